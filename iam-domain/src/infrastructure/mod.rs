pub mod adapters;
pub mod logging;
pub mod wiring;
