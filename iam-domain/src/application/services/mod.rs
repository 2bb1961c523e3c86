pub mod entity_management;
pub mod user_management;

pub use entity_management::*;
pub use user_management::*;
