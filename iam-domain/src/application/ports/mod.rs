pub mod auth;
pub mod config;
pub mod management_api;
pub mod mapper;
pub mod store;

pub use auth::*;
pub use config::*;
pub use management_api::*;
pub use mapper::*;
pub use store::*;
