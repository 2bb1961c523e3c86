pub mod auth0_mappers;
pub mod auth0_models;
pub mod auth0_rest;
pub mod auth0_store;
pub mod auth0_token_manager;
pub mod env_config;
pub mod memory_store;

pub use auth0_mappers::*;
pub use auth0_rest::*;
pub use auth0_store::*;
pub use auth0_token_manager::*;
pub use env_config::*;
pub use memory_store::*;
