pub mod api;
pub mod application;
pub mod common;
pub mod grant;
pub mod user;

pub use api::*;
pub use application::*;
pub use common::*;
pub use grant::*;
pub use user::*;
