pub mod auth;
pub mod error;
pub mod response;
pub mod role;
pub mod visibility;

pub use auth::{CallerContext, User};
pub use error::AppError;
pub use role::Role;
pub use visibility::{PatientOwned, Visibility};
