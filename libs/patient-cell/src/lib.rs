pub mod models;
pub mod handlers;
pub mod repository;
pub mod router;
pub mod services;

pub use models::*;
pub use handlers::*;
pub use repository::{PatientRepository, SupabasePatientRepository};
pub use router::*;
