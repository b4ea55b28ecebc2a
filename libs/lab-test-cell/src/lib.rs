pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use models::*;
pub use repository::{LabTestRepository, SupabaseLabTestRepository};
pub use router::lab_test_routes;
pub use services::LabTestService;
