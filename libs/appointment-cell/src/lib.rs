pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use models::*;
pub use repository::{AppointmentRepository, SupabaseAppointmentRepository};
pub use router::appointment_routes;
pub use services::AppointmentService;
