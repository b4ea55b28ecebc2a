pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use models::*;
pub use repository::{SupabaseTreatmentPlanRepository, TreatmentPlanRepository};
pub use router::treatment_plan_routes;
pub use services::TreatmentPlanService;
