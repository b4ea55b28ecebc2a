pub mod plan;

pub use plan::{TreatmentPlanService, TREATMENT_PLAN_ID};
