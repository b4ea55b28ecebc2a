use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use arv_protocol_cell::router::arv_protocol_routes;
use doctor_cell::router::create_doctor_router;
use lab_test_cell::router::lab_test_routes;
use patient_cell::router::create_patient_router;
use prescription_cell::router::prescription_routes;
use shared_config::AppConfig;
use treatment_plan_cell::router::treatment_plan_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "HIV Treatment API is running!" }))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/arv-protocols", arv_protocol_routes(state.clone()))
        .nest("/prescriptions", prescription_routes(state.clone()))
        .nest("/treatment-plans", treatment_plan_routes(state.clone()))
        .nest("/lab-tests", lab_test_routes(state.clone()))
        .nest("/patients", create_patient_router(state.clone()))
        .nest("/doctors", create_doctor_router(state))
}
