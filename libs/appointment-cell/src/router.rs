use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        // Patient
        .route("/book", post(handlers::book_appointment))
        .route("/my", get(handlers::get_my_appointments))
        .route("/{book_id}/check-in", put(handlers::patient_check_in))
        .route("/{book_id}/cancel-by-patient", put(handlers::cancel_by_patient))

        // Doctor
        .route("/doctor", get(handlers::get_doctor_appointments))
        .route("/doctor/patients", get(handlers::get_doctor_patient_appointments))
        .route("/{book_id}/checkout", put(handlers::doctor_checkout))
        .route("/{book_id}/cancel-by-doctor", put(handlers::cancel_by_doctor))

        // Admin, manager, staff
        .route("/all", get(handlers::get_all_appointments))
        .route("/{book_id}", get(handlers::get_appointment))

        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
