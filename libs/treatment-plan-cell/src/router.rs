use std::sync::Arc;
use axum::{middleware, routing::get, Router};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn treatment_plan_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_treatment_plans).post(create_treatment_plan).put(update_treatment_plan))
        .route("/patient/{patient_id}", get(get_patient_treatment_plans))
        .route("/{treatment_plan_id}", get(get_treatment_plan))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
