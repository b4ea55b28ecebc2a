use std::sync::Arc;
use axum::{middleware, routing::get, Router};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn create_doctor_router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/me", get(get_my_doctor_profile))
        .route("/{doctor_id}/schedules", get(get_doctor_schedules))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
