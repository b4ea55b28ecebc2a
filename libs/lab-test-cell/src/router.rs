use std::sync::Arc;
use axum::{middleware, routing::get, Router};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn lab_test_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_lab_tests).post(create_lab_test))
        .route("/my", get(get_my_lab_tests))
        .route("/{lab_test_id}", get(get_lab_test).put(update_lab_test).delete(delete_lab_test))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
