use std::sync::Arc;
use axum::{middleware, routing::get, Router};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn arv_protocol_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_protocols).post(create_protocol).put(update_protocol))
        .route("/{arv_id}", get(get_protocol))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
