use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// `{"success": true, "message": ...}` body for mutations.
pub fn success(message: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message
    }))
}

/// Success body that also carries the affected record under `data`.
pub fn success_with<T: Serialize>(message: &str, data: &T) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "data": data
    }))
}
