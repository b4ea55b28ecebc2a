use std::sync::Arc;
use axum::{
    extract::{Path, State, Extension},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{CallerContext, User};
use shared_models::error::AppError;
use shared_models::response::success_with;
use shared_models::role::Role;

use crate::models::{ArvProtocolError, CreateArvProtocolRequest, UpdateArvProtocolRequest};
use crate::services::ArvProtocolService;

impl From<ArvProtocolError> for AppError {
    fn from(err: ArvProtocolError) -> Self {
        match err {
            ArvProtocolError::Empty
            | ArvProtocolError::NotFound
            | ArvProtocolError::UpdateFailed => AppError::NotFound(err.to_string()),
            ArvProtocolError::Duplicate => AppError::BadRequest(err.to_string()),
            ArvProtocolError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn list_protocols(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&Role::CLINICAL)?;

    let protocols = ArvProtocolService::new(&config, auth.token()).list_protocols().await?;

    Ok(Json(json!(protocols)))
}

#[axum::debug_handler]
pub async fn get_protocol(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(arv_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&Role::CLINICAL)?;

    let protocol = ArvProtocolService::new(&config, auth.token()).get_protocol(&arv_id).await?;

    Ok(Json(json!(protocol)))
}

#[axum::debug_handler]
pub async fn create_protocol(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateArvProtocolRequest>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&[Role::Admin, Role::Manager])?;

    let protocol = ArvProtocolService::new(&config, auth.token()).create_protocol(request).await?;

    Ok(success_with("Thêm phác đồ ARV thành công.", &protocol))
}

#[axum::debug_handler]
pub async fn update_protocol(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateArvProtocolRequest>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&[Role::Admin, Role::Doctor])?;

    let protocol = ArvProtocolService::new(&config, auth.token()).update_protocol(request).await?;

    Ok(success_with("Cập nhật phác đồ ARV thành công.", &protocol))
}
