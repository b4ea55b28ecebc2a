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

use crate::models::{CreatePrescriptionRequest, PrescriptionError, UpdatePrescriptionRequest};
use crate::services::PrescriptionService;

const VIEW_FORBIDDEN_MESSAGE: &str = "Bạn không có quyền xem đơn thuốc!";
const PRESCRIBERS: [Role; 2] = [Role::Admin, Role::Doctor];

impl From<PrescriptionError> for AppError {
    fn from(err: PrescriptionError) -> Self {
        match err {
            PrescriptionError::CreateFailed
            | PrescriptionError::UpdateFailed
            | PrescriptionError::InvalidDateRange => AppError::BadRequest(err.to_string()),
            PrescriptionError::NotFound => AppError::NotFound(err.to_string()),
            PrescriptionError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn create_prescription(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&PRESCRIBERS)?;

    let prescription = PrescriptionService::new(&config, auth.token())
        .create_prescription(request)
        .await?;

    Ok(success_with("Kê đơn thuốc thành công", &prescription))
}

#[axum::debug_handler]
pub async fn update_prescription(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdatePrescriptionRequest>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&PRESCRIBERS)?;

    let prescription = PrescriptionService::new(&config, auth.token())
        .update_prescription(request)
        .await?;

    Ok(success_with("Cập nhật đơn thuốc thành công", &prescription))
}

/// Listing is refused with 400 rather than 403 for roles outside the clinic.
#[axum::debug_handler]
pub async fn list_prescriptions(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any_or(
        &Role::CLINICAL,
        AppError::BadRequest(VIEW_FORBIDDEN_MESSAGE.to_string()),
    )?;

    let prescriptions = PrescriptionService::new(&config, auth.token())
        .list_prescriptions()
        .await?;

    Ok(Json(json!(prescriptions)))
}

#[axum::debug_handler]
pub async fn get_prescription(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(prescription_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&Role::CLINICAL)?;

    let prescription = PrescriptionService::new(&config, auth.token())
        .get_prescription(&prescription_id)
        .await?;

    Ok(Json(json!(prescription)))
}
