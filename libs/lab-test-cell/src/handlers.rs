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
use shared_models::response::{success, success_with};
use shared_models::role::Role;

use crate::models::{LabTestError, LabTestRequest};
use crate::services::LabTestService;

impl From<LabTestError> for AppError {
    fn from(err: LabTestError) -> Self {
        match err {
            LabTestError::NotFound
            | LabTestError::UpdateFailed
            | LabTestError::DeleteFailed
            | LabTestError::PatientNotFound => AppError::NotFound(err.to_string()),
            LabTestError::Forbidden => AppError::Forbidden(err.to_string()),
            LabTestError::InvalidData | LabTestError::CreateFailed => AppError::BadRequest(err.to_string()),
            LabTestError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn list_lab_tests(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&Role::CLINICAL)?;

    let tests = LabTestService::new(&config, auth.token()).list_tests().await?;
    Ok(Json(json!(tests)))
}

#[axum::debug_handler]
pub async fn get_my_lab_tests(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;
    caller.require_any(&[Role::Patient])?;

    let tests = LabTestService::new(&config, auth.token()).my_tests(&caller).await?;
    Ok(Json(json!(tests)))
}

#[axum::debug_handler]
pub async fn get_lab_test(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(lab_test_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;

    let lab_test = LabTestService::new(&config, auth.token())
        .get_test(&caller, &lab_test_id)
        .await?;

    Ok(Json(json!(lab_test)))
}

#[axum::debug_handler]
pub async fn create_lab_test(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<LabTestRequest>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&Role::CLINICAL)?;

    let lab_test = LabTestService::new(&config, auth.token())
        .create_test(request)
        .await?;

    Ok(success_with("Tạo mới LabTest thành công!", &lab_test))
}

#[axum::debug_handler]
pub async fn update_lab_test(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(lab_test_id): Path<String>,
    Json(request): Json<LabTestRequest>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&Role::CLINICAL)?;

    let lab_test = LabTestService::new(&config, auth.token())
        .update_test(&lab_test_id, request)
        .await?;

    Ok(success_with("Cập nhật LabTest thành công!", &lab_test))
}

#[axum::debug_handler]
pub async fn delete_lab_test(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(lab_test_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&Role::CLINICAL)?;

    LabTestService::new(&config, auth.token())
        .delete_test(&lab_test_id)
        .await?;

    Ok(success("Xóa LabTest thành công!"))
}
