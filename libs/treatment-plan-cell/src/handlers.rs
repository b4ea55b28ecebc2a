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

use crate::models::{CreateTreatmentPlanRequest, TreatmentPlanError, UpdateTreatmentPlanRequest};
use crate::services::TreatmentPlanService;

const PLAN_WRITERS: [Role; 3] = [Role::Admin, Role::Manager, Role::Doctor];

impl From<TreatmentPlanError> for AppError {
    fn from(err: TreatmentPlanError) -> Self {
        match err {
            TreatmentPlanError::InvalidData
            | TreatmentPlanError::CreateFailed
            | TreatmentPlanError::UpdateFailed => AppError::BadRequest(err.to_string()),
            TreatmentPlanError::NotFound => AppError::NotFound(err.to_string()),
            TreatmentPlanError::Forbidden => AppError::Forbidden(err.to_string()),
            TreatmentPlanError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[axum::debug_handler]
pub async fn create_treatment_plan(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateTreatmentPlanRequest>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;
    caller.require_any(&PLAN_WRITERS)?;

    let plan = TreatmentPlanService::new(&config, auth.token())
        .create_plan(&caller, request)
        .await?;

    Ok(success_with("Thêm kế hoạch điều trị thành công", &plan))
}

#[axum::debug_handler]
pub async fn update_treatment_plan(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateTreatmentPlanRequest>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;
    caller.require_any(&PLAN_WRITERS)?;

    let plan = TreatmentPlanService::new(&config, auth.token())
        .update_plan(&caller, request)
        .await?;

    Ok(success_with("Cập nhật kế hoạch điều trị thành công", &plan))
}

#[axum::debug_handler]
pub async fn list_treatment_plans(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    CallerContext::from_user(&user)?.require_any(&Role::CLINICAL)?;

    let plans = TreatmentPlanService::new(&config, auth.token())
        .list_plans()
        .await?;

    Ok(Json(json!(plans)))
}

#[axum::debug_handler]
pub async fn get_treatment_plan(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(treatment_plan_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;

    let plan = TreatmentPlanService::new(&config, auth.token())
        .get_plan(&caller, &treatment_plan_id)
        .await?;

    Ok(Json(json!(plan)))
}

#[axum::debug_handler]
pub async fn get_patient_treatment_plans(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;

    let plans = TreatmentPlanService::new(&config, auth.token())
        .plans_for_patient(&caller, &patient_id)
        .await?;

    Ok(Json(json!(plans)))
}
