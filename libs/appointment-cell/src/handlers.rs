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

use crate::models::{AppointmentError, BookAppointmentRequest, CancelAppointmentRequest};
use crate::services::{AppointmentAction, AppointmentService};

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::InvalidBookingDate
            | AppointmentError::DoctorNotWorking
            | AppointmentError::DoctorAlreadyBooked
            | AppointmentError::InvalidStatusTransition { .. } => AppError::BadRequest(err.to_string()),
            AppointmentError::PatientNotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::Forbidden => AppError::Forbidden(err.to_string()),
            AppointmentError::StatusChanged => AppError::Conflict(err.to_string()),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

const STAFF_ROLES: [Role; 3] = [Role::Admin, Role::Manager, Role::Staff];

// ==============================================================================
// PATIENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;
    caller.require_any(&[Role::Patient])?;

    let service = AppointmentService::new(&config, auth.token());
    let appointment = service.book_appointment(&caller, request).await?;

    Ok(success_with("Đặt lịch hẹn thành công.", &appointment))
}

#[axum::debug_handler]
pub async fn cancel_by_patient(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(book_id): Path<String>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    transition(config, auth.token(), user, &book_id, AppointmentAction::CancelByPatient,
               request.reason.as_deref()).await
}

#[axum::debug_handler]
pub async fn patient_check_in(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(book_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    transition(config, auth.token(), user, &book_id, AppointmentAction::PatientCheckIn, None).await
}

#[axum::debug_handler]
pub async fn get_my_appointments(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;
    caller.require_any(&[Role::Patient])?;

    let service = AppointmentService::new(&config, auth.token());
    let appointments = service.my_appointments(&caller).await?;

    Ok(Json(json!(appointments)))
}

// ==============================================================================
// DOCTOR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn doctor_checkout(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(book_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    transition(config, auth.token(), user, &book_id, AppointmentAction::DoctorCheckout, None).await
}

#[axum::debug_handler]
pub async fn cancel_by_doctor(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(book_id): Path<String>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    transition(config, auth.token(), user, &book_id, AppointmentAction::CancelByDoctor,
               request.reason.as_deref()).await
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;
    caller.require_any(&[Role::Doctor])?;

    let service = AppointmentService::new(&config, auth.token());
    let appointments = service.doctor_appointments(&caller).await?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_doctor_patient_appointments(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;
    caller.require_any(&[Role::Doctor])?;

    let service = AppointmentService::new(&config, auth.token());
    let appointments = service.doctor_patient_appointments(&caller).await?;

    Ok(Json(json!(appointments)))
}

// ==============================================================================
// SHARED HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_all_appointments(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;
    caller.require_any(&STAFF_ROLES)?;

    let service = AppointmentService::new(&config, auth.token());
    let appointments = service.all_appointments().await?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(book_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;

    let service = AppointmentService::new(&config, auth.token());
    let appointment = service.get_appointment(&caller, &book_id).await?;

    Ok(Json(json!(appointment)))
}

async fn transition(
    config: Arc<AppConfig>,
    token: &str,
    user: User,
    book_id: &str,
    action: AppointmentAction,
    reason: Option<&str>,
) -> Result<Json<Value>, AppError> {
    let caller = CallerContext::from_user(&user)?;
    let role = match action {
        AppointmentAction::PatientCheckIn | AppointmentAction::CancelByPatient => Role::Patient,
        AppointmentAction::DoctorCheckout | AppointmentAction::CancelByDoctor => Role::Doctor,
    };
    caller.require_any(&[role])?;

    let service = AppointmentService::new(&config, token);
    let appointment = service.transition(&caller, book_id, action, reason).await?;

    Ok(success_with(action.success_message(), &appointment))
}
