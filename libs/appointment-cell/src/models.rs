use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use std::fmt;

use shared_models::visibility::PatientOwned;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub book_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub booking_type: Option<String>,
    pub book_date: NaiveDateTime,
    pub status: AppointmentStatus,
    pub note: Option<String>,
}

impl PatientOwned for Appointment {
    fn owner_patient_id(&self) -> &str {
        &self.patient_id
    }

    fn attending_doctor_id(&self) -> Option<&str> {
        Some(&self.doctor_id)
    }
}

/// Stored status strings of `books_appointments.status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    #[serde(rename = "Thành công")]
    Booked,
    #[serde(rename = "Đã xác nhận")]
    Confirmed,
    #[serde(rename = "Đã khám")]
    Completed,
    #[serde(rename = "Đã hủy")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "Thành công",
            AppointmentStatus::Confirmed => "Đã xác nhận",
            AppointmentStatus::Completed => "Đã khám",
            AppointmentStatus::Cancelled => "Đã hủy",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub booking_type: Option<String>,
    pub book_date: NaiveDateTime,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Ngày đặt lịch không hợp lệ")]
    InvalidBookingDate,

    #[error("Bác sĩ không làm việc vào thời gian này")]
    DoctorNotWorking,

    #[error("Bác sĩ đã có lịch hẹn trong ngày này")]
    DoctorAlreadyBooked,

    #[error("Không tìm thấy hồ sơ bệnh nhân")]
    PatientNotFound,

    #[error("Không tìm thấy bác sĩ")]
    DoctorNotFound,

    #[error("Không tìm thấy lịch hẹn")]
    NotFound,

    #[error("Bạn không có quyền thực hiện thao tác này.")]
    Forbidden,

    #[error("Appointment cannot be {action} while its status is \"{status}\".")]
    InvalidStatusTransition {
        action: &'static str,
        status: AppointmentStatus,
    },

    #[error("Trạng thái lịch hẹn đã thay đổi, vui lòng thử lại")]
    StatusChanged,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for AppointmentError {
    fn from(err: anyhow::Error) -> Self {
        AppointmentError::DatabaseError(err.to_string())
    }
}
