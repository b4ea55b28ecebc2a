use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub prescription_id: String,
    pub medical_record_id: String,
    pub medication_id: String,
    pub doctor_id: String,
    pub dosage: Option<String>,
    pub line_of_treatment: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub medical_record_id: String,
    pub medication_id: String,
    pub doctor_id: String,
    pub dosage: Option<String>,
    pub line_of_treatment: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePrescriptionRequest {
    pub prescription_id: String,
    pub medical_record_id: String,
    pub medication_id: String,
    pub doctor_id: String,
    pub dosage: Option<String>,
    pub line_of_treatment: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PrescriptionError {
    #[error("Kê đơn thuốc không thành công")]
    CreateFailed,

    #[error("Cập nhật đơn thuốc không thành công")]
    UpdateFailed,

    #[error("Không tìm thấy đơn thuốc.")]
    NotFound,

    #[error("Ngày kết thúc phải sau ngày bắt đầu")]
    InvalidDateRange,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for PrescriptionError {
    fn from(err: anyhow::Error) -> Self {
        PrescriptionError::DatabaseError(err.to_string())
    }
}
