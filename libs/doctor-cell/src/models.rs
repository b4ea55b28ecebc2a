use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: String,
    pub user_id: String,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub experience_years: Option<i32>,
}

/// A calendar date on which a doctor accepts bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorWorkSchedule {
    pub schedule_id: String,
    pub doctor_id: String,
    pub slot_id: Option<String>,
    pub date_work: NaiveDate,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DoctorError {
    #[error("Không tìm thấy bác sĩ")]
    NotFound,

    #[error("Bạn không có quyền thực hiện thao tác này.")]
    Forbidden,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
