use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub user_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub blood_type: Option<String>,
    pub allergy: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("Không tìm thấy hồ sơ bệnh nhân")]
    NotFound,

    #[error("Bạn không có quyền thực hiện thao tác này.")]
    Forbidden,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
