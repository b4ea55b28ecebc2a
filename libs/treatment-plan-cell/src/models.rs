use serde::{Deserialize, Serialize};
use shared_models::visibility::PatientOwned;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub treatment_plan_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub arv_protocol: Option<String>,
    pub treatment_line: Option<i32>,
    pub diagnosis: Option<String>,
    pub treatment_result: Option<String>,
}

impl PatientOwned for TreatmentPlan {
    fn owner_patient_id(&self) -> &str {
        &self.patient_id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTreatmentPlanRequest {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub doctor_id: String,
    pub arv_protocol: Option<String>,
    pub treatment_line: Option<i32>,
    pub diagnosis: Option<String>,
    pub treatment_result: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTreatmentPlanRequest {
    #[serde(default)]
    pub treatment_plan_id: String,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub doctor_id: String,
    pub arv_protocol: Option<String>,
    pub treatment_line: Option<i32>,
    pub diagnosis: Option<String>,
    pub treatment_result: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TreatmentPlanError {
    #[error("Dữ liệu không hợp lệ")]
    InvalidData,

    #[error("Thêm kế hoạch điều trị thất bại")]
    CreateFailed,

    #[error("Cập nhật kế hoạch điều trị thất bại")]
    UpdateFailed,

    #[error("Không tìm thấy kế hoạch điều trị.")]
    NotFound,

    #[error("Bạn không có quyền thực hiện thao tác này.")]
    Forbidden,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for TreatmentPlanError {
    fn from(err: anyhow::Error) -> Self {
        TreatmentPlanError::DatabaseError(err.to_string())
    }
}
