use serde::{Deserialize, Serialize};
use shared_models::visibility::PatientOwned;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTest {
    pub lab_test_id: String,
    pub request_id: Option<String>,
    pub treatment_plan_id: String,
    pub patient_id: String,
    pub test_name: Option<String>,
    pub test_code: Option<String>,
    pub test_type: Option<String>,
    pub result_value: Option<String>,
    pub cd4_initial: Option<i32>,
    pub viral_load_initial: Option<i32>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl PatientOwned for LabTest {
    fn owner_patient_id(&self) -> &str {
        &self.patient_id
    }
}

/// Body of both create and update. The owning patient is always taken from
/// the referenced treatment plan, never from the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabTestRequest {
    pub request_id: Option<String>,
    #[serde(default)]
    pub treatment_plan_id: String,
    pub test_name: Option<String>,
    pub test_code: Option<String>,
    pub test_type: Option<String>,
    pub result_value: Option<String>,
    pub cd4_initial: Option<i32>,
    pub viral_load_initial: Option<i32>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl LabTestRequest {
    pub fn into_lab_test(self, lab_test_id: String, patient_id: String) -> LabTest {
        LabTest {
            lab_test_id,
            request_id: self.request_id,
            treatment_plan_id: self.treatment_plan_id,
            patient_id,
            test_name: self.test_name,
            test_code: self.test_code,
            test_type: self.test_type,
            result_value: self.result_value,
            cd4_initial: self.cd4_initial,
            viral_load_initial: self.viral_load_initial,
            status: self.status,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LabTestError {
    #[error("Không tìm thấy xét nghiệm.")]
    NotFound,

    #[error("Bạn không có quyền xem kết quả này.")]
    Forbidden,

    #[error("Dữ liệu không hợp lệ.")]
    InvalidData,

    #[error("Tạo mới LabTest không thành công.")]
    CreateFailed,

    #[error("LabTest không tồn tại hoặc cập nhật không thành công.")]
    UpdateFailed,

    #[error("LabTest này không tồn tại hoặc đã bị xóa.")]
    DeleteFailed,

    #[error("Không tìm thấy hồ sơ bệnh nhân")]
    PatientNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for LabTestError {
    fn from(err: anyhow::Error) -> Self {
        LabTestError::DatabaseError(err.to_string())
    }
}
