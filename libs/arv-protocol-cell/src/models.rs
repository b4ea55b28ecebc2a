use serde::{Deserialize, Serialize};

/// An antiretroviral regimen. `arv_code` and `arv_name` are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArvProtocol {
    pub arv_id: String,
    pub arv_code: String,
    pub arv_name: String,
    pub description: Option<String>,
    pub age_range: Option<String>,
    pub for_group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArvProtocolRequest {
    pub arv_code: String,
    pub arv_name: String,
    pub description: Option<String>,
    pub age_range: Option<String>,
    pub for_group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateArvProtocolRequest {
    pub arv_id: String,
    pub arv_code: String,
    pub arv_name: String,
    pub description: Option<String>,
    pub age_range: Option<String>,
    pub for_group: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ArvProtocolError {
    #[error("Không có phác đồ ARV nào.")]
    Empty,

    #[error("Không tìm thấy phác đồ ARV.")]
    NotFound,

    #[error("Mã hoặc tên phác đồ ARV đã tồn tại.")]
    Duplicate,

    #[error("Phác đồ ARV không tồn tại hoặc cập nhật không thành công.")]
    UpdateFailed,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<anyhow::Error> for ArvProtocolError {
    fn from(err: anyhow::Error) -> Self {
        ArvProtocolError::DatabaseError(err.to_string())
    }
}
