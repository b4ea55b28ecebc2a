use std::sync::Arc;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_utils::SequentialId;

use crate::models::{ArvProtocol, ArvProtocolError, CreateArvProtocolRequest, UpdateArvProtocolRequest};
use crate::repository::{ArvProtocolRepository, SupabaseArvProtocolRepository};

pub const ARV_ID: SequentialId = SequentialId::new("AP", 6);

/// Whether any protocol other than `exclude_id` already uses `code` or `name`.
pub fn has_duplicate(existing: &[ArvProtocol], code: &str, name: &str, exclude_id: Option<&str>) -> bool {
    existing
        .iter()
        .filter(|p| Some(p.arv_id.as_str()) != exclude_id)
        .any(|p| p.arv_code == code || p.arv_name == name)
}

pub struct ArvProtocolService {
    repository: Arc<dyn ArvProtocolRepository>,
}

impl ArvProtocolService {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self::with_repository(Arc::new(SupabaseArvProtocolRepository::new(config, auth_token)))
    }

    pub fn with_repository(repository: Arc<dyn ArvProtocolRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_protocols(&self) -> Result<Vec<ArvProtocol>, ArvProtocolError> {
        let protocols = self.repository.find_all().await?;
        if protocols.is_empty() {
            return Err(ArvProtocolError::Empty);
        }
        Ok(protocols)
    }

    pub async fn get_protocol(&self, arv_id: &str) -> Result<ArvProtocol, ArvProtocolError> {
        self.repository
            .find_by_id(arv_id)
            .await?
            .ok_or(ArvProtocolError::NotFound)
    }

    /// Inserts a protocol under the next `AP` identifier. Duplicate codes or
    /// names are rejected before anything is written.
    pub async fn create_protocol(&self, request: CreateArvProtocolRequest) -> Result<ArvProtocol, ArvProtocolError> {
        let existing = self.repository.find_all().await?;
        if has_duplicate(&existing, &request.arv_code, &request.arv_name, None) {
            warn!("ARV protocol {} / {} already exists", request.arv_code, request.arv_name);
            return Err(ArvProtocolError::Duplicate);
        }

        let protocol = ArvProtocol {
            arv_id: ARV_ID.next_from_max(existing.iter().map(|p| p.arv_id.as_str())),
            arv_code: request.arv_code,
            arv_name: request.arv_name,
            description: request.description,
            age_range: request.age_range,
            for_group: request.for_group,
        };
        debug!("Creating ARV protocol {}", protocol.arv_id);

        let created = self.repository.insert(&protocol).await?;
        info!("ARV protocol {} created", created.arv_id);
        Ok(created)
    }

    pub async fn update_protocol(&self, request: UpdateArvProtocolRequest) -> Result<ArvProtocol, ArvProtocolError> {
        let existing = self.repository.find_all().await?;
        if !existing.iter().any(|p| p.arv_id == request.arv_id) {
            return Err(ArvProtocolError::UpdateFailed);
        }
        if has_duplicate(&existing, &request.arv_code, &request.arv_name, Some(&request.arv_id)) {
            warn!("ARV protocol update {} collides with another code or name", request.arv_id);
            return Err(ArvProtocolError::Duplicate);
        }

        let protocol = ArvProtocol {
            arv_id: request.arv_id,
            arv_code: request.arv_code,
            arv_name: request.arv_name,
            description: request.description,
            age_range: request.age_range,
            for_group: request.for_group,
        };

        let updated = self
            .repository
            .update(&protocol)
            .await?
            .ok_or(ArvProtocolError::UpdateFailed)?;
        info!("ARV protocol {} updated", updated.arv_id);
        Ok(updated)
    }
}
