use std::sync::Arc;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::auth::CallerContext;
use shared_models::role::Role;

use crate::models::{Patient, PatientError};
use crate::repository::{PatientRepository, SupabasePatientRepository};

pub struct PatientService {
    repository: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self::with_repository(Arc::new(SupabasePatientRepository::new(config, auth_token)))
    }

    pub fn with_repository(repository: Arc<dyn PatientRepository>) -> Self {
        Self { repository }
    }

    /// The patient record linked to the calling patient.
    pub async fn get_my_profile(&self, caller: &CallerContext) -> Result<Patient, PatientError> {
        if caller.role != Role::Patient {
            warn!("User {} with role {} requested a patient profile", caller.user_id, caller.role);
            return Err(PatientError::Forbidden);
        }

        debug!("Loading patient profile for user {}", caller.user_id);

        self.repository
            .find_by_user_id(&caller.user_id)
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?
            .ok_or(PatientError::NotFound)
    }
}
