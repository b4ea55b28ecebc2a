use std::sync::Arc;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::auth::CallerContext;
use shared_models::role::Role;

use crate::models::{Doctor, DoctorError, DoctorWorkSchedule};
use crate::repository::{DoctorRepository, SupabaseDoctorRepository};

pub struct DoctorService {
    repository: Arc<dyn DoctorRepository>,
}

impl DoctorService {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self::with_repository(Arc::new(SupabaseDoctorRepository::new(config, auth_token)))
    }

    pub fn with_repository(repository: Arc<dyn DoctorRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_my_profile(&self, caller: &CallerContext) -> Result<Doctor, DoctorError> {
        if caller.role != Role::Doctor {
            warn!("User {} with role {} requested a doctor profile", caller.user_id, caller.role);
            return Err(DoctorError::Forbidden);
        }

        self.repository
            .find_by_user_id(&caller.user_id)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .ok_or(DoctorError::NotFound)
    }

    /// Work dates of an existing doctor, earliest first.
    pub async fn list_schedules(&self, doctor_id: &str) -> Result<Vec<DoctorWorkSchedule>, DoctorError> {
        debug!("Listing work schedule for doctor {}", doctor_id);

        self.repository
            .find_by_id(doctor_id)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .ok_or(DoctorError::NotFound)?;

        self.repository
            .schedules_for(doctor_id)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }
}
