use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::Patient;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn find_by_id(&self, patient_id: &str) -> Result<Option<Patient>>;

    /// The patient record linked to an authenticated user.
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Patient>>;
}

pub struct SupabasePatientRepository {
    supabase: SupabaseClient,
    auth_token: String,
}

impl SupabasePatientRepository {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.to_string(),
        }
    }

    async fn first_where(&self, column: &str, value: &str) -> Result<Option<Patient>> {
        let path = format!(
            "/rest/v1/patients?{}=eq.{}&limit=1",
            column,
            urlencoding::encode(value)
        );
        let rows: Vec<Patient> = self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await?;

        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl PatientRepository for SupabasePatientRepository {
    async fn find_by_id(&self, patient_id: &str) -> Result<Option<Patient>> {
        debug!("Fetching patient {}", patient_id);
        self.first_where("patient_id", patient_id).await
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Patient>> {
        debug!("Fetching patient linked to user {}", user_id);
        self.first_where("user_id", user_id).await
    }
}
