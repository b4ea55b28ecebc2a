use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::Prescription;

const TABLE: &str = "/rest/v1/prescriptions";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrescriptionRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Prescription>>;

    async fn find_by_id(&self, prescription_id: &str) -> Result<Option<Prescription>>;

    /// Every `prescription_id` currently stored.
    async fn all_ids(&self) -> Result<Vec<String>>;

    async fn insert(&self, prescription: &Prescription) -> Result<Prescription>;

    async fn update(&self, prescription: &Prescription) -> Result<Option<Prescription>>;
}

pub struct SupabasePrescriptionRepository {
    supabase: SupabaseClient,
    auth_token: String,
}

impl SupabasePrescriptionRepository {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.to_string(),
        }
    }
}

#[async_trait]
impl PrescriptionRepository for SupabasePrescriptionRepository {
    async fn find_all(&self) -> Result<Vec<Prescription>> {
        debug!("Fetching all prescriptions");
        self.supabase
            .request(Method::GET, &format!("{}?order=prescription_id.asc", TABLE), Some(&self.auth_token), None)
            .await
    }

    async fn find_by_id(&self, prescription_id: &str) -> Result<Option<Prescription>> {
        debug!("Fetching prescription {}", prescription_id);

        let path = format!("{}?prescription_id=eq.{}&limit=1", TABLE, urlencoding::encode(prescription_id));
        let rows: Vec<Prescription> = self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn all_ids(&self) -> Result<Vec<String>> {
        self.supabase
            .key_values("prescriptions", "prescription_id", Some(&self.auth_token))
            .await
    }

    async fn insert(&self, prescription: &Prescription) -> Result<Prescription> {
        debug!("Inserting prescription {}", prescription.prescription_id);

        let rows: Vec<Prescription> = self.supabase
            .request_with_headers(
                Method::POST,
                TABLE,
                Some(&self.auth_token),
                Some(serde_json::to_value(prescription)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert of prescription {} returned no row", prescription.prescription_id))
    }

    async fn update(&self, prescription: &Prescription) -> Result<Option<Prescription>> {
        debug!("Updating prescription {}", prescription.prescription_id);

        let path = format!("{}?prescription_id=eq.{}", TABLE, urlencoding::encode(&prescription.prescription_id));
        let rows: Vec<Prescription> = self.supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(&self.auth_token),
                Some(serde_json::to_value(prescription)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        Ok(rows.into_iter().next())
    }
}
