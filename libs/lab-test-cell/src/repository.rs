use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::LabTest;

const TABLE: &str = "/rest/v1/lab_tests";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabTestRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<LabTest>>;

    async fn find_by_id(&self, lab_test_id: &str) -> Result<Option<LabTest>>;

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<LabTest>>;

    /// Every `lab_test_id` currently stored.
    async fn all_ids(&self) -> Result<Vec<String>>;

    async fn insert(&self, lab_test: &LabTest) -> Result<LabTest>;

    async fn update(&self, lab_test: &LabTest) -> Result<Option<LabTest>>;

    /// Whether a row was actually removed.
    async fn delete(&self, lab_test_id: &str) -> Result<bool>;
}

pub struct SupabaseLabTestRepository {
    supabase: SupabaseClient,
    auth_token: String,
}

impl SupabaseLabTestRepository {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.to_string(),
        }
    }

    fn by_id(lab_test_id: &str) -> String {
        format!("{}?lab_test_id=eq.{}", TABLE, urlencoding::encode(lab_test_id))
    }

    async fn write(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> Result<Vec<LabTest>> {
        self.supabase
            .request_with_headers(
                method,
                path,
                Some(&self.auth_token),
                body,
                Some(SupabaseClient::representation_headers()),
            )
            .await
    }
}

#[async_trait]
impl LabTestRepository for SupabaseLabTestRepository {
    async fn find_all(&self) -> Result<Vec<LabTest>> {
        debug!("Fetching all lab tests");
        self.supabase
            .request(Method::GET, &format!("{}?order=lab_test_id.asc", TABLE), Some(&self.auth_token), None)
            .await
    }

    async fn find_by_id(&self, lab_test_id: &str) -> Result<Option<LabTest>> {
        debug!("Fetching lab test {}", lab_test_id);

        let rows: Vec<LabTest> = self.supabase
            .request(Method::GET, &format!("{}&limit=1", Self::by_id(lab_test_id)), Some(&self.auth_token), None)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<LabTest>> {
        debug!("Fetching lab tests of patient {}", patient_id);

        let path = format!("{}?patient_id=eq.{}&order=lab_test_id.asc", TABLE, urlencoding::encode(patient_id));
        self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await
    }

    async fn all_ids(&self) -> Result<Vec<String>> {
        self.supabase
            .key_values("lab_tests", "lab_test_id", Some(&self.auth_token))
            .await
    }

    async fn insert(&self, lab_test: &LabTest) -> Result<LabTest> {
        debug!("Inserting lab test {}", lab_test.lab_test_id);

        self.write(Method::POST, TABLE, Some(serde_json::to_value(lab_test)?))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert of lab test {} returned no row", lab_test.lab_test_id))
    }

    async fn update(&self, lab_test: &LabTest) -> Result<Option<LabTest>> {
        debug!("Updating lab test {}", lab_test.lab_test_id);

        let rows = self
            .write(Method::PATCH, &Self::by_id(&lab_test.lab_test_id), Some(serde_json::to_value(lab_test)?))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, lab_test_id: &str) -> Result<bool> {
        debug!("Deleting lab test {}", lab_test_id);

        let rows = self.write(Method::DELETE, &Self::by_id(lab_test_id), None).await?;
        Ok(!rows.is_empty())
    }
}
