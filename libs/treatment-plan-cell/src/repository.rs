use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::TreatmentPlan;

const TABLE: &str = "/rest/v1/treatment_plans";

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TreatmentPlanRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<TreatmentPlan>>;

    async fn find_by_id(&self, treatment_plan_id: &str) -> Result<Option<TreatmentPlan>>;

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<TreatmentPlan>>;

    /// Every `treatment_plan_id` currently stored.
    async fn all_ids(&self) -> Result<Vec<String>>;

    async fn insert(&self, plan: &TreatmentPlan) -> Result<TreatmentPlan>;

    async fn update(&self, plan: &TreatmentPlan) -> Result<Option<TreatmentPlan>>;
}

pub struct SupabaseTreatmentPlanRepository {
    supabase: SupabaseClient,
    auth_token: String,
}

impl SupabaseTreatmentPlanRepository {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.to_string(),
        }
    }

    async fn select(&self, query: &str) -> Result<Vec<TreatmentPlan>> {
        self.supabase
            .request(Method::GET, &format!("{}?{}", TABLE, query), Some(&self.auth_token), None)
            .await
    }
}

#[async_trait]
impl TreatmentPlanRepository for SupabaseTreatmentPlanRepository {
    async fn find_all(&self) -> Result<Vec<TreatmentPlan>> {
        debug!("Fetching all treatment plans");
        self.select("order=treatment_plan_id.asc").await
    }

    async fn find_by_id(&self, treatment_plan_id: &str) -> Result<Option<TreatmentPlan>> {
        debug!("Fetching treatment plan {}", treatment_plan_id);

        let rows = self
            .select(&format!("treatment_plan_id=eq.{}&limit=1", urlencoding::encode(treatment_plan_id)))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<TreatmentPlan>> {
        debug!("Fetching treatment plans of patient {}", patient_id);
        self.select(&format!(
            "patient_id=eq.{}&order=treatment_plan_id.asc",
            urlencoding::encode(patient_id)
        ))
        .await
    }

    async fn all_ids(&self) -> Result<Vec<String>> {
        self.supabase
            .key_values("treatment_plans", "treatment_plan_id", Some(&self.auth_token))
            .await
    }

    async fn insert(&self, plan: &TreatmentPlan) -> Result<TreatmentPlan> {
        debug!("Inserting treatment plan {}", plan.treatment_plan_id);

        let rows: Vec<TreatmentPlan> = self.supabase
            .request_with_headers(
                Method::POST,
                TABLE,
                Some(&self.auth_token),
                Some(serde_json::to_value(plan)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert of treatment plan {} returned no row", plan.treatment_plan_id))
    }

    async fn update(&self, plan: &TreatmentPlan) -> Result<Option<TreatmentPlan>> {
        debug!("Updating treatment plan {}", plan.treatment_plan_id);

        let path = format!("{}?treatment_plan_id=eq.{}", TABLE, urlencoding::encode(&plan.treatment_plan_id));
        let rows: Vec<TreatmentPlan> = self.supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(&self.auth_token),
                Some(serde_json::to_value(plan)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        Ok(rows.into_iter().next())
    }
}
