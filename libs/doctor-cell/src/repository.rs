use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Doctor, DoctorWorkSchedule};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn find_by_id(&self, doctor_id: &str) -> Result<Option<Doctor>>;

    /// The doctor record linked to an authenticated user.
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Doctor>>;

    /// Every work date of a doctor, earliest first.
    async fn schedules_for(&self, doctor_id: &str) -> Result<Vec<DoctorWorkSchedule>>;

    async fn schedules_on(&self, doctor_id: &str, date: NaiveDate) -> Result<Vec<DoctorWorkSchedule>>;
}

pub struct SupabaseDoctorRepository {
    supabase: SupabaseClient,
    auth_token: String,
}

impl SupabaseDoctorRepository {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.to_string(),
        }
    }

    async fn first_doctor_where(&self, column: &str, value: &str) -> Result<Option<Doctor>> {
        let path = format!(
            "/rest/v1/doctors?{}=eq.{}&limit=1",
            column,
            urlencoding::encode(value)
        );
        let rows: Vec<Doctor> = self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await?;

        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl DoctorRepository for SupabaseDoctorRepository {
    async fn find_by_id(&self, doctor_id: &str) -> Result<Option<Doctor>> {
        debug!("Fetching doctor {}", doctor_id);
        self.first_doctor_where("doctor_id", doctor_id).await
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Doctor>> {
        debug!("Fetching doctor linked to user {}", user_id);
        self.first_doctor_where("user_id", user_id).await
    }

    async fn schedules_for(&self, doctor_id: &str) -> Result<Vec<DoctorWorkSchedule>> {
        debug!("Fetching work schedule for doctor {}", doctor_id);

        let path = format!(
            "/rest/v1/doctor_work_schedules?doctor_id=eq.{}&order=date_work.asc",
            urlencoding::encode(doctor_id)
        );
        self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await
    }

    async fn schedules_on(&self, doctor_id: &str, date: NaiveDate) -> Result<Vec<DoctorWorkSchedule>> {
        debug!("Fetching work schedule for doctor {} on {}", doctor_id, date);

        let path = format!(
            "/rest/v1/doctor_work_schedules?doctor_id=eq.{}&date_work=eq.{}",
            urlencoding::encode(doctor_id),
            date.format("%Y-%m-%d")
        );
        self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await
    }
}
