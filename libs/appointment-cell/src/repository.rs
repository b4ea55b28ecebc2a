use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use reqwest::Method;
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, AppointmentStatus};

const TABLE: &str = "/rest/v1/books_appointments";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find_by_id(&self, book_id: &str) -> Result<Option<Appointment>>;

    /// Appointments of a doctor whose `book_date` falls on `date`, any status.
    async fn find_by_doctor_on(&self, doctor_id: &str, date: NaiveDate) -> Result<Vec<Appointment>>;

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<Appointment>>;

    async fn find_by_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>>;

    async fn find_by_patients(&self, patient_ids: &[String]) -> Result<Vec<Appointment>>;

    async fn find_all(&self) -> Result<Vec<Appointment>>;

    /// Every `book_id` currently stored.
    async fn all_ids(&self) -> Result<Vec<String>>;

    async fn insert(&self, appointment: &Appointment) -> Result<Appointment>;

    /// Moves an appointment from `from` to `status`. `None` when no row with
    /// that id still holds `from`.
    async fn update_status(
        &self,
        book_id: &str,
        from: AppointmentStatus,
        status: AppointmentStatus,
        note: Option<String>,
    ) -> Result<Option<Appointment>>;
}

pub struct SupabaseAppointmentRepository {
    supabase: SupabaseClient,
    auth_token: String,
}

impl SupabaseAppointmentRepository {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.to_string(),
        }
    }

    async fn select(&self, query: &str) -> Result<Vec<Appointment>> {
        let path = format!("{}?{}", TABLE, query);
        self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await
    }
}

#[async_trait]
impl AppointmentRepository for SupabaseAppointmentRepository {
    async fn find_by_id(&self, book_id: &str) -> Result<Option<Appointment>> {
        debug!("Fetching appointment {}", book_id);

        let rows = self
            .select(&format!("book_id=eq.{}&limit=1", urlencoding::encode(book_id)))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_by_doctor_on(&self, doctor_id: &str, date: NaiveDate) -> Result<Vec<Appointment>> {
        debug!("Fetching appointments of doctor {} on {}", doctor_id, date);

        let next_day = date + Duration::days(1);
        self.select(&format!(
            "doctor_id=eq.{}&book_date=gte.{}T00:00:00&book_date=lt.{}T00:00:00",
            urlencoding::encode(doctor_id),
            date.format("%Y-%m-%d"),
            next_day.format("%Y-%m-%d")
        ))
        .await
    }

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<Appointment>> {
        debug!("Fetching appointments of patient {}", patient_id);

        self.select(&format!(
            "patient_id=eq.{}&order=book_date.desc",
            urlencoding::encode(patient_id)
        ))
        .await
    }

    async fn find_by_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>> {
        debug!("Fetching appointments of doctor {}", doctor_id);

        self.select(&format!(
            "doctor_id=eq.{}&order=book_date.desc",
            urlencoding::encode(doctor_id)
        ))
        .await
    }

    async fn find_by_patients(&self, patient_ids: &[String]) -> Result<Vec<Appointment>> {
        if patient_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = patient_ids
            .iter()
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        debug!("Fetching appointments of patients ({})", ids);

        self.select(&format!("patient_id=in.({})&order=book_date.desc", ids)).await
    }

    async fn find_all(&self) -> Result<Vec<Appointment>> {
        debug!("Fetching all appointments");
        self.select("order=book_date.desc").await
    }

    async fn all_ids(&self) -> Result<Vec<String>> {
        self.supabase
            .key_values("books_appointments", "book_id", Some(&self.auth_token))
            .await
    }

    async fn insert(&self, appointment: &Appointment) -> Result<Appointment> {
        debug!("Inserting appointment {}", appointment.book_id);

        let rows: Vec<Appointment> = self.supabase
            .request_with_headers(
                Method::POST,
                TABLE,
                Some(&self.auth_token),
                Some(serde_json::to_value(appointment)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert of appointment {} returned no row", appointment.book_id))
    }

    async fn update_status(
        &self,
        book_id: &str,
        from: AppointmentStatus,
        status: AppointmentStatus,
        note: Option<String>,
    ) -> Result<Option<Appointment>> {
        debug!("Setting appointment {} from {} to {}", book_id, from, status);

        let rows: Vec<Appointment> = self.supabase
            .request_with_headers(
                Method::PATCH,
                &format!(
                    "{}?book_id=eq.{}&status=eq.{}",
                    TABLE,
                    urlencoding::encode(book_id),
                    urlencoding::encode(from.as_str())
                ),
                Some(&self.auth_token),
                Some(json!({ "status": status, "note": note })),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        Ok(rows.into_iter().next())
    }
}
