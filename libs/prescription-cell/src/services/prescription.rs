use std::sync::Arc;
use chrono::NaiveDate;
use tracing::{error, info};

use shared_config::AppConfig;
use shared_utils::SequentialId;

use crate::models::{CreatePrescriptionRequest, Prescription, PrescriptionError, UpdatePrescriptionRequest};
use crate::repository::{PrescriptionRepository, SupabasePrescriptionRepository};

pub const PRESCRIPTION_ID: SequentialId = SequentialId::new("PR", 6);

fn validate_period(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), PrescriptionError> {
    if end_date < start_date {
        return Err(PrescriptionError::InvalidDateRange);
    }
    Ok(())
}

pub struct PrescriptionService {
    repository: Arc<dyn PrescriptionRepository>,
}

impl PrescriptionService {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self::with_repository(Arc::new(SupabasePrescriptionRepository::new(config, auth_token)))
    }

    pub fn with_repository(repository: Arc<dyn PrescriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_prescriptions(&self) -> Result<Vec<Prescription>, PrescriptionError> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn get_prescription(&self, prescription_id: &str) -> Result<Prescription, PrescriptionError> {
        self.repository
            .find_by_id(prescription_id)
            .await?
            .ok_or(PrescriptionError::NotFound)
    }

    pub async fn create_prescription(&self, request: CreatePrescriptionRequest) -> Result<Prescription, PrescriptionError> {
        validate_period(request.start_date, request.end_date)?;

        let ids = self.repository.all_ids().await?;
        let prescription = Prescription {
            prescription_id: PRESCRIPTION_ID.next_from_max(ids.iter().map(String::as_str)),
            medical_record_id: request.medical_record_id,
            medication_id: request.medication_id,
            doctor_id: request.doctor_id,
            dosage: request.dosage,
            line_of_treatment: request.line_of_treatment,
            start_date: request.start_date,
            end_date: request.end_date,
        };

        let created = self.repository.insert(&prescription).await.map_err(|e| {
            error!("Failed to insert prescription {}: {}", prescription.prescription_id, e);
            PrescriptionError::CreateFailed
        })?;

        info!("Prescription {} created", created.prescription_id);
        Ok(created)
    }

    pub async fn update_prescription(&self, request: UpdatePrescriptionRequest) -> Result<Prescription, PrescriptionError> {
        validate_period(request.start_date, request.end_date)?;

        let prescription = Prescription {
            prescription_id: request.prescription_id,
            medical_record_id: request.medical_record_id,
            medication_id: request.medication_id,
            doctor_id: request.doctor_id,
            dosage: request.dosage,
            line_of_treatment: request.line_of_treatment,
            start_date: request.start_date,
            end_date: request.end_date,
        };

        let updated = self
            .repository
            .update(&prescription)
            .await
            .map_err(|e| {
                error!("Failed to update prescription {}: {}", prescription.prescription_id, e);
                PrescriptionError::UpdateFailed
            })?
            .ok_or(PrescriptionError::UpdateFailed)?;

        info!("Prescription {} updated", updated.prescription_id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use assert_matches::assert_matches;
    use crate::repository::MockPrescriptionRepository;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn create_request(start: NaiveDate, end: NaiveDate) -> CreatePrescriptionRequest {
        CreatePrescriptionRequest {
            medical_record_id: "TP000001".to_string(),
            medication_id: "MED001".to_string(),
            doctor_id: "D001".to_string(),
            dosage: Some("1 tablet daily".to_string()),
            line_of_treatment: Some("First line".to_string()),
            start_date: start,
            end_date: end,
        }
    }

    fn update_request(prescription_id: &str) -> UpdatePrescriptionRequest {
        UpdatePrescriptionRequest {
            prescription_id: prescription_id.to_string(),
            medical_record_id: "TP000001".to_string(),
            medication_id: "MED002".to_string(),
            doctor_id: "D001".to_string(),
            dosage: Some("2 tablets daily".to_string()),
            line_of_treatment: None,
            start_date: date(1),
            end_date: date(20),
        }
    }

    #[tokio::test]
    async fn test_create_follows_highest_id() {
        let mut repo = MockPrescriptionRepository::new();
        repo.expect_all_ids().returning(|| Ok(vec!["PR000002".to_string(), "PR000005".to_string()]));
        repo.expect_insert().times(1).returning(|p| Ok(p.clone()));

        let service = PrescriptionService::with_repository(Arc::new(repo));
        let created = service.create_prescription(create_request(date(1), date(10))).await.unwrap();

        assert_eq!(created.prescription_id, "PR000006");
    }

    #[tokio::test]
    async fn test_malformed_ids_restart_sequence() {
        let mut repo = MockPrescriptionRepository::new();
        repo.expect_all_ids().returning(|| Ok(vec!["BADID".to_string()]));
        repo.expect_insert().returning(|p| Ok(p.clone()));

        let service = PrescriptionService::with_repository(Arc::new(repo));
        let created = service.create_prescription(create_request(date(1), date(1))).await.unwrap();

        assert_eq!(created.prescription_id, "PR000001");
    }

    #[tokio::test]
    async fn test_end_before_start_is_rejected() {
        let mut repo = MockPrescriptionRepository::new();
        repo.expect_insert().times(0);

        let service = PrescriptionService::with_repository(Arc::new(repo));
        let result = service.create_prescription(create_request(date(10), date(1))).await;

        assert_matches!(result, Err(PrescriptionError::InvalidDateRange));
    }

    #[tokio::test]
    async fn test_insert_failure_is_create_failed() {
        let mut repo = MockPrescriptionRepository::new();
        repo.expect_all_ids().returning(|| Ok(vec![]));
        repo.expect_insert().returning(|_| Err(anyhow!("duplicate key value")));

        let service = PrescriptionService::with_repository(Arc::new(repo));
        let result = service.create_prescription(create_request(date(1), date(2))).await;

        assert_matches!(result, Err(PrescriptionError::CreateFailed));
    }

    #[tokio::test]
    async fn test_update_of_unknown_prescription() {
        let mut repo = MockPrescriptionRepository::new();
        repo.expect_update().returning(|_| Ok(None));

        let service = PrescriptionService::with_repository(Arc::new(repo));
        let result = service.update_prescription(update_request("PR999999")).await;

        assert_matches!(result, Err(PrescriptionError::UpdateFailed));
    }

    #[tokio::test]
    async fn test_update_returns_stored_row() {
        let mut repo = MockPrescriptionRepository::new();
        repo.expect_update().returning(|p| Ok(Some(p.clone())));

        let service = PrescriptionService::with_repository(Arc::new(repo));
        let updated = service.update_prescription(update_request("PR000002")).await.unwrap();

        assert_eq!(updated.medication_id, "MED002");
    }
}
