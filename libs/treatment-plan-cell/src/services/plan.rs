use std::sync::Arc;
use tracing::{error, info, warn};

use doctor_cell::repository::{DoctorRepository, SupabaseDoctorRepository};
use patient_cell::repository::{PatientRepository, SupabasePatientRepository};
use shared_config::AppConfig;
use shared_models::auth::CallerContext;
use shared_models::role::Role;
use shared_models::visibility::Visibility;
use shared_utils::SequentialId;

use crate::models::{CreateTreatmentPlanRequest, TreatmentPlan, TreatmentPlanError, UpdateTreatmentPlanRequest};
use crate::repository::{SupabaseTreatmentPlanRepository, TreatmentPlanRepository};

pub const TREATMENT_PLAN_ID: SequentialId = SequentialId::new("TP", 6);

pub struct TreatmentPlanService {
    plans: Arc<dyn TreatmentPlanRepository>,
    patients: Arc<dyn PatientRepository>,
    doctors: Arc<dyn DoctorRepository>,
}

impl TreatmentPlanService {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self::with_repositories(
            Arc::new(SupabaseTreatmentPlanRepository::new(config, auth_token)),
            Arc::new(SupabasePatientRepository::new(config, auth_token)),
            Arc::new(SupabaseDoctorRepository::new(config, auth_token)),
        )
    }

    pub fn with_repositories(
        plans: Arc<dyn TreatmentPlanRepository>,
        patients: Arc<dyn PatientRepository>,
        doctors: Arc<dyn DoctorRepository>,
    ) -> Self {
        Self { plans, patients, doctors }
    }

    /// Patients see their own plans; every other role sees all of them.
    async fn visibility(&self, caller: &CallerContext) -> Result<Visibility, TreatmentPlanError> {
        if caller.role != Role::Patient {
            return Ok(Visibility::All);
        }

        let patient_id = self.patients
            .find_by_user_id(&caller.user_id)
            .await?
            .map(|patient| patient.patient_id);
        Ok(Visibility::Patient(patient_id))
    }

    /// A doctor may only write plans that name their own doctor record.
    async fn ensure_attending(&self, caller: &CallerContext, doctor_id: &str) -> Result<(), TreatmentPlanError> {
        if caller.role != Role::Doctor {
            return Ok(());
        }

        let own = self.doctors.find_by_user_id(&caller.user_id).await?;
        match own {
            Some(doctor) if doctor.doctor_id == doctor_id => Ok(()),
            _ => {
                warn!("Doctor user {} tried to write a plan for doctor {}", caller.user_id, doctor_id);
                Err(TreatmentPlanError::Forbidden)
            }
        }
    }

    pub async fn list_plans(&self) -> Result<Vec<TreatmentPlan>, TreatmentPlanError> {
        Ok(self.plans.find_all().await?)
    }

    pub async fn get_plan(&self, caller: &CallerContext, treatment_plan_id: &str) -> Result<TreatmentPlan, TreatmentPlanError> {
        let plan = self.plans
            .find_by_id(treatment_plan_id)
            .await?
            .ok_or(TreatmentPlanError::NotFound)?;

        if !self.visibility(caller).await?.allows(&plan) {
            return Err(TreatmentPlanError::Forbidden);
        }

        Ok(plan)
    }

    pub async fn plans_for_patient(&self, caller: &CallerContext, patient_id: &str) -> Result<Vec<TreatmentPlan>, TreatmentPlanError> {
        if let Visibility::Patient(own) = self.visibility(caller).await? {
            if own.as_deref() != Some(patient_id) {
                return Err(TreatmentPlanError::Forbidden);
            }
        }

        Ok(self.plans.find_by_patient(patient_id).await?)
    }

    pub async fn create_plan(
        &self,
        caller: &CallerContext,
        request: CreateTreatmentPlanRequest,
    ) -> Result<TreatmentPlan, TreatmentPlanError> {
        if request.patient_id.trim().is_empty() || request.doctor_id.trim().is_empty() {
            return Err(TreatmentPlanError::InvalidData);
        }
        self.ensure_attending(caller, &request.doctor_id).await?;

        let ids = self.plans.all_ids().await?;
        let plan = TreatmentPlan {
            treatment_plan_id: TREATMENT_PLAN_ID.next_from_max(ids.iter().map(String::as_str)),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            arv_protocol: request.arv_protocol,
            treatment_line: request.treatment_line,
            diagnosis: request.diagnosis,
            treatment_result: request.treatment_result,
        };

        let created = self.plans.insert(&plan).await.map_err(|e| {
            error!("Failed to insert treatment plan {}: {}", plan.treatment_plan_id, e);
            TreatmentPlanError::CreateFailed
        })?;

        info!("Treatment plan {} created for patient {}", created.treatment_plan_id, created.patient_id);
        Ok(created)
    }

    pub async fn update_plan(
        &self,
        caller: &CallerContext,
        request: UpdateTreatmentPlanRequest,
    ) -> Result<TreatmentPlan, TreatmentPlanError> {
        if request.treatment_plan_id.trim().is_empty()
            || request.patient_id.trim().is_empty()
            || request.doctor_id.trim().is_empty()
        {
            return Err(TreatmentPlanError::InvalidData);
        }

        let existing = self.plans
            .find_by_id(&request.treatment_plan_id)
            .await?
            .ok_or(TreatmentPlanError::UpdateFailed)?;
        self.ensure_attending(caller, &existing.doctor_id).await?;
        self.ensure_attending(caller, &request.doctor_id).await?;

        let plan = TreatmentPlan {
            treatment_plan_id: request.treatment_plan_id,
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            arv_protocol: request.arv_protocol,
            treatment_line: request.treatment_line,
            diagnosis: request.diagnosis,
            treatment_result: request.treatment_result,
        };

        let updated = self.plans
            .update(&plan)
            .await
            .map_err(|e| {
                error!("Failed to update treatment plan {}: {}", plan.treatment_plan_id, e);
                TreatmentPlanError::UpdateFailed
            })?
            .ok_or(TreatmentPlanError::UpdateFailed)?;

        info!("Treatment plan {} updated", updated.treatment_plan_id);
        Ok(updated)
    }
}
