pub mod booking;
pub mod lifecycle;
pub mod query;

use std::sync::Arc;

use doctor_cell::repository::{DoctorRepository, SupabaseDoctorRepository};
use patient_cell::repository::{PatientRepository, SupabasePatientRepository};
use shared_config::AppConfig;
use shared_models::auth::CallerContext;
use shared_models::role::Role;
use shared_models::visibility::Visibility;

use crate::models::AppointmentError;
use crate::repository::{AppointmentRepository, SupabaseAppointmentRepository};

pub use booking::{clinic_today, validate_booking_date, BOOKING_ID};
pub use lifecycle::AppointmentAction;

pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    patients: Arc<dyn PatientRepository>,
    doctors: Arc<dyn DoctorRepository>,
}

impl AppointmentService {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self::with_repositories(
            Arc::new(SupabaseAppointmentRepository::new(config, auth_token)),
            Arc::new(SupabasePatientRepository::new(config, auth_token)),
            Arc::new(SupabaseDoctorRepository::new(config, auth_token)),
        )
    }

    pub fn with_repositories(
        appointments: Arc<dyn AppointmentRepository>,
        patients: Arc<dyn PatientRepository>,
        doctors: Arc<dyn DoctorRepository>,
    ) -> Self {
        Self { appointments, patients, doctors }
    }

    async fn linked_patient_id(&self, caller: &CallerContext) -> Result<Option<String>, AppointmentError> {
        Ok(self.patients
            .find_by_user_id(&caller.user_id)
            .await?
            .map(|patient| patient.patient_id))
    }

    async fn linked_doctor_id(&self, caller: &CallerContext) -> Result<Option<String>, AppointmentError> {
        Ok(self.doctors
            .find_by_user_id(&caller.user_id)
            .await?
            .map(|doctor| doctor.doctor_id))
    }

    pub(crate) async fn visibility(&self, caller: &CallerContext) -> Result<Visibility, AppointmentError> {
        Ok(match caller.role {
            Role::Patient => Visibility::Patient(self.linked_patient_id(caller).await?),
            Role::Doctor => Visibility::Doctor(self.linked_doctor_id(caller).await?),
            Role::Admin | Role::Manager | Role::Staff => Visibility::All,
        })
    }
}
