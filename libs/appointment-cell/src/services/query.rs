use std::collections::BTreeSet;
use tracing::debug;

use shared_models::auth::CallerContext;

use crate::models::{Appointment, AppointmentError};
use super::AppointmentService;

impl AppointmentService {
    /// Appointments booked by the calling patient.
    pub async fn my_appointments(&self, caller: &CallerContext) -> Result<Vec<Appointment>, AppointmentError> {
        let patient_id = self
            .linked_patient_id(caller)
            .await?
            .ok_or(AppointmentError::PatientNotFound)?;

        Ok(self.appointments.find_by_patient(&patient_id).await?)
    }

    /// Appointments where the caller is the doctor.
    pub async fn doctor_appointments(&self, caller: &CallerContext) -> Result<Vec<Appointment>, AppointmentError> {
        let doctor_id = self
            .linked_doctor_id(caller)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;

        Ok(self.appointments.find_by_doctor(&doctor_id).await?)
    }

    /// Every appointment of every patient who has booked with the calling doctor.
    pub async fn doctor_patient_appointments(&self, caller: &CallerContext) -> Result<Vec<Appointment>, AppointmentError> {
        let own = self.doctor_appointments(caller).await?;
        let patient_ids: Vec<String> = own
            .into_iter()
            .map(|a| a.patient_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        debug!("Doctor {} has {} distinct patients", caller.user_id, patient_ids.len());
        if patient_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.appointments.find_by_patients(&patient_ids).await?)
    }

    pub async fn all_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.appointments.find_all().await?)
    }

    /// One appointment, if the caller's role and linked record allow seeing it.
    pub async fn get_appointment(&self, caller: &CallerContext, book_id: &str) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .appointments
            .find_by_id(book_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if !self.visibility(caller).await?.allows(&appointment) {
            return Err(AppointmentError::Forbidden);
        }

        Ok(appointment)
    }
}
