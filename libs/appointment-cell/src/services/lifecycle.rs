use tracing::{info, warn};

use shared_models::auth::CallerContext;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};
use super::AppointmentService;

/// A status change requested on an existing appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    PatientCheckIn,
    DoctorCheckout,
    CancelByPatient,
    CancelByDoctor,
}

impl AppointmentAction {
    pub fn allowed_from(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentAction::PatientCheckIn => &[AppointmentStatus::Booked],
            AppointmentAction::DoctorCheckout => &[AppointmentStatus::Confirmed],
            AppointmentAction::CancelByPatient => &[AppointmentStatus::Booked, AppointmentStatus::Confirmed],
            AppointmentAction::CancelByDoctor => &[AppointmentStatus::Booked],
        }
    }

    pub fn target(&self) -> AppointmentStatus {
        match self {
            AppointmentAction::PatientCheckIn => AppointmentStatus::Confirmed,
            AppointmentAction::DoctorCheckout => AppointmentStatus::Completed,
            AppointmentAction::CancelByPatient | AppointmentAction::CancelByDoctor => AppointmentStatus::Cancelled,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            AppointmentAction::PatientCheckIn => "Patient check-in confirmed.",
            AppointmentAction::DoctorCheckout => "Doctor checkout completed.",
            AppointmentAction::CancelByPatient => "Appointment cancelled by patient.",
            AppointmentAction::CancelByDoctor => "Appointment cancelled by doctor.",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            AppointmentAction::PatientCheckIn => "checked in",
            AppointmentAction::DoctorCheckout => "checked out",
            AppointmentAction::CancelByPatient => "cancelled by the patient",
            AppointmentAction::CancelByDoctor => "cancelled by the doctor",
        }
    }

    fn by_patient(&self) -> bool {
        matches!(self, AppointmentAction::PatientCheckIn | AppointmentAction::CancelByPatient)
    }

    /// The status after this action, or a rejection if `current` does not allow it.
    pub fn apply(&self, current: AppointmentStatus) -> Result<AppointmentStatus, AppointmentError> {
        if !self.allowed_from().contains(&current) {
            warn!("Rejected {:?} on appointment with status {}", self, current);
            return Err(AppointmentError::InvalidStatusTransition {
                action: self.past_tense(),
                status: current,
            });
        }
        Ok(self.target())
    }
}

/// Appends a cancellation reason to an existing note.
pub fn append_reason(note: Option<&str>, reason: Option<&str>) -> Option<String> {
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    match (note.filter(|n| !n.is_empty()), reason) {
        (Some(note), Some(reason)) => Some(format!("{} | Lý do hủy: {}", note, reason)),
        (None, Some(reason)) => Some(format!("Lý do hủy: {}", reason)),
        (note, None) => note.map(str::to_string),
    }
}

impl AppointmentService {
    /// Applies `action` to one of the caller's own appointments.
    pub async fn transition(
        &self,
        caller: &CallerContext,
        book_id: &str,
        action: AppointmentAction,
        reason: Option<&str>,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .appointments
            .find_by_id(book_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        let owns = if action.by_patient() {
            self.linked_patient_id(caller).await?.as_deref() == Some(appointment.patient_id.as_str())
        } else {
            self.linked_doctor_id(caller).await?.as_deref() == Some(appointment.doctor_id.as_str())
        };
        if !owns {
            warn!("User {} attempted {:?} on appointment {} they do not own", caller.user_id, action, book_id);
            return Err(AppointmentError::Forbidden);
        }

        let status = action.apply(appointment.status)?;
        let note = match action {
            AppointmentAction::CancelByPatient | AppointmentAction::CancelByDoctor => {
                append_reason(appointment.note.as_deref(), reason)
            }
            _ => appointment.note.clone(),
        };

        let updated = self
            .appointments
            .update_status(book_id, appointment.status, status, note)
            .await?
            .ok_or_else(|| {
                warn!("Appointment {} left status {} before {:?} was applied", book_id, appointment.status, action);
                AppointmentError::StatusChanged
            })?;

        info!("Appointment {} moved from {} to {}", book_id, appointment.status, updated.status);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::role::Role;

    use crate::repository::MockAppointmentRepository;
    use crate::services::test_support::*;

    #[test]
    fn test_check_in_only_from_booked() {
        let action = AppointmentAction::PatientCheckIn;
        assert_eq!(action.apply(AppointmentStatus::Booked).unwrap(), AppointmentStatus::Confirmed);
        assert_matches!(
            action.apply(AppointmentStatus::Confirmed),
            Err(AppointmentError::InvalidStatusTransition { status: AppointmentStatus::Confirmed, .. })
        );
        assert!(action.apply(AppointmentStatus::Cancelled).is_err());
    }

    #[test]
    fn test_checkout_only_from_confirmed() {
        let action = AppointmentAction::DoctorCheckout;
        assert_eq!(action.apply(AppointmentStatus::Confirmed).unwrap(), AppointmentStatus::Completed);
        assert!(action.apply(AppointmentStatus::Booked).is_err());
        assert!(action.apply(AppointmentStatus::Completed).is_err());
    }

    #[test]
    fn test_cancellation_windows() {
        let by_patient = AppointmentAction::CancelByPatient;
        assert!(by_patient.apply(AppointmentStatus::Booked).is_ok());
        assert!(by_patient.apply(AppointmentStatus::Confirmed).is_ok());
        assert!(by_patient.apply(AppointmentStatus::Cancelled).is_err());
        assert!(by_patient.apply(AppointmentStatus::Completed).is_err());

        let by_doctor = AppointmentAction::CancelByDoctor;
        assert!(by_doctor.apply(AppointmentStatus::Booked).is_ok());
        assert!(by_doctor.apply(AppointmentStatus::Confirmed).is_err());
    }

    #[test]
    fn test_append_reason() {
        assert_eq!(append_reason(Some("Test"), Some("sick")).as_deref(), Some("Test | Lý do hủy: sick"));
        assert_eq!(append_reason(None, Some("sick")).as_deref(), Some("Lý do hủy: sick"));
        assert_eq!(append_reason(Some("Test"), Some("  ")).as_deref(), Some("Test"));
        assert_eq!(append_reason(None, None), None);
    }

    #[tokio::test]
    async fn test_patient_check_in_updates_status() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_find_by_id().returning(|id| {
            Ok(Some(appointment(id, "P001", "D001", AppointmentStatus::Booked)))
        });
        appointments.expect_update_status().times(1).returning(|id, _from, status, note| {
            let mut updated = appointment(id, "P001", "D001", status);
            updated.note = note;
            Ok(Some(updated))
        });
        let service = service(appointments, patients(), doctors());

        let updated = service
            .transition(&CallerContext::new(PATIENT_USER, Role::Patient), "BK000002", AppointmentAction::PatientCheckIn, None)
            .await
            .unwrap();

        assert_eq!(updated.status, AppointmentStatus::Confirmed);
        assert_eq!(updated.note.as_deref(), Some("Test booking"));
    }

    #[tokio::test]
    async fn test_concurrent_status_change_is_reported() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_find_by_id().returning(|id| {
            Ok(Some(appointment(id, "P001", "D001", AppointmentStatus::Booked)))
        });
        appointments
            .expect_update_status()
            .withf(|id, from, status, _| {
                id == "BK000002" && *from == AppointmentStatus::Booked && *status == AppointmentStatus::Confirmed
            })
            .times(1)
            .returning(|_, _, _, _| Ok(None));
        let service = service(appointments, patients(), doctors());

        let result = service
            .transition(&CallerContext::new(PATIENT_USER, Role::Patient), "BK000002", AppointmentAction::PatientCheckIn, None)
            .await;

        assert_matches!(result, Err(AppointmentError::StatusChanged));
    }

    #[tokio::test]
    async fn test_out_of_order_checkout_leaves_record_untouched() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_find_by_id().returning(|id| {
            Ok(Some(appointment(id, "P001", "D001", AppointmentStatus::Booked)))
        });
        appointments.expect_update_status().times(0);
        let service = service(appointments, patients(), doctors());

        let result = service
            .transition(&CallerContext::new(DOCTOR_USER, Role::Doctor), "BK000002", AppointmentAction::DoctorCheckout, None)
            .await;

        assert_matches!(result, Err(AppointmentError::InvalidStatusTransition { .. }));
    }

    #[tokio::test]
    async fn test_doctor_cancel_appends_reason() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_find_by_id().returning(|id| {
            Ok(Some(appointment(id, "P001", "D001", AppointmentStatus::Booked)))
        });
        appointments.expect_update_status().returning(|id, _from, status, note| {
            let mut updated = appointment(id, "P001", "D001", status);
            updated.note = note;
            Ok(Some(updated))
        });
        let service = service(appointments, patients(), doctors());

        let updated = service
            .transition(
                &CallerContext::new(DOCTOR_USER, Role::Doctor),
                "BK000002",
                AppointmentAction::CancelByDoctor,
                Some("Doctor unavailable"),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, AppointmentStatus::Cancelled);
        assert_eq!(updated.note.as_deref(), Some("Test booking | Lý do hủy: Doctor unavailable"));
    }

    #[tokio::test]
    async fn test_other_patients_appointment_is_forbidden() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_find_by_id().returning(|id| {
            Ok(Some(appointment(id, "P002", "D001", AppointmentStatus::Booked)))
        });
        appointments.expect_update_status().times(0);
        let service = service(appointments, patients(), doctors());

        let result = service
            .transition(&CallerContext::new(PATIENT_USER, Role::Patient), "BK000003", AppointmentAction::CancelByPatient, None)
            .await;

        assert_matches!(result, Err(AppointmentError::Forbidden));
    }

    #[tokio::test]
    async fn test_missing_appointment_is_not_found() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_find_by_id().returning(|_| Ok(None));
        let service = service(appointments, patients(), doctors());

        let result = service
            .transition(&CallerContext::new(PATIENT_USER, Role::Patient), "BK404404", AppointmentAction::PatientCheckIn, None)
            .await;

        assert_matches!(result, Err(AppointmentError::NotFound));
    }
}
