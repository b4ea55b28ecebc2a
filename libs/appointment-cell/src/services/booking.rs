use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use shared_models::auth::CallerContext;
use shared_utils::SequentialId;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest};
use super::AppointmentService;

pub const BOOKING_ID: SequentialId = SequentialId::new("BK", 6);

/// The clinic's calendar date, taken from the server's local time zone.
pub fn clinic_today() -> NaiveDate {
    Local::now().date_naive()
}

/// A booking may target today or any later date.
pub fn validate_booking_date(book_date: NaiveDate, today: NaiveDate) -> Result<(), AppointmentError> {
    if book_date < today {
        return Err(AppointmentError::InvalidBookingDate);
    }
    Ok(())
}

impl AppointmentService {
    pub async fn book_appointment(
        &self,
        caller: &CallerContext,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        self.book_appointment_on(caller, request, clinic_today()).await
    }

    /// Runs the booking guards in order (date, patient record, doctor, work
    /// schedule, existing appointment) and inserts the booking.
    ///
    /// The guards and the insert are separate requests, so two callers can
    /// both pass the conflict guard for the same doctor and day. A colliding
    /// `book_id` is rejected by the primary key and surfaces as a database
    /// error.
    pub async fn book_appointment_on(
        &self,
        caller: &CallerContext,
        request: BookAppointmentRequest,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        let date = request.book_date.date();
        debug!("User {} booking doctor {} on {}", caller.user_id, request.doctor_id, date);

        validate_booking_date(date, today)?;

        let patient_id = self
            .linked_patient_id(caller)
            .await?
            .ok_or(AppointmentError::PatientNotFound)?;

        self.doctors
            .find_by_id(&request.doctor_id)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;

        let schedules = self.doctors.schedules_on(&request.doctor_id, date).await?;
        if schedules.is_empty() {
            warn!("Doctor {} has no work schedule on {}", request.doctor_id, date);
            return Err(AppointmentError::DoctorNotWorking);
        }

        let same_day = self.appointments.find_by_doctor_on(&request.doctor_id, date).await?;
        if same_day.iter().any(|a| a.status != AppointmentStatus::Cancelled) {
            warn!("Doctor {} already has an appointment on {}", request.doctor_id, date);
            return Err(AppointmentError::DoctorAlreadyBooked);
        }

        let ids = self.appointments.all_ids().await?;
        let appointment = Appointment {
            book_id: BOOKING_ID.next_from_max(ids.iter().map(String::as_str)),
            patient_id,
            doctor_id: request.doctor_id,
            booking_type: request.booking_type,
            book_date: request.book_date,
            status: AppointmentStatus::Booked,
            note: request.note,
        };

        let created = self.appointments.insert(&appointment).await?;
        info!("Appointment {} booked for patient {}", created.book_id, created.patient_id);

        Ok(created)
    }
}
