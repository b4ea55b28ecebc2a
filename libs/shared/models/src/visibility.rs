/// A record tied to one patient and, for some record kinds, to the doctor
/// attending it.
pub trait PatientOwned {
    fn owner_patient_id(&self) -> &str;

    /// Records without an attending doctor are visible to every doctor.
    fn attending_doctor_id(&self) -> Option<&str> {
        None
    }
}

/// Which records a caller may read, derived from their role and linked
/// patient or doctor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Admin, manager and staff.
    All,
    /// A patient; `None` when the caller has no linked patient record.
    Patient(Option<String>),
    /// A doctor; `None` when the caller has no linked doctor record.
    Doctor(Option<String>),
}

impl Visibility {
    pub fn allows<T: PatientOwned>(&self, record: &T) -> bool {
        match self {
            Visibility::All => true,
            Visibility::Patient(patient_id) => {
                patient_id.as_deref() == Some(record.owner_patient_id())
            }
            Visibility::Doctor(doctor_id) => match record.attending_doctor_id() {
                Some(attending) => doctor_id.as_deref() == Some(attending),
                None => true,
            },
        }
    }

    pub fn retain<T: PatientOwned>(&self, records: Vec<T>) -> Vec<T> {
        records.into_iter().filter(|record| self.allows(record)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        patient: &'static str,
        doctor: Option<&'static str>,
    }

    impl PatientOwned for Row {
        fn owner_patient_id(&self) -> &str {
            self.patient
        }

        fn attending_doctor_id(&self) -> Option<&str> {
            self.doctor
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { patient: "P001", doctor: Some("D001") },
            Row { patient: "P002", doctor: Some("D002") },
            Row { patient: "P001", doctor: None },
        ]
    }

    #[test]
    fn test_patient_sees_only_own_records() {
        let visible = Visibility::Patient(Some("P001".to_string())).retain(rows());
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|r| r.patient == "P001"));
    }

    #[test]
    fn test_unlinked_patient_sees_nothing() {
        assert!(Visibility::Patient(None).retain(rows()).is_empty());
    }

    #[test]
    fn test_doctor_sees_attended_and_unattended_records() {
        let visible = Visibility::Doctor(Some("D002".to_string())).retain(rows());
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].patient, "P002");
        assert!(visible[1].doctor.is_none());
    }

    #[test]
    fn test_all_sees_everything() {
        assert_eq!(Visibility::All.retain(rows()).len(), 3);
    }
}
