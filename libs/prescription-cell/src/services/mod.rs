pub mod prescription;

pub use prescription::{PrescriptionService, PRESCRIPTION_ID};
