
pub use lab_test::{LabTestService, LAB_TEST_ID};
