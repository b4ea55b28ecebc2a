pub mod extractor;
pub mod jwt;
pub mod sequential_id;
pub mod test_utils;

pub use sequential_id::SequentialId;
