pub mod protocol;

pub use protocol::{has_duplicate, ArvProtocolService, ARV_ID};
