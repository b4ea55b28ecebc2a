pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use models::*;
pub use repository::{ArvProtocolRepository, SupabaseArvProtocolRepository};
pub use router::arv_protocol_routes;
pub use services::ArvProtocolService;
