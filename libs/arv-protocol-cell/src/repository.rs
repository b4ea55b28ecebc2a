use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::ArvProtocol;

const TABLE: &str = "/rest/v1/arv_protocols";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArvProtocolRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<ArvProtocol>>;

    async fn find_by_id(&self, arv_id: &str) -> Result<Option<ArvProtocol>>;

    async fn insert(&self, protocol: &ArvProtocol) -> Result<ArvProtocol>;

    /// Overwrites the row with the same `arv_id`; `None` if no row matched.
    async fn update(&self, protocol: &ArvProtocol) -> Result<Option<ArvProtocol>>;
}

pub struct SupabaseArvProtocolRepository {
    supabase: SupabaseClient,
    auth_token: String,
}

impl SupabaseArvProtocolRepository {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.to_string(),
        }
    }
}

#[async_trait]
impl ArvProtocolRepository for SupabaseArvProtocolRepository {
    async fn find_all(&self) -> Result<Vec<ArvProtocol>> {
        debug!("Fetching all ARV protocols");
        self.supabase
            .request(Method::GET, &format!("{}?order=arv_id.asc", TABLE), Some(&self.auth_token), None)
            .await
    }

    async fn find_by_id(&self, arv_id: &str) -> Result<Option<ArvProtocol>> {
        debug!("Fetching ARV protocol {}", arv_id);

        let path = format!("{}?arv_id=eq.{}&limit=1", TABLE, urlencoding::encode(arv_id));
        let rows: Vec<ArvProtocol> = self.supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, protocol: &ArvProtocol) -> Result<ArvProtocol> {
        debug!("Inserting ARV protocol {}", protocol.arv_id);

        let rows: Vec<ArvProtocol> = self.supabase
            .request_with_headers(
                Method::POST,
                TABLE,
                Some(&self.auth_token),
                Some(serde_json::to_value(protocol)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert of ARV protocol {} returned no row", protocol.arv_id))
    }

    async fn update(&self, protocol: &ArvProtocol) -> Result<Option<ArvProtocol>> {
        debug!("Updating ARV protocol {}", protocol.arv_id);

        let path = format!("{}?arv_id=eq.{}", TABLE, urlencoding::encode(&protocol.arv_id));
        let rows: Vec<ArvProtocol> = self.supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(&self.auth_token),
                Some(serde_json::to_value(protocol)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        Ok(rows.into_iter().next())
    }
}
