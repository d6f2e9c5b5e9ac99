use crate::configuration::SupabaseCredentials;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

/// Minimal PostgREST client for the Supabase REST API.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    base_url: String,
    http_client: Client,
    service_role_key: Secret<String>,
}

#[derive(Debug)]
pub enum InsertResponse {
    /// The rows echoed back by `Prefer: return=representation`.
    Created { rows: Vec<serde_json::Value> },
    Rejected { status: StatusCode, body: String },
}

impl SupabaseClient {
    pub fn new(
        credentials: SupabaseCredentials,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: credentials.base_url,
            service_role_key: credentials.service_role_key,
        })
    }

    /// Only 200 and 201 count as success. Any other status is handed back
    /// together with the raw body; transport failures are returned as errors.
    #[tracing::instrument(name = "Inserting row", skip(self, row))]
    pub async fn insert<T>(&self, table: &str, row: &T) -> Result<InsertResponse, reqwest::Error>
    where
        T: serde::Serialize + ?Sized,
    {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let response = self
            .http_client
            .post(&url)
            .header("apikey", self.service_role_key.expose_secret())
            .bearer_auth(self.service_role_key.expose_secret())
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Supabase: {:?}", e);
                e
            })?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::OK || status == StatusCode::CREATED {
            let rows = serde_json::from_str::<Vec<serde_json::Value>>(&body).unwrap_or_else(|e| {
                tracing::warn!("Could not parse the returned representation: {}", e);
                Vec::new()
            });
            Ok(InsertResponse::Created { rows })
        } else {
            tracing::error!(%status, %body, "Supabase rejected the insert");
            Ok(InsertResponse::Rejected { status, body })
        }
    }
}
