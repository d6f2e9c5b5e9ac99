use crate::configuration::{ClaimSettings, ConfigurationError, Settings, SupabaseCredentials};
use crate::domain::{ClaimCode, NewClaimRecord};
use crate::supabase_client::{InsertResponse, SupabaseClient};
use crate::telemetry::error_chain_fmt;
use reqwest::StatusCode;
use std::io::Write;
use tracing::{Span, field::display};

#[derive(Debug)]
pub enum SeedOutcome {
    /// Credentials were not available, nothing was sent.
    MissingCredentials(ConfigurationError),
    Inserted {
        code: ClaimCode,
        row_id: Option<serde_json::Value>,
    },
    Rejected {
        code: ClaimCode,
        status: StatusCode,
        body: String,
    },
}

#[derive(thiserror::Error)]
pub enum SeedError {
    #[error("Failed to build the HTTP client")]
    ClientBuild(#[source] reqwest::Error),
    /// The row may still have been stored, so the code is kept for the report.
    #[error("Failed to reach the Supabase REST endpoint while inserting claim code {code}")]
    Transport {
        code: ClaimCode,
        #[source]
        source: reqwest::Error,
    },
}

impl std::fmt::Debug for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub struct Seeder {
    client: SupabaseClient,
    table: String,
    claim: ClaimSettings,
}

impl Seeder {
    pub fn build(settings: &Settings, credentials: SupabaseCredentials) -> Result<Self, SeedError> {
        let client = SupabaseClient::new(credentials, settings.seeder.timeout())
            .map_err(SeedError::ClientBuild)?;
        Ok(Self {
            client,
            table: settings.seeder.table.clone(),
            claim: settings.claim.clone(),
        })
    }

    #[tracing::instrument(
        name = "Seeding a claim code",
        skip(self),
        fields(table = %self.table, claim_code = tracing::field::Empty)
    )]
    pub async fn seed(&self) -> Result<SeedOutcome, SeedError> {
        let code = ClaimCode::generate();
        Span::current().record("claim_code", display(&code));
        tracing::info!("Generated test code");

        let record = NewClaimRecord::unclaimed(&code, &self.claim);
        let response = match self.client.insert(&self.table, &record).await {
            Ok(response) => response,
            Err(source) => return Err(SeedError::Transport { code, source }),
        };

        Ok(match response {
            InsertResponse::Created { rows } => {
                let row_id = rows.first().and_then(|row| row.get("id")).cloned();
                if let Some(id) = &row_id {
                    tracing::info!(row_id = %id, "Claim record inserted");
                }
                SeedOutcome::Inserted { code, row_id }
            }
            InsertResponse::Rejected { status, body } => {
                SeedOutcome::Rejected { code, status, body }
            }
        })
    }
}

/// Inserts one claim record. Missing credentials short-circuit before any
/// request is made.
pub async fn run(
    settings: &Settings,
    credentials: Result<SupabaseCredentials, ConfigurationError>,
) -> Result<SeedOutcome, SeedError> {
    let credentials = match credentials {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::warn!("{}", e);
            return Ok(SeedOutcome::MissingCredentials(e));
        }
    };
    Seeder::build(settings, credentials)?.seed().await
}

/// Writes the human readable summary of a seeding run.
pub fn report<W: Write>(outcome: &SeedOutcome, out: &mut W) -> std::io::Result<()> {
    match outcome {
        SeedOutcome::MissingCredentials(e) => writeln!(out, "{} (check your .env)", e),
        SeedOutcome::Inserted { code, .. } => {
            writeln!(out, "Generated test code: {}", code)?;
            writeln!(
                out,
                "Success! You can now test the claim flow with the code: {}",
                code
            )
        }
        SeedOutcome::Rejected { code, status, body } => {
            writeln!(out, "Generated test code: {}", code)?;
            writeln!(out, "Failed to insert: {}", status.as_u16())?;
            writeln!(out, "{}", body)
        }
    }
}
