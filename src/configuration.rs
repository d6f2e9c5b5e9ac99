use crate::telemetry::error_chain_fmt;
use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

// Shared with the web application's build environment.
pub const SUPABASE_URL_VARIABLE: &str = "VITE_SUPABASE_URL";
pub const SUPABASE_KEY_VARIABLE: &str = "SUPABASE_SERVICE_ROLE_KEY";

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub seeder: SeederSettings,
    pub claim: ClaimSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct SeederSettings {
    pub table: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub log_level: String,
}

impl SeederSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

/// Fixed values written into every seeded claim record.
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimSettings {
    pub order_id: String,
    pub stripe_session_id: String,
    pub art_slug: String,
}

impl Default for ClaimSettings {
    fn default() -> Self {
        Self {
            order_id: "test_order_123".to_string(),
            stripe_session_id: "cs_test_simulate".to_string(),
            art_slug: "crete-verte".to_string(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| config::ConfigError::Foreign(e.into()))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let defaults = ClaimSettings::default();
    let settings = config::Config::builder()
        .set_default("seeder.table", "owners_legacy")?
        .set_default("seeder.timeout_milliseconds", 10_000)?
        .set_default("seeder.log_level", "info")?
        .set_default("claim.order_id", defaults.order_id)?
        .set_default("claim.stripe_session_id", defaults.stripe_session_id)?
        .set_default("claim.art_slug", defaults.art_slug)?
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(false))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_SEEDER__TIMEOUT_MILLISECONDS=5000` would set `Settings.seeder.timeout_milliseconds`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// The possible runtime environment for our application.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SupabaseCredentials {
    pub base_url: String,
    pub service_role_key: Secret<String>,
}

#[derive(thiserror::Error)]
pub enum ConfigurationError {
    #[error("Missing Supabase credentials: {0} is not set")]
    MissingVariable(&'static str),
}

impl std::fmt::Debug for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SupabaseCredentials {
    /// Reads the credentials from the process environment. A `.env` file
    /// has to be loaded beforehand for its values to be seen.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Absent and empty values are both treated as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigurationError::MissingVariable(name))
        };
        let base_url = read(SUPABASE_URL_VARIABLE)?;
        let service_role_key = read(SUPABASE_KEY_VARIABLE)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: Secret::new(service_role_key),
        })
    }
}
