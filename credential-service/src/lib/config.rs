use std::env;
use std::fmt;

use auth::AuthSettings;
use auth::HashCost;
use auth::JwtSecret;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for credential-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub reset: ResetConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
}

/// PostgreSQL database configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Session token configuration.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_validity_minutes")]
    pub expiration_minutes: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

/// Password reset token configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ResetConfig {
    #[serde(default = "default_validity_minutes")]
    pub expiration_minutes: i64,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            expiration_minutes: default_validity_minutes(),
        }
    }
}

/// Argon2id cost configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let cost = HashCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

/// Account provisioning configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AccountsConfig {
    /// Emails that receive the admin role on registration
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

fn default_max_connections() -> u32 {
    5
}

fn default_validity_minutes() -> i64 {
    60
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// * `ConfigError` - A source could not be read or a field is missing
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }

    /// Validate the security settings and convert them for the auth core.
    ///
    /// Refuses to produce settings from an empty or short secret.
    ///
    /// # Errors
    /// * `SecretMissing` / `SecretTooShort` - Secret is unusable
    /// * `InvalidValidity` - A validity window is not positive
    pub fn auth_settings(&self) -> Result<AuthSettings, auth::ConfigError> {
        let secret = JwtSecret::new(self.jwt.secret.as_bytes())?;

        Ok(AuthSettings::new(secret)
            .with_token_validity_minutes(self.jwt.expiration_minutes)?
            .with_reset_validity_minutes(self.reset.expiration_minutes)?
            .with_hash_cost(HashCost {
                memory_kib: self.password.memory_kib,
                iterations: self.password.iterations,
                parallelism: self.password.parallelism,
            }))
    }
}
