//! Process configuration.
//!
//! Layering, lowest precedence first:
//! 1. built-in defaults
//! 2. `bizdir.toml` in the working directory (optional)
//! 3. `BIZDIR_*` environment variables, nested keys split on `__`
//!    (e.g. `BIZDIR_PASSWORD__MEMORY_KIB`)
//!
//! A `.env` file, if present, is loaded into the environment first.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use thiserror::Error;

use bizdir_auth::{HashCost, SigningSecret};
use bizdir_observability::LogFormat;

pub const CONFIG_FILE: &str = "bizdir.toml";
pub const ENV_PREFIX: &str = "BIZDIR_";
/// Upper bound on `token_ttl_secs`: one year.
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("jwt_secret must be set to a non-empty value")]
    MissingSecret,
    #[error("token_ttl_secs must be between 1 and 31536000 (one year)")]
    InvalidTtl,
    #[error("bootstrap_admin.email and bootstrap_admin.password must both be non-empty")]
    InvalidBootstrapAdmin,
    #[error("invalid password hashing cost: {0}")]
    InvalidPasswordCost(String),
}

/// Account created at startup so the directory has an administrator.
#[derive(Clone, Deserialize)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// HS256 signing secret. Required.
    pub jwt_secret: Option<SigningSecret>,
    pub token_ttl_secs: u64,
    pub password: HashCost,
    pub log_format: LogFormat,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            jwt_secret: None,
            token_ttl_secs: 24 * 60 * 60,
            password: HashCost::default(),
            log_format: LogFormat::default(),
            bootstrap_admin: None,
        }
    }
}

impl AppConfig {
    /// Load from `.env`, `bizdir.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is the normal case outside local development.
        let _ = dotenvy::dotenv();

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Extract and validate from an already-layered figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: AppConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.signing_secret()?;
        if self.token_ttl_secs == 0 || self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::InvalidTtl);
        }
        if let Some(admin) = &self.bootstrap_admin {
            if admin.email.trim().is_empty() || admin.password.is_empty() {
                return Err(ConfigError::InvalidBootstrapAdmin);
            }
        }
        Ok(())
    }

    pub fn signing_secret(&self) -> Result<&SigningSecret, ConfigError> {
        self.jwt_secret
            .as_ref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        let secs = self.token_ttl_secs.min(MAX_TOKEN_TTL_SECS);
        chrono::Duration::seconds(secs as i64)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::from_figment(Figment::new().merge(Toml::string(toml)))
    }

    #[test]
    fn defaults_apply_when_only_secret_is_given() {
        let config = from_toml("jwt_secret = 'abc'").unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.token_ttl(), chrono::Duration::hours(24));
        assert_eq!(config.password, HashCost::default());
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn missing_or_blank_secret_is_rejected() {
        assert!(matches!(from_toml(""), Err(ConfigError::MissingSecret)));
        assert!(matches!(from_toml("jwt_secret = '  '"), Err(ConfigError::MissingSecret)));
    }

    #[test]
    fn out_of_range_ttl_is_rejected() {
        assert!(matches!(
            from_toml("jwt_secret = 'abc'\ntoken_ttl_secs = 0"),
            Err(ConfigError::InvalidTtl)
        ));
        assert!(matches!(
            from_toml("jwt_secret = 'abc'\ntoken_ttl_secs = 999999999999"),
            Err(ConfigError::InvalidTtl)
        ));
    }

    #[test]
    fn nested_sections_are_read() {
        let config = from_toml(
            r#"
            jwt_secret = "abc"
            log_format = "pretty"

            [password]
            memory_kib = 4096

            [bootstrap_admin]
            email = "admin@example.com"
            password = "correct horse"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.password.memory_kib, 4096);
        assert_eq!(config.password.iterations, HashCost::default().iterations);
        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert!(!format!("{admin:?}").contains("correct horse"));
    }

    #[test]
    fn secret_is_not_printed() {
        let config = from_toml("jwt_secret = 'super-secret-value'").unwrap();
        assert!(!format!("{config:?}").contains("super-secret-value"));
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "jwt_secret = 'from-file'\nport = 4000")?;
            jail.set_env("BIZDIR_PORT", "5000");
            jail.set_env("BIZDIR_PASSWORD__ITERATIONS", "3");

            let config = AppConfig::from_figment(
                Figment::new()
                    .merge(Toml::file(CONFIG_FILE))
                    .merge(Env::prefixed(ENV_PREFIX).split("__")),
            )
            .map_err(|e| e.to_string())?;

            assert_eq!(config.port, 5000);
            assert_eq!(config.password.iterations, 3);
            assert!(config.signing_secret().is_ok());
            Ok(())
        });
    }
}
