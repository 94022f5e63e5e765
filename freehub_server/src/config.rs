use std::{env, fmt::Display, io::Write};

use chrono::Duration;
use fh_common::{helpers::parse_boolean_flag, Secret};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_FH_HOST: &str = "127.0.0.1";
const DEFAULT_FH_PORT: u16 = 8460;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/freehub.db";
const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;
const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;
const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    /// Internal error details are returned to clients.
    Development,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub environment: Environment,
    /// The capacity of each event hook's channel.
    pub event_buffer_size: usize,
    /// Leave the database schema alone on startup. Use this when migrations are applied out of band.
    pub skip_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FH_HOST.to_string(),
            port: DEFAULT_FH_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            environment: Environment::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            skip_migrations: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("FH_HOST").ok().unwrap_or_else(|| DEFAULT_FH_HOST.into());
        let port = env::var("FH_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for FH_PORT. {e} Using the default, {DEFAULT_FH_PORT}, instead.");
                    DEFAULT_FH_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FH_PORT);
        let database_url = env::var("FH_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ FH_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let environment = match env::var("FH_ENVIRONMENT").map(|s| s.to_lowercase()) {
            Ok(s) if s == "development" || s == "dev" => Environment::Development,
            Ok(s) if s == "production" || s == "prod" => Environment::Production,
            Ok(s) => {
                warn!("🪛️ Unknown FH_ENVIRONMENT value '{s}'. Using production.");
                Environment::Production
            },
            Err(_) => Environment::Production,
        };
        let event_buffer_size = env::var("FH_EVENT_BUFFER_SIZE")
            .ok()
            .and_then(|s| {
                s.parse::<usize>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for FH_EVENT_BUFFER_SIZE. {e}"))
                    .ok()
            })
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        let skip_migrations = env_flag("FH_SKIP_MIGRATIONS", false);
        info!("🪛️ Running in {environment} mode");
        Self { host, port, database_url, auth, environment, event_buffer_size, skip_migrations }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HS256 secret used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    /// How long issued access tokens remain valid.
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. DO NOT operate in \
             production like this, since every token will become invalid when the server restarts. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        match NamedTempFile::new().ok().and_then(|f| f.keep().ok()) {
            Some((mut f, p)) => match writeln!(f, "{secret}") {
                Ok(()) => warn!(
                    "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, you \
                     are doing it wrong! Set the FH_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                    p.display()
                ),
                Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
            },
            None => warn!("🪛️ Could not create a temporary file to store the JWT secret."),
        }
        Self { jwt_secret: Secret::new(secret), token_lifetime: Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS) }
    }
}

impl AuthConfig {
    pub fn new(secret: &str, token_lifetime: Duration) -> Self {
        Self { jwt_secret: Secret::new(secret.to_string()), token_lifetime }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("FH_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [FH_JWT_SECRET]")))?;
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ServerError::ConfigurationError(format!(
                "FH_JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} characters long"
            )));
        }
        let token_lifetime = env::var("FH_TOKEN_LIFETIME_HOURS")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for FH_TOKEN_LIFETIME_HOURS. {e}"))
                    .ok()
            })
            .filter(|&h| h > 0)
            .map(Duration::hours)
            .unwrap_or_else(|| Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS));
        Ok(Self { jwt_secret: Secret::new(secret), token_lifetime })
    }
}

/// Reads a boolean flag from the environment, falling back to `default` when it is unset or unparseable.
pub fn env_flag(name: &str, default: bool) -> bool {
    parse_boolean_flag(env::var(name).ok(), default)
}
