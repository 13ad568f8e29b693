use crate::error::{ApiError, Result};
use config::Environment;
use serde::Deserialize;
use std::{fmt, path::PathBuf, time::Duration};

/// Runtime configuration, resolved once at startup from `.env` and the
/// process environment.
#[derive(Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub mongodb_collection: String,
    pub poses_file: Option<PathBuf>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub sender_email: Option<String>,
    pub query_timeout_secs: u64,
    pub smtp_timeout_secs: u64,
    pub thesaurus_file: Option<PathBuf>,
}

/// Where pose records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo {
        uri: String,
        database: String,
        collection: String,
    },
    File(PathBuf),
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_environment(Environment::default())
    }

    /// Build the configuration from an explicit environment source.
    pub fn from_environment(environment: Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("mongodb_database", "yoga_asana")?
            .set_default("mongodb_collection", "yoga_asanas")?
            .set_default("smtp_host", "smtp.gmail.com")?
            .set_default("smtp_port", 587)?
            .set_default("query_timeout_secs", 10)?
            .set_default("smtp_timeout_secs", 30)?
            .add_source(environment)
            .build()?;

        let config = settings.try_deserialize::<Config>()?.without_blank_values();

        if config.smtp_username.trim().is_empty() || config.smtp_password.is_empty() {
            return Err(ApiError::ConfigError(
                "SMTP_USERNAME and SMTP_PASSWORD must be set".to_string(),
            ));
        }

        // Fail at startup rather than on the first submission
        config.store_backend()?;

        Ok(config)
    }

    /// `KEY=` in a `.env` file means unset.
    fn without_blank_values(mut self) -> Self {
        self.mongodb_uri = self.mongodb_uri.filter(|uri| !uri.trim().is_empty());
        self.sender_email = self.sender_email.filter(|email| !email.trim().is_empty());
        self.poses_file = self.poses_file.filter(|p| !p.as_os_str().is_empty());
        self.thesaurus_file = self.thesaurus_file.filter(|p| !p.as_os_str().is_empty());
        self
    }

    pub fn store_backend(&self) -> Result<StoreBackend> {
        match (&self.mongodb_uri, &self.poses_file) {
            (Some(uri), _) => Ok(StoreBackend::Mongo {
                uri: uri.clone(),
                database: self.mongodb_database.clone(),
                collection: self.mongodb_collection.clone(),
            }),
            (_, Some(path)) => Ok(StoreBackend::File(path.clone())),
            _ => Err(ApiError::ConfigError(
                "either MONGODB_URI or POSES_FILE must be set".to_string(),
            )),
        }
    }

    pub fn sender(&self) -> &str {
        self.sender_email
            .as_deref()
            .unwrap_or(self.smtp_username.as_str())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn smtp_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_secs)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("mongodb_uri", &self.mongodb_uri.as_ref().map(|_| "<redacted>"))
            .field("mongodb_database", &self.mongodb_database)
            .field("mongodb_collection", &self.mongodb_collection)
            .field("poses_file", &self.poses_file)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"<redacted>")
            .field("sender_email", &self.sender())
            .field("query_timeout_secs", &self.query_timeout_secs)
            .field("smtp_timeout_secs", &self.smtp_timeout_secs)
            .field("thesaurus_file", &self.thesaurus_file)
            .finish()
    }
}
