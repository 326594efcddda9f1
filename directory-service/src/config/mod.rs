use chrono::Duration;
use serde::Deserialize;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub mongo: MongoSettings,
    #[serde(default)]
    pub keys: KeySettings,
    #[serde(default)]
    pub token: TokenSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MongoSettings {
    #[serde(default = "default_mongo_uri")]
    pub uri: String,
    #[serde(default = "default_mongo_database")]
    pub database: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeySettings {
    /// Directory holding privateKey.pem / publicKey.pem.
    #[serde(default = "default_key_directory")]
    pub directory: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenSettings {
    #[serde(default = "default_login_expiry_minutes")]
    pub login_expiry_minutes: i64,
    #[serde(default = "default_registration_expiry_hours")]
    pub registration_expiry_hours: i64,
    #[serde(default = "default_reset_password_expiry_minutes")]
    pub reset_password_expiry_minutes: i64,
}

fn default_mongo_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_mongo_database() -> String {
    "directory".to_string()
}

fn default_key_directory() -> String {
    ".".to_string()
}

fn default_login_expiry_minutes() -> i64 {
    480
}

fn default_registration_expiry_hours() -> i64 {
    24
}

fn default_reset_password_expiry_minutes() -> i64 {
    15
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: default_mongo_uri(),
            database: default_mongo_database(),
        }
    }
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            directory: default_key_directory(),
        }
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            login_expiry_minutes: default_login_expiry_minutes(),
            registration_expiry_hours: default_registration_expiry_hours(),
            reset_password_expiry_minutes: default_reset_password_expiry_minutes(),
        }
    }
}

impl TokenSettings {
    pub fn login_lifetime(&self) -> Duration {
        Duration::minutes(self.login_expiry_minutes)
    }

    pub fn registration_lifetime(&self) -> Duration {
        Duration::hours(self.registration_expiry_hours)
    }

    pub fn reset_password_lifetime(&self) -> Duration {
        Duration::minutes(self.reset_password_expiry_minutes)
    }
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        service_core::config::load("DIRECTORY")
    }
}
