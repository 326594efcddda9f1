use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::de::DeserializeOwned;

/// Load a typed configuration from the optional `configuration` file plus
/// prefixed environment variables (e.g. `APP__MONGO__URI`).
pub fn load<T: DeserializeOwned>(prefix: &str) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let config = Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(config::Environment::with_prefix(prefix).separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}
