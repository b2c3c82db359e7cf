use std::path::Path;

use tracing::{info, warn};

use crate::error::ConfigError;

pub fn load_environment() -> Result<(), ConfigError> {
    let is_production =
        dotenvy::var("SCHOOL_PROFILE").unwrap_or("development".to_string()) == "production";

    let env_files = if is_production {
        vec!["config/common.env", "config/prod.env", ".secrets.env"]
    } else {
        vec!["config/common.env", "config/dev.env", ".secrets.env"]
    };

    for env_file in env_files {
        load_env_file(env_file)?;
    }

    Ok(())
}

pub fn load_env_file(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Environment file {} not found, skipping", path.display());
        return Ok(());
    }

    dotenvy::from_filename_override(path)?;
    info!("Loaded environment from: {}", path.display());
    Ok(())
}
