use crate::config::CrabCapsConfig;
use std::sync::{Arc, RwLock};
use tauri::command;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: Arc<RwLock<CrabCapsConfig>> =
        Arc::new(RwLock::new(CrabCapsConfig::load_or_default()));
}

pub(crate) fn current_config() -> Result<CrabCapsConfig, String> {
    let config = GLOBAL_CONFIG.read().map_err(|e| e.to_string())?;
    Ok(config.clone())
}

/// Get the current configuration
#[command]
pub async fn get_config() -> Result<CrabCapsConfig, String> {
    current_config()
}

/// Update configuration
#[command]
pub async fn update_config(new_config: CrabCapsConfig) -> Result<(), String> {
    new_config.validate()?;

    {
        let mut config = GLOBAL_CONFIG.write().map_err(|e| e.to_string())?;
        *config = new_config.clone();
    }

    new_config
        .save_to_file(CrabCapsConfig::default_path())
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Reset configuration to defaults
#[command]
pub async fn reset_config() -> Result<CrabCapsConfig, String> {
    let default_config = CrabCapsConfig::default();

    {
        let mut config = GLOBAL_CONFIG
            .write()
            .map_err(|e| format!("Failed to write config: {}", e))?;
        *config = default_config.clone();
    }

    default_config
        .save_to_file(CrabCapsConfig::default_path())
        .map_err(|e| e.to_string())?;

    Ok(default_config)
}
