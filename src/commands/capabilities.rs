use super::config::current_config;
use crate::platform::{CameraSystem, PlatformInfo};
use crate::types::{CapabilityReport, DeviceCapability};
use tauri::command;

/// Enumerate every camera and its normalized capabilities
#[command]
pub async fn get_camera_capabilities() -> Result<Vec<DeviceCapability>, String> {
    let config = current_config()?;
    let devices = CameraSystem::enumerate_async(config).await;

    log::info!("Found {} cameras", devices.len());
    for device in &devices {
        log::debug!(
            "Camera: {} ({} resolutions, {}-{} mfps)",
            device.name,
            device.resolutions.len(),
            device.min_milli_fps,
            device.max_milli_fps
        );
    }
    Ok(devices)
}

/// Enumerate cameras and include platform and backend context
#[command]
pub async fn get_capability_report() -> Result<CapabilityReport, String> {
    let config = current_config()?;
    tokio::task::spawn_blocking(move || CameraSystem::report(&config))
        .await
        .map_err(|e| format!("Camera enumeration task failed: {}", e))?
        .map_err(|e| {
            log::error!("Failed to build capability report: {}", e);
            format!("Failed to build capability report: {}", e)
        })
}

/// Get platform-specific information
#[command]
pub async fn get_platform_info() -> Result<PlatformInfo, String> {
    match CameraSystem::platform_info() {
        Ok(info) => {
            log::info!(
                "Platform: {} using {}",
                info.platform.as_str(),
                info.provider
            );
            Ok(info)
        }
        Err(e) => {
            log::error!("Failed to get platform info: {}", e);
            Err(format!("Failed to get platform info: {}", e))
        }
    }
}
