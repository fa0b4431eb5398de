//! crabcaps: camera capability enumeration for native media-capture pipelines
//!
//! Opens every camera on the host in turn, reads its supported preview sizes
//! and frame-rate ranges, and normalizes the result into one
//! [`DeviceCapability`] per camera. Frame rates are integer milli-fps so the
//! records cross foreign-function boundaries unchanged.
//!
//! # Features
//! - Android `android.hardware.Camera` provider via JNI, with legacy and
//!   extended API flavours selected once at startup
//! - Desktop provider via nokhwa (Windows, macOS, Linux)
//! - C ABI (`crabcaps_get_device_info` / `crabcaps_free_device_info`)
//! - Optional Tauri plugin (`plugin` feature)
//! - Simulated provider for offline testing
//!
//! # Usage
//! ```rust,no_run
//! use crabcaps::{config::CrabCapsConfig, CameraSystem};
//!
//! crabcaps::init_logging();
//! for device in CameraSystem::enumerate(&CrabCapsConfig::load_or_default()) {
//!     println!("{}: {:?}", device.name, device.fps_range());
//! }
//! ```
pub mod config;
pub mod enumerator;
pub mod errors;
pub mod ffi;
pub mod invariant_ppt;
pub mod platform;
pub mod types;

#[cfg(feature = "plugin")]
pub mod commands;

// Testing utilities - simulated hardware for offline testing
pub mod testing;

pub use enumerator::CameraCapabilityEnumerator;
pub use errors::CameraError;
pub use platform::{CameraDevice, CameraProvider, CameraSystem, PlatformCameraBackend};
pub use types::{
    BackendKind, CameraStaticInfo, CapabilityReport, DeviceCapability, Facing, FpsRange,
    Platform, Resolution,
};

/// Filter applied when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "crabcaps=info";

/// Initialize the crabcaps plugin with all commands
#[cfg(feature = "plugin")]
pub fn init<R: tauri::Runtime>() -> tauri::plugin::TauriPlugin<R> {
    tauri::plugin::Builder::new("crabcaps")
        .invoke_handler(tauri::generate_handler![
            commands::capabilities::get_camera_capabilities,
            commands::capabilities::get_capability_report,
            commands::capabilities::get_platform_info,
            commands::config::get_config,
            commands::config::update_config,
            commands::config::reset_config,
        ])
        .build()
}

/// Detect the current platform
pub fn current_platform() -> Platform {
    Platform::current()
}

/// Initialize logging with the default filter
pub fn init_logging() {
    init_logging_with(DEFAULT_LOG_FILTER);
}

/// Initialize logging; RUST_LOG still takes precedence over `filter`
pub fn init_logging_with(filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
        platform: Platform::current(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub platform: Platform,
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_info() {
        let info = get_info();
        assert_eq!(info.name, "crabcaps");
        assert!(!info.version.is_empty());
        assert!(!info.description.is_empty());
        assert_eq!(info.platform, current_platform());
    }

    #[test]
    fn test_init_logging_is_repeatable() {
        init_logging();
        init_logging_with("crabcaps=debug");
    }
}
