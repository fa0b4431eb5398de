//! Platform camera access
//!
//! A [`CameraProvider`] is the raw platform camera API: device count, static
//! info, open, and the preview configuration of an opened [`CameraDevice`].
//! [`PlatformCameraBackend`] wraps a provider in the API flavour chosen once at
//! startup so enumeration never has to branch on platform versions.

use crate::config::{BackendSelection, CrabCapsConfig};
use crate::enumerator::CameraCapabilityEnumerator;
use crate::errors::CameraError;
use crate::types::{
    BackendKind, CameraStaticInfo, CapabilityReport, DeviceCapability, FpsRange, Platform,
    Resolution,
};
use serde::{Deserialize, Serialize};

#[cfg(target_os = "android")]
pub mod android;
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub mod desktop;
pub mod unsupported;

/// An opened camera. Dropping it releases the hardware.
pub trait CameraDevice {
    /// Supported preview sizes in platform order
    fn preview_sizes(&mut self) -> Result<Vec<Resolution>, CameraError>;

    /// Native min/max frame-rate ranges, `None` when the platform has no such API
    fn preview_fps_ranges(&mut self) -> Result<Option<Vec<FpsRange>>, CameraError>;

    /// Flat list of supported frame rates in whole fps, `None` when unknown
    fn preview_frame_rates(&mut self) -> Result<Option<Vec<u32>>, CameraError>;
}

/// Raw platform camera API
pub trait CameraProvider {
    type Device: CameraDevice;

    /// Short provider name for diagnostics
    fn name(&self) -> &'static str;

    /// Whether per-index device info, indexed open and native frame-rate
    /// ranges are available
    fn supports_extended_api(&self) -> bool;

    fn number_of_cameras(&self) -> Result<usize, CameraError>;

    fn camera_info(&self, index: usize) -> Result<CameraStaticInfo, CameraError>;

    /// Open a camera by index for exclusive use
    fn open(&self, index: usize) -> Result<Self::Device, CameraError>;

    /// Open whatever camera the platform considers default
    fn open_default(&self) -> Result<Self::Device, CameraError>;
}

/// Provider wrapped in the API flavour it will be driven with
#[derive(Debug, Clone)]
pub enum PlatformCameraBackend<P> {
    /// Pre-extended API: one camera, no static info, flat frame rates only
    Legacy(P),
    Modern(P),
}

impl<P: CameraProvider> PlatformCameraBackend<P> {
    /// Pick the backend flavour once for the given provider
    pub fn select(provider: P, selection: BackendSelection) -> Self {
        let backend = match selection {
            BackendSelection::Legacy => PlatformCameraBackend::Legacy(provider),
            BackendSelection::Modern => PlatformCameraBackend::Modern(provider),
            BackendSelection::Auto if provider.supports_extended_api() => {
                PlatformCameraBackend::Modern(provider)
            }
            BackendSelection::Auto => PlatformCameraBackend::Legacy(provider),
        };
        log::debug!(
            "Selected {} backend for provider {}",
            backend.kind().as_str(),
            backend.provider().name()
        );
        backend
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            PlatformCameraBackend::Legacy(_) => BackendKind::Legacy,
            PlatformCameraBackend::Modern(_) => BackendKind::Modern,
        }
    }

    pub fn provider(&self) -> &P {
        match self {
            PlatformCameraBackend::Legacy(p) | PlatformCameraBackend::Modern(p) => p,
        }
    }

    /// Number of cameras to probe. A failing count query counts as none.
    pub fn camera_count(&self) -> usize {
        match self {
            PlatformCameraBackend::Legacy(_) => 1,
            PlatformCameraBackend::Modern(p) => p.number_of_cameras().unwrap_or_else(|e| {
                log::error!("Failed to query number of cameras: {}", e);
                0
            }),
        }
    }

    pub fn static_info(&self, index: usize) -> Result<CameraStaticInfo, CameraError> {
        match self {
            PlatformCameraBackend::Legacy(_) => Ok(CameraStaticInfo::default()),
            PlatformCameraBackend::Modern(p) => p.camera_info(index),
        }
    }

    pub fn open(&self, index: usize) -> Result<P::Device, CameraError> {
        match self {
            PlatformCameraBackend::Legacy(p) => p.open_default(),
            PlatformCameraBackend::Modern(p) => p.open(index),
        }
    }

    /// Native frame-rate ranges; the legacy API never exposes them
    pub fn native_fps_ranges(
        &self,
        device: &mut P::Device,
    ) -> Result<Option<Vec<FpsRange>>, CameraError> {
        match self {
            PlatformCameraBackend::Legacy(_) => Ok(None),
            PlatformCameraBackend::Modern(_) => device.preview_fps_ranges(),
        }
    }
}

#[cfg(target_os = "android")]
pub type DefaultProvider = android::AndroidCameraProvider;
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub type DefaultProvider = desktop::DesktopCameraProvider;
#[cfg(not(any(
    target_os = "android",
    target_os = "windows",
    target_os = "macos",
    target_os = "linux"
)))]
pub type DefaultProvider = unsupported::UnsupportedProvider;

/// Create the provider for the platform this crate was built for
pub fn default_provider() -> Result<DefaultProvider, CameraError> {
    #[cfg(target_os = "android")]
    {
        android::AndroidCameraProvider::new()
    }
    #[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
    {
        Ok(desktop::DesktopCameraProvider::new())
    }
    #[cfg(not(any(
        target_os = "android",
        target_os = "windows",
        target_os = "macos",
        target_os = "linux"
    )))]
    {
        Ok(unsupported::UnsupportedProvider)
    }
}

/// Platform description for front-ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub provider: String,
    pub extended_api: bool,
}

/// Process-level entry points driving the default provider
pub struct CameraSystem;

impl CameraSystem {
    /// Enumerate every camera with the default provider.
    ///
    /// Blocks while each camera is opened in turn. Provider setup failure is
    /// logged and yields an empty list, same as a host without cameras.
    pub fn enumerate(config: &CrabCapsConfig) -> Vec<DeviceCapability> {
        match Self::enumerator(config) {
            Ok(enumerator) => enumerator.enumerate(),
            Err(e) => {
                log::error!("Camera provider unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Run [`CameraSystem::enumerate`] on Tokio's blocking pool
    pub async fn enumerate_async(config: CrabCapsConfig) -> Vec<DeviceCapability> {
        match tokio::task::spawn_blocking(move || Self::enumerate(&config)).await {
            Ok(devices) => devices,
            Err(e) => {
                log::error!("Camera enumeration task failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Enumerate and wrap the result with platform and backend context
    pub fn report(config: &CrabCapsConfig) -> Result<CapabilityReport, CameraError> {
        let enumerator = Self::enumerator(config)?;
        let backend = enumerator.backend().kind();
        let devices = enumerator.enumerate();
        Ok(CapabilityReport::new(Platform::current(), backend, devices))
    }

    pub fn platform_info() -> Result<PlatformInfo, CameraError> {
        let provider = default_provider()?;
        Ok(PlatformInfo {
            platform: Platform::current(),
            provider: provider.name().to_string(),
            extended_api: provider.supports_extended_api(),
        })
    }

    fn enumerator(
        config: &CrabCapsConfig,
    ) -> Result<CameraCapabilityEnumerator<DefaultProvider>, CameraError> {
        let provider = default_provider()?;
        let backend = PlatformCameraBackend::select(provider, config.enumeration.backend);
        Ok(CameraCapabilityEnumerator::new(backend)
            .with_fallback_fps(config.enumeration.fallback_fps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{SimulatedCamera, SimulatedProvider};

    fn provider(extended: bool) -> SimulatedProvider {
        SimulatedProvider::new(vec![SimulatedCamera::front(270), SimulatedCamera::back(90)])
            .with_extended_api(extended)
    }

    #[test]
    fn test_auto_selection_follows_provider() {
        let modern = PlatformCameraBackend::select(provider(true), BackendSelection::Auto);
        assert_eq!(modern.kind(), BackendKind::Modern);

        let legacy = PlatformCameraBackend::select(provider(false), BackendSelection::Auto);
        assert_eq!(legacy.kind(), BackendKind::Legacy);
    }

    #[test]
    fn test_forced_selection_wins() {
        let backend = PlatformCameraBackend::select(provider(true), BackendSelection::Legacy);
        assert_eq!(backend.kind(), BackendKind::Legacy);
    }

    #[test]
    fn test_legacy_hides_extended_api() {
        let backend = PlatformCameraBackend::select(provider(true), BackendSelection::Legacy);
        assert_eq!(backend.camera_count(), 1);
        assert_eq!(backend.static_info(1).unwrap(), CameraStaticInfo::default());

        let mut device = backend.open(1).unwrap();
        assert_eq!(backend.native_fps_ranges(&mut device).unwrap(), None);
    }

    #[test]
    fn test_modern_count_failure_is_zero() {
        let backend = PlatformCameraBackend::select(
            SimulatedProvider::new(vec![SimulatedCamera::back(90)]).with_count_failure(),
            BackendSelection::Modern,
        );
        assert_eq!(backend.camera_count(), 0);
    }
}
