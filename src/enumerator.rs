//! Camera capability enumeration
//!
//! Opens every camera the backend reports, one at a time, and normalizes its
//! preview sizes and frame-rate data into a [`DeviceCapability`]. Cameras that
//! cannot be opened or queried are logged and left out; enumeration itself
//! never fails.

use crate::assert_invariant;
use crate::errors::CameraError;
use crate::platform::{CameraDevice, CameraProvider, PlatformCameraBackend};
use crate::types::{device_unique_name, DeviceCapability, FpsRange, FALLBACK_FPS};

pub struct CameraCapabilityEnumerator<P> {
    backend: PlatformCameraBackend<P>,
    fallback_fps: u32,
}

impl<P: CameraProvider> CameraCapabilityEnumerator<P> {
    pub fn new(backend: PlatformCameraBackend<P>) -> Self {
        Self {
            backend,
            fallback_fps: FALLBACK_FPS,
        }
    }

    /// Frame rate synthesized for cameras that report no frame-rate data
    pub fn with_fallback_fps(mut self, fps: u32) -> Self {
        self.fallback_fps = fps;
        self
    }

    pub fn backend(&self) -> &PlatformCameraBackend<P> {
        &self.backend
    }

    /// Probe every camera and return one record per camera that opened.
    ///
    /// Records come back in ascending camera index. Each call reacquires the
    /// hardware; nothing is cached between calls.
    pub fn enumerate(&self) -> Vec<DeviceCapability> {
        let count = self.backend.camera_count();
        log::debug!(
            "Enumerating {} camera(s) with {} backend",
            count,
            self.backend.kind().as_str()
        );

        let mut devices = Vec::with_capacity(count);
        for index in 0..count {
            match self.probe(index) {
                Ok(device) => {
                    log::info!("{}", device.name);
                    devices.push(device);
                }
                Err(e) if e.is_device_failure() => {
                    log::warn!("Skipping camera {}: {}", index, e);
                }
                Err(e) => {
                    log::error!("Skipping camera {}, platform refused: {}", index, e);
                }
            }
        }

        log::info!("Found {} usable camera(s)", devices.len());
        devices
    }

    /// Build the record for one camera, or fail without a partial record
    pub fn probe(&self, index: usize) -> Result<DeviceCapability, CameraError> {
        let info = self.backend.static_info(index)?;
        let name = device_unique_name(index, &info);

        let (resolutions, fps_ranges) = {
            let mut device = self.backend.open(index).map_err(|e| match e {
                CameraError::DeviceOpenFailed { .. } | CameraError::PermissionDenied(_) => e,
                other => CameraError::open_failed(index, other.to_string()),
            })?;
            let resolutions = device.preview_sizes()?;
            let fps_ranges = self.resolve_fps_ranges(&name, &mut device)?;
            (resolutions, fps_ranges)
            // device released here
        };

        let representative = fps_ranges.last().copied();
        assert_invariant!(
            representative.is_some(),
            "Resolved frame-rate list is never empty",
            &name
        );
        let range = representative.unwrap_or_else(|| FpsRange::single(self.fallback_fps));

        let device = DeviceCapability::new(name, &info)
            .with_resolutions(resolutions)
            .with_fps_range(range);

        assert_invariant!(
            device.widths().len() == device.heights().len(),
            "Width and height arrays have equal length",
            &device.name
        );
        Ok(device)
    }

    /// Native ranges, else single-point ranges from the flat rate list, else
    /// the synthesized fallback rate.
    fn resolve_fps_ranges(
        &self,
        name: &str,
        device: &mut P::Device,
    ) -> Result<Vec<FpsRange>, CameraError> {
        if let Some(ranges) = self.backend.native_fps_ranges(device)? {
            if !ranges.is_empty() {
                return Ok(ranges);
            }
            log::debug!("{} reported an empty frame-rate range list", name);
        }

        if let Some(rates) = device.preview_frame_rates()? {
            if !rates.is_empty() {
                return Ok(rates.into_iter().map(FpsRange::single).collect());
            }
        }

        log::warn!(
            "{} doesn't know its own frame rate, guessing {}fps",
            name,
            self.fallback_fps
        );
        Ok(vec![FpsRange::single(self.fallback_fps)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendSelection;
    use crate::testing::{SimulatedCamera, SimulatedProvider};
    use crate::types::Resolution;

    fn enumerator(provider: SimulatedProvider) -> CameraCapabilityEnumerator<SimulatedProvider> {
        CameraCapabilityEnumerator::new(PlatformCameraBackend::select(
            provider,
            BackendSelection::Auto,
        ))
    }

    #[test]
    fn test_last_native_range_wins() {
        let camera = SimulatedCamera::back(90).with_fps_ranges(vec![
            FpsRange::new(7000, 30000),
            FpsRange::new(15000, 15000),
        ]);
        let devices = enumerator(SimulatedProvider::new(vec![camera])).enumerate();
        assert_eq!(devices[0].fps_range(), FpsRange::new(15000, 15000));
    }

    #[test]
    fn test_empty_native_ranges_fall_through_to_flat_rates() {
        let camera = SimulatedCamera::back(90)
            .with_fps_ranges(Vec::new())
            .with_frame_rates(vec![10, 24]);
        let devices = enumerator(SimulatedProvider::new(vec![camera])).enumerate();
        assert_eq!(devices[0].fps_range(), FpsRange::single(24));
    }

    #[test]
    fn test_configured_fallback_rate() {
        let camera = SimulatedCamera::back(90).without_frame_rate_info();
        let devices = enumerator(SimulatedProvider::new(vec![camera]))
            .with_fallback_fps(30)
            .enumerate();
        assert_eq!(devices[0].fps_range(), FpsRange::new(30000, 30000));
    }

    #[test]
    fn test_query_failure_skips_device() {
        let provider = SimulatedProvider::new(vec![
            SimulatedCamera::back(90).with_query_failure("getParameters failed"),
            SimulatedCamera::front(270),
        ]);
        let devices = enumerator(provider.clone()).enumerate();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "Camera 1, Facing front, Orientation 270");
        assert_eq!(provider.open_handles(), 0);
    }

    #[test]
    fn test_probe_reports_open_failure() {
        let provider = SimulatedProvider::new(vec![SimulatedCamera::back(90).failing("busy")]);
        let err = enumerator(provider).probe(0).unwrap_err();
        assert_eq!(err, CameraError::open_failed(0, "busy"));
    }

    #[test]
    fn test_platform_refusal_is_not_a_device_failure() {
        let busy = SimulatedProvider::new(vec![SimulatedCamera::back(90).failing("busy")]);
        assert!(enumerator(busy).probe(0).unwrap_err().is_device_failure());

        let refused = CameraCapabilityEnumerator::new(PlatformCameraBackend::select(
            crate::platform::unsupported::UnsupportedProvider,
            BackendSelection::Modern,
        ));
        let err = refused.probe(0).unwrap_err();
        assert!(matches!(err, CameraError::Unsupported(_)));
        assert!(!err.is_device_failure());
        assert!(refused.enumerate().is_empty());
    }

    #[test]
    fn test_resolutions_keep_platform_order() {
        let sizes = vec![
            Resolution::new(1280, 720),
            Resolution::new(640, 480),
            Resolution::new(1280, 960),
        ];
        let camera = SimulatedCamera::back(90).with_preview_sizes(sizes.clone());
        let devices = enumerator(SimulatedProvider::new(vec![camera])).enumerate();
        assert_eq!(devices[0].resolutions, sizes);
    }
}
