//! Simulated camera hardware
//!
//! Modeled on a typical phone: a back camera mounted at 90 degrees and a front
//! camera at 270, both reporting native frame-rate ranges.

use crate::errors::CameraError;
use crate::platform::{CameraDevice, CameraProvider};
use crate::types::{CameraStaticInfo, Facing, FpsRange, Resolution};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// How a simulated camera misbehaves
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fault {
    None,
    Open(String),
    PermissionDenied,
    Query(String),
}

/// One simulated camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedCamera {
    pub info: CameraStaticInfo,
    pub preview_sizes: Vec<Resolution>,
    pub fps_ranges: Option<Vec<FpsRange>>,
    pub frame_rates: Option<Vec<u32>>,
    fault: Fault,
}

impl SimulatedCamera {
    pub fn new(info: CameraStaticInfo) -> Self {
        Self {
            info,
            preview_sizes: vec![
                Resolution::new(1920, 1080),
                Resolution::new(1280, 720),
                Resolution::new(640, 480),
                Resolution::new(320, 240),
            ],
            fps_ranges: Some(vec![FpsRange::new(15000, 30000), FpsRange::new(30000, 30000)]),
            frame_rates: Some(vec![15, 30]),
            fault: Fault::None,
        }
    }

    pub fn back(orientation: u32) -> Self {
        Self::new(CameraStaticInfo::new(Facing::Back, orientation))
    }

    pub fn front(orientation: u32) -> Self {
        Self::new(CameraStaticInfo::new(Facing::Front, orientation))
    }

    pub fn with_preview_sizes(mut self, sizes: Vec<Resolution>) -> Self {
        self.preview_sizes = sizes;
        self
    }

    pub fn with_fps_ranges(mut self, ranges: Vec<FpsRange>) -> Self {
        self.fps_ranges = Some(ranges);
        self
    }

    /// Drop the native range API, as on devices where it is broken
    pub fn without_fps_ranges(mut self) -> Self {
        self.fps_ranges = None;
        self
    }

    pub fn with_frame_rates(mut self, rates: Vec<u32>) -> Self {
        self.frame_rates = Some(rates);
        self
    }

    pub fn without_frame_rate_info(mut self) -> Self {
        self.fps_ranges = None;
        self.frame_rates = None;
        self
    }

    /// Fail to open, e.g. because another process holds the camera
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fault = Fault::Open(reason.into());
        self
    }

    pub fn permission_denied(mut self) -> Self {
        self.fault = Fault::PermissionDenied;
        self
    }

    /// Open fine but fail while reading the preview configuration
    pub fn with_query_failure(mut self, reason: impl Into<String>) -> Self {
        self.fault = Fault::Query(reason.into());
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    releases: AtomicUsize,
    open_handles: AtomicUsize,
    max_open_handles: AtomicUsize,
}

/// In-memory provider. Clones share their open/release counters.
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    cameras: Vec<SimulatedCamera>,
    extended_api: bool,
    count_failure: bool,
    counters: Arc<Counters>,
}

impl SimulatedProvider {
    pub fn new(cameras: Vec<SimulatedCamera>) -> Self {
        Self {
            cameras,
            extended_api: true,
            count_failure: false,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Back camera at 90 degrees plus front camera at 270
    pub fn phone() -> Self {
        Self::new(vec![SimulatedCamera::back(90), SimulatedCamera::front(270)])
    }

    pub fn with_extended_api(mut self, extended: bool) -> Self {
        self.extended_api = extended;
        self
    }

    pub fn with_count_failure(mut self) -> Self {
        self.count_failure = true;
        self
    }

    /// Successful opens so far
    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.counters.releases.load(Ordering::SeqCst)
    }

    /// Devices currently held open
    pub fn open_handles(&self) -> usize {
        self.counters.open_handles.load(Ordering::SeqCst)
    }

    /// Most devices ever held open at the same time
    pub fn max_open_handles(&self) -> usize {
        self.counters.max_open_handles.load(Ordering::SeqCst)
    }

    fn acquire(&self, index: usize) -> Result<SimulatedDevice, CameraError> {
        let camera = self
            .cameras
            .get(index)
            .ok_or_else(|| CameraError::open_failed(index, "no such camera"))?;

        match &camera.fault {
            Fault::Open(reason) => return Err(CameraError::open_failed(index, reason.clone())),
            Fault::PermissionDenied => {
                return Err(CameraError::PermissionDenied(format!("camera {}", index)))
            }
            Fault::None | Fault::Query(_) => {}
        }

        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        let held = self.counters.open_handles.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters
            .max_open_handles
            .fetch_max(held, Ordering::SeqCst);

        Ok(SimulatedDevice {
            camera: camera.clone(),
            counters: Arc::clone(&self.counters),
        })
    }
}

impl CameraProvider for SimulatedProvider {
    type Device = SimulatedDevice;

    fn name(&self) -> &'static str {
        "simulated"
    }

    fn supports_extended_api(&self) -> bool {
        self.extended_api
    }

    fn number_of_cameras(&self) -> Result<usize, CameraError> {
        if self.count_failure {
            return Err(CameraError::query("getNumberOfCameras", "camera service unavailable"));
        }
        Ok(self.cameras.len())
    }

    fn camera_info(&self, index: usize) -> Result<CameraStaticInfo, CameraError> {
        self.cameras
            .get(index)
            .map(|c| c.info)
            .ok_or_else(|| CameraError::query("getCameraInfo", format!("no camera {}", index)))
    }

    fn open(&self, index: usize) -> Result<Self::Device, CameraError> {
        self.acquire(index)
    }

    fn open_default(&self) -> Result<Self::Device, CameraError> {
        self.acquire(0)
    }
}

/// Open simulated camera; dropping it releases the simulated hardware
#[derive(Debug)]
pub struct SimulatedDevice {
    camera: SimulatedCamera,
    counters: Arc<Counters>,
}

impl SimulatedDevice {
    fn check(&self) -> Result<(), CameraError> {
        match &self.camera.fault {
            Fault::Query(reason) => Err(CameraError::query("getParameters", reason)),
            _ => Ok(()),
        }
    }
}

impl CameraDevice for SimulatedDevice {
    fn preview_sizes(&mut self) -> Result<Vec<Resolution>, CameraError> {
        self.check()?;
        Ok(self.camera.preview_sizes.clone())
    }

    fn preview_fps_ranges(&mut self) -> Result<Option<Vec<FpsRange>>, CameraError> {
        self.check()?;
        Ok(self.camera.fps_ranges.clone())
    }

    fn preview_frame_rates(&mut self) -> Result<Option<Vec<u32>>, CameraError> {
        self.check()?;
        Ok(self.camera.frame_rates.clone())
    }
}

impl Drop for SimulatedDevice {
    fn drop(&mut self) {
        self.counters.open_handles.fetch_sub(1, Ordering::SeqCst);
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_drop_balance() {
        let provider = SimulatedProvider::phone();
        {
            let _device = provider.open(1).unwrap();
            assert_eq!(provider.open_handles(), 1);
        }
        assert_eq!(provider.opens(), 1);
        assert_eq!(provider.releases(), 1);
        assert_eq!(provider.open_handles(), 0);
    }

    #[test]
    fn test_failed_open_is_not_counted() {
        let provider = SimulatedProvider::new(vec![SimulatedCamera::back(90).failing("busy")]);
        assert!(provider.open(0).is_err());
        assert_eq!(provider.opens(), 0);
        assert_eq!(provider.releases(), 0);
    }

    #[test]
    fn test_out_of_range_index() {
        let provider = SimulatedProvider::phone();
        assert!(matches!(
            provider.open(5),
            Err(CameraError::DeviceOpenFailed { index: 5, .. })
        ));
        assert!(provider.camera_info(5).is_err());
    }
}
