//! Desktop provider backed by nokhwa (V4L2, AVFoundation, Media Foundation)
//!
//! Desktop webcams expose no mounting metadata and no native frame-rate
//! ranges; frame rates come from the formats each device advertises.

use super::{CameraDevice, CameraProvider};
use crate::errors::CameraError;
use crate::types::{CameraStaticInfo, Facing, FpsRange, Resolution};
use nokhwa::{
    pixel_format::RgbFormat,
    query,
    utils::{
        ApiBackend, CameraFormat, CameraIndex, CameraInfo, RequestedFormat, RequestedFormatType,
    },
    Camera,
};

/// Webcams are mounted upright. Deliberately not the 90 degree default for unknown mounting.
const DESKTOP_ORIENTATION: u32 = 0;

#[derive(Debug, Clone, Copy)]
pub struct DesktopCameraProvider {
    api: ApiBackend,
}

impl Default for DesktopCameraProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopCameraProvider {
    pub fn new() -> Self {
        Self {
            api: ApiBackend::Auto,
        }
    }

    fn devices(&self) -> Result<Vec<CameraInfo>, CameraError> {
        query(self.api).map_err(|e| CameraError::query("Failed to query cameras", e))
    }

    fn device_index(&self, index: usize) -> Result<CameraIndex, CameraError> {
        self.devices()?
            .get(index)
            .map(|info| info.index().clone())
            .ok_or_else(|| CameraError::open_failed(index, "camera disappeared"))
    }
}

impl CameraProvider for DesktopCameraProvider {
    type Device = DesktopCameraDevice;

    fn name(&self) -> &'static str {
        "nokhwa"
    }

    fn supports_extended_api(&self) -> bool {
        true
    }

    fn number_of_cameras(&self) -> Result<usize, CameraError> {
        Ok(self.devices()?.len())
    }

    fn camera_info(&self, _index: usize) -> Result<CameraStaticInfo, CameraError> {
        Ok(CameraStaticInfo::new(Facing::Back, DESKTOP_ORIENTATION))
    }

    fn open(&self, index: usize) -> Result<Self::Device, CameraError> {
        let camera_index = self.device_index(index)?;
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::None);

        let camera = Camera::new(camera_index, requested)
            .map_err(|e| CameraError::open_failed(index, e.to_string()))?;

        log::debug!("Opened desktop camera {}: {}", index, camera.info().human_name());
        Ok(DesktopCameraDevice {
            camera,
            formats: None,
        })
    }

    fn open_default(&self) -> Result<Self::Device, CameraError> {
        self.open(0)
    }
}

pub struct DesktopCameraDevice {
    camera: Camera,
    formats: Option<Vec<CameraFormat>>,
}

impl DesktopCameraDevice {
    fn formats(&mut self) -> Result<&[CameraFormat], CameraError> {
        if self.formats.is_none() {
            let formats = self
                .camera
                .compatible_camera_formats()
                .map_err(|e| CameraError::query("Failed to read camera formats", e))?;
            self.formats = Some(formats);
        }
        Ok(self.formats.as_deref().unwrap_or(&[]))
    }
}

impl CameraDevice for DesktopCameraDevice {
    fn preview_sizes(&mut self) -> Result<Vec<Resolution>, CameraError> {
        Ok(distinct_sizes(self.formats()?))
    }

    fn preview_fps_ranges(&mut self) -> Result<Option<Vec<FpsRange>>, CameraError> {
        Ok(None)
    }

    fn preview_frame_rates(&mut self) -> Result<Option<Vec<u32>>, CameraError> {
        Ok(distinct_frame_rates(self.formats()?))
    }
}

/// Each resolution once, in the order the device reported it
fn distinct_sizes(formats: &[CameraFormat]) -> Vec<Resolution> {
    let mut sizes: Vec<Resolution> = Vec::new();
    for format in formats {
        let res = format.resolution();
        let size = Resolution::new(res.width(), res.height());
        if !sizes.contains(&size) {
            sizes.push(size);
        }
    }
    sizes
}

/// Ascending non-zero frame rates, `None` when the device advertised none
fn distinct_frame_rates(formats: &[CameraFormat]) -> Option<Vec<u32>> {
    let mut rates: Vec<u32> = formats
        .iter()
        .map(|f| f.frame_rate())
        .filter(|&fps| fps > 0)
        .collect();
    rates.sort_unstable();
    rates.dedup();

    if rates.is_empty() {
        None
    } else {
        Some(rates)
    }
}

impl Drop for DesktopCameraDevice {
    fn drop(&mut self) {
        if self.camera.is_stream_open() {
            let _ = self.camera.stop_stream();
        }
    }
}
