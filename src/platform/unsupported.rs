//! Provider for targets with no camera integration

use super::{CameraDevice, CameraProvider};
use crate::errors::CameraError;
use crate::types::{CameraStaticInfo, FpsRange, Resolution};

/// Reports zero cameras and refuses to open any
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProvider;

/// Never constructed
#[derive(Debug)]
pub enum UnsupportedDevice {}

impl CameraDevice for UnsupportedDevice {
    fn preview_sizes(&mut self) -> Result<Vec<Resolution>, CameraError> {
        match *self {}
    }

    fn preview_fps_ranges(&mut self) -> Result<Option<Vec<FpsRange>>, CameraError> {
        match *self {}
    }

    fn preview_frame_rates(&mut self) -> Result<Option<Vec<u32>>, CameraError> {
        match *self {}
    }
}

impl CameraProvider for UnsupportedProvider {
    type Device = UnsupportedDevice;

    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn supports_extended_api(&self) -> bool {
        true
    }

    fn number_of_cameras(&self) -> Result<usize, CameraError> {
        Ok(0)
    }

    fn camera_info(&self, _index: usize) -> Result<CameraStaticInfo, CameraError> {
        Err(self.unsupported())
    }

    fn open(&self, _index: usize) -> Result<Self::Device, CameraError> {
        Err(self.unsupported())
    }

    fn open_default(&self) -> Result<Self::Device, CameraError> {
        Err(self.unsupported())
    }
}

impl UnsupportedProvider {
    fn unsupported(&self) -> CameraError {
        CameraError::Unsupported(format!(
            "camera access on {}",
            crate::types::Platform::current().as_str()
        ))
    }
}
