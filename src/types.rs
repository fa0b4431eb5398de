//! Core data types shared by the providers, the enumerator and the export
//! surfaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Orientation reported when the platform cannot tell us the sensor mounting.
pub const DEFAULT_ORIENTATION: u32 = 90;

/// Frame rate assumed when a camera reports no frame-rate data at all.
pub const FALLBACK_FPS: u32 = 25;

/// Platform enumeration for platform-specific provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Android,
    Windows,
    MacOS,
    Linux,
    Unknown,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
            Platform::Unknown => "unknown",
        }
    }
}

/// Preview resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Frame-rate range in thousandths of a frame per second.
///
/// Integer milli-fps survive the trip through boundaries that only carry
/// integers, which is why no floating point appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FpsRange {
    pub min_milli_fps: u32,
    pub max_milli_fps: u32,
}

impl FpsRange {
    pub const fn new(min_milli_fps: u32, max_milli_fps: u32) -> Self {
        Self {
            min_milli_fps,
            max_milli_fps,
        }
    }

    /// Single-point range for a whole frame rate, e.g. 30 -> [30000, 30000]
    pub const fn single(fps: u32) -> Self {
        let milli = fps.saturating_mul(1000);
        Self::new(milli, milli)
    }
}

/// Direction a camera points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Back,
    Front,
}

impl Facing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Back => "back",
            Facing::Front => "front",
        }
    }
}

/// Static per-device metadata, readable without opening the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraStaticInfo {
    pub facing: Facing,
    pub orientation: u32,
}

impl Default for CameraStaticInfo {
    fn default() -> Self {
        Self {
            facing: Facing::Back,
            orientation: DEFAULT_ORIENTATION,
        }
    }
}

impl CameraStaticInfo {
    pub fn new(facing: Facing, orientation: u32) -> Self {
        Self {
            facing,
            orientation,
        }
    }

    pub fn is_front_facing(&self) -> bool {
        self.facing == Facing::Front
    }
}

/// Build the display name that uniquely identifies a camera
pub fn device_unique_name(index: usize, info: &CameraStaticInfo) -> String {
    format!(
        "Camera {}, Facing {}, Orientation {}",
        index,
        info.facing.as_str(),
        info.orientation
    )
}

/// Which platform API flavour produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    Legacy,
    Modern,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Legacy => "legacy",
            BackendKind::Modern => "modern",
        }
    }
}

/// Normalized capabilities of one camera
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapability {
    pub name: String,
    pub front_facing: bool,
    pub orientation: u32,
    pub resolutions: Vec<Resolution>,
    pub min_milli_fps: u32,
    pub max_milli_fps: u32,
}

impl DeviceCapability {
    pub fn new(name: String, info: &CameraStaticInfo) -> Self {
        Self {
            name,
            front_facing: info.is_front_facing(),
            orientation: info.orientation,
            resolutions: Vec::new(),
            min_milli_fps: FpsRange::single(FALLBACK_FPS).min_milli_fps,
            max_milli_fps: FpsRange::single(FALLBACK_FPS).max_milli_fps,
        }
    }

    pub fn with_resolutions(mut self, resolutions: Vec<Resolution>) -> Self {
        self.resolutions = resolutions;
        self
    }

    pub fn with_fps_range(mut self, range: FpsRange) -> Self {
        self.min_milli_fps = range.min_milli_fps;
        self.max_milli_fps = range.max_milli_fps;
        self
    }

    pub fn fps_range(&self) -> FpsRange {
        FpsRange::new(self.min_milli_fps, self.max_milli_fps)
    }

    /// Widths in platform order, parallel to [`DeviceCapability::heights`]
    pub fn widths(&self) -> Vec<u32> {
        self.resolutions.iter().map(|r| r.width).collect()
    }

    /// Heights in platform order, parallel to [`DeviceCapability::widths`]
    pub fn heights(&self) -> Vec<u32> {
        self.resolutions.iter().map(|r| r.height).collect()
    }
}

/// One enumeration pass with the context it ran in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityReport {
    pub platform: Platform,
    pub backend: BackendKind,
    pub generated_at: DateTime<Utc>,
    pub devices: Vec<DeviceCapability>,
}

impl CapabilityReport {
    pub fn new(platform: Platform, backend: BackendKind, devices: Vec<DeviceCapability>) -> Self {
        Self {
            platform,
            backend,
            generated_at: Utc::now(),
            devices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
