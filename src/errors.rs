use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Camera initialization error: {0}")]
    InitializationError(String),
    #[error("Permission denied error: {0}")]
    PermissionDenied(String),
    #[error("Failed to open camera {index}: {reason}")]
    DeviceOpenFailed { index: usize, reason: String },
    #[error("Camera query error: {0}")]
    QueryError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl CameraError {
    pub fn open_failed(index: usize, reason: impl Into<String>) -> Self {
        CameraError::DeviceOpenFailed {
            index,
            reason: reason.into(),
        }
    }

    pub fn query(context: &str, reason: impl std::fmt::Display) -> Self {
        CameraError::QueryError(format!("{}: {}", context, reason))
    }

    /// Whether the error came from the device itself rather than our setup.
    pub fn is_device_failure(&self) -> bool {
        matches!(
            self,
            CameraError::DeviceOpenFailed { .. }
                | CameraError::PermissionDenied(_)
                | CameraError::QueryError(_)
        )
    }
}
