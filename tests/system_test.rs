//! Process-level entry points against whatever provider the host offers

#[cfg(test)]
mod system_tests {
    use crabcaps::config::{BackendSelection, CrabCapsConfig};
    use crabcaps::platform::unsupported::UnsupportedProvider;
    use crabcaps::{
        BackendKind, CameraCapabilityEnumerator, CameraProvider, CameraSystem, Platform,
        PlatformCameraBackend,
    };

    #[test]
    fn test_enumerate_returns_consistent_records() {
        let devices = CameraSystem::enumerate(&CrabCapsConfig::default());
        for (i, device) in devices.iter().enumerate() {
            assert!(device.name.starts_with("Camera "), "record {}: {}", i, device.name);
            assert_eq!(device.widths().len(), device.heights().len());
        }
    }

    #[tokio::test]
    async fn test_enumerate_async_matches_shape() {
        let devices = CameraSystem::enumerate_async(CrabCapsConfig::default()).await;
        for device in devices {
            assert_eq!(device.widths().len(), device.heights().len());
        }
    }

    #[test]
    fn test_report_backend_follows_config() {
        let mut config = CrabCapsConfig::default();
        config.enumeration.backend = BackendSelection::Legacy;

        if let Ok(report) = CameraSystem::report(&config) {
            assert_eq!(report.platform, Platform::current());
            assert_eq!(report.backend, BackendKind::Legacy);
            assert!(report.devices.len() <= 1);
        }
    }

    #[test]
    fn test_platform_info() {
        if let Ok(info) = CameraSystem::platform_info() {
            assert_eq!(info.platform, Platform::current());
            assert!(!info.provider.is_empty());
        }
    }

    #[test]
    fn test_unsupported_platform_has_no_cameras() {
        let provider = UnsupportedProvider;
        assert_eq!(provider.number_of_cameras().unwrap(), 0);

        let backend = PlatformCameraBackend::select(provider, BackendSelection::Auto);
        assert_eq!(backend.kind(), BackendKind::Modern);
        assert!(CameraCapabilityEnumerator::new(backend).enumerate().is_empty());
    }
}
