//! Enumeration behaviour against simulated hardware
//!
//! Covers device counts, open failures, the frame-rate fallback chain, legacy
//! platforms and repeat calls.

#[cfg(test)]
mod enumerator_tests {
    use crabcaps::config::BackendSelection;
    use crabcaps::invariant_ppt::{clear_invariant_log, contract_covers, contract_test};
    use crabcaps::testing::{SimulatedCamera, SimulatedProvider};
    use crabcaps::{BackendKind, CameraCapabilityEnumerator, FpsRange, PlatformCameraBackend};

    fn enumerate(provider: &SimulatedProvider) -> Vec<crabcaps::DeviceCapability> {
        let backend = PlatformCameraBackend::select(provider.clone(), BackendSelection::Auto);
        CameraCapabilityEnumerator::new(backend).enumerate()
    }

    fn three_cameras() -> Vec<SimulatedCamera> {
        vec![
            SimulatedCamera::back(90),
            SimulatedCamera::front(270),
            SimulatedCamera::back(0),
        ]
    }

    #[test]
    fn test_one_record_per_openable_camera() {
        let provider = SimulatedProvider::new(three_cameras());
        let devices = enumerate(&provider);

        assert_eq!(devices.len(), 3);
        assert_eq!(
            devices.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            vec![
                "Camera 0, Facing back, Orientation 90",
                "Camera 1, Facing front, Orientation 270",
                "Camera 2, Facing back, Orientation 0",
            ]
        );
        assert!(!devices[0].front_facing);
        assert!(devices[1].front_facing);
        assert_eq!(devices[1].orientation, 270);
    }

    #[test]
    fn test_failing_camera_is_excluded() {
        let mut cameras = three_cameras();
        cameras[1] = cameras[1].clone().failing("Fail to connect to camera service");
        let provider = SimulatedProvider::new(cameras);

        let devices = enumerate(&provider);
        assert_eq!(devices.len(), 2);
        assert!(devices.iter().all(|d| !d.name.starts_with("Camera 1,")));
        assert_eq!(devices[1].name, "Camera 2, Facing back, Orientation 0");
    }

    #[test]
    fn test_permission_denied_is_excluded() {
        let provider = SimulatedProvider::new(vec![
            SimulatedCamera::back(90).permission_denied(),
            SimulatedCamera::front(270),
        ]);
        let devices = enumerate(&provider);
        assert_eq!(devices.len(), 1);
        assert!(devices[0].front_facing);
    }

    #[test]
    fn test_every_camera_failing_yields_empty_list() {
        let provider = SimulatedProvider::new(vec![
            SimulatedCamera::back(90).failing("busy"),
            SimulatedCamera::front(270).failing("busy"),
        ]);
        assert!(enumerate(&provider).is_empty());
    }

    #[test]
    fn test_no_cameras_yields_empty_list() {
        assert!(enumerate(&SimulatedProvider::new(Vec::new())).is_empty());
    }

    #[test]
    fn test_flat_rates_use_last_entry() {
        let camera = SimulatedCamera::back(90)
            .without_fps_ranges()
            .with_frame_rates(vec![15, 30]);
        let devices = enumerate(&SimulatedProvider::new(vec![camera]));

        assert_eq!(devices[0].min_milli_fps, 30000);
        assert_eq!(devices[0].max_milli_fps, 30000);
    }

    #[test]
    fn test_missing_frame_rate_info_falls_back_to_25fps() {
        let camera = SimulatedCamera::back(90).without_frame_rate_info();
        let devices = enumerate(&SimulatedProvider::new(vec![camera]));

        assert_eq!(devices[0].fps_range(), FpsRange::new(25000, 25000));
    }

    #[test]
    fn test_native_ranges_preferred_over_flat_rates() {
        let camera = SimulatedCamera::back(90)
            .with_fps_ranges(vec![FpsRange::new(15000, 15000), FpsRange::new(8000, 30000)])
            .with_frame_rates(vec![60]);
        let devices = enumerate(&SimulatedProvider::new(vec![camera]));

        assert_eq!(devices[0].fps_range(), FpsRange::new(8000, 30000));
    }

    #[test]
    fn test_widths_and_heights_stay_parallel() {
        let provider = SimulatedProvider::phone();
        for device in enumerate(&provider) {
            assert_eq!(device.widths().len(), device.heights().len());
            assert_eq!(device.widths().len(), device.resolutions.len());
        }
    }

    #[test]
    fn test_camera_without_preview_sizes() {
        let camera = SimulatedCamera::back(90).with_preview_sizes(Vec::new());
        let devices = enumerate(&SimulatedProvider::new(vec![camera]));

        assert_eq!(devices.len(), 1);
        assert!(devices[0].resolutions.is_empty());
        assert!(devices[0].widths().is_empty());
    }

    #[test]
    fn test_legacy_platform_defaults() {
        let provider = SimulatedProvider::new(vec![SimulatedCamera::front(270)])
            .with_extended_api(false);
        let backend = PlatformCameraBackend::select(provider.clone(), BackendSelection::Auto);
        assert_eq!(backend.kind(), BackendKind::Legacy);

        let devices = CameraCapabilityEnumerator::new(backend).enumerate();
        assert_eq!(devices.len(), 1);
        for device in &devices {
            assert!(!device.front_facing);
            assert_eq!(device.orientation, 90);
            assert_eq!(device.name, "Camera 0, Facing back, Orientation 90");
        }
    }

    #[test]
    fn test_legacy_platform_ignores_native_ranges() {
        let camera = SimulatedCamera::back(90)
            .with_fps_ranges(vec![FpsRange::new(7000, 30000)])
            .with_frame_rates(vec![10, 20]);
        let provider = SimulatedProvider::new(vec![camera, SimulatedCamera::front(270)])
            .with_extended_api(false);

        let devices = enumerate(&provider);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].fps_range(), FpsRange::single(20));
    }

    #[test]
    fn test_repeat_calls_are_equal_and_reacquire() {
        let provider = SimulatedProvider::phone();
        let first = enumerate(&provider);
        let second = enumerate(&provider);

        assert_eq!(first, second);
        assert_eq!(provider.opens(), 4);
        assert_eq!(provider.releases(), 4);
    }

    #[test]
    fn test_devices_released_one_at_a_time() {
        let provider = SimulatedProvider::new(three_cameras());
        enumerate(&provider);

        assert_eq!(provider.open_handles(), 0);
        assert_eq!(provider.max_open_handles(), 1);
        assert_eq!(provider.opens(), provider.releases());
    }

    #[test]
    fn test_count_failure_yields_empty_list() {
        let provider = SimulatedProvider::phone().with_count_failure();
        assert!(enumerate(&provider).is_empty());
        assert_eq!(provider.opens(), 0);
    }

    #[test]
    fn contract_capability_records() {
        clear_invariant_log();
        let provider = SimulatedProvider::new(vec![
            SimulatedCamera::back(90),
            SimulatedCamera::front(270).without_frame_rate_info(),
            SimulatedCamera::back(0).without_fps_ranges(),
        ]);
        let devices = enumerate(&provider);
        let names: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names.len(), 3);

        contract_test(
            "capability records",
            &[
                "Resolved frame-rate list is never empty",
                "Width and height arrays have equal length",
            ],
        );
        contract_covers(
            "capability records",
            "Resolved frame-rate list is never empty",
            &names,
        );
        contract_covers(
            "capability records",
            "Width and height arrays have equal length",
            &names,
        );
    }
}
