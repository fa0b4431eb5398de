//! C ABI for native media-capture pipelines.
//!
//! Everything crossing the boundary is integral or a C string, so frame
//! rates travel as milli-fps and resolutions as two parallel `u32` arrays.

use crate::assert_invariant;
use crate::config::CrabCapsConfig;
use crate::platform::CameraSystem;
use crate::types::DeviceCapability;
use std::ffi::{c_char, CString};
use std::panic::{self, UnwindSafe};
use std::ptr;

/// One camera as seen from C.
///
/// `width` and `height` each point at `resolution_count` elements.
#[repr(C)]
#[derive(Debug)]
pub struct CaptureCapability {
    pub name: *mut c_char,
    pub front_facing: bool,
    pub orientation: u32,
    pub width: *mut u32,
    pub height: *mut u32,
    pub resolution_count: usize,
    pub min_milli_fps: u32,
    pub max_milli_fps: u32,
}

impl CaptureCapability {
    fn from_device(device: DeviceCapability) -> Self {
        let widths = device.widths().into_boxed_slice();
        let heights = device.heights().into_boxed_slice();
        assert_invariant!(
            widths.len() == heights.len(),
            "Exported width and height arrays have equal length",
            &device.name
        );
        let resolution_count = widths.len();

        // Names are built from integers and ASCII, so they never hold NUL.
        let name = CString::new(device.name).unwrap_or_default();

        Self {
            name: name.into_raw(),
            front_facing: device.front_facing,
            orientation: device.orientation,
            width: Box::into_raw(widths) as *mut u32,
            height: Box::into_raw(heights) as *mut u32,
            resolution_count,
            min_milli_fps: device.min_milli_fps,
            max_milli_fps: device.max_milli_fps,
        }
    }

    /// # Safety
    /// Must only be called once, on a value built by `from_device`.
    unsafe fn release(&mut self) {
        if !self.name.is_null() {
            drop(CString::from_raw(self.name));
            self.name = ptr::null_mut();
        }
        for array in [&mut self.width, &mut self.height] {
            if !array.is_null() {
                let slice = ptr::slice_from_raw_parts_mut(*array, self.resolution_count);
                drop(Box::from_raw(slice));
                *array = ptr::null_mut();
            }
        }
        self.resolution_count = 0;
    }
}

/// Hand a capability list to C. Returns null for an empty list.
pub fn export_capabilities(
    devices: Vec<DeviceCapability>,
    out_len: &mut usize,
) -> *mut CaptureCapability {
    *out_len = devices.len();
    if devices.is_empty() {
        return ptr::null_mut();
    }

    let exported: Box<[CaptureCapability]> = devices
        .into_iter()
        .map(CaptureCapability::from_device)
        .collect();
    Box::into_raw(exported) as *mut CaptureCapability
}

/// Enumerate all cameras and return them as a C array.
///
/// Blocks while each camera is opened in turn; call it off the UI thread.
/// On return `*out_len` holds the element count. The array must be released
/// with [`crabcaps_free_device_info`]. Returns null when no camera is usable
/// or `out_len` is null.
#[no_mangle]
pub extern "C" fn crabcaps_get_device_info(out_len: *mut usize) -> *mut CaptureCapability {
    if out_len.is_null() {
        return ptr::null_mut();
    }

    // SAFETY: checked non-null above; the caller provides a writable usize.
    let out_len = unsafe { &mut *out_len };
    *out_len = 0;

    let devices =
        enumerate_guarded(|| CameraSystem::enumerate(&CrabCapsConfig::load_or_default()));
    export_capabilities(devices, out_len)
}

/// Run an enumeration so that a panic cannot unwind into C.
///
/// A panic is logged and reported as "no cameras".
pub(crate) fn enumerate_guarded<F>(enumerate: F) -> Vec<DeviceCapability>
where
    F: FnOnce() -> Vec<DeviceCapability> + UnwindSafe,
{
    panic::catch_unwind(enumerate).unwrap_or_else(|cause| {
        let reason = cause
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| cause.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        log::error!("Camera enumeration panicked: {}", reason);
        Vec::new()
    })
}

/// Hand the process Java VM to crabcaps before the first enumeration.
///
/// Needed when the host loads the library without `System.loadLibrary`
/// (which calls `JNI_OnLoad`) and without an `ndk-context` initialized
/// activity. Returns false for a null VM.
///
/// # Safety
/// `vm` must be a valid `JavaVM*` that outlives the process' use of crabcaps.
#[cfg(target_os = "android")]
#[no_mangle]
pub unsafe extern "C" fn crabcaps_set_java_vm(vm: *mut std::ffi::c_void) -> bool {
    crate::platform::android::register_raw_java_vm(vm.cast()).is_ok()
}

/// Free an array returned by [`crabcaps_get_device_info`].
///
/// # Safety
/// `devices` and `len` must be exactly what `crabcaps_get_device_info`
/// returned, and the array must not be used afterwards. Null is ignored.
#[no_mangle]
pub unsafe extern "C" fn crabcaps_free_device_info(devices: *mut CaptureCapability, len: usize) {
    if devices.is_null() {
        return;
    }
    let mut exported = Box::from_raw(ptr::slice_from_raw_parts_mut(devices, len));
    for device in exported.iter_mut() {
        device.release();
    }
}
