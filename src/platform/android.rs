//! Android provider using `android.hardware.Camera` through JNI
//!
//! The extended API (indexed open, `Camera.CameraInfo`, preview fps ranges)
//! appeared in API level 9; older releases only offer `Camera.open()`.

use super::{CameraDevice, CameraProvider};
use crate::errors::CameraError;
use crate::types::{CameraStaticInfo, Facing, FpsRange, Resolution};
use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JIntArray, JObject, JString, JValue};
use jni::sys::{jint, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM};
use std::ffi::c_void;
use std::panic;
use std::sync::{Arc, RwLock};

/// First API level with `Camera.getNumberOfCameras` and friends
pub const EXTENDED_API_LEVEL: i32 = 9;

const CAMERA_CLASS: &str = "android/hardware/Camera";
const CAMERA_INFO_CLASS: &str = "android/hardware/Camera$CameraInfo";
const CAMERA_FACING_FRONT: i32 = 1;
const PREVIEW_FPS_MIN_INDEX: usize = 0;
const PREVIEW_FPS_MAX_INDEX: usize = 1;

lazy_static::lazy_static! {
    static ref JAVA_VM: RwLock<Option<Arc<JavaVM>>> = RwLock::new(None);
}

/// Use `vm` for every later enumeration
pub fn register_java_vm(vm: JavaVM) {
    let mut slot = JAVA_VM.write().unwrap_or_else(|e| e.into_inner());
    *slot = Some(Arc::new(vm));
}

/// # Safety
/// `vm` must be null or a valid `JavaVM*` for the life of the process.
pub(crate) unsafe fn register_raw_java_vm(vm: *mut jni::sys::JavaVM) -> Result<(), CameraError> {
    let vm = JavaVM::from_raw(vm)
        .map_err(|e| CameraError::InitializationError(format!("Java VM: {}", e)))?;
    register_java_vm(vm);
    Ok(())
}

/// Called by the runtime when the library is loaded through `System.loadLibrary`
#[no_mangle]
pub extern "system" fn JNI_OnLoad(vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    // SAFETY: the runtime passes its own, process-wide VM.
    if let Err(e) = unsafe { register_raw_java_vm(vm) } {
        log::error!("JNI_OnLoad: {}", e);
    }
    JNI_VERSION_1_6
}

fn registered_java_vm() -> Option<Arc<JavaVM>> {
    JAVA_VM
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .as_ref()
        .map(Arc::clone)
}

/// The registered VM, else the one an `ndk-context` host published
fn java_vm() -> Result<Arc<JavaVM>, CameraError> {
    if let Some(vm) = registered_java_vm() {
        return Ok(vm);
    }

    // ndk-context panics instead of reporting an uninitialized context.
    let context = panic::catch_unwind(ndk_context::android_context).map_err(|_| {
        CameraError::InitializationError(
            "no Java VM: load through System.loadLibrary or call crabcaps_set_java_vm".into(),
        )
    })?;
    // SAFETY: ndk-context hands out the process-wide JavaVM pointer.
    unsafe { register_raw_java_vm(context.vm().cast())? };
    registered_java_vm()
        .ok_or_else(|| CameraError::InitializationError("Java VM was not kept".into()))
}

/// Release an opened `android.hardware.Camera`, clearing any exception it throws
fn release_camera(env: &mut JNIEnv, camera: &JObject) -> bool {
    let released = env.call_method(camera, "release", "()V", &[]).is_ok();
    if !released {
        let _ = env.exception_clear();
    }
    released
}

/// Run a JNI call, turning a pending Java exception into a [`CameraError`]
/// carrying the exception's message.
fn jni_call<'local, T>(
    env: &mut JNIEnv<'local>,
    context: &str,
    f: impl FnOnce(&mut JNIEnv<'local>) -> Result<T, JniError>,
) -> Result<T, CameraError> {
    let result = f(env);
    result.map_err(|e| match e {
        JniError::JavaException => {
            let message = take_exception_message(env).unwrap_or_else(|| e.to_string());
            CameraError::query(context, message)
        }
        other => CameraError::query(context, other),
    })
}

fn take_exception_message(env: &mut JNIEnv) -> Option<String> {
    let throwable = env.exception_occurred().ok()?;
    env.exception_clear().ok()?;
    if throwable.is_null() {
        return None;
    }
    let message = env
        .call_method(&*throwable, "getLocalizedMessage", "()Ljava/lang/String;", &[])
        .ok()?
        .l()
        .ok()?;
    if message.is_null() {
        return None;
    }
    let message = JString::from(message);
    let text: String = env.get_string(&message).ok()?.into();
    Some(text)
}

fn list_len(env: &mut JNIEnv, list: &JObject) -> Result<i32, CameraError> {
    jni_call(env, "List.size", |env| {
        env.call_method(list, "size", "()I", &[])?.i()
    })
}

fn list_get<'local>(
    env: &mut JNIEnv<'local>,
    list: &JObject,
    index: i32,
) -> Result<JObject<'local>, CameraError> {
    jni_call(env, "List.get", |env| {
        env.call_method(list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(index)])?
            .l()
    })
}

pub struct AndroidCameraProvider {
    vm: Arc<JavaVM>,
    api_level: i32,
}

impl AndroidCameraProvider {
    /// Attach to the application's Java VM and read the platform API level
    ///
    /// Fails with [`CameraError::InitializationError`] when no VM is known.
    pub fn new() -> Result<Self, CameraError> {
        let vm = java_vm()?;

        let api_level = {
            let mut env = vm
                .attach_current_thread()
                .map_err(|e| CameraError::InitializationError(format!("attach: {}", e)))?;
            jni_call(&mut env, "Build.VERSION.SDK_INT", |env| {
                env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")?
                    .i()
            })?
        };
        log::debug!("Android API level {}", api_level);

        Ok(Self { vm, api_level })
    }

    fn with_env<T>(
        &self,
        f: impl FnOnce(&mut JNIEnv) -> Result<T, CameraError>,
    ) -> Result<T, CameraError> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| CameraError::InitializationError(format!("attach: {}", e)))?;
        f(&mut env)
    }

    fn open_with(
        &self,
        index: usize,
        method_sig: &str,
        args: &[JValue],
    ) -> Result<AndroidCameraDevice, CameraError> {
        self.with_env(|env| {
            let camera = jni_call(env, "Camera.open", |env| {
                env.call_static_method(CAMERA_CLASS, "open", method_sig, args)?
                    .l()
            })
            .map_err(|e| CameraError::open_failed(index, e.to_string()))?;
            if camera.is_null() {
                return Err(CameraError::open_failed(index, "no camera available"));
            }
            let camera = match jni_call(env, "NewGlobalRef", |env| env.new_global_ref(&camera)) {
                Ok(global) => global,
                Err(e) => {
                    release_camera(env, &camera);
                    return Err(e);
                }
            };

            // Hold the handle before anything else can fail so it is released.
            let mut device = AndroidCameraDevice {
                vm: Arc::clone(&self.vm),
                camera,
                parameters: None,
            };

            let parameters = jni_call(env, "Camera.getParameters", |env| {
                env.call_method(
                    device.camera.as_obj(),
                    "getParameters",
                    "()Landroid/hardware/Camera$Parameters;",
                    &[],
                )?
                .l()
            })?;
            device.parameters =
                Some(jni_call(env, "NewGlobalRef", |env| env.new_global_ref(parameters))?);
            Ok(device)
        })
    }
}

impl CameraProvider for AndroidCameraProvider {
    type Device = AndroidCameraDevice;

    fn name(&self) -> &'static str {
        "android.hardware.Camera"
    }

    fn supports_extended_api(&self) -> bool {
        self.api_level >= EXTENDED_API_LEVEL
    }

    fn number_of_cameras(&self) -> Result<usize, CameraError> {
        self.with_env(|env| {
            let count = jni_call(env, "Camera.getNumberOfCameras", |env| {
                env.call_static_method(CAMERA_CLASS, "getNumberOfCameras", "()I", &[])?
                    .i()
            })?;
            Ok(count.max(0) as usize)
        })
    }

    fn camera_info(&self, index: usize) -> Result<CameraStaticInfo, CameraError> {
        self.with_env(|env| {
            let info = jni_call(env, "new CameraInfo", |env| {
                env.new_object(CAMERA_INFO_CLASS, "()V", &[])
            })?;
            jni_call(env, "Camera.getCameraInfo", |env| {
                env.call_static_method(
                    CAMERA_CLASS,
                    "getCameraInfo",
                    "(ILandroid/hardware/Camera$CameraInfo;)V",
                    &[JValue::Int(index as i32), JValue::Object(&info)],
                )?
                .v()
            })?;
            let facing = jni_call(env, "CameraInfo.facing", |env| {
                env.get_field(&info, "facing", "I")?.i()
            })?;
            let orientation = jni_call(env, "CameraInfo.orientation", |env| {
                env.get_field(&info, "orientation", "I")?.i()
            })?;

            let facing = if facing == CAMERA_FACING_FRONT {
                Facing::Front
            } else {
                Facing::Back
            };
            Ok(CameraStaticInfo::new(facing, orientation.max(0) as u32))
        })
    }

    fn open(&self, index: usize) -> Result<Self::Device, CameraError> {
        self.open_with(
            index,
            "(I)Landroid/hardware/Camera;",
            &[JValue::Int(index as i32)],
        )
    }

    fn open_default(&self) -> Result<Self::Device, CameraError> {
        self.open_with(0, "()Landroid/hardware/Camera;", &[])
    }
}

/// Open `android.hardware.Camera`; `release()` is called on drop
pub struct AndroidCameraDevice {
    vm: Arc<JavaVM>,
    camera: GlobalRef,
    parameters: Option<GlobalRef>,
}

impl AndroidCameraDevice {
    fn with_parameters<T>(
        &self,
        f: impl FnOnce(&mut JNIEnv, &JObject) -> Result<T, CameraError>,
    ) -> Result<T, CameraError> {
        let parameters = self
            .parameters
            .as_ref()
            .ok_or_else(|| CameraError::query("Camera.Parameters", "not loaded"))?;
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| CameraError::InitializationError(format!("attach: {}", e)))?;
        f(&mut env, parameters.as_obj())
    }

    /// Call a `Parameters` getter returning `java.util.List`, `None` on null
    fn parameter_list<T>(
        &self,
        getter: &str,
        mut convert: impl FnMut(&mut JNIEnv, &JObject) -> Result<T, CameraError>,
    ) -> Result<Option<Vec<T>>, CameraError> {
        self.with_parameters(|env, parameters| {
            let list = jni_call(env, getter, |env| {
                env.call_method(parameters, getter, "()Ljava/util/List;", &[])?
                    .l()
            })?;
            if list.is_null() {
                return Ok(None);
            }

            let len = list_len(env, &list)?;
            let mut items = Vec::with_capacity(len.max(0) as usize);
            for i in 0..len {
                let element = list_get(env, &list, i)?;
                items.push(convert(env, &element)?);
                let _ = env.delete_local_ref(element);
            }
            Ok(Some(items))
        })
    }
}

impl CameraDevice for AndroidCameraDevice {
    fn preview_sizes(&mut self) -> Result<Vec<Resolution>, CameraError> {
        let sizes = self.parameter_list("getSupportedPreviewSizes", |env, size| {
            let width = jni_call(env, "Size.width", |env| env.get_field(size, "width", "I")?.i())?;
            let height =
                jni_call(env, "Size.height", |env| env.get_field(size, "height", "I")?.i())?;
            Ok(Resolution::new(width.max(0) as u32, height.max(0) as u32))
        })?;
        Ok(sizes.unwrap_or_default())
    }

    fn preview_fps_ranges(&mut self) -> Result<Option<Vec<FpsRange>>, CameraError> {
        self.parameter_list("getSupportedPreviewFpsRange", |env, range| {
            let mut bounds = [0i32; 2];
            let array: &JIntArray = range.into();
            jni_call(env, "int[] region", |env| {
                env.get_int_array_region(array, 0, &mut bounds)
            })?;
            Ok(FpsRange::new(
                bounds[PREVIEW_FPS_MIN_INDEX].max(0) as u32,
                bounds[PREVIEW_FPS_MAX_INDEX].max(0) as u32,
            ))
        })
    }

    fn preview_frame_rates(&mut self) -> Result<Option<Vec<u32>>, CameraError> {
        self.parameter_list("getSupportedPreviewFrameRates", |env, rate| {
            let fps = jni_call(env, "Integer.intValue", |env| {
                env.call_method(rate, "intValue", "()I", &[])?.i()
            })?;
            Ok(fps.max(0) as u32)
        })
    }
}

impl Drop for AndroidCameraDevice {
    fn drop(&mut self) {
        let released = self
            .vm
            .attach_current_thread()
            .map(|mut env| release_camera(&mut env, self.camera.as_obj()));
        if !matches!(released, Ok(true)) {
            log::warn!("Failed to release Android camera");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forget_java_vm() {
        *JAVA_VM.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    #[test]
    fn test_missing_vm_is_initialization_error() {
        forget_java_vm();
        assert!(matches!(
            AndroidCameraProvider::new(),
            Err(CameraError::InitializationError(_))
        ));
    }

    #[test]
    fn test_null_vm_is_rejected() {
        forget_java_vm();
        assert!(unsafe { register_raw_java_vm(std::ptr::null_mut()) }.is_err());
        assert!(registered_java_vm().is_none());
    }
}
