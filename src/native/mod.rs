//! Native layer.
//!
//! The fixed raylib call surface the bindings talk to, the `#[repr(C)]` value
//! types crossing it, and the single owner of that surface (`NativeLayer`).
//!
//! Two implementations exist:
//! - [`ffi::RaylibLibrary`] loads raylib at runtime and calls straight into it
//! - [`headless::HeadlessNative`] is an in-process stand-in that records calls

pub mod ffi;
pub mod headless;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{AddonConfig, Backend};
use crate::core::NativeResult;

pub use ffi::RaylibLibrary;
pub use headless::{HeadlessNative, HeadlessProbe, NativeCall, WindowInfo};

/// RGBA color, 8 bits per channel. Layout matches raylib's `Color`.
#[repr(C)]
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0, 255);
    pub const GREEN: Color = Color::new(0, 255, 0, 255);
    pub const BLUE: Color = Color::new(0, 0, 255, 255);
    pub const RAYWHITE: Color = Color::new(245, 245, 245, 255);
    pub const LIGHTGRAY: Color = Color::new(200, 200, 200, 255);
    pub const GRAY: Color = Color::new(130, 130, 130, 255);
    pub const DARKGRAY: Color = Color::new(80, 80, 80, 255);
    pub const BLANK: Color = Color::new(0, 0, 0, 0);

    /// Colors exposed to scripts by name.
    pub const NAMED: [(&'static str, Color); 10] = [
        ("BLACK", Color::BLACK),
        ("WHITE", Color::WHITE),
        ("RED", Color::RED),
        ("GREEN", Color::GREEN),
        ("BLUE", Color::BLUE),
        ("RAYWHITE", Color::RAYWHITE),
        ("LIGHTGRAY", Color::LIGHTGRAY),
        ("GRAY", Color::GRAY),
        ("DARKGRAY", Color::DARKGRAY),
        ("BLANK", Color::BLANK),
    ];

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Three-component float vector. Layout matches raylib's `Vector3`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// 3D camera. Layout matches raylib's `Camera3D`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Camera3D {
    pub position: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Field of view (degrees) for perspective, near plane width for orthographic.
    pub fovy: f32,
    /// `CAMERA_PERSPECTIVE` or `CAMERA_ORTHOGRAPHIC`; not validated.
    pub projection: i32,
}

/// raylib `CameraProjection` values.
pub mod projection {
    pub const CAMERA_PERSPECTIVE: i32 = 0;
    pub const CAMERA_ORTHOGRAPHIC: i32 = 1;
}

/// raylib `CameraMode` values.
pub mod camera_mode {
    pub const CAMERA_CUSTOM: i32 = 0;
    pub const CAMERA_FREE: i32 = 1;
    pub const CAMERA_ORBITAL: i32 = 2;
    pub const CAMERA_FIRST_PERSON: i32 = 3;
    pub const CAMERA_THIRD_PERSON: i32 = 4;
}

/// A handful of raylib `KeyboardKey` values.
pub mod key {
    pub const KEY_SPACE: i32 = 32;
    pub const KEY_ESCAPE: i32 = 256;
    pub const KEY_ENTER: i32 = 257;
    pub const KEY_RIGHT: i32 = 262;
    pub const KEY_LEFT: i32 = 263;
    pub const KEY_DOWN: i32 = 264;
    pub const KEY_UP: i32 = 265;
}

/// The fixed native call surface: one method per raylib entry point.
///
/// Implementations do not validate anything; whatever raylib does with a bad
/// call (no-op, log, abort) is what happens.
pub trait NativeApi {
    fn init_window(&mut self, width: i32, height: i32, title: &str);
    fn close_window(&mut self);
    fn is_window_ready(&mut self) -> bool;
    fn window_should_close(&mut self) -> bool;
    fn is_key_pressed(&mut self, key: i32) -> bool;
    fn set_target_fps(&mut self, fps: i32);

    fn begin_drawing(&mut self);
    fn end_drawing(&mut self);
    fn clear_background(&mut self, color: Color);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: i32, color: Color);
    fn draw_cube(&mut self, position: Vector3, width: f32, height: f32, depth: f32, color: Color);
    fn draw_grid(&mut self, slices: i32, spacing: f32);

    fn begin_mode_3d(&mut self, camera: Camera3D);
    fn end_mode_3d(&mut self);
    fn update_camera(&mut self, camera: &mut Camera3D, mode: i32);

    fn measure_text(&mut self, text: &str, font_size: i32) -> i32;

    /// Short name used in logs.
    fn backend_name(&self) -> &'static str;
}

/// Sole owner of the native call surface.
///
/// raylib keeps one process-global window; this handle makes that ownership
/// explicit. It also tracks whether a stateful window controller currently
/// holds the window, so a second one can be refused.
pub struct NativeLayer {
    api: Mutex<Box<dyn NativeApi + Send>>,
    controller_live: AtomicBool,
}

/// Reference-counted handle shared by the function table and controllers.
pub type SharedNative = Arc<NativeLayer>;

impl NativeLayer {
    pub fn new<A>(api: A) -> SharedNative
    where
        A: NativeApi + Send + 'static,
    {
        Self::from_boxed(Box::new(api))
    }

    pub fn from_boxed(api: Box<dyn NativeApi + Send>) -> SharedNative {
        tracing::debug!(target: "raylib_addon::native", backend = api.backend_name(), "native layer created");
        Arc::new(Self {
            api: Mutex::new(api),
            controller_live: AtomicBool::new(false),
        })
    }

    /// Builds the backend selected in `config`.
    pub fn from_config(config: &AddonConfig) -> NativeResult<SharedNative> {
        match config.native.backend {
            Backend::Raylib => {
                let path = config.native.resolved_library_path();
                Ok(Self::new(RaylibLibrary::load(Path::new(&path))?))
            }
            Backend::Headless => Ok(Self::new(HeadlessNative::from_config(config))),
        }
    }

    /// Runs `f` against the native surface.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn NativeApi) -> R) -> R {
        let mut api = self.api.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **api)
    }

    pub fn backend_name(&self) -> &'static str {
        self.with(|api| api.backend_name())
    }

    /// Whether a window controller is currently live.
    pub fn controller_live(&self) -> bool {
        self.controller_live.load(Ordering::Acquire)
    }

    pub(crate) fn try_claim_controller(&self) -> bool {
        self.controller_live
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn release_controller(&self) {
        self.controller_live.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_match_raylib() {
        assert_eq!(std::mem::size_of::<Color>(), 4);
        assert_eq!(std::mem::size_of::<Vector3>(), 12);
        assert_eq!(std::mem::size_of::<Camera3D>(), 44);
        assert_eq!(bytemuck::bytes_of(&Color::new(1, 2, 3, 4)), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_vector3_glam_conversion() {
        let v = Vector3::new(1.0, -2.0, 3.5);
        let g: Vec3 = v.into();
        assert_eq!(Vector3::from(g), v);
    }

    #[test]
    fn test_controller_claim_is_exclusive() {
        let native = NativeLayer::new(HeadlessNative::new());
        assert!(native.try_claim_controller());
        assert!(!native.try_claim_controller());
        native.release_controller();
        assert!(!native.controller_live());
        assert!(native.try_claim_controller());
    }

    #[test]
    fn test_from_config_headless() {
        let mut config = AddonConfig::default();
        config.native.backend = Backend::Headless;
        let native = NativeLayer::from_config(&config).unwrap();
        assert_eq!(native.backend_name(), "headless");
    }

    #[test]
    fn test_from_config_missing_library() {
        let mut config = AddonConfig::default();
        config.native.library_path = Some("/nonexistent/libraylib-missing.so".into());
        assert!(NativeLayer::from_config(&config).is_err());
    }
}
