//! raylib loaded at runtime through `libloading`.
//!
//! Every entry point is resolved once in [`RaylibLibrary::load`]; a missing
//! symbol fails the load instead of surfacing mid-frame.

use std::ffi::{c_char, c_int, CString};
use std::path::Path;

use libloading::{Library, Symbol};

use super::{Camera3D, Color, NativeApi, Vector3};
use crate::core::{NativeError, NativeResult};

type InitWindowFn = unsafe extern "C" fn(c_int, c_int, *const c_char);
type VoidFn = unsafe extern "C" fn();
type BoolFn = unsafe extern "C" fn() -> bool;
type IsKeyPressedFn = unsafe extern "C" fn(c_int) -> bool;
type SetTargetFpsFn = unsafe extern "C" fn(c_int);
type ClearBackgroundFn = unsafe extern "C" fn(Color);
type DrawTextFn = unsafe extern "C" fn(*const c_char, c_int, c_int, c_int, Color);
type DrawCubeFn = unsafe extern "C" fn(Vector3, f32, f32, f32, Color);
type DrawGridFn = unsafe extern "C" fn(c_int, f32);
type BeginMode3DFn = unsafe extern "C" fn(Camera3D);
type UpdateCameraFn = unsafe extern "C" fn(*mut Camera3D, c_int);
type MeasureTextFn = unsafe extern "C" fn(*const c_char, c_int) -> c_int;

/// Function pointers resolved from the loaded library.
struct RaylibSymbols {
    init_window: InitWindowFn,
    close_window: VoidFn,
    is_window_ready: BoolFn,
    window_should_close: BoolFn,
    is_key_pressed: IsKeyPressedFn,
    set_target_fps: SetTargetFpsFn,
    begin_drawing: VoidFn,
    end_drawing: VoidFn,
    clear_background: ClearBackgroundFn,
    draw_text: DrawTextFn,
    draw_cube: DrawCubeFn,
    draw_grid: DrawGridFn,
    begin_mode_3d: BeginMode3DFn,
    end_mode_3d: VoidFn,
    update_camera: UpdateCameraFn,
    measure_text: MeasureTextFn,
}

impl RaylibSymbols {
    /// # Safety
    ///
    /// `library` must be a raylib build whose exported signatures match the
    /// aliases above (raylib 4.5 / 5.x).
    unsafe fn resolve(library: &Library) -> NativeResult<Self> {
        Ok(Self {
            init_window: symbol(library, "InitWindow")?,
            close_window: symbol(library, "CloseWindow")?,
            is_window_ready: symbol(library, "IsWindowReady")?,
            window_should_close: symbol(library, "WindowShouldClose")?,
            is_key_pressed: symbol(library, "IsKeyPressed")?,
            set_target_fps: symbol(library, "SetTargetFPS")?,
            begin_drawing: symbol(library, "BeginDrawing")?,
            end_drawing: symbol(library, "EndDrawing")?,
            clear_background: symbol(library, "ClearBackground")?,
            draw_text: symbol(library, "DrawText")?,
            draw_cube: symbol(library, "DrawCube")?,
            draw_grid: symbol(library, "DrawGrid")?,
            begin_mode_3d: symbol(library, "BeginMode3D")?,
            end_mode_3d: symbol(library, "EndMode3D")?,
            update_camera: symbol(library, "UpdateCamera")?,
            measure_text: symbol(library, "MeasureText")?,
        })
    }
}

unsafe fn symbol<T: Copy>(library: &Library, name: &str) -> NativeResult<T> {
    let sym: Symbol<T> = library
        .get(name.as_bytes())
        .map_err(|e| NativeError::Symbol {
            symbol: name.to_string(),
            reason: e.to_string(),
        })?;
    Ok(*sym)
}

/// Converts to a C string the way `std::string::c_str()` would be read:
/// everything after an interior NUL is dropped.
fn to_c_string(text: &str) -> CString {
    let end = text.find('\0').unwrap_or(text.len());
    CString::new(&text[..end]).unwrap_or_default()
}

/// raylib, dynamically loaded.
pub struct RaylibLibrary {
    symbols: RaylibSymbols,
    // Keeps the code behind `symbols` mapped; must outlive every call.
    _library: Library,
}

impl RaylibLibrary {
    /// Loads raylib from `path` and resolves all entry points.
    pub fn load(path: impl AsRef<Path>) -> NativeResult<Self> {
        let path = path.as_ref();

        // SAFETY: loading runs the library's initializers; raylib has none
        // with preconditions.
        let library = unsafe { Library::new(path) }.map_err(|e| {
            tracing::error!(target: "raylib_addon::native", "failed to load {}: {}", path.display(), e);
            NativeError::LibraryLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        // SAFETY: signatures follow raylib.h.
        let symbols = unsafe { RaylibSymbols::resolve(&library)? };

        tracing::info!(target: "raylib_addon::native", "loaded raylib from {}", path.display());

        Ok(Self {
            symbols,
            _library: library,
        })
    }
}

// SAFETY (all blocks below): each pointer was resolved from `_library`, which
// lives as long as `self`; arguments are plain values or NUL-terminated
// strings that outlive the call.
impl NativeApi for RaylibLibrary {
    fn init_window(&mut self, width: i32, height: i32, title: &str) {
        let title = to_c_string(title);
        unsafe { (self.symbols.init_window)(width, height, title.as_ptr()) }
    }

    fn close_window(&mut self) {
        unsafe { (self.symbols.close_window)() }
    }

    fn is_window_ready(&mut self) -> bool {
        unsafe { (self.symbols.is_window_ready)() }
    }

    fn window_should_close(&mut self) -> bool {
        unsafe { (self.symbols.window_should_close)() }
    }

    fn is_key_pressed(&mut self, key: i32) -> bool {
        unsafe { (self.symbols.is_key_pressed)(key) }
    }

    fn set_target_fps(&mut self, fps: i32) {
        unsafe { (self.symbols.set_target_fps)(fps) }
    }

    fn begin_drawing(&mut self) {
        unsafe { (self.symbols.begin_drawing)() }
    }

    fn end_drawing(&mut self) {
        unsafe { (self.symbols.end_drawing)() }
    }

    fn clear_background(&mut self, color: Color) {
        unsafe { (self.symbols.clear_background)(color) }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: i32, color: Color) {
        let text = to_c_string(text);
        unsafe { (self.symbols.draw_text)(text.as_ptr(), x, y, font_size, color) }
    }

    fn draw_cube(&mut self, position: Vector3, width: f32, height: f32, depth: f32, color: Color) {
        unsafe { (self.symbols.draw_cube)(position, width, height, depth, color) }
    }

    fn draw_grid(&mut self, slices: i32, spacing: f32) {
        unsafe { (self.symbols.draw_grid)(slices, spacing) }
    }

    fn begin_mode_3d(&mut self, camera: Camera3D) {
        unsafe { (self.symbols.begin_mode_3d)(camera) }
    }

    fn end_mode_3d(&mut self) {
        unsafe { (self.symbols.end_mode_3d)() }
    }

    fn update_camera(&mut self, camera: &mut Camera3D, mode: i32) {
        unsafe { (self.symbols.update_camera)(camera as *mut Camera3D, mode) }
    }

    fn measure_text(&mut self, text: &str, font_size: i32) -> i32 {
        let text = to_c_string(text);
        unsafe { (self.symbols.measure_text)(text.as_ptr(), font_size) }
    }

    fn backend_name(&self) -> &'static str {
        "raylib"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_string_truncates_at_nul() {
        assert_eq!(to_c_string("demo").as_bytes(), b"demo");
        assert_eq!(to_c_string("de\0mo").as_bytes(), b"de");
        assert_eq!(to_c_string("").as_bytes(), b"");
    }

    #[test]
    fn test_load_missing_library() {
        let err = RaylibLibrary::load("/nonexistent/libraylib-missing.so")
            .err()
            .expect("load should fail");
        assert!(matches!(err, NativeError::LibraryLoad { .. }));
    }
}
