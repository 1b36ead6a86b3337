//! In-process stand-in for raylib.
//!
//! Opens no window and draws nothing. It keeps the little state the binding
//! layer can observe (window open, frame count, pressed keys), records every
//! call, measures text with the built-in font's advances and moves orbital
//! cameras. Tests and `--headless` runs use it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use glam::{Quat, Vec3};

use super::{camera_mode, Camera3D, Color, NativeApi, Vector3};
use crate::config::AddonConfig;

/// raylib's `CAMERA_ORBITAL_SPEED`, radians per second.
const ORBITAL_SPEED: f32 = 0.5;

/// Base size of raylib's built-in bitmap font.
const DEFAULT_FONT_SIZE: i32 = 10;

/// Glyph widths of the built-in font, codepoints `' '..='\u{ff}'`.
const GLYPH_WIDTHS: [u8; 224] = [
    3, 1, 4, 6, 5, 7, 6, 2, 3, 3, 5, 5, 2, 4, 1, 7, 5, 2, 5, 5, 5, 5, 5, 5, 5, 5, 1, 1, 3, 4, 3, 6,
    7, 6, 6, 6, 6, 6, 6, 6, 6, 3, 5, 6, 5, 7, 6, 6, 6, 6, 6, 6, 7, 6, 7, 7, 6, 6, 6, 2, 7, 2, 3, 5,
    2, 5, 5, 5, 5, 5, 4, 5, 5, 1, 2, 5, 2, 5, 5, 5, 5, 5, 5, 5, 4, 5, 5, 5, 5, 5, 5, 3, 1, 3, 4, 4,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 5, 5, 5, 7, 1, 5, 3, 7, 3, 5, 4, 1, 7, 4, 3, 5, 3, 3, 2, 5, 6, 1, 2, 2, 3, 5, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 6, 7, 6, 6, 6, 6, 6, 3, 3, 3, 3, 7, 6, 6, 6, 6, 6, 6, 5, 6, 6, 6, 6, 6, 6, 4, 6,
    5, 5, 5, 5, 5, 5, 9, 5, 5, 5, 5, 5, 2, 2, 3, 3, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
];

/// One recorded call into the native surface.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCall {
    InitWindow { width: i32, height: i32, title: String },
    CloseWindow,
    IsWindowReady,
    WindowShouldClose,
    IsKeyPressed(i32),
    SetTargetFps(i32),
    BeginDrawing,
    EndDrawing,
    ClearBackground(Color),
    DrawText { text: String, x: i32, y: i32, font_size: i32, color: Color },
    DrawCube { position: Vector3, width: f32, height: f32, depth: f32, color: Color },
    DrawGrid { slices: i32, spacing: f32 },
    BeginMode3D(Camera3D),
    EndMode3D,
    UpdateCamera { mode: i32 },
    MeasureText { text: String, font_size: i32 },
}

/// Window opened by `InitWindow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub width: i32,
    pub height: i32,
    pub title: String,
}

#[derive(Debug, Default)]
struct Shared {
    calls: Vec<NativeCall>,
    window: Option<WindowInfo>,
    frames_drawn: u64,
    pressed_keys: HashSet<i32>,
    close_requested: bool,
}

/// Observer/controller for a [`HeadlessNative`] that has been moved into a
/// `NativeLayer`.
#[derive(Debug, Clone, Default)]
pub struct HeadlessProbe {
    shared: Arc<Mutex<Shared>>,
}

impl HeadlessProbe {
    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every call recorded so far, oldest first.
    pub fn calls(&self) -> Vec<NativeCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&NativeCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn window(&self) -> Option<WindowInfo> {
        self.lock().window.clone()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.lock().frames_drawn
    }

    /// Reports `key` as pressed until the current frame ends.
    pub fn press_key(&self, key: i32) {
        self.lock().pressed_keys.insert(key);
    }

    /// Simulates the user closing the window.
    pub fn request_close(&self) {
        self.lock().close_requested = true;
    }
}

/// Headless native backend.
#[derive(Debug)]
pub struct HeadlessNative {
    probe: HeadlessProbe,
    drawing: bool,
    mode_3d_depth: u32,
    target_fps: i32,
    frame_limit: Option<u64>,
}

impl Default for HeadlessNative {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessNative {
    pub fn new() -> Self {
        Self {
            probe: HeadlessProbe::default(),
            drawing: false,
            mode_3d_depth: 0,
            target_fps: 60,
            frame_limit: None,
        }
    }

    pub fn from_config(config: &AddonConfig) -> Self {
        let mut native = Self::new();
        native.frame_limit = config.native.frame_limit;
        native.target_fps = i32::try_from(config.window.target_fps).unwrap_or(60);
        native
    }

    /// `windowShouldClose` turns true once this many frames were drawn.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn probe(&self) -> HeadlessProbe {
        self.probe.clone()
    }

    fn record(&self, call: NativeCall) {
        self.probe.lock().calls.push(call);
    }

    fn frame_time(&self) -> f32 {
        if self.target_fps > 0 {
            1.0 / self.target_fps as f32
        } else {
            1.0 / 60.0
        }
    }
}

/// Width in pixels of `text` drawn with the built-in font, as `MeasureText`
/// computes it. Accumulates in `f32` and saturates into `i32`.
pub fn measure_default_font(text: &str, font_size: i32) -> i32 {
    if text.is_empty() {
        return 0;
    }

    let font_size = font_size.max(DEFAULT_FONT_SIZE);
    let spacing = (font_size / DEFAULT_FONT_SIZE) as f32;
    let scale = font_size as f32 / DEFAULT_FONT_SIZE as f32;

    let mut widest_line = 0f32;
    let mut line_width = 0f32;
    let mut longest_run = 0usize;
    let mut run = 0usize;

    for ch in text.chars() {
        run += 1;
        if ch == '\n' {
            widest_line = widest_line.max(line_width);
            line_width = 0.0;
            run = 0;
        } else {
            line_width += f32::from(glyph_width(ch));
        }
        longest_run = longest_run.max(run);
    }
    widest_line = widest_line.max(line_width);

    let gaps = longest_run.saturating_sub(1) as f32;
    // `as` saturates out-of-range floats
    (widest_line * scale + gaps * spacing) as i32
}

fn glyph_width(ch: char) -> u8 {
    let index = (ch as u32).checked_sub(32).map(|i| i as usize);
    match index.and_then(|i| GLYPH_WIDTHS.get(i)) {
        Some(width) => *width,
        // codepoints outside the font render as '?'
        None => GLYPH_WIDTHS[('?' as u32 - 32) as usize],
    }
}

impl NativeApi for HeadlessNative {
    fn init_window(&mut self, width: i32, height: i32, title: &str) {
        self.record(NativeCall::InitWindow {
            width,
            height,
            title: title.to_string(),
        });

        let mut shared = self.probe.lock();
        if shared.window.is_some() {
            tracing::warn!(target: "raylib_addon::native", "InitWindow called while a window is already open");
            return;
        }
        shared.window = Some(WindowInfo {
            width,
            height,
            title: title.to_string(),
        });
        shared.frames_drawn = 0;
        shared.close_requested = false;
        drop(shared);

        self.drawing = false;
        self.mode_3d_depth = 0;
        tracing::info!(target: "raylib_addon::native", width, height, title, "headless window opened");
    }

    fn close_window(&mut self) {
        self.record(NativeCall::CloseWindow);
        let mut shared = self.probe.lock();
        if shared.window.take().is_some() {
            tracing::info!(target: "raylib_addon::native", "headless window closed");
        }
        shared.pressed_keys.clear();
    }

    fn is_window_ready(&mut self) -> bool {
        self.record(NativeCall::IsWindowReady);
        self.probe.lock().window.is_some()
    }

    fn window_should_close(&mut self) -> bool {
        self.record(NativeCall::WindowShouldClose);
        let shared = self.probe.lock();
        if shared.window.is_none() {
            return true;
        }
        shared.close_requested
            || self
                .frame_limit
                .is_some_and(|limit| shared.frames_drawn >= limit)
    }

    fn is_key_pressed(&mut self, key: i32) -> bool {
        self.record(NativeCall::IsKeyPressed(key));
        self.probe.lock().pressed_keys.contains(&key)
    }

    fn set_target_fps(&mut self, fps: i32) {
        self.record(NativeCall::SetTargetFps(fps));
        self.target_fps = fps;
    }

    fn begin_drawing(&mut self) {
        self.record(NativeCall::BeginDrawing);
        self.drawing = true;
    }

    fn end_drawing(&mut self) {
        self.record(NativeCall::EndDrawing);
        if !self.drawing {
            tracing::debug!(target: "raylib_addon::native", "EndDrawing without BeginDrawing");
        }
        self.drawing = false;
        let mut shared = self.probe.lock();
        shared.frames_drawn += 1;
        shared.pressed_keys.clear();
    }

    fn clear_background(&mut self, color: Color) {
        self.record(NativeCall::ClearBackground(color));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: i32, color: Color) {
        self.record(NativeCall::DrawText {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
    }

    fn draw_cube(&mut self, position: Vector3, width: f32, height: f32, depth: f32, color: Color) {
        self.record(NativeCall::DrawCube {
            position,
            width,
            height,
            depth,
            color,
        });
    }

    fn draw_grid(&mut self, slices: i32, spacing: f32) {
        self.record(NativeCall::DrawGrid { slices, spacing });
    }

    fn begin_mode_3d(&mut self, camera: Camera3D) {
        self.record(NativeCall::BeginMode3D(camera));
        self.mode_3d_depth += 1;
    }

    fn end_mode_3d(&mut self) {
        self.record(NativeCall::EndMode3D);
        self.mode_3d_depth = self.mode_3d_depth.saturating_sub(1);
    }

    fn update_camera(&mut self, camera: &mut Camera3D, mode: i32) {
        self.record(NativeCall::UpdateCamera { mode });

        // Without mouse or keyboard input only the orbital mode moves.
        if mode == camera_mode::CAMERA_ORBITAL {
            let up = Vec3::from(camera.up).try_normalize().unwrap_or(Vec3::Y);
            let target = Vec3::from(camera.target);
            let view = Vec3::from(camera.position) - target;
            let rotation = Quat::from_axis_angle(up, ORBITAL_SPEED * self.frame_time());
            camera.position = Vector3::from(target + rotation * view);
        }
    }

    fn measure_text(&mut self, text: &str, font_size: i32) -> i32 {
        self.record(NativeCall::MeasureText {
            text: text.to_string(),
            font_size,
        });
        measure_default_font(text, font_size)
    }

    fn backend_name(&self) -> &'static str {
        "headless"
    }
}
