//! 参数编组性能基准测试
//!
//! 测试结构化值转换与函数表分发的开销（原生层为空实现）

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use raylib_addon::config::DefaultColors;
use raylib_addon::native::{Camera3D, Color, NativeApi, NativeLayer, Vector3};
use raylib_addon::scripting::{
    color_to_value, value_to_camera, value_to_color, vector3_to_value, ScriptValue,
};
use raylib_addon::RaylibFunctions;

/// 什么也不做的原生层，只衡量绑定层本身
struct NullNative;

impl NativeApi for NullNative {
    fn init_window(&mut self, _: i32, _: i32, _: &str) {}
    fn close_window(&mut self) {}
    fn is_window_ready(&mut self) -> bool {
        true
    }
    fn window_should_close(&mut self) -> bool {
        false
    }
    fn is_key_pressed(&mut self, _: i32) -> bool {
        false
    }
    fn set_target_fps(&mut self, _: i32) {}
    fn begin_drawing(&mut self) {}
    fn end_drawing(&mut self) {}
    fn clear_background(&mut self, _: Color) {}
    fn draw_text(&mut self, _: &str, _: i32, _: i32, _: i32, _: Color) {}
    fn draw_cube(&mut self, _: Vector3, _: f32, _: f32, _: f32, _: Color) {}
    fn draw_grid(&mut self, _: i32, _: f32) {}
    fn begin_mode_3d(&mut self, _: Camera3D) {}
    fn end_mode_3d(&mut self) {}
    fn update_camera(&mut self, _: &mut Camera3D, _: i32) {}
    fn measure_text(&mut self, text: &str, _: i32) -> i32 {
        text.len() as i32
    }
    fn backend_name(&self) -> &'static str {
        "null"
    }
}

fn camera_value() -> ScriptValue {
    ScriptValue::object([
        ("position", vector3_to_value(Vector3::new(5.0, 5.0, 5.0))),
        ("target", vector3_to_value(Vector3::new(0.0, 0.0, 0.0))),
        ("up", vector3_to_value(Vector3::new(0.0, 1.0, 0.0))),
        ("fovy", ScriptValue::from(45.0)),
        ("projection", ScriptValue::from(0)),
    ])
}

// ============================================================================
// 结构化值转换
// ============================================================================

fn bench_conversions(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    let color = color_to_value(Color::new(10, 20, 30, 255));
    let color_map = color.as_object().cloned().unwrap_or_default();
    group.bench_function("color", |b| {
        b.iter(|| black_box(value_to_color("bench", black_box(&color_map))))
    });

    let camera = camera_value();
    let camera_map = camera.as_object().cloned().unwrap_or_default();
    group.bench_function("camera", |b| {
        b.iter(|| black_box(value_to_camera("bench", black_box(&camera_map))))
    });

    group.finish();
}

// ============================================================================
// 函数表分发
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let mut functions =
        RaylibFunctions::new(NativeLayer::new(NullNative), DefaultColors::default());

    let cases: Vec<(&str, Vec<ScriptValue>)> = vec![
        ("beginDrawing", vec![]),
        (
            "drawText",
            vec![
                "Hello".into(),
                10.into(),
                10.into(),
                20.into(),
                color_to_value(Color::WHITE),
            ],
        ),
        ("updateCamera", vec![camera_value(), 2.into()]),
        ("measureText", vec!["Hello from Node.js + Raylib".into(), 20.into()]),
    ];

    for (name, args) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), args, |b, args| {
            b.iter(|| black_box(functions.call(name, args.clone())))
        });
    }

    // 参数个数不足时的拒绝路径
    group.bench_function("arity_rejection", |b| {
        b.iter(|| black_box(functions.call("drawText", vec!["Hello".into()])))
    });

    group.finish();
}

criterion_group!(benches, bench_conversions, bench_dispatch);
criterion_main!(benches);
