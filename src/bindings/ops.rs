//! Operations shared by the stateless function table and the window
//! controller.
//!
//! Each one validates its arguments, converts them, then makes exactly one
//! native call. Window lifecycle is not here; the two variants track it
//! differently.

use crate::config::DefaultColors;
use crate::core::{BindingError, BindingResult};
use crate::native::NativeLayer;
use crate::scripting::{vector3_to_value, ArgShape, CallArgs, ScriptValue};

use super::table::{BindingTable, Signature};

pub const EXPECTED_1_ARGUMENT: &str = "Expected 1 argument";
pub const EXPECTED_2_ARGUMENTS: &str = "Expected 2 arguments";
pub const EXPECTED_3_ARGUMENTS: &str = "Expected 3 arguments";
pub const EXPECTED_5_ARGUMENTS: &str = "Expected 5 arguments";
pub const EXPECTED_CAMERA_OBJECT: &str = "Expected a camera object";
pub const EXPECTED_CAMERA_AND_MODE: &str = "Expected 2 arguments: camera object and mode";
pub const EXPECTED_CAMERA_MODE_NUMBER: &str = "Expected a number for camera mode";
pub const EXPECTED_SLICES_AND_SPACING: &str = "Expected 2 arguments: slices and spacing";

const COLOR_ARG: &[ArgShape] = &[ArgShape::Color];
const CAMERA_ARG: &[ArgShape] = &[ArgShape::Camera];
const DRAW_TEXT_ARGS: &[ArgShape] = &[
    ArgShape::Scalar,
    ArgShape::Scalar,
    ArgShape::Scalar,
    ArgShape::Scalar,
    ArgShape::Color,
];
const DRAW_CUBE_ARGS: &[ArgShape] = &[
    ArgShape::Vector3,
    ArgShape::Scalar,
    ArgShape::Scalar,
    ArgShape::Scalar,
    ArgShape::Color,
];

/// Something the shared operations can run against.
pub trait BindingTarget {
    fn native(&self) -> &NativeLayer;

    /// Colors used when a color argument is absent or not an object.
    fn defaults(&self) -> &DefaultColors;
}

/// Registers every operation that behaves the same in both variants.
pub fn register_shared<T>(table: &mut BindingTable<T>)
where
    T: BindingTarget + 'static,
{
    table.register_function("windowShouldClose", Signature::variadic(), |t: &mut T, _| {
        Ok(window_should_close(t))
    });
    table.register_function(
        "isKeyPressed",
        Signature::at_least(1, EXPECTED_1_ARGUMENT),
        |t: &mut T, args| is_key_pressed(t, args),
    );
    table.register_function(
        "setTargetFPS",
        Signature::at_least(1, EXPECTED_1_ARGUMENT),
        |t: &mut T, args| set_target_fps(t, args),
    );
    table.register_function("beginDrawing", Signature::variadic(), |t: &mut T, _| {
        t.native().with(|api| api.begin_drawing());
        Ok(ScriptValue::Undefined)
    });
    table.register_function("endDrawing", Signature::variadic(), |t: &mut T, _| {
        t.native().with(|api| api.end_drawing());
        Ok(ScriptValue::Undefined)
    });
    table.register_function(
        "clearBackground",
        Signature::variadic().with_shapes(COLOR_ARG),
        |t: &mut T, args| clear_background(t, args),
    );
    table.register_function(
        "drawText",
        Signature::at_least(5, EXPECTED_5_ARGUMENTS).with_shapes(DRAW_TEXT_ARGS),
        |t: &mut T, args| draw_text(t, args),
    );
    table.register_function(
        "drawCube",
        Signature::at_least(5, EXPECTED_5_ARGUMENTS).with_shapes(DRAW_CUBE_ARGS),
        |t: &mut T, args| draw_cube(t, args),
    );
    table.register_function(
        "beginMode3D",
        Signature::at_least(1, EXPECTED_CAMERA_OBJECT).with_shapes(CAMERA_ARG),
        |t: &mut T, args| begin_mode_3d(t, args),
    );
    table.register_function("endMode3D", Signature::variadic(), |t: &mut T, _| {
        t.native().with(|api| api.end_mode_3d());
        Ok(ScriptValue::Undefined)
    });
    table.register_function(
        "updateCamera",
        Signature::at_least(2, EXPECTED_CAMERA_AND_MODE).with_shapes(CAMERA_ARG),
        |t: &mut T, args| update_camera(t, args),
    );
    table.register_function(
        "drawGrid",
        Signature::at_least(2, EXPECTED_SLICES_AND_SPACING),
        |t: &mut T, args| draw_grid(t, args),
    );
    table.register_function(
        "measureText",
        Signature::at_least(2, EXPECTED_2_ARGUMENTS),
        |t: &mut T, args| measure_text(t, args),
    );
}

pub fn window_should_close<T: BindingTarget>(target: &T) -> ScriptValue {
    ScriptValue::Bool(target.native().with(|api| api.window_should_close()))
}

pub fn is_key_pressed<T: BindingTarget>(target: &T, args: &CallArgs) -> BindingResult<ScriptValue> {
    let key = args.int32(0)?;
    Ok(ScriptValue::Bool(
        target.native().with(|api| api.is_key_pressed(key)),
    ))
}

pub fn set_target_fps<T: BindingTarget>(target: &T, args: &CallArgs) -> BindingResult<ScriptValue> {
    let fps = args.int32(0)?;
    target.native().with(|api| api.set_target_fps(fps));
    Ok(ScriptValue::Undefined)
}

pub fn clear_background<T: BindingTarget>(
    target: &T,
    args: &CallArgs,
) -> BindingResult<ScriptValue> {
    let color = args.color_or(0, target.defaults().background)?;
    target.native().with(|api| api.clear_background(color));
    Ok(ScriptValue::Undefined)
}

pub fn draw_text<T: BindingTarget>(target: &T, args: &CallArgs) -> BindingResult<ScriptValue> {
    let text = args.string(0)?;
    let x = args.int32(1)?;
    let y = args.int32(2)?;
    let font_size = args.int32(3)?;
    let color = args.color_or(4, target.defaults().text)?;
    target
        .native()
        .with(|api| api.draw_text(text, x, y, font_size, color));
    Ok(ScriptValue::Undefined)
}

pub fn draw_cube<T: BindingTarget>(target: &T, args: &CallArgs) -> BindingResult<ScriptValue> {
    let position = args.vector3(0, "position")?;
    let width = args.float(1)?;
    let height = args.float(2)?;
    let depth = args.float(3)?;
    let color = args.color(4)?;
    target
        .native()
        .with(|api| api.draw_cube(position, width, height, depth, color));
    Ok(ScriptValue::Undefined)
}

pub fn begin_mode_3d<T: BindingTarget>(
    target: &T,
    args: &CallArgs,
) -> BindingResult<ScriptValue> {
    let camera = args.camera(0, EXPECTED_CAMERA_OBJECT)?;
    target.native().with(|api| api.begin_mode_3d(camera));
    Ok(ScriptValue::Undefined)
}

/// Runs the native camera update and writes the new `position` back to the
/// caller's camera as a fresh `{x, y, z}` object. Other fields stay as they
/// were on the script side.
pub fn update_camera<T: BindingTarget>(
    target: &T,
    args: &mut CallArgs,
) -> BindingResult<ScriptValue> {
    if !args.get(0).is_object() {
        return Err(BindingError::Shape {
            function: args.function(),
            message: EXPECTED_CAMERA_OBJECT,
        });
    }
    if !args.get(1).is_number() {
        return Err(BindingError::Shape {
            function: args.function(),
            message: EXPECTED_CAMERA_MODE_NUMBER,
        });
    }

    let mut camera = args.camera(0, EXPECTED_CAMERA_OBJECT)?;
    let mode = args.int32(1)?;
    target
        .native()
        .with(|api| api.update_camera(&mut camera, mode));

    args.write_back(0, "position", vector3_to_value(camera.position));
    Ok(ScriptValue::Undefined)
}

pub fn draw_grid<T: BindingTarget>(target: &T, args: &CallArgs) -> BindingResult<ScriptValue> {
    let slices = args.int32(0)?;
    let spacing = args.float(1)?;
    target.native().with(|api| api.draw_grid(slices, spacing));
    Ok(ScriptValue::Undefined)
}

pub fn measure_text<T: BindingTarget>(target: &T, args: &CallArgs) -> BindingResult<ScriptValue> {
    let text = args.string(0)?;
    let font_size = args.int32(1)?;
    let width = target.native().with(|api| api.measure_text(text, font_size));
    Ok(ScriptValue::from(width))
}
