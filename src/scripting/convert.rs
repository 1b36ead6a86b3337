//! Structured value conversion.
//!
//! Turns script objects into the native `Color`, `Vector3` and `Camera3D`
//! layouts and back. Numbers follow the ECMAScript integer conversions
//! (`ToUint32`, `ToInt32`) so that out-of-range channels wrap the same way a
//! JS engine would coerce them.

use super::{ScriptObject, ScriptValue};
use crate::core::{BindingError, BindingResult};
use crate::native::{Camera3D, Color, Vector3};

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Layout a positional argument is read with.
///
/// For object arguments the host looks up only the fields listed by
/// [`ArgShape::fields`], each read with its own shape. Nothing else on the
/// object is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgShape {
    /// Number, string or boolean; objects are not looked into.
    #[default]
    Scalar,
    Color,
    Vector3,
    Camera,
}

const COLOR_FIELDS: &[(&str, ArgShape)] = &[
    ("r", ArgShape::Scalar),
    ("g", ArgShape::Scalar),
    ("b", ArgShape::Scalar),
    ("a", ArgShape::Scalar),
];

const VECTOR3_FIELDS: &[(&str, ArgShape)] = &[
    ("x", ArgShape::Scalar),
    ("y", ArgShape::Scalar),
    ("z", ArgShape::Scalar),
];

const CAMERA_FIELDS: &[(&str, ArgShape)] = &[
    ("position", ArgShape::Vector3),
    ("target", ArgShape::Vector3),
    ("up", ArgShape::Vector3),
    ("fovy", ArgShape::Scalar),
    ("projection", ArgShape::Scalar),
];

impl ArgShape {
    pub fn fields(self) -> &'static [(&'static str, ArgShape)] {
        match self {
            ArgShape::Scalar => &[],
            ArgShape::Color => COLOR_FIELDS,
            ArgShape::Vector3 => VECTOR3_FIELDS,
            ArgShape::Camera => CAMERA_FIELDS,
        }
    }
}

/// ECMAScript `ToUint32` for a number.
pub fn to_uint32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let wrapped = value.trunc().rem_euclid(TWO_POW_32);
    wrapped as u32
}

/// ECMAScript `ToInt32` for a number.
pub fn to_int32(value: f64) -> i32 {
    to_uint32(value) as i32
}

fn number_field(
    function: &'static str,
    what: &'static str,
    object: &ScriptObject,
    field: &'static str,
) -> BindingResult<f64> {
    match object.get(field) {
        None | Some(ScriptValue::Undefined) => Err(BindingError::MissingField {
            function,
            what,
            field,
        }),
        Some(value) => value.as_f64().ok_or(BindingError::FieldType {
            function,
            what,
            field,
            expected: "a number",
            found: value.type_name(),
        }),
    }
}

fn object_field<'a>(
    function: &'static str,
    what: &'static str,
    object: &'a ScriptObject,
    field: &'static str,
) -> BindingResult<&'a ScriptObject> {
    match object.get(field) {
        None | Some(ScriptValue::Undefined) => Err(BindingError::MissingField {
            function,
            what,
            field,
        }),
        Some(value) => value.as_object().ok_or(BindingError::FieldType {
            function,
            what,
            field,
            expected: "an object",
            found: value.type_name(),
        }),
    }
}

/// `{r, g, b, a}` to a native color. Each channel keeps the low 8 bits of
/// its `ToUint32` value.
pub fn value_to_color(
    function: &'static str,
    object: &ScriptObject,
) -> BindingResult<Color> {
    let channel = |field| number_field(function, "color", object, field).map(|n| to_uint32(n) as u8);
    Ok(Color::new(
        channel("r")?,
        channel("g")?,
        channel("b")?,
        channel("a")?,
    ))
}

/// `{x, y, z}` to a native vector.
pub fn value_to_vector3(
    function: &'static str,
    what: &'static str,
    object: &ScriptObject,
) -> BindingResult<Vector3> {
    let component = |field| number_field(function, what, object, field).map(|n| n as f32);
    Ok(Vector3::new(component("x")?, component("y")?, component("z")?))
}

/// `{position, target, up, fovy, projection}` to a native camera.
///
/// `projection` is passed through without checking it names a known mode.
pub fn value_to_camera(
    function: &'static str,
    object: &ScriptObject,
) -> BindingResult<Camera3D> {
    let vector = |field| {
        object_field(function, "camera", object, field)
            .and_then(|inner| value_to_vector3(function, field, inner))
    };

    Ok(Camera3D {
        position: vector("position")?,
        target: vector("target")?,
        up: vector("up")?,
        fovy: number_field(function, "camera", object, "fovy")? as f32,
        projection: to_int32(number_field(function, "camera", object, "projection")?),
    })
}

pub fn color_to_value(color: Color) -> ScriptValue {
    ScriptValue::object([
        ("r", ScriptValue::from(i32::from(color.r))),
        ("g", ScriptValue::from(i32::from(color.g))),
        ("b", ScriptValue::from(i32::from(color.b))),
        ("a", ScriptValue::from(i32::from(color.a))),
    ])
}

pub fn vector3_to_value(vector: Vector3) -> ScriptValue {
    ScriptValue::object([
        ("x", ScriptValue::from(vector.x)),
        ("y", ScriptValue::from(vector.y)),
        ("z", ScriptValue::from(vector.z)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obj(value: ScriptValue) -> ScriptObject {
        match value {
            ScriptValue::Object(map) => map,
            other => panic!("not an object: {:?}", other),
        }
    }

    fn camera_value() -> ScriptValue {
        ScriptValue::object([
            ("position", vector3_to_value(Vector3::new(10.0, 10.0, 10.0))),
            ("target", vector3_to_value(Vector3::new(0.0, 0.0, 0.0))),
            ("up", vector3_to_value(Vector3::new(0.0, 1.0, 0.0))),
            ("fovy", ScriptValue::from(45)),
            ("projection", ScriptValue::from(0)),
        ])
    }

    #[test]
    fn test_shape_fields() {
        assert!(ArgShape::Scalar.fields().is_empty());
        let camera: Vec<&str> = ArgShape::Camera.fields().iter().map(|(f, _)| *f).collect();
        assert_eq!(camera, ["position", "target", "up", "fovy", "projection"]);
        assert!(ArgShape::Camera
            .fields()
            .iter()
            .filter(|(_, shape)| *shape == ArgShape::Vector3)
            .all(|(_, shape)| shape.fields().len() == 3));
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(to_uint32(300.0), 300);
        assert_eq!(to_uint32(-1.0), u32::MAX);
        assert_eq!(to_uint32(3.9), 3);
        assert_eq!(to_uint32(f64::NAN), 0);
        assert_eq!(to_uint32(f64::INFINITY), 0);
        assert_eq!(to_int32(4_294_967_295.0), -1);
        assert_eq!(to_int32(-2.5), -2);
    }

    #[test]
    fn test_color_round_trip() {
        let value = ScriptValue::object([
            ("r", ScriptValue::from(10)),
            ("g", 20.into()),
            ("b", 30.into()),
            ("a", 255.into()),
        ]);
        let color = value_to_color("test", &obj(value.clone())).unwrap();
        assert_eq!(color, Color::new(10, 20, 30, 255));
        assert_eq!(color_to_value(color), value);
    }

    #[test]
    fn test_field_order_follows_layout() {
        let keys = |value: ScriptValue| -> Vec<String> {
            obj(value).keys().cloned().collect()
        };
        assert_eq!(keys(vector3_to_value(Vector3::new(1.0, 2.0, 3.0))), ["x", "y", "z"]);
        assert_eq!(keys(color_to_value(Color::RED)), ["r", "g", "b", "a"]);
    }

    #[test]
    fn test_color_channels_wrap() {
        let value = ScriptValue::object([
            ("r", ScriptValue::from(300)),
            ("g", (-1).into()),
            ("b", 12.7.into()),
            ("a", 256.into()),
        ]);
        let color = value_to_color("test", &obj(value)).unwrap();
        assert_eq!(color, Color::new(44, 255, 12, 0));
    }

    #[test]
    fn test_color_missing_and_mistyped_fields() {
        let missing = ScriptValue::object([("r", ScriptValue::from(1)), ("g", 2.into()), ("b", 3.into())]);
        assert_eq!(
            value_to_color("drawText", &obj(missing)),
            Err(BindingError::MissingField {
                function: "drawText",
                what: "color",
                field: "a",
            })
        );

        let mistyped = ScriptValue::object([
            ("r", ScriptValue::from("red")),
            ("g", 2.into()),
            ("b", 3.into()),
            ("a", 4.into()),
        ]);
        assert!(matches!(
            value_to_color("drawText", &obj(mistyped)),
            Err(BindingError::FieldType { field: "r", found: "string", .. })
        ));
    }

    #[test]
    fn test_camera_conversion() {
        let camera = value_to_camera("beginMode3D", &obj(camera_value())).unwrap();
        assert_eq!(camera.position, Vector3::new(10.0, 10.0, 10.0));
        assert_eq!(camera.up, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(camera.fovy, 45.0);
        assert_eq!(camera.projection, 0);
    }

    #[test]
    fn test_camera_projection_not_validated() {
        let mut value = camera_value();
        value
            .as_object_mut()
            .unwrap()
            .insert("projection".to_string(), ScriptValue::from(7));
        let camera = value_to_camera("beginMode3D", &obj(value)).unwrap();
        assert_eq!(camera.projection, 7);
    }

    #[test]
    fn test_camera_nested_errors() {
        let mut value = camera_value();
        value.as_object_mut().unwrap().shift_remove("target");
        assert!(matches!(
            value_to_camera("beginMode3D", &obj(value)),
            Err(BindingError::MissingField { field: "target", .. })
        ));

        let mut value = camera_value();
        value
            .as_object_mut()
            .unwrap()
            .insert("up".to_string(), ScriptValue::from(1));
        assert!(matches!(
            value_to_camera("beginMode3D", &obj(value)),
            Err(BindingError::FieldType { field: "up", expected: "an object", .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_color_channel_is_low_byte(n in any::<u32>()) {
            let value = ScriptValue::object([
                ("r", ScriptValue::from(i64::from(n))),
                ("g", 0.into()),
                ("b", 0.into()),
                ("a", 0.into()),
            ]);
            let color = value_to_color("prop", &obj(value)).unwrap();
            prop_assert_eq!(color.r, (n & 0xff) as u8);
        }

        #[test]
        fn prop_int32_matches_wrapping_cast(n in -(1i64 << 52)..(1i64 << 52)) {
            prop_assert_eq!(to_int32(n as f64), n as i32);
        }

        #[test]
        fn prop_vector_components_are_f32(x in -1.0e6f64..1.0e6, y in -1.0e6f64..1.0e6, z in -1.0e6f64..1.0e6) {
            let value = ScriptValue::object([
                ("x", ScriptValue::from(x)),
                ("y", y.into()),
                ("z", z.into()),
            ]);
            let v = value_to_vector3("prop", "position", &obj(value)).unwrap();
            prop_assert_eq!(v, Vector3::new(x as f32, y as f32, z as f32));
        }
    }
}
