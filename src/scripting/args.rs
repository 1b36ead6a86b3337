use super::convert::{value_to_camera, value_to_color, value_to_vector3};
use super::{ScriptObject, ScriptValue};
use crate::core::{BindingError, BindingResult};
use crate::native::{Camera3D, Color, Vector3};

static UNDEFINED: ScriptValue = ScriptValue::Undefined;

/// 需要写回调用方对象的字段
///
/// 宿主在调用返回后把 `value` 赋给第 `index` 个参数的 `field` 字段。
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBack {
    pub index: usize,
    pub field: &'static str,
    pub value: ScriptValue,
}

/// 一次调用的位置参数
///
/// 提供带类型检查的访问器；所有失败都以 `BindingError` 返回，
/// 在触碰原生层之前结束调用。
#[derive(Debug, Clone)]
pub struct CallArgs {
    function: &'static str,
    values: Vec<ScriptValue>,
    write_backs: Vec<WriteBack>,
}

impl CallArgs {
    pub fn new(function: &'static str, values: Vec<ScriptValue>) -> Self {
        Self {
            function,
            values,
            write_backs: Vec::new(),
        }
    }

    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 第 `index` 个参数，越界时为 `undefined`
    pub fn get(&self, index: usize) -> &ScriptValue {
        self.values.get(index).unwrap_or(&UNDEFINED)
    }

    fn type_error(&self, index: usize, expected: &'static str) -> BindingError {
        BindingError::ArgumentType {
            function: self.function,
            index,
            expected,
            found: self.get(index).type_name(),
        }
    }

    fn number(&self, index: usize) -> BindingResult<f64> {
        self.get(index)
            .as_f64()
            .ok_or_else(|| self.type_error(index, "a number"))
    }

    /// 按 `ToInt32` 取整
    pub fn int32(&self, index: usize) -> BindingResult<i32> {
        self.number(index).map(super::convert::to_int32)
    }

    pub fn float(&self, index: usize) -> BindingResult<f32> {
        self.number(index).map(|n| n as f32)
    }

    pub fn string(&self, index: usize) -> BindingResult<&str> {
        self.get(index)
            .as_str()
            .ok_or_else(|| self.type_error(index, "a string"))
    }

    pub fn object(&self, index: usize) -> BindingResult<&ScriptObject> {
        self.get(index)
            .as_object()
            .ok_or_else(|| self.type_error(index, "an object"))
    }

    pub fn color(&self, index: usize) -> BindingResult<Color> {
        value_to_color(self.function, self.object(index)?)
    }

    /// 参数是对象时按颜色解析，否则使用 `default`
    pub fn color_or(&self, index: usize, default: Color) -> BindingResult<Color> {
        match self.get(index).as_object() {
            Some(object) => value_to_color(self.function, object),
            None => Ok(default),
        }
    }

    pub fn vector3(&self, index: usize, what: &'static str) -> BindingResult<Vector3> {
        value_to_vector3(self.function, what, self.object(index)?)
    }

    /// 非对象参数以 `message` 报错
    pub fn camera(&self, index: usize, message: &'static str) -> BindingResult<Camera3D> {
        let object = self.get(index).as_object().ok_or(BindingError::Shape {
            function: self.function,
            message,
        })?;
        value_to_camera(self.function, object)
    }

    /// 记录一次写回，同时更新本地副本
    pub fn write_back(&mut self, index: usize, field: &'static str, value: ScriptValue) {
        if let Some(object) = self.values.get_mut(index).and_then(ScriptValue::as_object_mut) {
            object.insert(field.to_string(), value.clone());
        }
        self.write_backs.push(WriteBack { index, field, value });
    }

    pub fn write_backs(&self) -> &[WriteBack] {
        &self.write_backs
    }

    pub fn into_write_backs(self) -> Vec<WriteBack> {
        self.write_backs
    }

    pub fn values(&self) -> &[ScriptValue] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripting::convert::color_to_value;

    #[test]
    fn test_positional_access() {
        let args = CallArgs::new(
            "drawText",
            vec!["hi".into(), 10.into(), 10.5.into(), 20.into()],
        );
        assert_eq!(args.len(), 4);
        assert_eq!(args.string(0).unwrap(), "hi");
        assert_eq!(args.int32(1).unwrap(), 10);
        assert_eq!(args.int32(2).unwrap(), 10);
        assert_eq!(args.float(2).unwrap(), 10.5);
        assert_eq!(*args.get(9), ScriptValue::Undefined);
    }

    #[test]
    fn test_type_errors() {
        let args = CallArgs::new("drawGrid", vec!["ten".into()]);
        assert_eq!(
            args.int32(0),
            Err(BindingError::ArgumentType {
                function: "drawGrid",
                index: 0,
                expected: "a number",
                found: "string",
            })
        );
        assert!(args.float(1).is_err());
        assert!(args.object(0).is_err());
    }

    #[test]
    fn test_color_or_default() {
        let args = CallArgs::new(
            "clearBackground",
            vec![ScriptValue::Null, color_to_value(Color::RED), "red".into()],
        );
        assert_eq!(args.color_or(0, Color::BLACK).unwrap(), Color::BLACK);
        assert_eq!(args.color_or(1, Color::BLACK).unwrap(), Color::RED);
        assert_eq!(args.color_or(2, Color::WHITE).unwrap(), Color::WHITE);
        assert_eq!(args.color_or(3, Color::WHITE).unwrap(), Color::WHITE);
    }

    #[test]
    fn test_camera_shape_message() {
        let args = CallArgs::new("beginMode3D", vec![5.into()]);
        let err = args.camera(0, "Expected a camera object").unwrap_err();
        assert_eq!(err.to_string(), "Expected a camera object");
    }

    #[test]
    fn test_write_back_updates_local_copy() {
        let mut args = CallArgs::new(
            "updateCamera",
            vec![ScriptValue::object([("position", ScriptValue::Null)]), 2.into()],
        );
        args.write_back(0, "position", ScriptValue::from(1));
        assert_eq!(args.get(0).get("position"), Some(&ScriptValue::Int(1)));
        assert_eq!(args.write_backs().len(), 1);
        assert_eq!(args.into_write_backs()[0].field, "position");
    }
}
