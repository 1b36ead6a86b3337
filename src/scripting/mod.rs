//! 脚本值与参数编组
//!
//! - `value` - 动态脚本值 `ScriptValue`
//! - `convert` - 结构化值与原生布局之间的转换
//! - `args` - 带类型检查的位置参数访问

pub mod args;
pub mod convert;
pub mod value;

pub use args::{CallArgs, WriteBack};
pub use convert::{
    color_to_value, ArgShape, to_int32, to_uint32, value_to_camera, value_to_color, value_to_vector3,
    vector3_to_value,
};
pub use value::{ScriptObject, ScriptValue};
