use std::fmt;

use indexmap::IndexMap;

/// 对象字段表，保留插入顺序
pub type ScriptObject = IndexMap<String, ScriptValue>;

/// 脚本值类型
///
/// 脚本调用方传入的动态值，在绑定层内部以此形式流转。
/// 数字区分整数与浮点，便于保持脚本侧的原始表示。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScriptValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<ScriptValue>),
    Object(ScriptObject),
}

impl ScriptValue {
    /// 用于错误消息的类型名，与 `typeof` 的写法保持一致
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Undefined => "undefined",
            ScriptValue::Null => "null",
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Int(_) | ScriptValue::Float(_) => "number",
            ScriptValue::String(_) => "string",
            ScriptValue::Array(_) => "array",
            ScriptValue::Object(_) => "object",
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, ScriptValue::Int(_) | ScriptValue::Float(_))
    }

    /// 非数组的普通对象
    pub fn is_object(&self) -> bool {
        matches!(self, ScriptValue::Object(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScriptValue::Int(i) => Some(*i as f64),
            ScriptValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ScriptObject> {
        match self {
            ScriptValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ScriptObject> {
        match self {
            ScriptValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// 对象字段，非对象或字段不存在时返回 `None`
    pub fn get(&self, key: &str) -> Option<&ScriptValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// 从键值对构建对象
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ScriptValue)>,
    {
        ScriptValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Undefined => f.write_str("undefined"),
            ScriptValue::Null => f.write_str("null"),
            ScriptValue::Bool(b) => write!(f, "{}", b),
            ScriptValue::Int(i) => write!(f, "{}", i),
            ScriptValue::Float(x) => write!(f, "{}", x),
            ScriptValue::String(s) => f.write_str(s),
            ScriptValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            ScriptValue::Object(_) => f.write_str("[object Object]"),
        }
    }
}

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

impl From<i32> for ScriptValue {
    fn from(i: i32) -> Self {
        ScriptValue::Int(i64::from(i))
    }
}

impl From<i64> for ScriptValue {
    fn from(i: i64) -> Self {
        ScriptValue::Int(i)
    }
}

impl From<f32> for ScriptValue {
    fn from(x: f32) -> Self {
        ScriptValue::Float(f64::from(x))
    }
}

impl From<f64> for ScriptValue {
    fn from(x: f64) -> Self {
        ScriptValue::Float(x)
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::String(s.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(s: String) -> Self {
        ScriptValue::String(s)
    }
}
