//! 统一错误处理模块
//!
//! 提供绑定层范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **边界错误** (`BindingError`): 参数个数、参数类型、结构化值字段缺失等，
//!   在调用原生层之前检测，以 `TypeError` 的形式抛给脚本
//! - **原生层错误** (`NativeError`): 动态库加载、符号解析
//! - **宿主错误** (`HostError`): JS 运行时创建、脚本执行
//!
//! 原生库自身的失败（静默失败、哨兵返回值、进程终止）不经过这里。

use thiserror::Error;

use crate::config::ConfigError;

/// 边界错误：在触碰原生层之前检测到的形状/个数违规
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    /// 参数个数不足，消息沿用各函数注册时给出的文本
    #[error("{message}")]
    Arity {
        function: &'static str,
        expected: usize,
        received: usize,
        message: &'static str,
    },

    /// 位置参数类型不符
    #[error("{function}: expected {expected} for argument {index}, got {found}")]
    ArgumentType {
        function: &'static str,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// 由函数自身给出消息的类型错误（例如 "Expected a camera object"）
    #[error("{message}")]
    Shape {
        function: &'static str,
        message: &'static str,
    },

    /// 结构化值缺少必需字段
    #[error("{function}: {what} is missing field `{field}`")]
    MissingField {
        function: &'static str,
        what: &'static str,
        field: &'static str,
    },

    /// 结构化值字段类型不符
    #[error("{function}: field `{field}` of {what} must be {expected}, got {found}")]
    FieldType {
        function: &'static str,
        what: &'static str,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// 函数表中不存在该名称
    #[error("Function '{0}' not found")]
    UnknownFunction(String),

    /// 已有一个存活的窗口控制器
    #[error("a RaylibWindow is already live; dispose it before creating another")]
    ControllerBusy,

    /// 控制器句柄无效（已释放或从未创建）
    #[error("RaylibWindow handle {0} is not live")]
    StaleController(u32),
}

impl BindingError {
    /// 该错误在脚本侧是否应以 `TypeError` 抛出
    pub fn is_type_error(&self) -> bool {
        !matches!(
            self,
            BindingError::ControllerBusy | BindingError::StaleController(_)
        )
    }
}

/// 原生层错误
#[derive(Error, Debug)]
pub enum NativeError {
    #[error("Failed to load native library {path}: {reason}")]
    LibraryLoad { path: String, reason: String },

    #[error("Failed to resolve native symbol `{symbol}`: {reason}")]
    Symbol { symbol: String, reason: String },
}

/// 脚本宿主错误
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Failed to create JS runtime: {0}")]
    Runtime(String),

    #[error("Script evaluation error: {0}")]
    Evaluation(String),

    #[error("Pending job failed: {0}")]
    Job(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 绑定层顶层错误类型
#[derive(Error, Debug)]
pub enum AddonError {
    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    #[error("Native error: {0}")]
    Native(#[from] NativeError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// 结果类型别名
pub type AddonResult<T> = Result<T, AddonError>;
pub type BindingResult<T> = Result<T, BindingError>;
pub type NativeResult<T> = Result<T, NativeError>;
pub type HostResult<T> = Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let binding_err = BindingError::ControllerBusy;
        let addon_err: AddonError = binding_err.into();
        assert!(matches!(addon_err, AddonError::Binding(_)));
    }

    #[test]
    fn test_arity_message_is_verbatim() {
        let err = BindingError::Arity {
            function: "initWindow",
            expected: 3,
            received: 1,
            message: "Expected 3 arguments",
        };
        assert_eq!(err.to_string(), "Expected 3 arguments");
        assert!(err.is_type_error());
    }

    #[test]
    fn test_error_display() {
        let err = BindingError::MissingField {
            function: "drawCube",
            what: "color",
            field: "a",
        };
        assert_eq!(err.to_string(), "drawCube: color is missing field `a`");
        assert!(!BindingError::ControllerBusy.is_type_error());
    }
}
