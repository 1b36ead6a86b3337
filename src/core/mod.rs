//! 核心模块
//!
//! 包含绑定层的基础设施：
//! - `error` - 错误类型定义
//! - `logging` - 日志初始化
//! - `macros` - 通用宏

pub mod error;
pub mod logging;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{
    AddonError, AddonResult, BindingError, BindingResult, HostError, HostResult, NativeError,
    NativeResult,
};

pub use logging::initialize_logging;
