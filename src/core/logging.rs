//! 日志初始化
//!
//! 使用 `tracing` + `tracing-subscriber`。`RUST_LOG` 优先，
//! 未设置时回退到配置文件中的日志级别。

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// 初始化日志系统
///
/// 幂等：重复调用会被忽略。测试中其他 subscriber 已安装时也不会报错。
pub fn initialize_logging(config: &LoggingConfig) {
    let fallback = config.level.as_directive();

    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();

        tracing::info!(target: "raylib_addon", "logging initialized");
    });
}
