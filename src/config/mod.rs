/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖和校验
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub mod native;
pub mod window;

pub use native::{Backend, NativeConfig};
pub use window::{DefaultColors, WindowConfig};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 绑定层主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddonConfig {
    /// 原生层配置
    #[serde(default)]
    pub native: NativeConfig,

    /// 默认颜色
    #[serde(default)]
    pub defaults: DefaultColors,

    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AddonConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 按扩展名加载（`.json` 走 JSON，其余走 TOML）
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("RAYLIB_ADDON_BACKEND") {
            match val.parse() {
                Ok(backend) => self.native.backend = backend,
                Err(e) => tracing::warn!(target: "raylib_addon::config", "ignoring RAYLIB_ADDON_BACKEND: {}", e),
            }
        }
        if let Ok(val) = env::var("RAYLIB_ADDON_LIBRARY") {
            self.native.library_path = Some(val.into());
        }
        if let Ok(val) = env::var("RAYLIB_ADDON_FRAME_LIMIT") {
            if let Ok(limit) = val.parse() {
                self.native.frame_limit = Some(limit);
            }
        }
        if let Ok(val) = env::var("RAYLIB_ADDON_TARGET_FPS") {
            if let Ok(fps) = val.parse() {
                self.window.target_fps = fps;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.native.validate()?;
        self.window.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./raylib_addon.toml
    /// 2. ./raylib_addon.json
    /// 3. <config_dir>/raylib_addon/config.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("raylib_addon.toml") {
            tracing::info!(target: "raylib_addon::config", "Loaded config from raylib_addon.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("raylib_addon.json") {
            tracing::info!(target: "raylib_addon::config", "Loaded config from raylib_addon.json");
            return config;
        }

        if let Some(dir) = dirs::config_dir() {
            let config_path = dir.join("raylib_addon").join("config.toml");
            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "raylib_addon::config", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::debug!(target: "raylib_addon::config", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `RUST_LOG` 未设置时使用的日志级别
    #[serde(default)]
    pub level: LogLevel,
}

/// 日志级别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    #[default]
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// 转换为 `EnvFilter` 指令
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::Color;

    #[test]
    fn test_default_config() {
        let config = AddonConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.native.backend, Backend::Raylib);
        assert_eq!(config.defaults.background, Color::BLACK);
        assert_eq!(config.defaults.text, Color::WHITE);
    }

    #[test]
    fn test_partial_toml() {
        let config = AddonConfig::from_toml_str(
            r#"
            [native]
            backend = "headless"
            frame_limit = 3

            [defaults]
            background = { r = 245, g = 245, b = 245, a = 255 }

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.native.backend, Backend::Headless);
        assert_eq!(config.native.frame_limit, Some(3));
        assert_eq!(config.defaults.background, Color::RAYWHITE);
        assert_eq!(config.defaults.text, Color::WHITE);
        assert_eq!(config.window.target_fps, 60);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_json_config() {
        let config = AddonConfig::from_json_str(r#"{ "window": { "target_fps": 30 } }"#).unwrap();
        assert_eq!(config.window.target_fps, 30);
        assert_eq!(config.native.backend, Backend::Raylib);
    }

    #[test]
    fn test_invalid_fps_rejected() {
        let config = AddonConfig::from_toml_str("[window]\ntarget_fps = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_toml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raylib_addon.toml");

        let mut config = AddonConfig::default();
        config.native.backend = Backend::Headless;
        config.window.target_fps = 144;
        config.save_toml(&path).unwrap();

        let loaded = AddonConfig::from_file(&path).unwrap();
        assert_eq!(loaded.native.backend, Backend::Headless);
        assert_eq!(loaded.window.target_fps, 144);
    }
}
