use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// 原生层配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeConfig {
    /// 后端选择
    #[serde(default)]
    pub backend: Backend,

    /// raylib 动态库路径，缺省时使用平台库名（如 `libraylib.so`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_path: Option<PathBuf>,

    /// headless 后端在多少帧之后让 `windowShouldClose` 返回 true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_limit: Option<u64>,
}

impl_default!(NativeConfig {
    backend: Backend::Raylib,
    library_path: None,
    frame_limit: None,
});

impl NativeConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(path) = &self.library_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "native.library_path must not be empty".to_string(),
                ));
            }
        }
        if self.frame_limit == Some(0) {
            return Err(ConfigError::ValidationError(
                "native.frame_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// 实际加载的库路径
    pub fn resolved_library_path(&self) -> PathBuf {
        self.library_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(libloading::library_filename("raylib")))
    }
}

/// 原生后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// 通过 libloading 加载的 raylib
    #[default]
    Raylib,
    /// 进程内替身，不打开窗口
    Headless,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raylib" => Ok(Backend::Raylib),
            "headless" => Ok(Backend::Headless),
            other => Err(ConfigError::ParseError(format!(
                "unknown backend '{}', expected 'raylib' or 'headless'",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Raylib => f.write_str("raylib"),
            Backend::Headless => f.write_str("headless"),
        }
    }
}
