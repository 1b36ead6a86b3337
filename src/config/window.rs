use super::{ConfigError, ConfigResult};
use crate::impl_default;
use crate::native::Color;
use serde::{Deserialize, Serialize};

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// `gameLoop` 使用的目标帧率，同时决定 headless 后端的帧时间
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_target_fps() -> u32 {
    60
}

impl_default!(WindowConfig {
    target_fps: default_target_fps(),
});

impl WindowConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.target_fps == 0 || self.target_fps > 1000 {
            return Err(ConfigError::ValidationError(
                "Invalid target FPS".to_string(),
            ));
        }
        Ok(())
    }
}

/// 省略颜色参数时使用的默认颜色
///
/// 无状态与有状态两种绑定共用同一套默认值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultColors {
    /// `clearBackground()` 的默认颜色
    #[serde(default = "default_background")]
    pub background: Color,

    /// `drawText(..., color)` 中颜色不是对象时的默认颜色
    #[serde(default = "default_text")]
    pub text: Color,
}

fn default_background() -> Color {
    Color::BLACK
}

fn default_text() -> Color {
    Color::WHITE
}

impl_default!(DefaultColors {
    background: default_background(),
    text: default_text(),
});
