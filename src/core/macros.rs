//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```ignore
/// struct WindowConfig {
///     target_fps: u32,
/// }
///
/// impl_default!(WindowConfig {
///     target_fps: 60,
/// });
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    struct Probe {
        fps: u32,
        title: String,
    }

    impl_default!(Probe {
        fps: 60,
        title: "demo".to_string(),
    });

    #[test]
    fn test_impl_default() {
        let probe = Probe::default();
        assert_eq!(probe.fps, 60);
        assert_eq!(probe.title, "demo");
    }
}
