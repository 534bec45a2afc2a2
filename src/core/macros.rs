//! 核心宏定义
//!
//! 提供统一的宏来减少配置结构体的样板代码

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use sfx_engine::impl_default;
///
/// struct ClipSettings {
///     max_instances: usize,
///     template: String,
/// }
///
/// impl_default!(ClipSettings {
///     max_instances: 4,
///     template: "{name}.ogg".to_string(),
/// });
///
/// assert_eq!(ClipSettings::default().max_instances, 4);
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
