//! 日志初始化
//!
//! 配置tracing日志框架。日志级别优先读取`RUST_LOG`环境变量，
//! 未设置时使用`LoggingConfig`中的级别。

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// 安装全局tracing订阅者
///
/// 返回是否由本次调用完成安装；已有订阅者时返回`false`，可重复调用。
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter_str()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(target: "sfx", "Logging initialized at {:?}", config.level);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        // 第二次调用不能panic，且不会重复安装
        assert!(!init_logging(&config));
    }
}
