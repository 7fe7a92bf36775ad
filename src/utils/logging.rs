//! # 日志初始化
//!
//! 使用 `tracing-subscriber` 将诊断日志输出到 stderr，级别由 `-v` 次数决定，
//! `-q` 关闭日志。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing`, `tracing-subscriber`

use crate::error::{MpCompatError, Result};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// 根据 verbosity 选择日志级别
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// 安装全局日志订阅者
pub fn setup_logging(verbosity: u8, quiet: bool) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(level_for(verbosity, quiet))
        .with(stderr_layer)
        .try_init()
        .map_err(|e| MpCompatError::ConfigError(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(7, false), LevelFilter::TRACE);
        assert_eq!(level_for(3, true), LevelFilter::OFF);
    }
}
