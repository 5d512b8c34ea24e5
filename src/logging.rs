//! 日志初始化
//!
//! 用户可见的进度输出仍使用 stdout；这里只负责开发诊断（引擎命令行、
//! 解析失败、阶段切换）。尊重 `RUST_LOG` 环境变量。

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 初始化全局 tracing 订阅者，输出到 stderr
///
/// `verbose` 为真时默认级别为 debug，否则为 warn。重复调用不会 panic。
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}
