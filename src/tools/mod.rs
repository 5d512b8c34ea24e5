//! 工具模块集合
//!
//! 包含CLI、文件扫描、格式化与信息查看等模块，支持两个二进制入口的流程控制。

pub mod cli;
pub mod constants;
pub mod formatter;
pub mod inspector;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{AppConfig, parse_args, show_completion_info, show_startup_info};
pub use formatter::{format_batch_summary, format_result_line};
pub use inspector::{InspectionReport, inspect_directory, render_json, render_table, render_text};
pub use scanner::{SUPPORTED_EXTENSIONS, scan_audio_files};
