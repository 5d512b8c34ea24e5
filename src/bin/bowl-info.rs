//! bowl-info - 音频文件信息查看器
//!
//! 列出目录及其 `processed/` 子目录中的音频文件。
//!
//! 用法示例：
//! ```bash
//! # 当前目录，文本报告
//! bowl-info
//!
//! # 指定目录并测量响度（较慢）
//! bowl-info -d ~/bowls --loudness
//!
//! # JSON 输出
//! bowl-info --format json
//! ```

use anyhow::{Context, Result};
use bowl_audio_tools::{
    AudioError,
    engine::{FfmpegEngine, ffmpeg::FFMPEG_INSTALL_GUIDE},
    logging,
    tools::{inspect_directory, render_json, render_table, render_text},
};
use clap::Parser;
use std::path::PathBuf;

/// 引擎缺失时的退出码（与 bowl-process 一致）
const ENGINE_MISSING_EXIT_CODE: i32 = 3;

#[derive(Parser, Debug)]
#[command(name = "bowl-info")]
#[command(about = "显示音频文件信息 / Display audio file information")]
#[command(version)]
struct Cli {
    /// 显示积分响度与真峰值（较慢） / Show LUFS and true peak (slower)
    #[arg(long, short = 'l')]
    loudness: bool,

    /// 要检查的目录（默认当前目录） / Directory to inspect
    #[arg(long, short = 'd', default_value = ".")]
    dir: PathBuf,

    /// 输出格式: text, table, json / Output format
    #[arg(long, short = 'F', default_value = "text")]
    format: OutputFormat,

    /// 输出调试日志 / Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {s}")),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let engine = match FfmpegEngine::discover() {
        Ok(engine) => engine,
        Err(error @ AudioError::EngineNotFound { .. }) => {
            eprintln!("[ERROR] {error}");
            eprintln!("{FFMPEG_INSTALL_GUIDE}");
            std::process::exit(ENGINE_MISSING_EXIT_CODE);
        }
        Err(error) => return Err(error).context("Engine discovery failed / 引擎初始化失败"),
    };

    let report = inspect_directory(&engine, &cli.dir, cli.loudness)
        .with_context(|| format!("Cannot inspect / 无法检查目录: {}", cli.dir.display()))?;

    match cli.format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Table => print!("{}", render_table(&report)),
        OutputFormat::Json => println!("{}", render_json(&report)?),
    }

    Ok(())
}
