//! bowl-process - 处理器主程序入口
//!
//! 纯流程控制器：解析参数、定位引擎、顺序处理每个输入并打印结果。

use bowl_audio_tools::{
    engine::{FfmpegEngine, ffmpeg::FFMPEG_INSTALL_GUIDE},
    error::{AudioError, ErrorCategory},
    logging,
    processing::{self, BatchEvent, FileOutcome},
    tools::{self, AppConfig, utils},
};
use std::process;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 参数/配置错误
    pub const INVALID_INPUT: i32 = 2;
    /// 外部引擎缺失
    pub const ENGINE_MISSING: i32 = 3;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &AudioError) -> &'static str {
    match error {
        AudioError::InvalidInput(_) => {
            "检查命令行参数是否正确，使用 --help 查看完整用法 / Check if command-line arguments are correct, use --help to see full usage"
        }
        AudioError::EngineNotFound { .. } => {
            "安装 FFmpeg 并确保 ffmpeg 与 ffprobe 位于 PATH 中 / Install FFmpeg and make sure ffmpeg and ffprobe are on PATH"
        }
        _ => match ErrorCategory::from_audio_error(error) {
            ErrorCategory::Io => {
                "检查文件路径是否正确，文件是否存在且可读 / Check if file path is correct, file exists and is readable"
            }
            _ => "请检查输入文件和参数设置 / Please check input file and parameter settings",
        },
    }
}

/// 错误处理和建议
fn handle_error(error: AudioError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(&error));

    if matches!(error, AudioError::EngineNotFound { .. }) {
        eprintln!("{FFMPEG_INSTALL_GUIDE}");
    }

    let exit_code = match &error {
        AudioError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        AudioError::EngineNotFound { .. } => exit_codes::ENGINE_MISSING,
        _ => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

/// 打印批处理进度
fn print_event(config: &AppConfig, event: BatchEvent<'_>) {
    match event {
        BatchEvent::Started { input } => {
            println!("Processing: {}", utils::extract_filename_lossy(input));
        }
        BatchEvent::Finished(FileOutcome::Succeeded(result)) => {
            if config.verbose {
                println!("  filter: {}", result.filter_chain);
            }
            println!("{}", tools::format_result_line(result));
        }
        BatchEvent::Finished(FileOutcome::Skipped { input, reason }) => {
            println!("Skipping: {} ({reason})", input.display());
        }
        BatchEvent::Finished(FileOutcome::Failed { stage, error, .. }) => {
            if config.verbose {
                println!(
                    "  [FAIL] {} / {}: {error}",
                    stage,
                    ErrorCategory::from_audio_error(error).display_name()
                );
            } else {
                println!("  [FAIL] Error: {error}");
            }
        }
    }
}

/// 应用程序主逻辑（便于测试和复用）
fn run() -> Result<(), AudioError> {
    // 1. 解析命令行参数
    let config = tools::parse_args();
    logging::init_tracing(config.verbose);

    // 2. 校验配置
    config.processing.validate()?;

    // 3. 定位引擎（缺失即终止，此时尚未创建任何目录）
    let engine = FfmpegEngine::discover()?;

    // 4. 显示启动信息
    tools::show_startup_info(&config);

    // 5. 顺序处理
    let report = processing::process_batch(
        &engine,
        &config.inputs,
        &config.processing,
        &mut |event| print_event(&config, event),
    )?;

    tools::show_completion_info(&config, &report);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
