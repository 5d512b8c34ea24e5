//! 命令行接口模块
//!
//! 负责处理器的命令行参数解析、配置构造和程序信息展示。

use super::constants::defaults;
use crate::processing::{BatchReport, ProcessingConfig};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 处理器运行配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 输入文件（通配符由 shell 展开）
    pub inputs: Vec<PathBuf>,

    /// 不可变的处理参数
    pub processing: ProcessingConfig,

    /// 是否显示详细信息（滤镜链、调试日志）
    pub verbose: bool,
}

fn number_arg(id: &'static str, short: char, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .short(short)
        .long(long)
        .help(help)
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
}

/// 构建处理器命令定义
pub fn build_command() -> Command {
    Command::new("bowl-process")
        .version(VERSION)
        .about("颂钵音频批处理 / Singing bowl audio processor: trim silence, shorten, fade out, normalize loudness")
        .author("MacinMeter Team")
        .after_help(
            "示例 / Examples:\n  \
             bowl-process bowl.mp3              # 10s, 2s fade\n  \
             bowl-process bowl.mp3 -d 15        # 15s, 2s fade\n  \
             bowl-process bowl.mp3 -d 10 -f 3   # 10s, 3s fade\n  \
             bowl-process *.mp3                 # all MP3 files",
        )
        .arg(
            Arg::new("FILES")
                .help("输入音频文件 (MP3) / Input audio files (MP3)")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            number_arg("duration", 'd', "duration", "目标时长（秒）/ Target duration in seconds")
                .value_name("SECONDS")
                .default_value("10"),
        )
        .arg(
            number_arg("fade", 'f', "fade", "淡出时长（秒）/ Fade-out length in seconds")
                .value_name("SECONDS")
                .default_value("2"),
        )
        .arg(
            number_arg("lufs", 'l', "lufs", "目标响度 / Target integrated loudness")
                .value_name("LUFS")
                .default_value("-16"),
        )
        .arg(
            number_arg("peak", 'p', "peak", "真峰值上限 / True-peak ceiling")
                .value_name("DBTP")
                .default_value("-1.5"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("输出子目录 / Output directory next to each input")
                .value_name("DIR")
                .default_value(defaults::OUTPUT_DIRECTORY),
        )
        .arg(
            Arg::new("bitrate")
                .long("bitrate")
                .short('b')
                .help("编码比特率 / Encoder bitrate")
                .value_name("RATE")
                .default_value(defaults::BITRATE),
        )
        .arg(
            Arg::new("silence-threshold")
                .long("silence-threshold")
                .help("静音门限 / Silence noise floor in dB")
                .value_name("DB")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .default_value("-50"),
        )
        .arg(
            Arg::new("min-silence")
                .long("min-silence")
                .help("最小静音时长（秒）/ Minimum silence length in seconds")
                .value_name("SECONDS")
                .value_parser(value_parser!(f64))
                .default_value("0.1"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息 / Show filter chains and debug logging")
                .action(ArgAction::SetTrue),
        )
}

fn config_from_matches(matches: &ArgMatches) -> AppConfig {
    let number = |id: &str, fallback: f64| matches.get_one::<f64>(id).copied().unwrap_or(fallback);
    let text = |id: &str, fallback: &str| {
        matches
            .get_one::<String>(id)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    };

    let processing = ProcessingConfig {
        target_duration: number("duration", defaults::TARGET_DURATION_SECONDS),
        fade_duration: number("fade", defaults::FADE_DURATION_SECONDS),
        target_loudness: number("lufs", defaults::TARGET_LOUDNESS_LUFS),
        true_peak_ceiling: number("peak", defaults::TRUE_PEAK_CEILING_DBTP),
        silence_threshold_db: number("silence-threshold", defaults::SILENCE_THRESHOLD_DB),
        min_silence_duration: number("min-silence", defaults::MIN_SILENCE_DURATION_SECONDS),
        output_directory: text("output", defaults::OUTPUT_DIRECTORY),
        bitrate: text("bitrate", defaults::BITRATE),
    };

    AppConfig {
        inputs: matches
            .get_many::<PathBuf>("FILES")
            .map(|files| files.cloned().collect())
            .unwrap_or_default(),
        processing,
        verbose: matches.get_flag("verbose"),
    }
}

/// 从给定参数解析（测试使用）
pub fn parse_args_from<I, T>(args: I) -> Result<AppConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().try_get_matches_from(args)?;
    Ok(config_from_matches(&matches))
}

/// 解析命令行参数并创建配置
///
/// 参数错误时 clap 打印用法并退出（退出码 2）。
pub fn parse_args() -> AppConfig {
    let matches = build_command().get_matches();
    config_from_matches(&matches)
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    let processing = &config.processing;
    println!(
        "目标 / Target: {}s with {}s fade-out, {} LUFS, {} dBTP",
        processing.target_duration,
        processing.fade_duration,
        processing.target_loudness,
        processing.true_peak_ceiling
    );
    if config.verbose {
        println!("bowl-process v{VERSION}");
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig, report: &BatchReport) {
    if let Some(line) = super::formatter::format_processed_line(
        &report.stats,
        &config.processing.output_directory,
    ) {
        println!("\n{line}");
    }

    let summary = super::formatter::format_batch_summary(&report.stats);
    if !summary.is_empty() {
        println!();
        print!("{summary}");
    }

    if config.verbose {
        println!("✅ 所有任务处理完成！/ All tasks completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_processing_config() {
        let config = parse_args_from(["bowl-process", "bowl.mp3"]).unwrap();
        assert_eq!(config.inputs, vec![PathBuf::from("bowl.mp3")]);
        assert_eq!(config.processing, ProcessingConfig::default());
        assert!(!config.verbose);
    }

    #[test]
    fn test_negative_values_accepted() {
        let config =
            parse_args_from(["bowl-process", "-l", "-14", "-p", "-1", "a.mp3", "b.mp3"]).unwrap();
        assert_eq!(config.processing.target_loudness, -14.0);
        assert_eq!(config.processing.true_peak_ceiling, -1.0);
        assert_eq!(config.inputs.len(), 2);
    }

    #[test]
    fn test_files_required() {
        assert!(parse_args_from(["bowl-process"]).is_err());
    }

    #[test]
    fn test_non_numeric_duration_rejected() {
        assert!(parse_args_from(["bowl-process", "-d", "ten", "a.mp3"]).is_err());
    }

    #[test]
    fn test_startup_banner_does_not_panic() {
        let config = parse_args_from(["bowl-process", "-v", "a.mp3"]).unwrap();
        show_startup_info(&config);
    }
}
