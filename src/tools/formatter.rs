//! 输出格式化模块
//!
//! 处理器结果行、信息查看器的固定宽度列，以及批处理统计摘要。

use super::constants::inspector::NAME_COLUMN_WIDTH;
use super::utils::table;
use crate::processing::{BatchStatsSnapshot, ProcessingResult};

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// 时长格式化为 `m:ss.ss`
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0).floor();
    let secs = seconds - mins * 60.0;
    format!("{}:{:05.2}", mins as u64, secs)
}

/// 文件大小：≥ 1 MiB 显示 `x.y MB`，否则 `n KB`
pub fn format_size(bytes: u64) -> String {
    if bytes >= BYTES_PER_MIB {
        format!("{:.1} MB", bytes as f64 / BYTES_PER_MIB as f64)
    } else {
        format!("{:.0} KB", bytes as f64 / 1024.0)
    }
}

/// 声道布局名称
pub fn channel_layout(channels: u64) -> String {
    match channels {
        1 => "mono".to_string(),
        2 => "stereo".to_string(),
        n => format!("{n}ch"),
    }
}

/// 测量值保留一位小数，不可用时为 `-`
pub fn format_measurement(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

/// 处理器单文件结果行
///
/// `  → 10.0s | -16.0 LUFS | -1.5 dBTP, 1.2s silence removed`
pub fn format_result_line(result: &ProcessingResult) -> String {
    let mut line = format!(
        "  → {:.1}s | {} LUFS | {} dBTP",
        result.final_duration,
        format_measurement(result.loudness.integrated_lufs),
        format_measurement(result.loudness.true_peak_dbtp)
    );
    if result.silence_removed > 0.0 {
        line.push_str(&format!(", {:.1}s silence removed", result.silence_removed));
    }
    line
}

/// 信息查看器的表头行
pub fn format_listing_header(show_loudness: bool) -> String {
    let loudness = if show_loudness { "    LUFS     Peak  " } else { "" };
    format!(
        "{} {:>8}  {:>8}  {:>8}  {:<6}  {loudness}{:>8}",
        table::pad_right("File", NAME_COLUMN_WIDTH),
        "Duration",
        "Sample",
        "Rate",
        "Ch",
        "Size"
    )
}

/// 信息查看器的数据行各列
pub struct ListingColumns<'a> {
    pub name: &'a str,
    pub duration_secs: f64,
    pub sample_rate: u64,
    pub bit_rate_kbps: u64,
    pub channel_count: u64,
    /// 只有启用响度列时才为 Some
    pub loudness: Option<(Option<f64>, Option<f64>)>,
    pub file_size_bytes: u64,
}

/// 信息查看器的一行
pub fn format_listing_row(columns: &ListingColumns<'_>) -> String {
    let loudness = match columns.loudness {
        Some((lufs, peak)) => format!(
            "{:>6} LUFS  {:>5} dBTP  ",
            format_measurement(lufs),
            format_measurement(peak)
        ),
        None => String::new(),
    };

    format!(
        "{} {:>8}  {:>5} Hz  {:>3} kbps  {:<6}  {loudness}{:>8}",
        table::pad_right(columns.name, NAME_COLUMN_WIDTH),
        format_duration(columns.duration_secs),
        columns.sample_rate,
        columns.bit_rate_kbps,
        channel_layout(columns.channel_count),
        format_size(columns.file_size_bytes)
    )
}

/// 完成行：`3 file(s) processed → processed/`，没有成功文件时为 None
pub fn format_processed_line(stats: &BatchStatsSnapshot, output_directory: &str) -> Option<String> {
    (stats.processed > 0)
        .then(|| format!("{} file(s) processed → {output_directory}/", stats.processed))
}

/// 批处理统计摘要（失败按类别、跳过按原因）
pub fn format_batch_summary(stats: &BatchStatsSnapshot) -> String {
    let mut output = String::new();

    if stats.failed > 0 {
        output.push_str(&format!("处理失败 / Failed: {}\n", stats.failed));
        for (category, files) in &stats.error_stats {
            output.push_str(&format!("   {}: {}\n", category.display_name(), files.join(", ")));
        }
    }

    if stats.skipped > 0 {
        output.push_str(&format!("已跳过 / Skipped: {}\n", stats.skipped));
        for (reason, files) in &stats.skip_stats {
            output.push_str(&format!("   {}: {}\n", reason.description(), files.join(", ")));
        }
    }

    output
}
