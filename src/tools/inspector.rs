//! 音频文件信息查看
//!
//! 列出目录（及其 `processed/` 子目录）中的音频文件，输出时长、采样率、
//! 比特率、声道布局、可选响度与文件大小。无法读取的文件也会列出。

use super::constants::inspector::{
    PROCESSED_SUBDIRECTORY, REPORT_TITLE, REPORT_WIDTH, REPORT_WIDTH_WITH_LOUDNESS,
};
use super::formatter::{self, ListingColumns};
use super::{scanner, utils};
use crate::analysis::{self, LoudnessReading};
use crate::engine::AudioEngine;
use crate::error::{AudioResult, format_error};
use chrono::Local;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 单个可读音频文件的信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioFileInfo {
    pub name: String,
    pub duration_secs: f64,
    pub sample_rate: u64,
    pub channel_count: u64,
    pub bit_rate_kbps: u64,
    pub file_size_bytes: u64,
    pub codec_name: Option<String>,
    /// 仅在请求响度时测量
    pub loudness: Option<LoudnessReading>,
}

/// 列表中的一项；`info` 为 None 表示无法读取
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub path: PathBuf,
    pub info: Option<AudioFileInfo>,
}

/// 完整的目录检查报告
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub generated_at: String,
    pub base_dir: PathBuf,
    pub show_loudness: bool,
    pub original: Vec<ListingEntry>,
    pub processed: Vec<ListingEntry>,
}

impl InspectionReport {
    /// 文本报告宽度
    pub fn width(&self) -> usize {
        if self.show_loudness {
            REPORT_WIDTH_WITH_LOUDNESS
        } else {
            REPORT_WIDTH
        }
    }
}

/// 非致命错误降级为 None 并记录，只有引擎缺失继续向上传播
fn tolerate<T>(path: &Path, result: AudioResult<T>) -> AudioResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::warn!("{}: {}", path.display(), e);
            Ok(None)
        }
    }
}

fn unreadable(name: String, path: &Path) -> ListingEntry {
    ListingEntry {
        name,
        path: path.to_path_buf(),
        info: None,
    }
}

/// 检查单个文件
///
/// 发现的文件一定会出现在列表里：探测失败记为不可读，响度测量失败记为不可用。
pub fn inspect_file(
    engine: &dyn AudioEngine,
    path: &Path,
    show_loudness: bool,
) -> AudioResult<ListingEntry> {
    let name = utils::extract_filename_lossy(path);

    let Some(report) = tolerate(path, analysis::probe_media(engine, path))?.flatten() else {
        tracing::debug!("{}: probe returned nothing readable", path.display());
        return Ok(unreadable(name, path));
    };

    let stream = report.first_audio_stream().cloned().unwrap_or_default();
    let file_size_bytes = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            tracing::debug!("{}", format_error(&name, e));
            report.format.size.unwrap_or(0)
        }
    };

    let loudness = if show_loudness {
        Some(
            tolerate(path, analysis::measure_loudness(engine, path))?
                .unwrap_or_default(),
        )
    } else {
        None
    };

    let info = AudioFileInfo {
        name: name.clone(),
        duration_secs: report.format.duration.unwrap_or(0.0),
        sample_rate: stream.sample_rate.unwrap_or(0),
        channel_count: stream.channels.unwrap_or(0),
        bit_rate_kbps: report.format.bit_rate.unwrap_or(0) / 1000,
        file_size_bytes,
        codec_name: stream.codec_name,
        loudness,
    };

    Ok(ListingEntry {
        name,
        path: path.to_path_buf(),
        info: Some(info),
    })
}

fn inspect_all(
    engine: &dyn AudioEngine,
    files: &[PathBuf],
    show_loudness: bool,
) -> AudioResult<Vec<ListingEntry>> {
    files
        .iter()
        .map(|path| inspect_file(engine, path, show_loudness))
        .collect()
}

/// 检查目录及其 `processed/` 子目录
pub fn inspect_directory(
    engine: &dyn AudioEngine,
    base_dir: &Path,
    show_loudness: bool,
) -> AudioResult<InspectionReport> {
    let original_files = scanner::scan_audio_files(base_dir)?;
    let processed_files = scanner::scan_optional_dir(&base_dir.join(PROCESSED_SUBDIRECTORY))?;

    Ok(InspectionReport {
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        base_dir: base_dir.to_path_buf(),
        show_loudness,
        original: inspect_all(engine, &original_files, show_loudness)?,
        processed: inspect_all(engine, &processed_files, show_loudness)?,
    })
}

fn loudness_pair(info: &AudioFileInfo, show_loudness: bool) -> Option<(Option<f64>, Option<f64>)> {
    if !show_loudness {
        return None;
    }
    let reading = info.loudness.unwrap_or_default();
    Some((reading.integrated_lufs, reading.true_peak_dbtp))
}

fn render_entry(entry: &ListingEntry, indent: &str, show_loudness: bool) -> String {
    match &entry.info {
        None => format!("{indent}{}: (unable to read)", entry.name),
        Some(info) => {
            let row = formatter::format_listing_row(&ListingColumns {
                name: &info.name,
                duration_secs: info.duration_secs,
                sample_rate: info.sample_rate,
                bit_rate_kbps: info.bit_rate_kbps,
                channel_count: info.channel_count,
                loudness: loudness_pair(info, show_loudness),
                file_size_bytes: info.file_size_bytes,
            });
            format!("{indent}{row}")
        }
    }
}

/// 固定宽度文本报告（默认输出）
pub fn render_text(report: &InspectionReport) -> String {
    let width = report.width();
    let heavy = "=".repeat(width);
    let light = "-".repeat(width);
    let mut lines = vec![
        heavy.clone(),
        REPORT_TITLE.to_string(),
        heavy,
        formatter::format_listing_header(report.show_loudness),
        light.clone(),
    ];

    if !report.original.is_empty() {
        lines.push("\n[Original Files]".to_string());
        lines.extend(
            report
                .original
                .iter()
                .map(|entry| render_entry(entry, "", report.show_loudness)),
        );
    }

    if !report.processed.is_empty() {
        lines.push("\n[Processed Files]".to_string());
        lines.extend(
            report
                .processed
                .iter()
                .map(|entry| render_entry(entry, "  ", report.show_loudness)),
        );
    }

    lines.push(light);
    lines.push(format!(
        "Total: {} original, {} processed",
        report.original.len(),
        report.processed.len()
    ));

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

fn right(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).set_alignment(CellAlignment::Right)
}

/// 终端表格报告（comfy-table）
pub fn render_table(report: &InspectionReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        "Section", "File", "Duration", "Sample Rate", "Bitrate", "Ch",
    ];
    if report.show_loudness {
        header.extend(["LUFS", "Peak (dBTP)"]);
    }
    header.push("Size");
    table.set_header(header);

    let sections = [("original", &report.original), ("processed", &report.processed)];
    for (section, entries) in sections {
        for entry in entries {
            let mut row = vec![Cell::new(section), Cell::new(&entry.name)];
            match &entry.info {
                Some(info) => {
                    row.push(right(formatter::format_duration(info.duration_secs)));
                    row.push(right(format!("{} Hz", info.sample_rate)));
                    row.push(right(format!("{} kbps", info.bit_rate_kbps)));
                    row.push(Cell::new(formatter::channel_layout(info.channel_count)));
                    if let Some((lufs, peak)) = loudness_pair(info, report.show_loudness) {
                        row.push(right(formatter::format_measurement(lufs)));
                        row.push(right(formatter::format_measurement(peak)));
                    }
                    row.push(right(formatter::format_size(info.file_size_bytes)));
                }
                None => row.push(Cell::new("(unable to read)")),
            }
            table.add_row(row);
        }
    }

    format!(
        "{REPORT_TITLE}\n{}\n{table}\nTotal: {} original, {} processed\n",
        report.base_dir.display(),
        report.original.len(),
        report.processed.len()
    )
}

/// JSON 报告
pub fn render_json(report: &InspectionReport) -> AudioResult<String> {
    serde_json::to_string_pretty(report).map_err(|e| format_error("JSON", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readable(name: &str) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            path: PathBuf::from(name),
            info: Some(AudioFileInfo {
                name: name.to_string(),
                duration_secs: 12.0,
                sample_rate: 44100,
                channel_count: 2,
                bit_rate_kbps: 192,
                file_size_bytes: 288_000,
                codec_name: Some("mp3".to_string()),
                loudness: None,
            }),
        }
    }

    fn report(show_loudness: bool) -> InspectionReport {
        InspectionReport {
            generated_at: "2026-01-01 00:00:00".to_string(),
            base_dir: PathBuf::from("bowls"),
            show_loudness,
            original: vec![
                readable("a.mp3"),
                ListingEntry {
                    name: "broken.mp3".to_string(),
                    path: PathBuf::from("broken.mp3"),
                    info: None,
                },
            ],
            processed: vec![readable("a.mp3")],
        }
    }

    #[test]
    fn test_text_report_layout() {
        let text = render_text(&report(false));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(110));
        assert_eq!(lines[1], "SINGING BOWL AUDIO FILES");
        assert_eq!(lines[4], "-".repeat(110));
        assert!(text.contains("\n[Original Files]\n"));
        assert!(text.contains("broken.mp3: (unable to read)"));
        assert!(text.contains("\n[Processed Files]\n  a.mp3"));
        assert_eq!(lines.last().copied(), Some("Total: 2 original, 1 processed"));
    }

    #[test]
    fn test_text_report_wider_with_loudness() {
        let text = render_text(&report(true));
        assert!(text.starts_with(&"=".repeat(135)));
        assert!(text.contains("     - LUFS      - dBTP  "));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut empty = report(false);
        empty.original.clear();
        empty.processed.clear();
        let text = render_text(&empty);
        assert!(!text.contains("[Original Files]"));
        assert!(!text.contains("[Processed Files]"));
        assert!(text.contains("Total: 0 original, 0 processed"));
    }

    #[test]
    fn test_table_and_json_renderers() {
        let table = render_table(&report(true));
        assert!(table.contains("broken.mp3"));
        assert!(table.contains("(unable to read)"));
        assert!(table.contains("LUFS"));

        let json = render_json(&report(false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["original"].as_array().map(Vec::len), Some(2));
        assert!(value["original"][1]["info"].is_null());
        assert_eq!(value["processed"][0]["info"]["sample_rate"], 44100);
    }
}
