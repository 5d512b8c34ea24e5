//! 首部静音检测
//!
//! 使用 ffmpeg `silencedetect` 滤镜，只关心诊断流中第一个 `silence_end`。

use crate::engine::{self, AudioEngine};
use crate::error::AudioResult;
use crate::processing::filter_chain::format_number;
use crate::tools::constants::policy::LEADING_SILENCE_MIN_SECONDS;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static SILENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"silence_end: ([\d.]+)").expect("silence_end pattern is valid")
});

/// 构造 silencedetect 滤镜字符串
pub fn silence_filter(threshold_db: f64, min_duration: f64) -> String {
    format!(
        "silencedetect=noise={}dB:d={}",
        format_number(threshold_db),
        format_number(min_duration)
    )
}

/// 取诊断文本中第一个 `silence_end` 的值
///
/// 后续的静音段（曲中停顿）不参与首部裁切，直接忽略。
pub fn parse_first_silence_end(text: &str) -> Option<f64> {
    SILENCE_END
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// 首部静音策略：不超过 0.5 秒的静音视为可忽略
pub fn significant_leading_silence(silence_end: Option<f64>) -> Option<f64> {
    silence_end.filter(|end| *end > LEADING_SILENCE_MIN_SECONDS)
}

/// 检测首部静音结束时间（秒）
pub fn detect_leading_silence(
    engine: &dyn AudioEngine,
    path: &Path,
    threshold_db: f64,
    min_duration: f64,
) -> AudioResult<Option<f64>> {
    let filter = silence_filter(threshold_db, min_duration);
    let diagnostics = engine::capture_diagnostics(engine, path, &filter)?;

    let first = parse_first_silence_end(&diagnostics);
    let significant = significant_leading_silence(first);
    if first.is_some() && significant.is_none() {
        tracing::debug!(
            "{}: leading silence {:?}s below threshold, ignored",
            path.display(),
            first
        );
    }
    Ok(significant)
}
