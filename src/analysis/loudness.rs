//! 响度测量（EBU R128 积分响度与真峰值）
//!
//! 测量本身由 ffmpeg `loudnorm` 完成（`print_format=summary`），
//! 这里只解析诊断流中的摘要文本。

use crate::engine::{self, AudioEngine};
use crate::error::AudioResult;
use crate::tools::constants::encoding::LOUDNESS_MEASUREMENT_FILTER;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

static INPUT_INTEGRATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Input Integrated:\s+([-\d.]+)").expect("integrated pattern is valid")
});

static INPUT_TRUE_PEAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Input True Peak:\s+([-\d.]+)").expect("true peak pattern is valid")
});

/// 一次响度测量的结果
///
/// 任一值缺失（解析失败、`-inf`）都用 `None` 表示，显示为 `-`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoudnessReading {
    pub integrated_lufs: Option<f64>,
    pub true_peak_dbtp: Option<f64>,
}

impl LoudnessReading {
    /// 从 loudnorm 摘要文本解析
    pub fn from_summary(text: &str) -> Self {
        Self {
            integrated_lufs: parse_integrated_loudness(text),
            true_peak_dbtp: parse_true_peak(text),
        }
    }

    /// 两个值都不可用
    pub fn is_unavailable(&self) -> bool {
        self.integrated_lufs.is_none() && self.true_peak_dbtp.is_none()
    }
}

fn capture_number(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// 解析 `Input Integrated:` 行（LUFS）
pub fn parse_integrated_loudness(text: &str) -> Option<f64> {
    capture_number(&INPUT_INTEGRATED, text)
}

/// 解析 `Input True Peak:` 行（dBTP）
pub fn parse_true_peak(text: &str) -> Option<f64> {
    capture_number(&INPUT_TRUE_PEAK, text)
}

/// 测量文件响度
pub fn measure_loudness(engine: &dyn AudioEngine, path: &Path) -> AudioResult<LoudnessReading> {
    let diagnostics = engine::capture_diagnostics(engine, path, LOUDNESS_MEASUREMENT_FILTER)?;
    let reading = LoudnessReading::from_summary(&diagnostics);
    if reading.is_unavailable() {
        tracing::debug!("{}: loudness summary not found", path.display());
    }
    Ok(reading)
}
