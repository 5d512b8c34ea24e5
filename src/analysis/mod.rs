//! 音频分析模块
//!
//! 全部测量委托给外部引擎，本模块负责组织调用并解析结果。

pub mod loudness;
pub mod probe;
pub mod silence;

pub use loudness::{LoudnessReading, measure_loudness};
pub use probe::{ProbeReport, StreamInfo, probe_duration, probe_media};
pub use silence::detect_leading_silence;

use crate::engine::AudioEngine;
use crate::error::AudioResult;
use crate::processing::ProcessingConfig;
use std::path::Path;

/// 单个输入文件的分析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioAnalysis {
    /// 原始总时长（秒）
    pub total_duration: f64,
    /// 首部静音结束时间（仅超过 0.5 秒时存在）
    pub leading_silence_end: Option<f64>,
    /// 去除首部静音后的时长
    pub effective_duration: f64,
}

impl AudioAnalysis {
    pub fn new(total_duration: f64, leading_silence_end: Option<f64>) -> Self {
        let effective_duration = match leading_silence_end {
            Some(end) => total_duration - end,
            None => total_duration,
        };
        Self {
            total_duration,
            leading_silence_end,
            effective_duration,
        }
    }

    /// 被移除的首部静音时长（秒）
    #[inline]
    pub fn silence_removed(&self) -> f64 {
        self.leading_silence_end.unwrap_or(0.0)
    }
}

/// 探测时长并检测首部静音
pub fn analyze_audio(
    engine: &dyn AudioEngine,
    path: &Path,
    config: &ProcessingConfig,
) -> AudioResult<AudioAnalysis> {
    let total_duration = probe_duration(engine, path)?;
    let silence_end = detect_leading_silence(
        engine,
        path,
        config.silence_threshold_db,
        config.min_silence_duration,
    )?;

    let analysis = AudioAnalysis::new(total_duration, silence_end);
    tracing::debug!("{}: {:?}", path.display(), analysis);
    Ok(analysis)
}
