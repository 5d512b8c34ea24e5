//! 单文件处理流水线与批处理
//!
//! 每个输入依次经过：检查 → 分析 → 构建滤镜 → 编码 → 复测。
//! 失败记录发生的阶段；引擎缺失是唯一会中止整个批次的错误。

use super::batch_state::{BatchStatsSnapshot, SerialBatchStats};
use super::filter_chain::build_filter_chain;
use super::ProcessingConfig;
use crate::analysis::{self, LoudnessReading};
use crate::engine::{self, AudioEngine};
use crate::error::{AudioError, AudioResult, ErrorCategory};
use crate::tools::constants::encoding::{OUTPUT_CODEC, PROCESSOR_INPUT_EXTENSION};
use crate::tools::utils;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// 文件不存在（或不是普通文件）
    NotFound,
    /// 扩展名不是 mp3
    UnsupportedExtension,
}

impl SkipReason {
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::NotFound => "未找到 / not found",
            SkipReason::UnsupportedExtension => "不是MP3 / not an MP3",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// 失败发生的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Analyze,
    Filter,
    Encode,
    Measure,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Analyze => "分析 / analyze",
            PipelineStage::Filter => "滤镜 / filter",
            PipelineStage::Encode => "编码 / encode",
            PipelineStage::Measure => "测量 / measure",
        };
        f.write_str(name)
    }
}

/// 单文件处理失败（附带阶段）
#[derive(Debug)]
pub struct StageFailure {
    pub stage: PipelineStage,
    pub error: AudioError,
}

impl StageFailure {
    fn at(stage: PipelineStage) -> impl FnOnce(AudioError) -> Self {
        move |error| Self { stage, error }
    }
}

/// 成功处理一个文件的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// 复测得到的输出时长（秒）
    pub final_duration: f64,
    /// 输出文件的响度复测值
    pub loudness: LoudnessReading,
    /// 移除的首部静音（秒）
    pub silence_removed: f64,
    /// 实际使用的滤镜链
    pub filter_chain: String,
}

/// 单个输入的最终结果
#[derive(Debug)]
pub enum FileOutcome {
    Succeeded(ProcessingResult),
    Skipped {
        input: PathBuf,
        reason: SkipReason,
    },
    Failed {
        input: PathBuf,
        stage: PipelineStage,
        error: AudioError,
    },
}

impl FileOutcome {
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Succeeded(result) => &result.input_path,
            FileOutcome::Skipped { input, .. } | FileOutcome::Failed { input, .. } => input,
        }
    }
}

/// 批处理过程中的进度事件
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// 开始处理（已通过输入检查）
    Started { input: &'a Path },
    /// 一个输入处理结束（包括跳过）
    Finished(&'a FileOutcome),
}

/// 批处理汇总
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub stats: BatchStatsSnapshot,
}

impl BatchReport {
    /// 成功结果
    pub fn succeeded(&self) -> impl Iterator<Item = &ProcessingResult> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Succeeded(result) => Some(result),
            _ => None,
        })
    }
}

/// 输入检查：存在且扩展名为 mp3（不区分大小写）
pub fn check_input(path: &Path) -> Option<SkipReason> {
    if !path.is_file() {
        return Some(SkipReason::NotFound);
    }
    match utils::extract_extension_lowercase(path) {
        Some(ext) if ext == PROCESSOR_INPUT_EXTENSION => None,
        _ => Some(SkipReason::UnsupportedExtension),
    }
}

/// 输出路径：`<输入目录>/<输出子目录>/<原文件名>`
pub fn output_path_for(input: &Path, config: &ProcessingConfig) -> AudioResult<PathBuf> {
    let file_name = input.file_name().ok_or_else(|| {
        AudioError::InvalidInput(format!("无效文件名 / invalid file name: {}", input.display()))
    })?;
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    let output = parent.join(&config.output_directory).join(file_name);

    if output == input {
        return Err(AudioError::InvalidInput(format!(
            "输出会覆盖输入 / output would overwrite input: {}",
            input.display()
        )));
    }
    Ok(output)
}

/// 处理单个已通过检查的输入
pub fn process_file(
    engine: &dyn AudioEngine,
    input: &Path,
    config: &ProcessingConfig,
) -> Result<ProcessingResult, StageFailure> {
    // 分析
    let analysis = analysis::analyze_audio(engine, input, config)
        .map_err(StageFailure::at(PipelineStage::Analyze))?;
    if analysis.effective_duration <= 0.0 {
        return Err(StageFailure {
            stage: PipelineStage::Analyze,
            error: AudioError::CalculationError(format!(
                "静音后无有效音频 / no audio after leading silence ({:.2}s of {:.2}s)",
                analysis.silence_removed(),
                analysis.total_duration
            )),
        });
    }

    // 滤镜
    let plan = build_filter_chain(&analysis, config);
    let filter_chain = plan.to_filter_string();
    tracing::debug!("{}: filter chain {}", input.display(), filter_chain);

    // 编码
    let output_path =
        output_path_for(input, config).map_err(StageFailure::at(PipelineStage::Filter))?;
    if let Some(dir) = output_path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(|e| StageFailure {
            stage: PipelineStage::Encode,
            error: AudioError::IoError(e),
        })?;
    }
    engine::encode_to_file(
        engine,
        input,
        &filter_chain,
        OUTPUT_CODEC,
        &config.bitrate,
        &output_path,
    )
    .map_err(StageFailure::at(PipelineStage::Encode))?;

    // 复测
    let final_duration = analysis::probe_duration(engine, &output_path)
        .map_err(StageFailure::at(PipelineStage::Measure))?;
    let loudness = analysis::measure_loudness(engine, &output_path)
        .map_err(StageFailure::at(PipelineStage::Measure))?;

    Ok(ProcessingResult {
        input_path: input.to_path_buf(),
        output_path,
        final_duration,
        loudness,
        silence_removed: analysis.silence_removed(),
        filter_chain,
    })
}

/// 顺序处理一批输入
///
/// 单文件错误只影响该文件；引擎缺失立即返回 `Err`。
pub fn process_batch(
    engine: &dyn AudioEngine,
    inputs: &[PathBuf],
    config: &ProcessingConfig,
    observer: &mut dyn FnMut(BatchEvent<'_>),
) -> AudioResult<BatchReport> {
    let mut stats = SerialBatchStats::new();
    let mut outcomes = Vec::with_capacity(inputs.len());

    for input in inputs {
        let display_name = utils::extract_filename_lossy(input);

        let outcome = if let Some(reason) = check_input(input) {
            stats.inc_skipped(reason, input.display().to_string());
            FileOutcome::Skipped {
                input: input.clone(),
                reason,
            }
        } else {
            observer(BatchEvent::Started { input });
            match process_file(engine, input, config) {
                Ok(result) => {
                    stats.inc_processed();
                    FileOutcome::Succeeded(result)
                }
                Err(failure) if failure.error.is_fatal() => return Err(failure.error),
                Err(StageFailure { stage, error }) => {
                    tracing::debug!("{} failed at {}: {}", display_name, stage, error);
                    stats.inc_failed(ErrorCategory::from_audio_error(&error), display_name);
                    FileOutcome::Failed {
                        input: input.clone(),
                        stage,
                        error,
                    }
                }
            }
        };

        observer(BatchEvent::Finished(&outcome));
        outcomes.push(outcome);
    }

    Ok(BatchReport {
        outcomes,
        stats: stats.snapshot(),
    })
}
