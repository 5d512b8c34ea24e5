//! 外部音频引擎调用层
//!
//! 所有信号处理（静音检测、响度测量、淡出、编码）都交给 ffmpeg/ffprobe。
//! 本模块只定义一个窄接口 [`AudioEngine`]，两种调用形态：
//! - `transform`：驱动 ffmpeg（写文件，或以 null 输出只采集诊断流）
//! - `probe`：驱动 ffprobe，输出结构化 JSON
//!
//! 测试中可以用脚本化的假引擎替换，不启动任何真实进程。

pub mod ffmpeg;

use crate::error::{AudioResult, engine_error};
use std::path::Path;

pub use ffmpeg::FfmpegEngine;

/// 需要采集的输出流
///
/// 部分测量滤镜（silencedetect、loudnorm）把结果写到诊断流（stderr）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStream {
    Stdout,
    Stderr,
}

/// 一次引擎调用的完整输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// 进程是否以零状态退出
    pub success: bool,
    /// 退出码（被信号终止时为 None）
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl EngineOutput {
    /// 成功输出（测试与假引擎常用）
    pub fn ok(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// 失败输出
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// 按需取出某个输出流的文本
    pub fn captured(&self, stream: CaptureStream) -> &str {
        match stream {
            CaptureStream::Stdout => &self.stdout,
            CaptureStream::Stderr => &self.stderr,
        }
    }

    /// 诊断流最后一行非空文本（用于简短错误描述）
    pub fn last_diagnostic_line(&self) -> &str {
        self.stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// 外部音频引擎接口
///
/// 实现必须同步阻塞执行；引擎不存在时返回 [`crate::error::AudioError::EngineNotFound`]。
pub trait AudioEngine {
    /// 以给定参数运行转换/滤镜引擎（ffmpeg）
    fn transform(&self, args: &[String]) -> AudioResult<EngineOutput>;

    /// 以给定参数运行探测引擎（ffprobe）
    fn probe(&self, args: &[String]) -> AudioResult<EngineOutput>;
}

/// 路径转为命令行参数（非UTF-8路径做有损转换）
#[inline]
fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// 转换模式：应用滤镜链并写出编码后的文件
pub fn encode_to_file(
    engine: &dyn AudioEngine,
    input: &Path,
    filter_chain: &str,
    codec: &str,
    bitrate: &str,
    output: &Path,
) -> AudioResult<()> {
    let args = vec![
        "-y".to_string(),
        "-i".to_string(),
        path_arg(input),
        "-af".to_string(),
        filter_chain.to_string(),
        "-c:a".to_string(),
        codec.to_string(),
        "-b:a".to_string(),
        bitrate.to_string(),
        path_arg(output),
    ];

    let result = engine.transform(&args)?;
    if !result.success {
        return Err(engine_error(
            &format!("ffmpeg exit {:?}", result.exit_code),
            result.last_diagnostic_line(),
        ));
    }
    Ok(())
}

/// 诊断采集模式：应用滤镜并丢弃音频输出，只返回诊断流文本
///
/// 不检查退出状态，测量解析器自行降级为"未知"。
pub fn capture_diagnostics(
    engine: &dyn AudioEngine,
    input: &Path,
    filter: &str,
) -> AudioResult<String> {
    let args = vec![
        "-i".to_string(),
        path_arg(input),
        "-af".to_string(),
        filter.to_string(),
        "-f".to_string(),
        "null".to_string(),
        "-".to_string(),
    ];

    let result = engine.transform(&args)?;
    if !result.success {
        tracing::debug!(
            "diagnostic run for {} exited with {:?}",
            input.display(),
            result.exit_code
        );
    }
    Ok(result.stderr)
}

/// 探测模式：以 JSON 输出容器与流元数据
pub fn probe_json(engine: &dyn AudioEngine, input: &Path) -> AudioResult<EngineOutput> {
    let args = vec![
        "-v".to_string(),
        "quiet".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_format".to_string(),
        "-show_streams".to_string(),
        path_arg(input),
    ];
    engine.probe(&args)
}
