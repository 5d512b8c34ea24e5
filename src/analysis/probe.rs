//! 元数据探测（ffprobe JSON）
//!
//! ffprobe 习惯把数字写成字符串（`"duration": "12.000000"`），
//! 这里的反序列化对两种写法都宽容。

use crate::engine::{self, AudioEngine, CaptureStream};
use crate::error::{AudioError, AudioResult, format_error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

/// ffprobe `-show_format -show_streams` 输出
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub format: FormatInfo,
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
}

/// 容器级信息
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatInfo {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bit_rate: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
}

/// 单个流信息
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamInfo {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub sample_rate: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub channels: Option<u64>,
}

impl ProbeReport {
    /// 从 ffprobe 的 JSON 文本解析
    pub fn from_json(text: &str) -> AudioResult<Self> {
        serde_json::from_str(text).map_err(|e| format_error("ffprobe JSON", e))
    }

    /// 第一条音频流（没有则为 None）
    pub fn first_audio_stream(&self) -> Option<&StreamInfo> {
        self.streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("audio"))
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }))
}

/// 探测媒体文件
///
/// 文件不可读（ffprobe 非零退出或 JSON 无法解析）返回 `Ok(None)`；
/// 只有引擎缺失这类致命错误才返回 `Err`。
pub fn probe_media(engine: &dyn AudioEngine, path: &Path) -> AudioResult<Option<ProbeReport>> {
    let output = engine::probe_json(engine, path)?;
    if !output.success {
        return Ok(None);
    }

    match ProbeReport::from_json(output.captured(CaptureStream::Stdout)) {
        Ok(report) => Ok(Some(report)),
        Err(e) => {
            tracing::debug!("{}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// 读取容器时长（秒），处理器使用
pub fn probe_duration(engine: &dyn AudioEngine, path: &Path) -> AudioResult<f64> {
    let report = probe_media(engine, path)?.ok_or_else(|| {
        AudioError::ProbeError(format!("无法读取 / unable to read: {}", path.display()))
    })?;

    report.format.duration.ok_or_else(|| {
        format_error(
            &path.display().to_string(),
            "缺少时长信息 / missing duration",
        )
    })
}
