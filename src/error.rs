//! 统一错误处理框架
//!
//! 引擎缺失是唯一的致命错误，其余错误只影响单个文件；缺失的测量值用 `None` 表示。

use std::io;
use thiserror::Error;

/// 音频处理相关的统一错误类型
#[derive(Debug, Error)]
pub enum AudioError {
    /// 输入验证错误（参数、配置、输出路径）
    #[error("输入验证失败 / Invalid input: {0}")]
    InvalidInput(String),

    /// 文件I/O错误
    #[error("文件I/O错误 / I/O error: {0}")]
    IoError(#[from] io::Error),

    /// 音频格式错误（探测结果缺少必要字段等）
    #[error("音频格式错误 / Format error: {0}")]
    FormatError(String),

    /// ffprobe 无法读取文件
    #[error("元数据探测失败 / Probe failed: {0}")]
    ProbeError(String),

    /// ffmpeg 执行失败（非零退出）
    #[error("音频引擎执行失败 / Engine failed: {0}")]
    EngineError(String),

    /// 外部引擎不存在 - 致命错误，整个运行立即终止
    #[error("未找到 {tool}，请先安装 / {tool} not found, please install it")]
    EngineNotFound { tool: &'static str },

    /// 计算异常（例如裁切后无有效音频）
    #[error("计算异常 / Calculation error: {0}")]
    CalculationError(String),

    /// 资源访问错误（子进程无法启动等）
    #[error("资源访问错误 / Resource error: {0}")]
    ResourceError(String),
}

impl AudioError {
    /// 是否为致命错误（批处理必须立即停止）
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, AudioError::EngineNotFound { .. })
    }
}

/// 音频处理操作的标准Result类型
pub type AudioResult<T> = Result<T, AudioError>;

// ==================== 错误转换Helper函数 ====================

/// 创建格式错误的helper函数
#[inline]
pub fn format_error<E: std::fmt::Display>(context: &str, err: E) -> AudioError {
    AudioError::FormatError(format!("{context}: {err}"))
}

/// 创建引擎错误的helper函数
#[inline]
pub fn engine_error<E: std::fmt::Display>(context: &str, err: E) -> AudioError {
    AudioError::EngineError(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================
// 用于批量处理中的错误统计

/// 错误类别枚举（用于批量处理统计）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ErrorCategory {
    /// 格式相关错误
    Format,
    /// 元数据探测失败
    Probe,
    /// 引擎执行失败
    Engine,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
    /// 计算相关错误
    Calculation,
    /// 其他未分类错误
    Other,
}

impl ErrorCategory {
    /// 从AudioError提取错误类别
    pub fn from_audio_error(e: &AudioError) -> Self {
        match e {
            AudioError::FormatError(_) => Self::Format,
            AudioError::ProbeError(_) => Self::Probe,
            AudioError::EngineError(_) | AudioError::EngineNotFound { .. } => Self::Engine,
            AudioError::IoError(_) => Self::Io,
            AudioError::CalculationError(_) => Self::Calculation,
            AudioError::InvalidInput(_) | AudioError::ResourceError(_) => Self::Other,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Format => "格式错误 / Format",
            Self::Probe => "探测失败 / Probe",
            Self::Engine => "引擎错误 / Engine",
            Self::Io => "I/O错误 / I/O",
            Self::Calculation => "计算错误 / Calculation",
            Self::Other => "其他错误 / Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_engine_is_fatal() {
        assert!(AudioError::EngineNotFound { tool: "ffmpeg" }.is_fatal());
        assert!(!AudioError::EngineError("exit 1".to_string()).is_fatal());
        assert!(!AudioError::ProbeError("bowl.mp3".to_string()).is_fatal());
        assert!(!AudioError::IoError(io::Error::other("disk")).is_fatal());
    }

    #[test]
    fn test_error_category_mapping() {
        let cases = [
            (AudioError::FormatError("x".into()), ErrorCategory::Format),
            (AudioError::ProbeError("x".into()), ErrorCategory::Probe),
            (AudioError::EngineError("x".into()), ErrorCategory::Engine),
            (AudioError::CalculationError("x".into()), ErrorCategory::Calculation),
            (AudioError::InvalidInput("x".into()), ErrorCategory::Other),
            (
                AudioError::IoError(io::Error::new(io::ErrorKind::NotFound, "x")),
                ErrorCategory::Io,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(ErrorCategory::from_audio_error(&error), expected);
        }
    }

    #[test]
    fn test_engine_not_found_message_names_tool() {
        let message = AudioError::EngineNotFound { tool: "ffprobe" }.to_string();
        assert!(message.contains("ffprobe"));
    }
}
