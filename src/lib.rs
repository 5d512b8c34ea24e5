//! 颂钵音频批处理工具集
//!
//! 两个命令行工具共享的库：
//! - `bowl-process`：去除首部静音、截断到目标时长、淡出、响度标准化
//! - `bowl-info`：列出目录中音频文件的时长、采样率、比特率、声道与响度
//!
//! 所有信号处理都委托给外部 ffmpeg/ffprobe，本库负责构建滤镜链、
//! 解析引擎输出并格式化结果。

pub mod analysis;
pub mod engine;
pub mod error;
pub mod logging;
pub mod processing;
pub mod tools;

// 重新导出核心类型
pub use analysis::{AudioAnalysis, LoudnessReading};
pub use engine::{AudioEngine, EngineOutput, FfmpegEngine};
pub use error::{AudioError, AudioResult, ErrorCategory};
pub use processing::{FileOutcome, ProcessingConfig, ProcessingResult};
