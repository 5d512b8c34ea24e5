//! 处理配置
//!
//! 由命令行参数构造一次，之后以不可变引用传给每个阶段。

use crate::error::{AudioError, AudioResult};
use crate::tools::constants::defaults;

/// 处理器配置
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingConfig {
    /// 目标时长（秒）
    pub target_duration: f64,
    /// 淡出时长（秒）
    pub fade_duration: f64,
    /// 目标积分响度（LUFS）
    pub target_loudness: f64,
    /// 真峰值上限（dBTP）
    pub true_peak_ceiling: f64,
    /// 静音检测门限（dB）
    pub silence_threshold_db: f64,
    /// 静音检测最小时长（秒）
    pub min_silence_duration: f64,
    /// 输出子目录名（相对每个输入文件所在目录）
    pub output_directory: String,
    /// 编码比特率（如 "192k"）
    pub bitrate: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            target_duration: defaults::TARGET_DURATION_SECONDS,
            fade_duration: defaults::FADE_DURATION_SECONDS,
            target_loudness: defaults::TARGET_LOUDNESS_LUFS,
            true_peak_ceiling: defaults::TRUE_PEAK_CEILING_DBTP,
            silence_threshold_db: defaults::SILENCE_THRESHOLD_DB,
            min_silence_duration: defaults::MIN_SILENCE_DURATION_SECONDS,
            output_directory: defaults::OUTPUT_DIRECTORY.to_string(),
            bitrate: defaults::BITRATE.to_string(),
        }
    }
}

impl ProcessingConfig {
    /// 校验配置
    ///
    /// 输出目录必须是单一路径段，输出文件因此永远不会覆盖输入文件。
    pub fn validate(&self) -> AudioResult<()> {
        if !self.target_duration.is_finite() || self.target_duration <= 0.0 {
            return Err(AudioError::InvalidInput(format!(
                "目标时长必须为正数 / target duration must be positive: {}",
                self.target_duration
            )));
        }

        if !self.fade_duration.is_finite() || self.fade_duration < 0.0 {
            return Err(AudioError::InvalidInput(format!(
                "淡出时长不能为负 / fade duration must not be negative: {}",
                self.fade_duration
            )));
        }

        if !self.min_silence_duration.is_finite() || self.min_silence_duration <= 0.0 {
            return Err(AudioError::InvalidInput(format!(
                "最小静音时长必须为正数 / minimum silence duration must be positive: {}",
                self.min_silence_duration
            )));
        }

        for (name, value) in [
            ("target loudness", self.target_loudness),
            ("true peak ceiling", self.true_peak_ceiling),
            ("silence threshold", self.silence_threshold_db),
        ] {
            if !value.is_finite() {
                return Err(AudioError::InvalidInput(format!(
                    "数值无效 / invalid {name}: {value}"
                )));
            }
        }

        if self.bitrate.trim().is_empty() {
            return Err(AudioError::InvalidInput(
                "比特率不能为空 / bitrate must not be empty".to_string(),
            ));
        }

        let dir = self.output_directory.as_str();
        if dir.is_empty() || dir == "." || dir == ".." || dir.contains(['/', '\\']) {
            return Err(AudioError::InvalidInput(format!(
                "输出目录必须是单一目录名 / output directory must be a single directory name: {dir:?}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ProcessingConfig::default();
        assert_eq!(config.target_duration, 10.0);
        assert_eq!(config.fade_duration, 2.0);
        assert_eq!(config.target_loudness, -16.0);
        assert_eq!(config.true_peak_ceiling, -1.5);
        assert_eq!(config.silence_threshold_db, -50.0);
        assert_eq!(config.min_silence_duration, 0.1);
        assert_eq!(config.output_directory, "processed");
        assert_eq!(config.bitrate, "192k");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_durations() {
        for target in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = ProcessingConfig {
                target_duration: target,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "target {target} accepted");
        }

        let config = ProcessingConfig {
            fade_duration: -0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ProcessingConfig {
            fade_duration: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unsafe_output_directory() {
        for dir in ["", ".", "..", "out/nested", "..\\up"] {
            let config = ProcessingConfig {
                output_directory: dir.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "directory {dir:?} accepted");
        }
    }

    #[test]
    fn test_rejects_empty_bitrate() {
        let config = ProcessingConfig {
            bitrate: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
