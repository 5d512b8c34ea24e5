//! 滤镜链构建
//!
//! 纯函数：由分析结果和配置得到 ffmpeg `-af` 滤镜链，顺序固定为
//! 裁切 → 时间戳归零 → 淡出 → 响度标准化。

use crate::analysis::AudioAnalysis;
use crate::processing::ProcessingConfig;
use crate::tools::constants::policy::LOUDNESS_RANGE_LU;
use std::fmt;

/// 滤镜链中的单个阶段
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStage {
    /// 裁切：`duration` 为 None 时只去掉开头
    Trim { start: f64, duration: Option<f64> },
    /// 裁切后时间戳归零
    ResetTimestamps,
    /// 线性淡出
    FadeOut { start: f64, duration: f64 },
    /// EBU R128 响度标准化
    LoudnessNormalize {
        integrated: f64,
        true_peak: f64,
        range: f64,
    },
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FilterStage::Trim {
                start,
                duration: Some(duration),
            } => write!(
                f,
                "atrim=start={}:duration={}",
                format_number(start),
                format_number(duration)
            ),
            FilterStage::Trim {
                start,
                duration: None,
            } => write!(f, "atrim=start={}", format_number(start)),
            FilterStage::ResetTimestamps => f.write_str("asetpts=PTS-STARTPTS"),
            FilterStage::FadeOut { start, duration } => write!(
                f,
                "afade=t=out:st={}:d={}",
                format_number(start),
                format_number(duration)
            ),
            FilterStage::LoudnessNormalize {
                integrated,
                true_peak,
                range,
            } => write!(
                f,
                "loudnorm=I={}:TP={}:LRA={}",
                format_number(integrated),
                format_number(true_peak),
                format_number(range)
            ),
        }
    }
}

/// 构建好的滤镜链及其预期输出时长
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    pub stages: Vec<FilterStage>,
    /// 预期输出时长（秒）
    pub final_duration: f64,
}

impl FilterPlan {
    /// 以逗号连接为 ffmpeg 滤镜字符串
    pub fn to_filter_string(&self) -> String {
        self.stages
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// 淡出阶段（总是存在）
    pub fn fade(&self) -> Option<(f64, f64)> {
        self.stages.iter().find_map(|stage| match *stage {
            FilterStage::FadeOut { start, duration } => Some((start, duration)),
            _ => None,
        })
    }
}

/// 数值转为滤镜参数：最多6位小数，去掉末尾的零
///
/// `10.0` → `10`，`1.2` → `1.2`，`-1.5` → `-1.5`
pub fn format_number(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// 由分析结果和配置构建滤镜链
pub fn build_filter_chain(analysis: &AudioAnalysis, config: &ProcessingConfig) -> FilterPlan {
    let mut stages = Vec::with_capacity(4);

    // 1. 裁切
    let trim_start = analysis.silence_removed();
    let final_duration = if analysis.effective_duration > config.target_duration {
        stages.push(FilterStage::Trim {
            start: trim_start,
            duration: Some(config.target_duration),
        });
        config.target_duration
    } else {
        if trim_start > 0.0 {
            stages.push(FilterStage::Trim {
                start: trim_start,
                duration: None,
            });
        }
        analysis.effective_duration
    };

    // 2. 时间戳归零
    stages.push(FilterStage::ResetTimestamps);

    // 3. 淡出：不超过输出时长，起点不为负
    let fade_duration = config.fade_duration.min(final_duration);
    let fade_start = (final_duration - fade_duration).max(0.0);
    stages.push(FilterStage::FadeOut {
        start: fade_start,
        duration: fade_duration,
    });

    // 4. 响度标准化
    stages.push(FilterStage::LoudnessNormalize {
        integrated: config.target_loudness,
        true_peak: config.true_peak_ceiling,
        range: LOUDNESS_RANGE_LU,
    });

    FilterPlan {
        stages,
        final_duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(1.2), "1.2");
        assert_eq!(format_number(-1.5), "-1.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(10.8 - 2.0), "8.8");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn test_long_input_with_silence() {
        let analysis = AudioAnalysis::new(12.0, Some(1.2));
        let plan = build_filter_chain(&analysis, &ProcessingConfig::default());

        assert_eq!(
            plan.to_filter_string(),
            "atrim=start=1.2:duration=10,asetpts=PTS-STARTPTS,\
             afade=t=out:st=8:d=2,loudnorm=I=-16:TP=-1.5:LRA=11"
        );
        assert_eq!(plan.final_duration, 10.0);
    }

    #[test]
    fn test_short_input_without_silence_has_no_trim() {
        let analysis = AudioAnalysis::new(6.0, None);
        let plan = build_filter_chain(&analysis, &ProcessingConfig::default());

        assert_eq!(
            plan.to_filter_string(),
            "asetpts=PTS-STARTPTS,afade=t=out:st=4:d=2,loudnorm=I=-16:TP=-1.5:LRA=11"
        );
        assert_eq!(plan.final_duration, 6.0);
    }

    #[test]
    fn test_short_input_with_silence_trims_start_only() {
        let analysis = AudioAnalysis::new(8.0, Some(2.0));
        let plan = build_filter_chain(&analysis, &ProcessingConfig::default());

        assert_eq!(
            plan.stages[0],
            FilterStage::Trim {
                start: 2.0,
                duration: None
            }
        );
        assert_eq!(plan.stages[0].to_string(), "atrim=start=2");
        assert_eq!(plan.final_duration, 6.0);
    }

    #[test]
    fn test_fade_never_exceeds_output() {
        let config = ProcessingConfig {
            fade_duration: 5.0,
            ..Default::default()
        };
        let analysis = AudioAnalysis::new(1.5, None);
        let plan = build_filter_chain(&analysis, &config);

        let (start, duration) = plan.fade().unwrap();
        assert_eq!(start, 0.0);
        assert_eq!(duration, 1.5);
        assert!(start + duration <= plan.final_duration + 1e-9);
    }

    #[test]
    fn test_stage_order_is_fixed() {
        let analysis = AudioAnalysis::new(30.0, Some(0.8));
        let config = ProcessingConfig {
            target_duration: 15.0,
            fade_duration: 3.0,
            target_loudness: -14.0,
            true_peak_ceiling: -1.0,
            ..Default::default()
        };
        let plan = build_filter_chain(&analysis, &config);

        let names: Vec<String> = plan
            .stages
            .iter()
            .map(|s| s.to_string().split('=').next().unwrap_or("").to_string())
            .collect();
        assert_eq!(names, ["atrim", "asetpts", "afade", "loudnorm"]);
        assert_eq!(plan.stages[2].to_string(), "afade=t=out:st=12:d=3");
        assert_eq!(plan.stages[3].to_string(), "loudnorm=I=-14:TP=-1:LRA=11");
    }
}
