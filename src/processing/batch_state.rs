//! 批处理状态统计
//!
//! 串行处理，只需普通计数器。失败按错误类别归档，跳过按原因归档。

use crate::error::ErrorCategory;
use std::collections::BTreeMap;

use super::pipeline::SkipReason;

/// 批处理统计快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStatsSnapshot {
    /// 成功处理的文件数
    pub processed: usize,
    /// 跳过的文件数
    pub skipped: usize,
    /// 失败的文件数
    pub failed: usize,
    /// 错误分类统计（错误类型 -> 失败文件列表）
    pub error_stats: BTreeMap<ErrorCategory, Vec<String>>,
    /// 跳过原因统计
    pub skip_stats: BTreeMap<SkipReason, Vec<String>>,
}

impl BatchStatsSnapshot {
    /// 输入总数
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }
}

/// 串行批处理统计
#[derive(Debug, Default)]
pub struct SerialBatchStats {
    processed: usize,
    skipped: usize,
    failed: usize,
    error_stats: BTreeMap<ErrorCategory, Vec<String>>,
    skip_stats: BTreeMap<SkipReason, Vec<String>>,
}

impl SerialBatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 增加成功处理计数
    #[inline]
    pub fn inc_processed(&mut self) -> usize {
        self.processed += 1;
        self.processed
    }

    /// 增加跳过计数并记录原因
    #[inline]
    pub fn inc_skipped(&mut self, reason: SkipReason, filename: String) -> usize {
        self.skipped += 1;
        self.skip_stats.entry(reason).or_default().push(filename);
        self.skipped
    }

    /// 增加失败计数并记录错误分类
    #[inline]
    pub fn inc_failed(&mut self, category: ErrorCategory, filename: String) -> usize {
        self.failed += 1;
        self.error_stats.entry(category).or_default().push(filename);
        self.failed
    }

    /// 获取统计快照
    pub fn snapshot(&self) -> BatchStatsSnapshot {
        BatchStatsSnapshot {
            processed: self.processed,
            skipped: self.skipped,
            failed: self.failed,
            error_stats: self.error_stats.clone(),
            skip_stats: self.skip_stats.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AudioError;

    #[test]
    fn test_serial_stats_counts() {
        let mut stats = SerialBatchStats::new();
        assert_eq!(stats.snapshot().total(), 0);

        assert_eq!(stats.inc_processed(), 1);
        assert_eq!(
            stats.inc_skipped(SkipReason::UnsupportedExtension, "notes.wav".to_string()),
            1
        );

        let category = ErrorCategory::from_audio_error(&AudioError::EngineError("exit 1".into()));
        assert_eq!(stats.inc_failed(category, "broken.mp3".to_string()), 1);
        assert_eq!(stats.inc_failed(category, "broken2.mp3".to_string()), 2);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.processed, 1);
        assert_eq!(snapshot.skipped, 1);
        assert_eq!(snapshot.failed, 2);
        assert_eq!(snapshot.total(), 4);
        assert_eq!(snapshot.error_stats[&ErrorCategory::Engine].len(), 2);
        assert_eq!(
            snapshot.skip_stats[&SkipReason::UnsupportedExtension],
            vec!["notes.wav".to_string()]
        );
    }
}
