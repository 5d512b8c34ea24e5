//! 处理器模块
//!
//! 配置、滤镜链构建、单文件流水线与批处理统计。

pub mod batch_state;
pub mod config;
pub mod filter_chain;
pub mod pipeline;

pub use batch_state::{BatchStatsSnapshot, SerialBatchStats};
pub use config::ProcessingConfig;
pub use filter_chain::{FilterPlan, FilterStage, build_filter_chain};
pub use pipeline::{
    BatchEvent, BatchReport, FileOutcome, PipelineStage, ProcessingResult, SkipReason,
    StageFailure, check_input, output_path_for, process_batch, process_file,
};
