//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 默认处理配置值
pub mod defaults {
    /// 默认目标时长（秒）
    pub const TARGET_DURATION_SECONDS: f64 = 10.0;

    /// 默认淡出时长（秒）
    pub const FADE_DURATION_SECONDS: f64 = 2.0;

    /// 默认目标响度（LUFS）
    ///
    /// -16 LUFS 是移动端/流媒体播放的常用目标值
    pub const TARGET_LOUDNESS_LUFS: f64 = -16.0;

    /// 默认真峰值上限（dBTP）
    pub const TRUE_PEAK_CEILING_DBTP: f64 = -1.5;

    /// 静音检测噪声门限（dB）
    pub const SILENCE_THRESHOLD_DB: f64 = -50.0;

    /// 静音检测最小持续时间（秒）
    pub const MIN_SILENCE_DURATION_SECONDS: f64 = 0.1;

    /// 默认输出子目录名
    pub const OUTPUT_DIRECTORY: &str = "processed";

    /// 默认编码比特率
    pub const BITRATE: &str = "192k";
}

/// 处理策略常量
pub mod policy {
    /// 首部静音有效阈值（秒）
    ///
    /// 首段静音在此时长以内（含）视为噪声，不做裁切
    pub const LEADING_SILENCE_MIN_SECONDS: f64 = 0.5;

    /// loudnorm 响度范围目标（LU）
    pub const LOUDNESS_RANGE_LU: f64 = 11.0;
}

/// 编码与测量参数
pub mod encoding {
    /// 输出编码器（固定为MP3）
    pub const OUTPUT_CODEC: &str = "libmp3lame";

    /// 处理器接受的输入扩展名
    pub const PROCESSOR_INPUT_EXTENSION: &str = "mp3";

    /// 响度测量滤镜（仅测量，结果写入诊断流）
    pub const LOUDNESS_MEASUREMENT_FILTER: &str = "loudnorm=I=-16:print_format=summary";
}

/// 信息查看器版式常量
pub mod inspector {
    /// 已处理文件子目录（与处理器默认输出目录一致）
    pub const PROCESSED_SUBDIRECTORY: &str = super::defaults::OUTPUT_DIRECTORY;

    /// 文件名列宽（显示宽度）
    pub const NAME_COLUMN_WIDTH: usize = 45;

    /// 报告宽度
    pub const REPORT_WIDTH: usize = 110;

    /// 启用响度列时的报告宽度
    pub const REPORT_WIDTH_WITH_LOUDNESS: usize = 135;

    /// 报告标题
    pub const REPORT_TITLE: &str = "SINGING BOWL AUDIO FILES";
}
