//! 工具函数模块
//!
//! 文件路径处理与按显示宽度对齐的文本工具。

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 提取小写扩展名（无扩展名返回 None）
    #[inline]
    pub fn extract_extension_lowercase(path: &Path) -> Option<String> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase())
    }

    /// 扩展名是否在允许列表中（不区分大小写）
    pub fn has_extension_in(path: &Path, allowed: &[&str]) -> bool {
        extract_extension_lowercase(path).is_some_and(|ext| allowed.contains(&ext.as_str()))
    }
}

/// 按"显示宽度"对齐的文本工具
///
/// 中日文文件名每个字符占两列，直接用 `{:<45}` 会错位。
pub mod table {
    use unicode_width::UnicodeWidthStr;

    /// 字符串的终端显示宽度
    #[inline]
    pub fn display_width(text: &str) -> usize {
        UnicodeWidthStr::width(text)
    }

    /// 左对齐到指定显示宽度（超出时原样返回）
    pub fn pad_right(text: &str, width: usize) -> String {
        let current = display_width(text);
        if current >= width {
            return text.to_string();
        }
        format!("{text}{}", " ".repeat(width - current))
    }
}

pub use path::{extract_extension_lowercase, extract_filename_lossy, has_extension_in};
