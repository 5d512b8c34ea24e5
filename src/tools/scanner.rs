//! 文件扫描模块
//!
//! 扫描目录中的音频文件（不递归），按文件名排序。

use super::utils;
use crate::{AudioError, AudioResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 信息查看器支持的音频格式扩展名
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "flac"];

/// 扩展名是否受支持（不区分大小写）
#[inline]
pub fn is_supported_extension(path: &Path) -> bool {
    utils::has_extension_in(path, SUPPORTED_EXTENSIONS)
}

/// 扫描目录中的音频文件
///
/// 只看目录本身这一层；子目录（包括输出目录）不参与。
pub fn scan_audio_files(dir_path: &Path) -> AudioResult<Vec<PathBuf>> {
    if !dir_path.exists() {
        return Err(AudioError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("目录不存在 / directory not found: {}", dir_path.display()),
        )));
    }

    if !dir_path.is_dir() {
        return Err(AudioError::InvalidInput(format!(
            "路径不是目录 / not a directory: {}",
            dir_path.display()
        )));
    }

    let mut audio_files = Vec::new();
    for entry in WalkDir::new(dir_path).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            AudioError::IoError(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;

        let path = entry.path();
        if path.is_file() && is_supported_extension(path) {
            audio_files.push(path.to_path_buf());
        }
    }

    // 按文件名排序
    audio_files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(audio_files)
}

/// 扫描可选目录：不存在时返回空列表
pub fn scan_optional_dir(dir_path: &Path) -> AudioResult<Vec<PathBuf>> {
    if dir_path.is_dir() {
        scan_audio_files(dir_path)
    } else {
        Ok(Vec::new())
    }
}
