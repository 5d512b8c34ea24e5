//! FFmpeg子进程引擎
//!
//! 通过 `std::process::Command` 同步调用 ffmpeg / ffprobe。
//! 无超时：引擎挂起即整个运行挂起（交互式批处理工具，可由用户中断）。

use super::{AudioEngine, EngineOutput};
use crate::error::{AudioError, AudioResult};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// FFmpeg安装指南（跨平台）
pub const FFMPEG_INSTALL_GUIDE: &str = r#"
FFmpeg (ffmpeg + ffprobe) is required / 需要安装FFmpeg（ffmpeg 与 ffprobe）

Installation / 安装方法:
  macOS:   brew install ffmpeg
  Windows: https://www.gyan.dev/ffmpeg/builds/ (推荐Full版本)
           或使用: winget install Gyan.FFmpeg
  Linux:
    - Ubuntu/Debian: sudo apt install ffmpeg
    - Fedora/RHEL:   sudo dnf install ffmpeg
    - Arch:          sudo pacman -S ffmpeg

Official site / 官方网站: https://ffmpeg.org/download.html
"#;

const FFMPEG: &str = "ffmpeg";
const FFPROBE: &str = "ffprobe";

/// 基于系统 ffmpeg/ffprobe 的引擎实现
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl FfmpegEngine {
    /// 使用指定的可执行文件路径创建引擎（不做可用性检查）
    pub fn with_paths(ffmpeg_path: impl Into<PathBuf>, ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// 查找 ffmpeg 与 ffprobe，任一缺失即返回致命错误
    ///
    /// 必须在处理任何文件之前调用，保证缺失引擎时不会创建输出目录。
    pub fn discover() -> AudioResult<Self> {
        let ffmpeg_path =
            find_executable(FFMPEG).ok_or(AudioError::EngineNotFound { tool: FFMPEG })?;
        let ffprobe_path =
            find_executable(FFPROBE).ok_or(AudioError::EngineNotFound { tool: FFPROBE })?;

        tracing::debug!(
            "engine located: ffmpeg={}, ffprobe={}",
            ffmpeg_path.display(),
            ffprobe_path.display()
        );

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }

    fn run(&self, tool: &'static str, program: &Path, args: &[String]) -> AudioResult<EngineOutput> {
        tracing::debug!("running {} {}", program.display(), args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => AudioError::EngineNotFound { tool },
                _ => AudioError::ResourceError(format!(
                    "Failed to spawn {tool} / 无法启动{tool}: {e}"
                )),
            })?;

        Ok(EngineOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl AudioEngine for FfmpegEngine {
    fn transform(&self, args: &[String]) -> AudioResult<EngineOutput> {
        self.run(FFMPEG, &self.ffmpeg_path, args)
    }

    fn probe(&self, args: &[String]) -> AudioResult<EngineOutput> {
        let output = self.run(FFPROBE, &self.ffprobe_path, args)?;
        if !output.success {
            tracing::debug!(
                "ffprobe exited with {:?}: {}",
                output.exit_code,
                output.last_diagnostic_line()
            );
        }
        Ok(output)
    }
}

/// 可执行文件名（Windows 追加 .exe）
fn executable_name(tool: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{tool}.exe")
    } else {
        tool.to_string()
    }
}

/// 候选路径：PATH 中的名字优先，其次常见安装位置与本程序所在目录
fn candidate_paths(tool: &str) -> Vec<PathBuf> {
    let name = executable_name(tool);
    let mut candidates = vec![PathBuf::from(&name)];

    if cfg!(target_os = "windows") {
        candidates.push(PathBuf::from(r"C:\Program Files\ffmpeg\bin").join(&name));
        candidates.push(PathBuf::from(r"C:\ffmpeg\bin").join(&name));
    }

    // 便携部署：与可执行文件同目录
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        candidates.push(dir.join(&name));
    }

    candidates
}

/// 通过 `-version` 探测可执行文件是否真正可运行
fn find_executable(tool: &str) -> Option<PathBuf> {
    candidate_paths(tool).into_iter().find(|path| {
        Command::new(path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    })
}
