//! 集成测试共享的脚本化引擎
//!
//! 按参数模式应答，不启动任何真实进程：
//! - 探测：按路径返回预置的 ffprobe JSON（编码写出的文件按滤镜链推算时长）
//! - silencedetect：返回预置的诊断文本
//! - loudnorm 测量：返回预置摘要（默认 -16.0 LUFS / -1.5 dBTP）
//! - 编码：写出输出文件

#![allow(dead_code)]

use bowl_audio_tools::engine::{AudioEngine, EngineOutput};
use bowl_audio_tools::error::{AudioError, AudioResult};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

pub const DEFAULT_SUMMARY: &str = "Input Integrated:    -16.0 LUFS\n\
                                   Input True Peak:      -1.5 dBTP\n\
                                   Input LRA:             4.0 LU\n";

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// 生成 ffprobe 风格的 JSON（数字写成字符串）
pub fn probe_json(duration: f64, sample_rate: u32, channels: u32, bit_rate: u64) -> String {
    format!(
        r#"{{"streams":[{{"index":0,"codec_name":"mp3","codec_type":"audio","sample_rate":"{sample_rate}","channels":{channels}}}],
            "format":{{"duration":"{duration:.6}","bit_rate":"{bit_rate}"}}}}"#
    )
}

/// 生成 silencedetect 诊断文本
pub fn silence_log(silence_end: f64) -> String {
    format!(
        "[silencedetect @ 0x55] silence_start: 0\n\
         [silencedetect @ 0x55] silence_end: {silence_end} | silence_duration: {silence_end}\n\
         size=N/A time=00:00:12.00 bitrate=N/A speed= 500x\n"
    )
}

#[derive(Default)]
pub struct FakeEngine {
    missing: bool,
    probes: RefCell<HashMap<String, String>>,
    silence: HashMap<String, String>,
    loudness: HashMap<String, String>,
    failing_encodes: HashSet<String>,
    spawn_failures: HashSet<(&'static str, String)>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟未安装 ffmpeg/ffprobe
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    /// 可读输入：时长与可选的首部静音
    pub fn with_input(self, path: &Path, duration: f64, silence_end: Option<f64>) -> Self {
        self.probes
            .borrow_mut()
            .insert(key(path), probe_json(duration, 44100, 2, 192_000));
        let mut engine = self;
        if let Some(end) = silence_end {
            engine.silence.insert(key(path), silence_log(end));
        }
        engine
    }

    /// 自定义探测 JSON
    pub fn with_probe(self, path: &Path, json: &str) -> Self {
        self.probes.borrow_mut().insert(key(path), json.to_string());
        self
    }

    /// 自定义响度摘要
    pub fn with_loudness(mut self, path: &Path, summary: &str) -> Self {
        self.loudness.insert(key(path), summary.to_string());
        self
    }

    /// 编码该输入时 ffmpeg 返回非零
    pub fn with_failing_encode(mut self, path: &Path) -> Self {
        self.failing_encodes.insert(key(path));
        self
    }

    /// 针对该路径启动某个工具时失败（非致命的资源错误，如 EMFILE）
    pub fn with_spawn_failure(mut self, tool: &'static str, path: &Path) -> Self {
        self.spawn_failures.insert((tool, key(path)));
        self
    }

    fn spawn_check(&self, tool: &'static str, args: &[String]) -> AudioResult<()> {
        match args
            .iter()
            .find(|arg| self.spawn_failures.contains(&(tool, (*arg).clone())))
        {
            Some(_) => Err(AudioError::ResourceError(format!(
                "Failed to spawn {tool} / 无法启动{tool}: Too many open files"
            ))),
            None => Ok(()),
        }
    }

    /// 所有调用参数
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// 涉及某个路径的调用次数
    pub fn calls_touching(&self, path: &Path) -> usize {
        let target = key(path);
        self.calls
            .borrow()
            .iter()
            .filter(|args| args.contains(&target))
            .count()
    }

    /// 使用某个滤镜前缀的调用次数
    pub fn filter_calls(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|args| {
                args.windows(2)
                    .any(|pair| pair[0] == "-af" && pair[1].starts_with(prefix))
            })
            .count()
    }

    fn encode(&self, args: &[String]) -> AudioResult<EngineOutput> {
        let input = args.get(2).cloned().unwrap_or_default();
        let chain = args.get(4).cloned().unwrap_or_default();
        let output = args.last().cloned().unwrap_or_default();

        if self.failing_encodes.contains(&input) {
            return Ok(EngineOutput::failed(
                1,
                format!("{input}: Invalid data found when processing input\n"),
            ));
        }

        // 输出时长 = 淡出起点 + 淡出时长
        let final_duration = chain
            .split(',')
            .find_map(|stage| stage.strip_prefix("afade=t=out:"))
            .map(|params| {
                params
                    .split(':')
                    .filter_map(|kv| kv.split_once('='))
                    .filter_map(|(_, v)| v.parse::<f64>().ok())
                    .sum::<f64>()
            })
            .unwrap_or(0.0);

        fs::write(&output, b"ID3 fake mp3 payload")?;
        self.probes
            .borrow_mut()
            .insert(output, probe_json(final_duration, 44100, 2, 192_000));
        Ok(EngineOutput::ok("", "size=     235kB time=00:00:10.00\n"))
    }

    fn diagnostics(&self, args: &[String]) -> AudioResult<EngineOutput> {
        let input = args.get(1).cloned().unwrap_or_default();
        let filter = args.get(3).cloned().unwrap_or_default();

        let stderr = if filter.starts_with("silencedetect") {
            self.silence.get(&input).cloned().unwrap_or_default()
        } else if filter.starts_with("loudnorm") {
            self.loudness
                .get(&input)
                .cloned()
                .unwrap_or_else(|| DEFAULT_SUMMARY.to_string())
        } else {
            String::new()
        };
        Ok(EngineOutput::ok("", stderr))
    }
}

impl AudioEngine for FakeEngine {
    fn transform(&self, args: &[String]) -> AudioResult<EngineOutput> {
        self.calls.borrow_mut().push(args.to_vec());
        if self.missing {
            return Err(AudioError::EngineNotFound { tool: "ffmpeg" });
        }
        self.spawn_check("ffmpeg", args)?;
        if args.first().map(String::as_str) == Some("-y") {
            self.encode(args)
        } else {
            self.diagnostics(args)
        }
    }

    fn probe(&self, args: &[String]) -> AudioResult<EngineOutput> {
        self.calls.borrow_mut().push(args.to_vec());
        if self.missing {
            return Err(AudioError::EngineNotFound { tool: "ffprobe" });
        }
        self.spawn_check("ffprobe", args)?;
        let path = args.last().cloned().unwrap_or_default();
        match self.probes.borrow().get(&path) {
            Some(json) => Ok(EngineOutput::ok(json.clone(), "")),
            None => Ok(EngineOutput::failed(1, format!("{path}: Invalid data"))),
        }
    }
}

/// 写一个占位输入文件
pub fn touch(path: &Path, bytes: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![0u8; bytes]).unwrap();
}
