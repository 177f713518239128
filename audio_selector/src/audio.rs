//! 分段播放模块
//!
//! 标记序列的下游消费者：把信号切分为相邻分段
//! `[0, m1), [m1, m2), …, [mLast, duration)` 并按顺序播放。
//! 播放发生在 rodio 的音频线程上，通过通道控制，标注模型不会因此阻塞，
//! 播放期间游标、标记与选区仍可正常查询和修改。

use std::collections::VecDeque;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rodio::{OutputStream, OutputStreamHandle, Source};

/// 按标记切分出的分段边界（秒）。
///
/// 越界的标记被钳制到 `[0, duration]`，零宽分段被丢弃；
/// 没有标记时返回整段信号。
pub fn segment_bounds(marks: &[f64], duration: f64) -> Vec<(f64, f64)> {
    let mut bounds = Vec::with_capacity(marks.len() + 1);
    let mut start = 0.0;
    for &mark in marks {
        let mark = mark.clamp(0.0, duration);
        if mark > start {
            bounds.push((start, mark));
            start = mark;
        }
    }
    if start < duration {
        bounds.push((start, duration));
    }
    bounds
}

/// 宿主可替换的播放后端抽象。
pub trait PlaybackBackend {
    /// 按标记切分并从头播放全部分段。
    fn play_marked(&self, marks: &[f64], duration: f64);

    /// 停止播放并清空队列。
    fn stop(&self);

    fn set_volume(&self, volume: f32);
}

/// 空实现，允许宿主禁用音频输出。
#[derive(Default)]
pub struct NullPlayback;

impl PlaybackBackend for NullPlayback {
    fn play_marked(&self, _marks: &[f64], _duration: f64) {}
    fn stop(&self) {}
    fn set_volume(&self, _volume: f32) {}
}

/// 分段播放配置。
#[derive(Clone, Copy, Debug)]
pub struct SegmentEngineConfig {
    /// 每个分段连续播放的次数
    pub repeats: usize,
    /// 初始音量
    pub volume: f32,
}

impl Default for SegmentEngineConfig {
    fn default() -> Self {
        Self {
            repeats: 1,
            volume: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
enum AudioMessage {
    Play(Vec<Range<usize>>),
    Stop,
    SetVolume(f32),
}

/// 默认的 rodio 分段播放实现。
///
/// 持有整段信号的交错 f32 采样；`play_marked` 把分段换算为采样区间
/// 后整批送入音频线程。
pub struct SegmentEngine {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sender: Sender<AudioMessage>,
    sample_rate: u32,
    channels: u16,
    total_samples: usize,
    repeats: usize,
}

impl SegmentEngine {
    /// 以交错的 f32 采样创建播放引擎。
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self::with_config(samples, channels, sample_rate, SegmentEngineConfig::default())
    }

    pub fn with_config(
        samples: Vec<f32>,
        channels: u16,
        sample_rate: u32,
        config: SegmentEngineConfig,
    ) -> Self {
        let (_stream, handle) = OutputStream::try_default().expect("无法初始化输出设备");
        let (sender, receiver) = unbounded();
        let total_samples = samples.len();
        let streamer = SegmentStreamer {
            receiver,
            samples: Arc::new(samples),
            channels,
            sample_rate,
            queue: VecDeque::new(),
            position: 0,
            end: 0,
            volume: config.volume,
        };
        handle
            .play_raw(streamer.convert_samples())
            .expect("无法启动音频线程");

        Self {
            _stream,
            _handle: handle,
            sender,
            sample_rate,
            channels,
            total_samples,
            repeats: config.repeats.max(1),
        }
    }

    fn dispatch(&self, msg: AudioMessage) {
        let _ = self.sender.send(msg);
    }

    /// 把秒换算为对齐到帧边界的采样区间。
    fn sample_range(&self, start: f64, end: f64) -> Range<usize> {
        let channels = self.channels.max(1) as usize;
        let frames = self.total_samples / channels;
        let start_frame = ((start * self.sample_rate as f64) as usize).min(frames);
        let end_frame = ((end * self.sample_rate as f64) as usize).min(frames);
        start_frame * channels..end_frame * channels
    }
}

impl PlaybackBackend for SegmentEngine {
    fn play_marked(&self, marks: &[f64], duration: f64) {
        let mut order = Vec::new();
        for (start, end) in segment_bounds(marks, duration) {
            let range = self.sample_range(start, end);
            if range.is_empty() {
                continue;
            }
            for _ in 0..self.repeats {
                order.push(range.clone());
            }
        }
        self.dispatch(AudioMessage::Play(order));
    }

    fn stop(&self) {
        self.dispatch(AudioMessage::Stop);
    }

    fn set_volume(&self, volume: f32) {
        self.dispatch(AudioMessage::SetVolume(volume.clamp(0.0, 2.0)));
    }
}

struct SegmentStreamer {
    receiver: Receiver<AudioMessage>,
    samples: Arc<Vec<f32>>,
    channels: u16,
    sample_rate: u32,
    queue: VecDeque<Range<usize>>,
    position: usize,
    end: usize,
    volume: f32,
}

impl SegmentStreamer {
    fn process_messages(&mut self) {
        while let Ok(msg) = self.receiver.try_recv() {
            match msg {
                AudioMessage::Play(order) => {
                    self.queue = order.into();
                    self.position = 0;
                    self.end = 0;
                }
                AudioMessage::Stop => {
                    self.queue.clear();
                    self.position = 0;
                    self.end = 0;
                }
                AudioMessage::SetVolume(volume) => {
                    self.volume = volume;
                }
            }
        }
    }
}

impl Iterator for SegmentStreamer {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        self.process_messages();

        while self.position >= self.end {
            match self.queue.pop_front() {
                Some(range) => {
                    self.position = range.start;
                    self.end = range.end;
                }
                // 队列空闲时输出静音，保持音频流存活
                None => return Some(0.0),
            }
        }

        let sample = self.samples[self.position] * self.volume;
        self.position += 1;
        Some(sample)
    }
}

impl Source for SegmentStreamer {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
