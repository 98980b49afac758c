//! Test doubles for the collaborator traits (§11), standing in for a real
//! demuxer/decoder/sink stack the way `proteus-cli/tests/cli_effects_json.rs`
//! stands in for a real audio device with `assert_cmd`/`tempfile` — here the
//! substitution happens one layer down, at the `Backend` trait boundary
//! itself, so the whole five-stage pipeline runs against in-memory data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use mediaplay_core::collab::{
    AudioSink, Backend, DecodeOutcome, Demuxer, InterruptPoll, ReadOutcome, StreamDecoder,
    VideoSink,
};
use mediaplay_core::error::PlayerError;
use mediaplay_core::frame::{AudioFrame, AudioFrameDescriptor, Frame, Plane, SampleFormat, VideoFrame};
use mediaplay_core::packet::{DataPacket, StreamKind};
use mediaplay_core::stream::{StreamDescriptor, TimeBase};

/// One synthetic "file": enough facts to generate a deterministic packet
/// stream plus the knobs the scenarios below need.
#[derive(Clone)]
pub struct Scenario {
    pub video_width: u32,
    pub video_height: u32,
    pub video_frame_ticks: i64,
    pub audio_frame_ticks: i64,
    pub total_ticks: i64,
    pub seekable: bool,
    pub duration_seconds: Option<f64>,
    pub hard_eof: bool,
    /// Number of 10ms steps `open` blocks for, polling the interrupt hook
    /// each step — simulates a slow network open a `stop`/superseding
    /// `open` can cancel mid-flight (S3, S4).
    pub open_delay_steps: u32,
    pub has_video: bool,
    pub has_audio: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            video_width: 64,
            video_height: 48,
            video_frame_ticks: 40,
            audio_frame_ticks: 20,
            total_ticks: 2000,
            seekable: true,
            duration_seconds: Some(2.0),
            hard_eof: true,
            open_delay_steps: 0,
            has_video: true,
            has_audio: true,
        }
    }
}

fn time_base() -> TimeBase {
    TimeBase::new(1, 1000)
}

fn generate_packets(scenario: &Scenario) -> Vec<DataPacket> {
    let mut packets = Vec::new();
    if scenario.has_video {
        let mut pts = 0i64;
        while pts < scenario.total_ticks {
            packets.push(DataPacket {
                stream: StreamKind::Video,
                bytes: vec![0u8; 16],
                duration_ticks: scenario.video_frame_ticks,
                pts_ticks: pts,
            });
            pts += scenario.video_frame_ticks;
        }
    }
    if scenario.has_audio {
        let mut pts = 0i64;
        while pts < scenario.total_ticks {
            packets.push(DataPacket {
                stream: StreamKind::Audio,
                bytes: vec![0u8; 8],
                duration_ticks: scenario.audio_frame_ticks,
                pts_ticks: pts,
            });
            pts += scenario.audio_frame_ticks;
        }
    }
    packets.sort_by_key(|p| p.pts_ticks);
    packets
}

pub struct MockDemuxer {
    scenarios: Arc<HashMap<String, Scenario>>,
    scenario: Option<Scenario>,
    packets: Vec<DataPacket>,
    cursor: usize,
    streams: Vec<StreamDescriptor>,
    interrupt: Option<InterruptPoll>,
}

impl MockDemuxer {
    fn new(scenarios: Arc<HashMap<String, Scenario>>) -> Self {
        Self {
            scenarios,
            scenario: None,
            packets: Vec::new(),
            cursor: 0,
            streams: Vec::new(),
            interrupt: None,
        }
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt.as_ref().is_some_and(|poll| poll())
    }
}

impl Demuxer for MockDemuxer {
    fn open(&mut self, url: &str, interrupt: InterruptPoll) -> Result<(), PlayerError> {
        self.interrupt = Some(interrupt);

        let scenario = self
            .scenarios
            .get(url)
            .cloned()
            .ok_or_else(|| PlayerError::OpenFailed(format!("no such scenario: {url}")))?;

        for _ in 0..scenario.open_delay_steps {
            if self.is_interrupted() {
                return Err(PlayerError::OpenFailed("aborted during open".into()));
            }
            thread::sleep(Duration::from_millis(10));
        }
        if self.is_interrupted() {
            return Err(PlayerError::OpenFailed("aborted during open".into()));
        }

        self.packets = generate_packets(&scenario);
        let mut streams = Vec::new();
        if scenario.has_video {
            streams.push(StreamDescriptor {
                kind: StreamKind::Video,
                index: 0,
                time_base: time_base(),
                start_time_ticks: 0,
                codec_id: 1,
                width: Some(scenario.video_width),
                height: Some(scenario.video_height),
            });
        }
        if scenario.has_audio {
            streams.push(StreamDescriptor {
                kind: StreamKind::Audio,
                index: 1,
                time_base: time_base(),
                start_time_ticks: 0,
                codec_id: 2,
                width: None,
                height: None,
            });
        }
        self.streams = streams;
        self.scenario = Some(scenario);
        Ok(())
    }

    fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    fn duration_seconds(&self) -> Option<f64> {
        self.scenario.as_ref().and_then(|s| s.duration_seconds)
    }

    fn seekable(&self) -> bool {
        self.scenario.as_ref().is_some_and(|s| s.seekable)
    }

    fn read_packet(&mut self) -> ReadOutcome {
        let hard_eof = self.scenario.as_ref().is_some_and(|s| s.hard_eof);
        match self.packets.get(self.cursor) {
            Some(packet) => {
                self.cursor += 1;
                ReadOutcome::Packet(packet.clone())
            }
            None => ReadOutcome::Eof { hard: hard_eof },
        }
    }

    fn seek(&mut self, position_seconds: f64) -> Result<(), PlayerError> {
        let target_ticks = (position_seconds * 1000.0).round() as i64;
        self.cursor = self
            .packets
            .iter()
            .position(|p| p.pts_ticks >= target_ticks)
            .unwrap_or(self.packets.len());
        Ok(())
    }

    fn close(&mut self) {
        self.interrupt = None;
    }
}

/// Pass-through "decoder": wraps each packet's bytes straight into a frame,
/// exercising queue/clock/sync plumbing without a real codec.
pub struct MockVideoDecoder {
    width: u32,
    height: u32,
}

impl StreamDecoder for MockVideoDecoder {
    fn decode(&mut self, packet: &DataPacket) -> DecodeOutcome {
        DecodeOutcome::Frame(Frame::Video(VideoFrame {
            pts_ticks: packet.pts_ticks,
            duration_ticks: packet.duration_ticks,
            width: self.width,
            height: self.height,
            planes: vec![Plane {
                data: vec![0u8; (self.width * self.height) as usize],
                stride: self.width as usize,
            }],
        }))
    }

    fn flush(&mut self) {}
}

pub struct MockAudioDecoder;

impl StreamDecoder for MockAudioDecoder {
    fn decode(&mut self, packet: &DataPacket) -> DecodeOutcome {
        let nb_samples = 16usize;
        DecodeOutcome::Frame(Frame::Audio(AudioFrame {
            pts_ticks: packet.pts_ticks,
            duration_ticks: packet.duration_ticks,
            sample_format: SampleFormat::F32,
            sample_rate: 48_000,
            channels: 2,
            nb_samples,
            channel_data: vec![vec![0.0; nb_samples]; 2],
        }))
    }

    fn flush(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentedFrame {
    pub width: u32,
    pub pts_ticks: i64,
}

#[derive(Default)]
pub struct RecordingVideoSink {
    pub frames: Arc<Mutex<Vec<PresentedFrame>>>,
}

impl VideoSink for RecordingVideoSink {
    fn present(&mut self, frame: &VideoFrame) {
        self.frames.lock().unwrap().push(PresentedFrame {
            width: frame.width,
            pts_ticks: frame.pts_ticks,
        });
    }
}

#[derive(Default)]
pub struct RecordingAudioSink {
    pub rendered: Arc<AtomicBool>,
}

impl AudioSink for RecordingAudioSink {
    fn open(&mut self, _descriptor: AudioFrameDescriptor) {}

    fn render(&mut self, _frame: &AudioFrame) -> bool {
        self.rendered.store(true, Ordering::SeqCst);
        true
    }

    fn stop(&mut self) {}

    fn close(&mut self) {}

    fn is_stopped(&self) -> bool {
        false
    }

    fn set_volume(&mut self, _volume: f32) {}
}

/// Ties the mocks together. Construct once per test; every `open()` during
/// that test looks scenarios up by URL, exactly like `SymphoniaBackend`
/// looks codecs up by the demuxer's own track parameters.
#[derive(Clone)]
pub struct MockBackend {
    scenarios: Arc<HashMap<String, Scenario>>,
    pub video_frames: Arc<Mutex<Vec<PresentedFrame>>>,
    pub audio_rendered: Arc<AtomicBool>,
}

impl MockBackend {
    pub fn new(scenarios: HashMap<String, Scenario>) -> Self {
        Self {
            scenarios: Arc::new(scenarios),
            video_frames: Arc::new(Mutex::new(Vec::new())),
            audio_rendered: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Backend for MockBackend {
    type Demuxer = MockDemuxer;
    type VideoDecoder = MockVideoDecoder;
    type AudioDecoder = MockAudioDecoder;
    type AudioSink = RecordingAudioSink;
    type VideoSink = RecordingVideoSink;

    fn new_demuxer(&self) -> Self::Demuxer {
        MockDemuxer::new(self.scenarios.clone())
    }

    fn new_video_decoder(
        &self,
        _demuxer: &Self::Demuxer,
        stream: &StreamDescriptor,
    ) -> Result<Self::VideoDecoder, PlayerError> {
        Ok(MockVideoDecoder {
            width: stream.width.unwrap_or(1),
            height: stream.height.unwrap_or(1),
        })
    }

    fn new_audio_decoder(
        &self,
        _demuxer: &Self::Demuxer,
        _stream: &StreamDescriptor,
    ) -> Result<Self::AudioDecoder, PlayerError> {
        Ok(MockAudioDecoder)
    }

    fn new_audio_sink(&self) -> Self::AudioSink {
        RecordingAudioSink {
            rendered: self.audio_rendered.clone(),
        }
    }

    fn new_video_sink(&self) -> Self::VideoSink {
        RecordingVideoSink {
            frames: self.video_frames.clone(),
        }
    }
}

/// Polls `f` until it returns `true` or `timeout` elapses; returns whether
/// it converged, for an assertion message that says what actually happened
/// rather than just "timed out".
pub fn wait_until<F: Fn() -> bool>(timeout: Duration, f: F) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if f() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    f()
}
