//! `AudioSink`/`VideoSink` implementations.
//!
//! The audio sink is grounded in the teacher's `playback/player/runtime.rs`
//! worker, which opens the default `rodio` output stream with a bounded
//! retry loop (devices can be transiently busy right after a previous
//! session releases them) and drives playback through a single `Sink`.

use std::thread;
use std::time::Duration;

use log::warn;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use mediaplay_core::collab::{AudioSink, VideoSink};
use mediaplay_core::frame::{AudioFrame, AudioFrameDescriptor, VideoFrame};

const OUTPUT_STREAM_OPEN_RETRIES: u32 = 20;
const OUTPUT_STREAM_OPEN_RETRY_MS: u64 = 100;

fn open_default_stream_with_retry() -> Option<OutputStream> {
    for attempt in 0..OUTPUT_STREAM_OPEN_RETRIES {
        match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => return Some(stream),
            Err(err) => {
                warn!("failed to open audio output stream (attempt {attempt}): {err}");
                thread::sleep(Duration::from_millis(OUTPUT_STREAM_OPEN_RETRY_MS));
            }
        }
    }
    None
}

/// Real, non-no-op volume control: `rodio::Sink::set_volume` applies
/// immediately to whatever is currently queued.
pub struct RodioAudioSink {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    channels: u16,
    sample_rate: u32,
    pending_volume: f32,
}

impl Default for RodioAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RodioAudioSink {
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            channels: 0,
            sample_rate: 0,
            pending_volume: 1.0,
        }
    }
}

impl AudioSink for RodioAudioSink {
    fn open(&mut self, descriptor: AudioFrameDescriptor) {
        self.channels = descriptor.channels;
        self.sample_rate = descriptor.sample_rate;
        let Some(stream) = open_default_stream_with_retry() else {
            warn!("giving up on opening an audio output stream after {OUTPUT_STREAM_OPEN_RETRIES} attempts");
            return;
        };
        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(self.pending_volume);
        self.sink = Some(sink);
        self.stream = Some(stream);
    }

    fn render(&mut self, frame: &AudioFrame) -> bool {
        let Some(sink) = self.sink.as_ref() else {
            return false;
        };
        let interleaved = frame.interleaved();
        let source = SamplesBuffer::new(self.channels.max(1), self.sample_rate, interleaved);
        sink.append(source);
        // `Sink::append` queues without blocking; back-pressure comes from
        // the frame queue's bounded capacity (§4.B), not from this call.
        true
    }

    fn stop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.clear();
        }
    }

    fn close(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.clear();
        }
        self.stream = None;
    }

    fn is_stopped(&self) -> bool {
        self.sink.as_ref().is_none_or(Sink::empty)
    }

    fn set_volume(&mut self, volume: f32) {
        self.pending_volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }
}

/// Video presentation is out of scope for this backend (§12); the CLI
/// reports frames through the `on_video_render` callback instead.
#[derive(Default)]
pub struct NullVideoSink;

impl VideoSink for NullVideoSink {
    fn present(&mut self, _frame: &VideoFrame) {}
}
