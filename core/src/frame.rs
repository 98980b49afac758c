//! Decoded, raw units travelling from decoder stages to render stages.

use crate::packet::StreamKind;

/// A decoded unit: either a planar video frame or a planar audio frame.
#[derive(Debug, Clone)]
pub enum Frame {
    Video(VideoFrame),
    Audio(AudioFrame),
}

impl Frame {
    pub fn kind(&self) -> StreamKind {
        match self {
            Frame::Video(_) => StreamKind::Video,
            Frame::Audio(_) => StreamKind::Audio,
        }
    }

    pub fn pts_ticks(&self) -> i64 {
        match self {
            Frame::Video(f) => f.pts_ticks,
            Frame::Audio(f) => f.pts_ticks,
        }
    }

    pub fn duration_ticks(&self) -> i64 {
        match self {
            Frame::Video(f) => f.duration_ticks,
            Frame::Audio(f) => f.duration_ticks,
        }
    }

    pub fn as_video(&self) -> Option<&VideoFrame> {
        match self {
            Frame::Video(f) => Some(f),
            Frame::Audio(_) => None,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioFrame> {
        match self {
            Frame::Audio(f) => Some(f),
            Frame::Video(_) => None,
        }
    }
}

/// One luma or chroma plane.
#[derive(Debug, Clone)]
pub struct Plane {
    pub data: Vec<u8>,
    pub stride: usize,
}

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub pts_ticks: i64,
    pub duration_ticks: i64,
    pub width: u32,
    pub height: u32,
    pub planes: Vec<Plane>,
}

/// Sample format of a decoded audio frame, before the sink's own
/// resampling/downmix (the core does no colour conversion or resampling
/// policy beyond what the sink performs itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    U8,
    S16,
    S24,
    U24,
    F32,
}

/// The shape the audio sink is opened with, taken from the first
/// decoded audio frame of a session.
#[derive(Debug, Clone, Copy)]
pub struct AudioFrameDescriptor {
    pub sample_format: SampleFormat,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub pts_ticks: i64,
    pub duration_ticks: i64,
    pub sample_format: SampleFormat,
    pub sample_rate: u32,
    pub channels: u16,
    pub nb_samples: usize,
    /// Planar: one `Vec<f32>` of `nb_samples` per channel.
    pub channel_data: Vec<Vec<f32>>,
}

impl AudioFrame {
    pub fn descriptor(&self) -> AudioFrameDescriptor {
        AudioFrameDescriptor {
            sample_format: self.sample_format,
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Interleaves the planar `channel_data` into a single `Vec<f32>`, the
    /// shape most audio sink APIs (including `rodio`'s `SamplesBuffer`)
    /// expect.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.nb_samples * self.channel_data.len());
        for i in 0..self.nb_samples {
            for channel in &self.channel_data {
                out.push(channel.get(i).copied().unwrap_or(0.0));
            }
        }
        out
    }
}
