//! `Demuxer` implementation wrapping a `symphonia::core::formats::FormatReader`.
//!
//! Grounded in the teacher's `container::info::probe_with_hint`/
//! `get_probe_result_from_string` (extension hinting, `-` for stdin) and
//! `tools::tools::get_reader` (first decodable track selection).

use std::fs::File;
use std::io::stdin;
use std::path::Path;

use log::warn;
use symphonia::core::codecs::CodecParameters;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo, Track};
use symphonia::core::io::{MediaSource, MediaSourceStream, ReadOnlySource};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::Time;

use mediaplay_core::collab::{Demuxer, InterruptPoll, ReadOutcome};
use mediaplay_core::error::PlayerError;
use mediaplay_core::packet::{DataPacket, StreamKind};
use mediaplay_core::stream::{StreamDescriptor, TimeBase};

/// A track is treated as video if symphonia reports pixel dimensions for
/// it; `symphonia` never ships a video decoder, but `FormatReader`s still
/// expose these parameters for container formats that carry a video
/// track alongside audio.
fn track_kind(params: &CodecParameters) -> Option<StreamKind> {
    if params.width.is_some() && params.height.is_some() {
        Some(StreamKind::Video)
    } else if params.sample_rate.is_some() {
        Some(StreamKind::Audio)
    } else {
        None
    }
}

/// `symphonia::core::codecs::CodecType` keeps its inner id private, so the
/// only portable way to turn one into this crate's codec-agnostic `u32`
/// is to hash its `Debug` form (stable per codec for the lifetime of a
/// process, which is all `StreamDescriptor::codec_id` is used for).
fn codec_id_of(params: &CodecParameters) -> u32 {
    let label = format!("{:?}", params.codec);
    let mut hash: u32 = 2166136261;
    for byte in label.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

fn descriptor_from_track(track: &Track, kind: StreamKind) -> StreamDescriptor {
    let params = &track.codec_params;
    let time_base = params
        .time_base
        .map(|tb| TimeBase::new(tb.numer, tb.denom))
        .unwrap_or_default();
    StreamDescriptor {
        kind,
        index: track.id,
        time_base,
        start_time_ticks: params.start_ts as i64,
        codec_id: codec_id_of(params),
        width: params.width.map(u32::from),
        height: params.height.map(u32::from),
    }
}

pub struct SymphoniaDemuxer {
    format: Option<Box<dyn FormatReader>>,
    streams: Vec<StreamDescriptor>,
    video_track_id: Option<u32>,
    audio_track_id: Option<u32>,
    interrupt: Option<InterruptPoll>,
}

impl Default for SymphoniaDemuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl SymphoniaDemuxer {
    pub fn new() -> Self {
        Self {
            format: None,
            streams: Vec::new(),
            video_track_id: None,
            audio_track_id: None,
            interrupt: None,
        }
    }

    /// Full codec parameters for the selected track of `kind`, used by
    /// [`crate::decoder::SymphoniaAudioDecoder::new`] — this is the detail
    /// this crate's codec-agnostic `StreamDescriptor` deliberately doesn't
    /// carry.
    pub(crate) fn codec_params(&self, kind: StreamKind) -> Option<&CodecParameters> {
        let format = self.format.as_ref()?;
        let track_id = match kind {
            StreamKind::Video => self.video_track_id?,
            StreamKind::Audio => self.audio_track_id?,
        };
        format
            .tracks()
            .iter()
            .find(|track| track.id == track_id)
            .map(|track| &track.codec_params)
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt.as_ref().is_some_and(|poll| poll())
    }
}

fn open_media_source(url: &str) -> std::io::Result<Box<dyn MediaSource>> {
    if url == "-" {
        Ok(Box::new(ReadOnlySource::new(stdin())))
    } else {
        Ok(Box::new(File::open(url)?))
    }
}

fn probe(url: &str) -> Result<Box<dyn FormatReader>, PlayerError> {
    let source = open_media_source(url).map_err(|err| PlayerError::OpenFailed(err.to_string()))?;
    let mut hint = Hint::new();
    if let Some(extension) = Path::new(url).extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }
    let mss = MediaSourceStream::new(source, Default::default());
    let format_opts = FormatOptions::default();
    let metadata_opts = MetadataOptions::default();
    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|err| PlayerError::OpenFailed(err.to_string()))?;
    Ok(probed.format)
}

impl Demuxer for SymphoniaDemuxer {
    fn open(&mut self, url: &str, interrupt: InterruptPoll) -> Result<(), PlayerError> {
        self.interrupt = Some(interrupt);
        let format = probe(url)?;

        let video_track = format.tracks().iter().find(|track| {
            track_kind(&track.codec_params) == Some(StreamKind::Video)
        });
        let audio_track = format.tracks().iter().find(|track| {
            track_kind(&track.codec_params) == Some(StreamKind::Audio)
        });

        let audio_track = audio_track.ok_or(PlayerError::NoSuchStream)?;
        self.streams.push(descriptor_from_track(audio_track, StreamKind::Audio));
        self.audio_track_id = Some(audio_track.id);

        if let Some(video_track) = video_track {
            self.streams.push(descriptor_from_track(video_track, StreamKind::Video));
            self.video_track_id = Some(video_track.id);
        }

        self.format = Some(format);
        Ok(())
    }

    fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    fn duration_seconds(&self) -> Option<f64> {
        let format = self.format.as_ref()?;
        let track_id = self.audio_track_id?;
        let track = format.tracks().iter().find(|track| track.id == track_id)?;
        let params = &track.codec_params;
        let time_base = params.time_base?;
        let n_frames = params.n_frames?;
        let time = time_base.calc_time(params.start_ts + n_frames);
        Some(time.seconds as f64 + time.frac)
    }

    fn seekable(&self) -> bool {
        // `FormatReader::seek` is always attempted; containers that don't
        // support it return an error the demux stage treats as a failed
        // seek (§4.E step 1), so this is a best-effort "probably".
        self.format.is_some()
    }

    fn read_packet(&mut self) -> ReadOutcome {
        if self.is_interrupted() {
            return ReadOutcome::Eof { hard: false };
        }
        let Some(format) = self.format.as_mut() else {
            return ReadOutcome::Eof { hard: true };
        };
        let outcome = match format.next_packet() {
            Ok(packet) => {
                let stream = if Some(packet.track_id) == self.video_track_id {
                    StreamKind::Video
                } else if Some(packet.track_id) == self.audio_track_id {
                    StreamKind::Audio
                } else {
                    return ReadOutcome::Eagain;
                };
                ReadOutcome::Packet(DataPacket {
                    stream,
                    bytes: packet.data.to_vec(),
                    duration_ticks: packet.dur as i64,
                    pts_ticks: packet.ts as i64,
                })
            }
            Err(SymphoniaError::IoError(err)) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                ReadOutcome::Eof { hard: true }
            }
            Err(SymphoniaError::ResetRequired) => ReadOutcome::Eagain,
            Err(err) => {
                warn!("demux read error, treating as end of stream: {err}");
                ReadOutcome::Eof { hard: false }
            }
        };
        if self.is_interrupted() {
            return ReadOutcome::Eof { hard: false };
        }
        outcome
    }

    fn seek(&mut self, position_seconds: f64) -> Result<(), PlayerError> {
        let Some(format) = self.format.as_mut() else {
            return Err(PlayerError::SeekFailed("no open container".into()));
        };
        let seconds = position_seconds.trunc().max(0.0) as u64;
        let frac = position_seconds.fract();
        format
            .seek(
                SeekMode::Accurate,
                SeekTo::Time {
                    time: Time::new(seconds, frac),
                    track_id: self.audio_track_id,
                },
            )
            .map(|_| ())
            .map_err(|err| PlayerError::SeekFailed(err.to_string()))
    }

    fn close(&mut self) {
        self.format = None;
        self.interrupt = None;
    }
}
