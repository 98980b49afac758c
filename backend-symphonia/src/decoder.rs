//! `StreamDecoder` implementations: a real `symphonia` audio decoder, and
//! a placeholder video decoder (§12 — `symphonia` ships no video codecs).

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CodecParameters, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::Packet as SymphoniaPacket;

use mediaplay_core::collab::{DecodeOutcome, StreamDecoder};
use mediaplay_core::error::PlayerError;
use mediaplay_core::frame::{AudioFrame, Frame, Plane, SampleFormat, VideoFrame};
use mediaplay_core::packet::DataPacket;
use mediaplay_core::stream::StreamDescriptor;

/// Wraps a `Box<dyn symphonia::core::codecs::Decoder>`, built the way the
/// teacher's `tools::tools::get_decoder` builds one: from the track's own
/// `CodecParameters`, via `symphonia::default::get_codecs()`.
pub struct SymphoniaAudioDecoder {
    decoder: Box<dyn Decoder>,
    track_id: u32,
}

impl SymphoniaAudioDecoder {
    pub(crate) fn new(params: &CodecParameters, track_id: u32) -> Result<Self, PlayerError> {
        let decoder = symphonia::default::get_codecs()
            .make(params, &DecoderOptions::default())
            .map_err(|err| PlayerError::OpenFailed(err.to_string()))?;
        Ok(Self { decoder, track_id })
    }
}

impl StreamDecoder for SymphoniaAudioDecoder {
    fn decode(&mut self, packet: &DataPacket) -> DecodeOutcome {
        let symphonia_packet =
            SymphoniaPacket::new_from_slice(self.track_id, packet.pts_ticks as u64, packet.duration_ticks as u64, &packet.bytes);

        match self.decoder.decode(&symphonia_packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count() as u16;
                let sample_rate = spec.rate;
                let nb_samples = decoded.frames();

                let mut sample_buf = SampleBuffer::<f32>::new(nb_samples as u64, spec);
                sample_buf.copy_interleaved_ref(decoded);
                let interleaved = sample_buf.samples();

                let mut channel_data = vec![Vec::with_capacity(nb_samples); channels.max(1) as usize];
                for (i, sample) in interleaved.iter().enumerate() {
                    channel_data[i % channels.max(1) as usize].push(*sample);
                }

                DecodeOutcome::Frame(Frame::Audio(AudioFrame {
                    pts_ticks: packet.pts_ticks,
                    duration_ticks: packet.duration_ticks,
                    sample_format: SampleFormat::F32,
                    sample_rate,
                    channels,
                    nb_samples,
                    channel_data,
                }))
            }
            Err(SymphoniaError::DecodeError(_)) => DecodeOutcome::NoFrame,
            Err(err) => DecodeOutcome::Err(err.to_string()),
        }
    }

    fn flush(&mut self) {
        self.decoder.reset();
    }
}

/// Turns every video packet into one solid mid-grey frame of the stream's
/// declared dimensions (§12 — video decode is out of scope; `symphonia`
/// has no video codecs to wrap).
pub struct PlaceholderVideoDecoder {
    width: u32,
    height: u32,
}

impl PlaceholderVideoDecoder {
    pub(crate) fn new(stream: &StreamDescriptor) -> Self {
        Self {
            width: stream.width.unwrap_or(1),
            height: stream.height.unwrap_or(1),
        }
    }
}

impl StreamDecoder for PlaceholderVideoDecoder {
    fn decode(&mut self, packet: &DataPacket) -> DecodeOutcome {
        let plane = Plane {
            data: vec![128u8; (self.width * self.height) as usize],
            stride: self.width as usize,
        };
        DecodeOutcome::Frame(Frame::Video(VideoFrame {
            pts_ticks: packet.pts_ticks,
            duration_ticks: packet.duration_ticks,
            width: self.width,
            height: self.height,
            planes: vec![plane],
        }))
    }

    fn flush(&mut self) {}
}
