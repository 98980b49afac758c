//! Ties the `symphonia` demuxer/decoder and `rodio` sink together as one
//! [`mediaplay_core::collab::Backend`] implementation.

use mediaplay_core::collab::Backend;
use mediaplay_core::error::PlayerError;
use mediaplay_core::packet::StreamKind;
use mediaplay_core::stream::StreamDescriptor;

use crate::decoder::{PlaceholderVideoDecoder, SymphoniaAudioDecoder};
use crate::demuxer::SymphoniaDemuxer;
use crate::sink::{NullVideoSink, RodioAudioSink};

#[derive(Default)]
pub struct SymphoniaBackend;

impl Backend for SymphoniaBackend {
    type Demuxer = SymphoniaDemuxer;
    type VideoDecoder = PlaceholderVideoDecoder;
    type AudioDecoder = SymphoniaAudioDecoder;
    type AudioSink = RodioAudioSink;
    type VideoSink = NullVideoSink;

    fn new_demuxer(&self) -> Self::Demuxer {
        SymphoniaDemuxer::new()
    }

    fn new_video_decoder(
        &self,
        _demuxer: &Self::Demuxer,
        stream: &StreamDescriptor,
    ) -> Result<Self::VideoDecoder, PlayerError> {
        Ok(PlaceholderVideoDecoder::new(stream))
    }

    fn new_audio_decoder(
        &self,
        demuxer: &Self::Demuxer,
        stream: &StreamDescriptor,
    ) -> Result<Self::AudioDecoder, PlayerError> {
        let params = demuxer
            .codec_params(StreamKind::Audio)
            .ok_or(PlayerError::NoSuchStream)?;
        SymphoniaAudioDecoder::new(params, stream.index)
    }

    fn new_audio_sink(&self) -> Self::AudioSink {
        RodioAudioSink::new()
    }

    fn new_video_sink(&self) -> Self::VideoSink {
        NullVideoSink
    }
}
