//! The trait boundary between this crate and its external collaborators
//! (§1 "OUT OF SCOPE", §6 "Downward interfaces"): the demuxer/decoder
//! library, the audio sink, and the video sink. A concrete adapter crate
//! (for example one wrapping `symphonia`/`rodio`) implements [`Backend`]
//! and its associated traits; the core never depends on a specific codec
//! or I/O stack.

use std::sync::Arc;

use crate::error::PlayerError;
use crate::frame::{AudioFrameDescriptor, Frame};
use crate::packet::DataPacket;
use crate::stream::StreamDescriptor;

/// Polled periodically during blocking demuxer I/O; returns `true` when
/// the caller should abandon the operation. Backed by the player's
/// shared abort flag — see the design note on the interrupt callback's
/// cyclic reference, modelled here as a plain `Arc<dyn Fn>` rather than
/// a raw pointer back to the player.
pub type InterruptPoll = Arc<dyn Fn() -> bool + Send + Sync>;

/// Result of one non-blocking `read_packet` call (§6 demuxer interface).
pub enum ReadOutcome {
    Packet(DataPacket),
    /// Transient; the demux stage backs off and retries.
    Eagain,
    /// Terminal. `hard` distinguishes genuine end-of-stream from other
    /// errors the design note says to conflate with EOF for the purpose
    /// of stopping, while still tracking which one actually happened
    /// (only hard EOF sets `end_reached`).
    Eof { hard: bool },
}

/// Opens a container, enumerates its streams, and yields packets.
///
/// Implementations own any blocking I/O; `open` and `read_packet` are the
/// only calls expected to block, and both must honour `interrupt`.
pub trait Demuxer: Send {
    fn open(&mut self, url: &str, interrupt: InterruptPoll) -> Result<(), PlayerError>;

    /// The selected streams, populated by `open`. Exactly one video and
    /// one audio stream are kept (the first of each kind); everything
    /// else was discovered and discarded.
    fn streams(&self) -> &[StreamDescriptor];

    fn duration_seconds(&self) -> Option<f64>;

    fn seekable(&self) -> bool;

    fn read_packet(&mut self) -> ReadOutcome;

    fn seek(&mut self, position_seconds: f64) -> Result<(), PlayerError>;

    fn close(&mut self);
}

/// Result of feeding one packet to a decoder.
pub enum DecodeOutcome {
    Frame(Frame),
    /// The packet was consumed but produced no frame yet (common for
    /// B-frame reordering or codec priming).
    NoFrame,
    Err(String),
}

/// Decodes packets of one stream kind into frames.
pub trait StreamDecoder: Send {
    fn decode(&mut self, packet: &DataPacket) -> DecodeOutcome;

    /// Resets internal state; called when a flush marker is observed.
    fn flush(&mut self);
}

/// Consumes decoded audio frames in real time.
pub trait AudioSink: Send {
    fn open(&mut self, descriptor: AudioFrameDescriptor);

    /// Blocks up to one buffer slot; returns whether bytes were
    /// actually committed (a `false` is treated as a no-op, not an
    /// error — §7 `SinkRenderFailure`).
    fn render(&mut self, frame: &crate::frame::AudioFrame) -> bool;

    fn stop(&mut self);

    fn close(&mut self);

    fn is_stopped(&self) -> bool;

    /// Effect is implementation-defined; the capability is required,
    /// its behaviour is not specified (design note, open question).
    fn set_volume(&mut self, volume: f32);
}

/// Presents decoded video frames. No colour conversion or drawing is
/// performed by the core; presentation is synchronous from the video
/// render stage's perspective.
pub trait VideoSink: Send {
    fn present(&mut self, frame: &crate::frame::VideoFrame);
}

/// Factory for one open session's collaborators. The core is generic
/// over `Backend` rather than over each trait individually so that a
/// fresh demuxer/decoder/sink set can be constructed per `open()` while
/// the `Player` itself persists across sessions.
pub trait Backend: Send + Sync + 'static {
    type Demuxer: Demuxer + 'static;
    type VideoDecoder: StreamDecoder + 'static;
    type AudioDecoder: StreamDecoder + 'static;
    type AudioSink: AudioSink + 'static;
    type VideoSink: VideoSink + 'static;

    fn new_demuxer(&self) -> Self::Demuxer;

    /// Takes the opened demuxer itself (not just its [`StreamDescriptor`])
    /// because a decoder is typically built from the demuxer's own native
    /// codec parameters (e.g. `symphonia`'s `CodecParameters`, which carry
    /// more than this crate's codec-agnostic descriptor does).
    fn new_video_decoder(
        &self,
        demuxer: &Self::Demuxer,
        stream: &StreamDescriptor,
    ) -> Result<Self::VideoDecoder, PlayerError>;
    fn new_audio_decoder(
        &self,
        demuxer: &Self::Demuxer,
        stream: &StreamDescriptor,
    ) -> Result<Self::AudioDecoder, PlayerError>;
    fn new_audio_sink(&self) -> Self::AudioSink;
    fn new_video_sink(&self) -> Self::VideoSink;
}
