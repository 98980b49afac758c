//! `symphonia`/`rodio`-backed implementation of `mediaplay_core::collab::Backend`.
//!
//! Grounded in the teacher's `container/info.rs` probing helpers,
//! `tools/tools.rs`'s `get_reader`/`get_decoder`, and
//! `playback/player/runtime.rs`'s rodio `Sink` lifecycle.

mod backend;
mod demuxer;
mod decoder;
mod sink;

pub use backend::SymphoniaBackend;
pub use decoder::{PlaceholderVideoDecoder, SymphoniaAudioDecoder};
pub use demuxer::SymphoniaDemuxer;
pub use sink::{NullVideoSink, RodioAudioSink};
