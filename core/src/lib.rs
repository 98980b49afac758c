//! Core demux/decode/render pipeline for a small media player.
//!
//! This crate implements the state machine, bounded queues, clocks, and
//! worker-stage coordination described for a pull-based player: it consumes
//! a container URL through a [`collab::Demuxer`]/[`collab::StreamDecoder`]
//! pair and presents timestamped frames to a [`collab::VideoSink`] /
//! [`collab::AudioSink`] pair in audio-master synchronized real time.
//!
//! The crate has no opinion on *which* demuxer, decoder, or sink is used —
//! see [`collab::Backend`] for the trait boundary a concrete adapter (such
//! as `mediaplay-symphonia`) implements.

pub mod buffering;
pub mod clock;
pub mod collab;
pub mod command;
pub mod config;
pub mod dump;
pub mod error;
pub mod frame;
pub mod packet;
pub mod player;
pub mod queue;
pub(crate) mod session;
pub(crate) mod stage;
mod state;
pub mod stream;

pub use buffering::Buffering;
pub use clock::Clock;
pub use command::{Command, CommandBus};
pub use config::PipelineConfig;
pub use dump::DumpInfo;
pub use error::PlayerError;
pub use frame::{AudioFrame, Frame, Plane, SampleFormat, VideoFrame};
pub use packet::{DataPacket, Packet, StreamKind};
pub use player::{Player, PlayerCallbacks, PlayerState};
pub use queue::{FrameQueue, PacketQueue};
pub use stream::{StreamDescriptor, TimeBase};
