//! §4.I Player controller: the public state machine that owns command
//! dispatch, session lifecycle, and the capability-set callback surface
//! of §6.

mod controls;
mod lifecycle;

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::buffering::Buffering;
use crate::clock::Clock;
use crate::collab::Backend;
use crate::command::CommandBus;
use crate::config::PipelineConfig;
use crate::frame::VideoFrame;
use crate::queue::{FrameQueue, PacketQueue};
use crate::state::StateHandle;

pub use crate::state::PlayerState;

/// The embedder's callback surface (§6): a capability set, not an
/// inheritance hierarchy (§9 design note) — any subset may be wired up,
/// independently, at any time.
#[derive(Default)]
pub struct PlayerCallbacks {
    pub on_video_render: Option<Box<dyn Fn(&VideoFrame) + Send + Sync>>,
    pub on_position_changed: Option<Box<dyn Fn(f64) + Send + Sync>>,
    pub on_state_changed: Option<Box<dyn Fn(PlayerState) + Send + Sync>>,
    pub on_buffering_changed: Option<Box<dyn Fn(bool) + Send + Sync>>,
}

/// The handles for one open session's worker threads.
///
/// Only the demux stage's handle is kept: per the design note on
/// open/stop worker threads, that stage is spawned last, owns the other
/// four decode/render handles, and joins them itself before flipping the
/// player to `Stopped` — so joining this one handle is sufficient to
/// know the whole session has wound down (see `stage::demux`).
pub(crate) struct SessionThreads {
    pub demux: JoinHandle<()>,
}

/// Pull-based demux/decode/render pipeline controller (§1, §4.I).
///
/// Generic over one [`Backend`] implementation, monomorphized once per
/// process — a `Player` owns exactly one backend and may be `open`ed and
/// `stop`ped repeatedly across sessions.
pub struct Player<B: Backend> {
    pub(crate) backend: Arc<B>,
    pub(crate) config: PipelineConfig,

    pub(crate) state: Arc<StateHandle>,
    pub(crate) command_bus: Arc<CommandBus>,
    pub(crate) command_thread: Arc<Mutex<Option<JoinHandle<()>>>>,
    pub(crate) session_threads: Arc<Mutex<Option<SessionThreads>>>,

    pub(crate) abort: Arc<AtomicBool>,
    pub(crate) clock: Clock,
    pub(crate) buffering: Arc<Buffering>,
    pub(crate) synced: Arc<AtomicBool>,

    pub(crate) seek_to: Arc<Mutex<Option<f64>>>,
    pub(crate) position: Arc<Mutex<f64>>,
    pub(crate) duration: Arc<Mutex<Option<f64>>>,
    pub(crate) seekable: Arc<AtomicBool>,
    pub(crate) end_reached: Arc<AtomicBool>,
    pub(crate) volume: Arc<Mutex<f32>>,

    pub(crate) bytes_read_bucket: Arc<AtomicUsize>,
    pub(crate) download_speed: Arc<Mutex<f64>>,
    pub(crate) fps: Arc<AtomicU32>,

    pub(crate) video_pq: Arc<PacketQueue>,
    pub(crate) audio_pq: Arc<PacketQueue>,
    pub(crate) video_fq: Arc<FrameQueue>,
    pub(crate) audio_fq: Arc<FrameQueue>,

    pub(crate) callbacks: Arc<Mutex<PlayerCallbacks>>,
}

/// Written by hand rather than `#[derive(Clone)]`: every field here is an
/// `Arc`/`Copy` handle onto shared state, but a derived impl would add a
/// spurious `B: Clone` bound on the backend type itself (derive adds a
/// bound per generic parameter, not per field) — and concrete backends
/// such as `SymphoniaBackend` have no reason to implement `Clone`.
impl<B: Backend> Clone for Player<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            config: self.config,
            state: self.state.clone(),
            command_bus: self.command_bus.clone(),
            command_thread: self.command_thread.clone(),
            session_threads: self.session_threads.clone(),
            abort: self.abort.clone(),
            clock: self.clock.clone(),
            buffering: self.buffering.clone(),
            synced: self.synced.clone(),
            seek_to: self.seek_to.clone(),
            position: self.position.clone(),
            duration: self.duration.clone(),
            seekable: self.seekable.clone(),
            end_reached: self.end_reached.clone(),
            volume: self.volume.clone(),
            bytes_read_bucket: self.bytes_read_bucket.clone(),
            download_speed: self.download_speed.clone(),
            fps: self.fps.clone(),
            video_pq: self.video_pq.clone(),
            audio_pq: self.audio_pq.clone(),
            video_fq: self.video_fq.clone(),
            audio_fq: self.audio_fq.clone(),
            callbacks: self.callbacks.clone(),
        }
    }
}

impl<B: Backend> Player<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, PipelineConfig::default())
    }

    pub fn with_config(backend: B, config: PipelineConfig) -> Self {
        let callbacks: Arc<Mutex<PlayerCallbacks>> = Arc::new(Mutex::new(PlayerCallbacks::default()));
        let state = Arc::new(StateHandle::new(PlayerState::Stopped));
        let buffering = Arc::new(Buffering::new());

        {
            let callbacks = callbacks.clone();
            state.set_on_change(move |to| {
                if let Some(cb) = callbacks.lock().unwrap().on_state_changed.as_ref() {
                    cb(to);
                }
            });
        }
        {
            let callbacks = callbacks.clone();
            buffering.set_on_change(move |value| {
                if let Some(cb) = callbacks.lock().unwrap().on_buffering_changed.as_ref() {
                    cb(value);
                }
            });
        }

        Self {
            backend: Arc::new(backend),
            config,
            state,
            command_bus: Arc::new(CommandBus::new()),
            command_thread: Arc::new(Mutex::new(None)),
            session_threads: Arc::new(Mutex::new(None)),
            abort: Arc::new(AtomicBool::new(false)),
            clock: Clock::new(),
            buffering,
            synced: Arc::new(AtomicBool::new(false)),
            seek_to: Arc::new(Mutex::new(None)),
            position: Arc::new(Mutex::new(0.0)),
            duration: Arc::new(Mutex::new(None)),
            seekable: Arc::new(AtomicBool::new(false)),
            end_reached: Arc::new(AtomicBool::new(false)),
            volume: Arc::new(Mutex::new(1.0)),
            bytes_read_bucket: Arc::new(AtomicUsize::new(0)),
            download_speed: Arc::new(Mutex::new(0.0)),
            fps: Arc::new(AtomicU32::new(0)),
            video_pq: Arc::new(PacketQueue::new()),
            audio_pq: Arc::new(PacketQueue::new()),
            video_fq: Arc::new(FrameQueue::new()),
            audio_fq: Arc::new(FrameQueue::new()),
            callbacks,
        }
    }
}
