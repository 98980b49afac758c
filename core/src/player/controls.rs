//! §6 public controls: the small surface an embedder actually calls.
//! `open`/`stop` go through the command bus (§4.D); everything else
//! either reads shared state directly or flips a flag a worker stage
//! observes on its next loop iteration.

use std::sync::atomic::Ordering;

use crate::collab::Backend;
use crate::command::Command;
use crate::dump::DumpInfo;
use crate::frame::VideoFrame;
use crate::state::PlayerState;

use super::Player;

impl<B: Backend> Player<B> {
    /// Opens `url`, superseding any session already open or opening.
    ///
    /// `abort` is raised synchronously, before the command even reaches
    /// the bus, so that a blocking `Demuxer::open`/`read_packet` in a
    /// session this call supersedes is interrupted immediately rather
    /// than only once its worker thread gets around to executing the
    /// queued command.
    pub fn open(&self, url: impl Into<String>) {
        self.abort.store(true, Ordering::SeqCst);
        let id = self.command_bus.next_id();
        self.dispatch(Command::Open { id, url: url.into() });
    }

    /// Stops any open or opening session, superseding a queued `open`.
    pub fn stop(&self) {
        self.abort.store(true, Ordering::SeqCst);
        let id = self.command_bus.next_id();
        self.dispatch(Command::Stop { id });
    }

    /// Resumes from `Paused`. A no-op outside that state.
    pub fn play(&self) -> bool {
        self.state.change_state(PlayerState::Paused, PlayerState::Playing)
    }

    /// Pauses from `Playing`. A no-op outside that state.
    pub fn pause(&self) -> bool {
        self.state.change_state(PlayerState::Playing, PlayerState::Paused)
    }

    pub fn toggle_pause(&self) {
        match self.state.get() {
            PlayerState::Playing => {
                self.pause();
            }
            PlayerState::Paused => {
                self.play();
            }
            _ => {}
        }
    }

    /// Requests a seek to `position_seconds`. A no-op if the open stream
    /// isn't seekable; otherwise the demux stage picks this up on its
    /// next loop iteration (§4.E step 1). Clamped to `[0, duration]` and
    /// optimistically reflected in `position()` immediately, matching the
    /// original's `mSeekToPosition = pos; mPosition = pos;`.
    pub fn seek(&self, position_seconds: f64) {
        if !self.seekable.load(Ordering::SeqCst) {
            return;
        }
        let mut pos = position_seconds.max(0.0);
        if let Some(duration) = *self.duration.lock().unwrap() {
            pos = pos.min(duration);
        }
        *self.seek_to.lock().unwrap() = Some(pos);
        *self.position.lock().unwrap() = pos;
    }

    pub fn set_volume(&self, volume: f32) {
        *self.volume.lock().unwrap() = volume;
    }

    pub fn volume(&self) -> f32 {
        *self.volume.lock().unwrap()
    }

    pub fn state(&self) -> PlayerState {
        self.state.get()
    }

    pub fn position(&self) -> f64 {
        *self.position.lock().unwrap()
    }

    pub fn duration(&self) -> Option<f64> {
        *self.duration.lock().unwrap()
    }

    pub fn seekable(&self) -> bool {
        self.seekable.load(Ordering::SeqCst)
    }

    pub fn buffering(&self) -> bool {
        self.buffering.get()
    }

    pub fn end_reached(&self) -> bool {
        self.end_reached.load(Ordering::SeqCst)
    }

    pub fn download_speed(&self) -> f64 {
        *self.download_speed.lock().unwrap()
    }

    pub fn fps(&self) -> u32 {
        self.fps.load(Ordering::SeqCst)
    }

    pub fn set_on_video_render<F>(&self, callback: F)
    where
        F: Fn(&VideoFrame) + Send + Sync + 'static,
    {
        self.callbacks.lock().unwrap().on_video_render = Some(Box::new(callback));
    }

    pub fn set_on_position_changed<F>(&self, callback: F)
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.callbacks.lock().unwrap().on_position_changed = Some(Box::new(callback));
    }

    pub fn set_on_state_changed<F>(&self, callback: F)
    where
        F: Fn(PlayerState) + Send + Sync + 'static,
    {
        self.callbacks.lock().unwrap().on_state_changed = Some(Box::new(callback));
    }

    pub fn set_on_buffering_changed<F>(&self, callback: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks.lock().unwrap().on_buffering_changed = Some(Box::new(callback));
    }

    /// Read-only diagnostic snapshot (§6 `dump`), never used to drive
    /// control flow.
    pub fn dump(&self) -> DumpInfo {
        DumpInfo {
            packet_buffer_size: self.video_pq.byte_size() + self.audio_pq.byte_size(),
            max_packet_buffer_size: self.config.max_packet_buffer_size,
            max_frame_queue_size: self.config.max_frame_queue_size,
            video_packet_queue_size: self.video_pq.size(),
            audio_packet_queue_size: self.audio_pq.size(),
            video_frame_queue_size: self.video_fq.size(),
            audio_frame_queue_size: self.audio_fq.size(),
            video_packet_queue_duration: self.video_pq.duration_seconds(),
            audio_packet_queue_duration: self.audio_pq.duration_seconds(),
            video_frame_queue_duration: self.video_fq.duration_seconds(),
            audio_frame_queue_duration: self.audio_fq.duration_seconds(),
            video_clock: self.clock.video_seconds(),
            audio_clock: self.clock.audio_seconds(),
        }
    }
}
