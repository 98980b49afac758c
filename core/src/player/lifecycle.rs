//! Command execution: the `Open`/`Stop` routines of §4.I and the command
//! worker that runs them.
//!
//! Per the design note on open/stop worker threads, a previous worker's
//! handle is always joined — never detached — before a new one replaces
//! it; `CommandBus` already guarantees at most one is executing, so by
//! the time a caller reaches `spawn_command` the previous handle (if any)
//! has already returned from `run_command_loop` and the join is
//! immediate.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use log::{info, warn};

use crate::collab::{Backend, Demuxer};
use crate::command::Command;
use crate::packet::StreamKind;
use crate::session::SessionShared;
use crate::stage::{audio_render, decode, demux, video_render};
use crate::state::PlayerState;

use super::{Player, SessionThreads};

impl<B: Backend> Player<B> {
    pub(crate) fn dispatch(&self, cmd: Command) {
        if let Some(cmd) = self.command_bus.submit(cmd) {
            self.spawn_command(cmd);
        }
    }

    fn spawn_command(&self, cmd: Command) {
        let player = self.clone();
        let handle = thread::spawn(move || player.run_command_loop(cmd));
        let mut slot = self.command_thread.lock().unwrap();
        if let Some(previous) = slot.take() {
            let _ = previous.join();
        }
        *slot = Some(handle);
    }

    fn run_command_loop(&self, mut cmd: Command) {
        loop {
            match cmd {
                Command::Open { url, .. } => self.do_open(url),
                Command::Stop { .. } => self.do_stop(),
            }
            match self.command_bus.on_command_finished() {
                Some(next) => cmd = next,
                None => break,
            }
        }
    }

    pub(crate) fn join_session(&self) {
        if let Some(session) = self.session_threads.lock().unwrap().take() {
            let _ = session.demux.join();
        }
    }

    fn reset_session_state(&self) {
        self.video_pq.clear();
        self.audio_pq.clear();
        self.video_fq.clear();
        self.audio_fq.clear();
        self.clock.clear();
        self.synced.store(false, Ordering::SeqCst);
        *self.seek_to.lock().unwrap() = None;
        *self.position.lock().unwrap() = 0.0;
        self.end_reached.store(false, Ordering::SeqCst);
        self.seekable.store(false, Ordering::SeqCst);
        *self.duration.lock().unwrap() = None;
    }

    /// §4.I `open`: abort and join any previous session, then spawn a
    /// fresh one. On any failure this leaves the player `Stopped` with
    /// `buffering` cleared, per the `OpenFailed` taxonomy (§7).
    fn do_open(&self, url: String) {
        self.abort.store(true, Ordering::SeqCst);
        self.join_session();
        self.abort.store(false, Ordering::SeqCst);
        self.reset_session_state();
        self.buffering.set(true);
        self.state.force_state(PlayerState::Opening);

        let interrupt = demux::interrupt_poll(self.abort.clone());
        let mut demuxer = self.backend.new_demuxer();
        if let Err(err) = demuxer.open(&url, interrupt) {
            warn!("open failed for {url}: {err}");
            self.buffering.set(false);
            self.state.force_state(PlayerState::Stopped);
            return;
        }

        let streams = demuxer.streams().to_vec();
        let video_stream = streams.iter().find(|s| s.kind == StreamKind::Video).cloned();
        let audio_stream = streams.iter().find(|s| s.kind == StreamKind::Audio).cloned();
        let (video_stream, audio_stream) = match (video_stream, audio_stream) {
            (Some(video), Some(audio)) => (video, audio),
            _ => {
                warn!("{url}: exactly one video and one audio stream are required");
                demuxer.close();
                self.buffering.set(false);
                self.state.force_state(PlayerState::Stopped);
                return;
            }
        };

        let video_decoder = match self.backend.new_video_decoder(&demuxer, &video_stream) {
            Ok(decoder) => decoder,
            Err(err) => {
                warn!("{url}: {err}");
                demuxer.close();
                self.buffering.set(false);
                self.state.force_state(PlayerState::Stopped);
                return;
            }
        };
        let audio_decoder = match self.backend.new_audio_decoder(&demuxer, &audio_stream) {
            Ok(decoder) => decoder,
            Err(err) => {
                warn!("{url}: {err}");
                demuxer.close();
                self.buffering.set(false);
                self.state.force_state(PlayerState::Stopped);
                return;
            }
        };

        self.video_pq.set_time_base(video_stream.time_base);
        self.audio_pq.set_time_base(audio_stream.time_base);
        self.video_fq.set_time_base(video_stream.time_base);
        self.audio_fq.set_time_base(audio_stream.time_base);

        *self.duration.lock().unwrap() = demuxer.duration_seconds();
        self.seekable.store(demuxer.seekable(), Ordering::SeqCst);

        let shared = Arc::new(SessionShared {
            abort: self.abort.clone(),
            state: self.state.clone(),
            clock: self.clock.clone(),
            buffering: self.buffering.clone(),
            seek_to: self.seek_to.clone(),
            position: self.position.clone(),
            config: self.config,
            callbacks: self.callbacks.clone(),
            synced: self.synced.clone(),
            bytes_read_bucket: self.bytes_read_bucket.clone(),
            download_speed: self.download_speed.clone(),
            fps: self.fps.clone(),
            volume: self.volume.clone(),
        });

        let video_sink = self.backend.new_video_sink();
        let audio_sink = self.backend.new_audio_sink();

        let video_render_handle = {
            let fq = self.video_fq.clone();
            let shared = shared.clone();
            let stream = video_stream.clone();
            thread::spawn(move || video_render::run(video_sink, stream, fq, shared))
        };
        let audio_render_handle = {
            let fq = self.audio_fq.clone();
            let shared = shared.clone();
            let stream = audio_stream.clone();
            thread::spawn(move || audio_render::run(audio_sink, stream, fq, shared))
        };
        let video_decode_handle = {
            let pq = self.video_pq.clone();
            let fq = self.video_fq.clone();
            let shared = shared.clone();
            thread::spawn(move || decode::run(StreamKind::Video, video_decoder, pq, fq, shared))
        };
        let audio_decode_handle = {
            let pq = self.audio_pq.clone();
            let fq = self.audio_fq.clone();
            let shared = shared.clone();
            thread::spawn(move || decode::run(StreamKind::Audio, audio_decoder, pq, fq, shared))
        };

        let demux_handle = {
            let inputs = demux::DemuxStageInputs {
                video_pq: self.video_pq.clone(),
                audio_pq: self.audio_pq.clone(),
                video_fq: self.video_fq.clone(),
                audio_fq: self.audio_fq.clone(),
                shared,
                seekable: self.seekable.clone(),
                end_reached: self.end_reached.clone(),
                sibling_handles: vec![
                    video_decode_handle,
                    audio_decode_handle,
                    video_render_handle,
                    audio_render_handle,
                ],
            };
            thread::spawn(move || demux::run(demuxer, inputs))
        };

        *self.session_threads.lock().unwrap() = Some(SessionThreads { demux: demux_handle });
        self.state.force_state(PlayerState::Playing);
        info!("opened {url}");
    }

    /// §4.I `stop`: abort, join every worker (via the demux stage's own
    /// teardown), and finish in `Stopped`.
    fn do_stop(&self) {
        self.state.force_state(PlayerState::Stopping);
        self.abort.store(true, Ordering::SeqCst);
        self.join_session();
        self.state.force_state(PlayerState::Stopped);
    }
}
