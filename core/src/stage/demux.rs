//! §4.E Demux (read) stage.
//!
//! This stage is the pipeline's supervisor as well as its producer: it is
//! spawned last (after the four decode/render threads are already
//! running) and holds their `JoinHandle`s, so that whichever path ends
//! the session — natural EOS drained here, or an externally set `abort`
//! observed at the top of this loop — the same thread that notices it is
//! the one that joins every sibling, closes the container, and flips the
//! player to `Stopped` (Invariant 5, Invariant 6). A caller that joins
//! *this* stage's handle is guaranteed all five workers have exited.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};

use crate::collab::{Demuxer, InterruptPoll, ReadOutcome};
use crate::packet::StreamKind;
use crate::queue::{FrameQueue, PacketQueue};
use crate::state::PlayerState;

use super::SessionShared;

/// Everything the demux stage needs beyond the demuxer it owns. Bundled
/// the way the teacher's `ThreadContext` bundles a worker thread's
/// captured state, so `Player::do_open` doesn't hand this function a
/// dozen positional arguments.
pub(crate) struct DemuxStageInputs {
    pub video_pq: Arc<PacketQueue>,
    pub audio_pq: Arc<PacketQueue>,
    pub video_fq: Arc<FrameQueue>,
    pub audio_fq: Arc<FrameQueue>,
    pub shared: Arc<SessionShared>,
    pub seekable: Arc<AtomicBool>,
    pub end_reached: Arc<AtomicBool>,
    /// The four decode/render workers, joined here once this stage winds
    /// down (either by abort or by natural end-of-stream).
    pub sibling_handles: Vec<JoinHandle<()>>,
}

pub(crate) fn run<D: Demuxer>(mut demuxer: D, inputs: DemuxStageInputs) {
    let DemuxStageInputs {
        video_pq,
        audio_pq,
        video_fq,
        audio_fq,
        shared,
        seekable,
        end_reached,
        sibling_handles,
    } = inputs;

    let mut eof = false;
    let mut hard_eof = false;

    loop {
        if shared.is_aborted() {
            break;
        }

        // Step 1: seek check.
        if seekable.load(Ordering::SeqCst) {
            let target = { *shared.seek_to.lock().unwrap() };
            if let Some(target) = target {
                shared.buffering.set(true);
                video_pq.clear();
                audio_pq.clear();
                video_fq.clear();
                audio_fq.clear();
                video_pq.append_flush_marker();
                audio_pq.append_flush_marker();
                shared.synced.store(false, Ordering::SeqCst);
                shared.clock.clear();
                eof = false;
                hard_eof = false;

                match demuxer.seek(target) {
                    Ok(()) => {
                        let mut seek_to = shared.seek_to.lock().unwrap();
                        if *seek_to == Some(target) {
                            *seek_to = None;
                        }
                    }
                    Err(err) => {
                        warn!("seek to {target:.3}s failed: {err}");
                        *shared.seek_to.lock().unwrap() = None;
                    }
                }
                continue;
            }
        }

        // Step 2: back-pressure / EOS.
        let buffered_bytes = video_pq.byte_size() + audio_pq.byte_size();
        if buffered_bytes > shared.config.max_packet_buffer_size || eof {
            shared.buffering.set(false);
        }
        if eof
            && video_pq.size() == 0
            && audio_pq.size() == 0
            && video_fq.size() == 0
            && audio_fq.size() == 0
        {
            break;
        }
        if buffered_bytes > shared.config.max_packet_buffer_size {
            thread::sleep(Duration::from_millis(shared.config.demux_poll_ms));
            continue;
        }
        if eof {
            thread::sleep(Duration::from_millis(shared.config.demux_poll_ms));
            continue;
        }

        // Step 3: buffering enter.
        if !shared.buffering.get() && (video_pq.size() == 0 || video_fq.size() == 0) {
            shared.buffering.set(true);
        }

        // Step 4: read one packet.
        match demuxer.read_packet() {
            ReadOutcome::Packet(packet) => {
                shared
                    .bytes_read_bucket
                    .fetch_add(packet.bytes.len(), Ordering::SeqCst);
                match packet.stream {
                    StreamKind::Video => video_pq.append(packet),
                    StreamKind::Audio => audio_pq.append(packet),
                }
            }
            ReadOutcome::Eagain => {
                thread::sleep(Duration::from_millis(shared.config.demux_poll_ms));
            }
            ReadOutcome::Eof { hard } => {
                eof = true;
                hard_eof = hard;
            }
        }

        // Step 6: buffering exit.
        if shared.buffering.get() {
            let buffered_video_duration = video_pq.duration_seconds() + video_fq.duration_seconds();
            if buffered_video_duration >= shared.config.max_buffer_duration_secs
                && video_fq.size() > 0
            {
                shared.buffering.set(false);
            }
        }
    }

    // Wind-down: whether we got here by abort or by natural EOS, every
    // other stage must observe `abort` and exit before we can declare
    // the session over. Resets every field the original's teardown
    // resets (`mSeekable`, `mSeekToPosition`, `mTotalBytes`,
    // `mDownloadSpeed`, `mFps`, `mSynced`) so the session's observable
    // state doesn't stay stale once `Stopped` is reached.
    shared.abort.store(true, Ordering::SeqCst);
    for handle in sibling_handles {
        let _ = handle.join();
    }
    demuxer.close();
    shared.clock.clear();
    shared.buffering.set(false);
    end_reached.store(eof && hard_eof, Ordering::SeqCst);
    seekable.store(false, Ordering::SeqCst);
    *shared.seek_to.lock().unwrap() = None;
    shared.synced.store(false, Ordering::SeqCst);
    shared.bytes_read_bucket.store(0, Ordering::SeqCst);
    *shared.download_speed.lock().unwrap() = 0.0;
    shared.fps.store(0, Ordering::SeqCst);
    shared.state.force_state(PlayerState::Stopped);
    info!("demux stage wound down session (hard_eof={})", hard_eof);
}

/// Builds the `InterruptPoll` closure handed to `Demuxer::open`: a plain
/// `Arc<dyn Fn>` reading the player's shared abort flag, per the design
/// note modelling the interrupt callback's cyclic reference as a weak,
/// structurally-nested reference rather than a raw pointer.
pub(crate) fn interrupt_poll(abort: Arc<AtomicBool>) -> InterruptPoll {
    Arc::new(move || abort.load(Ordering::SeqCst))
}
