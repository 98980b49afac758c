//! §4.H Audio render stage — audio is the master clock; video catches up
//! or drops frames to maintain lip-sync with it.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::collab::AudioSink;
use crate::frame::Frame;
use crate::queue::FrameQueue;
use crate::state::PlayerState;
use crate::stream::StreamDescriptor;

use super::SessionShared;

pub(crate) fn run<AS: AudioSink>(
    mut sink: AS,
    stream: StreamDescriptor,
    fq: Arc<FrameQueue>,
    shared: Arc<SessionShared>,
) {
    let mut sink_opened = false;
    let mut was_paused = false;
    let mut applied_volume: Option<f32> = None;

    loop {
        if shared.is_aborted() {
            break;
        }

        if sink_opened {
            let current = *shared.volume.lock().unwrap();
            if applied_volume != Some(current) {
                sink.set_volume(current);
                applied_volume = Some(current);
            }
        }

        // Step 1: paused flag, seeking, and buffering gates.
        let state = shared.state.get();
        if state == PlayerState::Paused {
            if !was_paused {
                sink.stop();
                was_paused = true;
            }
            thread::sleep(Duration::from_millis(shared.config.render_gate_poll_ms));
            continue;
        }
        was_paused = false;
        if shared.seek_to.lock().unwrap().is_some() || shared.buffering.get() {
            thread::sleep(Duration::from_millis(shared.config.render_gate_poll_ms));
            continue;
        }

        // Step 2: acquire one frame.
        let frame = match fq.acquire() {
            Some(Frame::Audio(frame)) => frame,
            Some(Frame::Video(_)) => continue, // audio FrameQueue never holds video frames
            None => {
                thread::sleep(Duration::from_millis(shared.config.render_poll_ms));
                continue;
            }
        };

        // Lazily open the sink from the first decoded frame's shape.
        if !sink_opened {
            sink.open(frame.descriptor());
            sink_opened = true;
        }

        // Step 3: first frame ever anchors clock_base; update audio clock.
        shared.clock.ensure_clock_base(shared.clock.system());
        shared
            .clock
            .set_audio_pts(frame.pts_ticks, stream.time_base, stream.start_time_ticks);

        // Step 4: initial A/V sync handshake.
        if !shared.synced.load(Ordering::SeqCst) {
            let mut dropped = false;
            loop {
                if shared.is_aborted() {
                    sink.close();
                    return;
                }
                if !shared.clock.video_observed() {
                    thread::sleep(Duration::from_millis(shared.config.sync_poll_ms));
                    continue;
                }
                let diff = shared.clock.video_seconds() - shared.clock.audio_seconds();
                if diff >= shared.config.sync_window_secs {
                    dropped = true;
                    break;
                } else if diff <= -shared.config.sync_window_secs {
                    thread::sleep(Duration::from_millis(shared.config.sync_poll_ms));
                    continue;
                } else {
                    shared.synced.store(true, Ordering::SeqCst);
                    break;
                }
            }
            if dropped {
                continue;
            }
        }

        // Step 5: render, blocking up to one buffer slot, then pace.
        let committed = sink.render(&frame);
        let frame_duration = stream.time_base.ticks_to_seconds(frame.duration_ticks);
        let slack = if committed { 0.01 } else { 0.0 };
        let sleep_for = (frame_duration - slack).max(0.0);
        if sleep_for > 0.0 {
            thread::sleep(Duration::from_secs_f64(sleep_for));
        }
    }

    if sink_opened {
        sink.close();
    }
}
