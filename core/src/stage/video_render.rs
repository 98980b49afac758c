//! §4.G Video render stage.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::collab::VideoSink;
use crate::frame::Frame;
use crate::state::PlayerState;
use crate::stream::StreamDescriptor;

use super::SessionShared;

pub(crate) fn run<VS: VideoSink>(
    mut sink: VS,
    stream: StreamDescriptor,
    fq: Arc<crate::queue::FrameQueue>,
    shared: Arc<SessionShared>,
) {
    let mut bucket_started = Instant::now();
    let mut frames_in_bucket: u32 = 0;

    loop {
        if shared.is_aborted() {
            break;
        }

        // Step 1: one-second fps/download-speed bucket.
        if bucket_started.elapsed() >= Duration::from_secs(1) {
            let bytes = shared.bytes_read_bucket.swap(0, Ordering::SeqCst);
            let mut download_speed = shared.download_speed.lock().unwrap();
            *download_speed = (*download_speed * 5.0 + bytes as f64 * 3.0) / 8.0;
            drop(download_speed);
            shared.fps.store(frames_in_bucket, Ordering::SeqCst);
            frames_in_bucket = 0;
            bucket_started = Instant::now();
        }

        // Step 2: gates.
        let gated = shared.buffering.get()
            || shared.state.get() == PlayerState::Paused
            || shared.seek_to.lock().unwrap().is_some();
        if gated {
            thread::sleep(Duration::from_millis(shared.config.render_gate_poll_ms));
            continue;
        }

        // Step 3: acquire one frame.
        let frame = match fq.acquire() {
            Some(Frame::Video(frame)) => frame,
            Some(Frame::Audio(_)) => continue, // video FrameQueue never holds audio frames
            None => {
                thread::sleep(Duration::from_millis(shared.config.render_poll_ms));
                continue;
            }
        };

        // Step 4: first frame ever this session anchors the wall-clock base.
        shared.clock.ensure_clock_base(shared.clock.system());

        // Step 5: update the video clock.
        shared
            .clock
            .set_video_pts(frame.pts_ticks, stream.time_base, stream.start_time_ticks);

        // Step 6: initial A/V sync handshake.
        if !shared.synced.load(Ordering::SeqCst) {
            let mut dropped = false;
            loop {
                if shared.is_aborted() {
                    return;
                }
                if shared.state.get() != PlayerState::Playing || !shared.clock.audio_observed() {
                    thread::sleep(Duration::from_millis(shared.config.sync_poll_ms));
                    continue;
                }
                let diff = shared.clock.video_seconds() - shared.clock.audio_seconds();
                if diff >= shared.config.sync_window_secs {
                    thread::sleep(Duration::from_millis(shared.config.sync_poll_ms));
                    continue;
                } else if diff <= -shared.config.sync_window_secs {
                    dropped = true;
                    break;
                } else {
                    shared.synced.store(true, Ordering::SeqCst);
                    break;
                }
            }
            if dropped {
                continue;
            }
        }

        // Step 7: present.
        sink.present(&frame);
        frames_in_bucket += 1;
        if let Some(callback) = shared.callbacks.lock().unwrap().on_video_render.as_ref() {
            callback(&frame);
        }

        // Step 8: position tracking.
        shared.update_position_if_drifted(shared.clock.video_seconds());

        // Step 9: pace against the master clock.
        let frame_duration = stream.time_base.ticks_to_seconds(frame.duration_ticks);
        let delay = (shared.clock.video_seconds() - shared.clock.master_seconds())
            .min(frame_duration * 2.0);
        if delay > 0.0 {
            thread::sleep(Duration::from_secs_f64(delay));
        }
    }
}
