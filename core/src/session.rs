//! The state one open session's five stages share, independent of which
//! backend produced the packets and frames flowing through it.
//!
//! Per the design note on shared mutable state (§5), every field here is
//! either an atomic or its own small lock; no stage ever needs
//! cross-field atomicity, and a reader that observes a partial update
//! converges on the next loop iteration.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::buffering::Buffering;
use crate::clock::Clock;
use crate::config::PipelineConfig;
use crate::player::PlayerCallbacks;
use crate::state::StateHandle;

pub(crate) struct SessionShared {
    pub abort: Arc<AtomicBool>,
    pub state: Arc<StateHandle>,
    pub clock: Clock,
    pub buffering: Arc<Buffering>,
    pub seek_to: Arc<Mutex<Option<f64>>>,
    pub position: Arc<Mutex<f64>>,
    pub config: PipelineConfig,
    pub callbacks: Arc<Mutex<PlayerCallbacks>>,
    /// Invariant 7's `synced`: gates presentation until the initial A/V
    /// handshake (§4.G/§4.H) completes.
    pub synced: Arc<AtomicBool>,
    /// Bytes read by the demux stage since the last one-second bucket
    /// reset, consumed by the video render stage's download-speed EMA
    /// (§4.G step 1).
    pub bytes_read_bucket: Arc<AtomicUsize>,
    pub download_speed: Arc<Mutex<f64>>,
    pub fps: Arc<AtomicU32>,
    /// Mirrors `Player::set_volume`; the audio render stage applies
    /// changes to its sink as they're observed (§9 Open Question —
    /// volume control).
    pub volume: Arc<Mutex<f32>>,
}

impl SessionShared {
    pub fn fire_position_changed(&self, position: f64) {
        if let Some(cb) = self.callbacks.lock().unwrap().on_position_changed.as_ref() {
            cb(position);
        }
    }

    pub fn update_position_if_drifted(&self, seconds: f64) {
        if self.seek_to.lock().unwrap().is_some() {
            return;
        }
        let mut position = self.position.lock().unwrap();
        if (seconds - *position).abs() > self.config.sync_window_secs {
            *position = seconds;
            drop(position);
            self.fire_position_changed(seconds);
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }
}
