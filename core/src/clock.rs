//! Per-stream clocks, drift correction, and master-clock selection
//! (§4.C).
//!
//! Scalar fields are individually guarded rather than atomic-typed:
//! `std` has no `AtomicF64`, and the design note on shared mutable state
//! explicitly allows modelling these as independent cells with relaxed
//! consistency — a reader that sees a partial update converges on the
//! next iteration rather than needing cross-field atomicity.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::stream::TimeBase;

#[derive(Debug, Default)]
struct ClockInner {
    video_pts_seconds: f64,
    audio_pts_seconds: f64,
    video_drift_seconds: Option<f64>,
    audio_drift_seconds: Option<f64>,
    clock_base: Option<f64>,
    video_observed: bool,
    audio_observed: bool,
}

/// Cheaply cloneable handle onto one open session's shared clock state.
#[derive(Debug, Clone)]
pub struct Clock(Arc<Mutex<ClockInner>>);

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(ClockInner::default())))
    }

    /// Monotonic-enough wall clock, seconds since the epoch.
    pub fn system(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }

    /// Sets `clock_base` if unset, returns the (possibly just-set) base.
    /// Invariant 4: set at most once per open session.
    pub fn ensure_clock_base(&self, now: f64) -> f64 {
        let mut inner = self.0.lock().unwrap();
        *inner.clock_base.get_or_insert(now)
    }

    pub fn clock_base(&self) -> Option<f64> {
        self.0.lock().unwrap().clock_base
    }

    pub fn set_video_pts(&self, pts_ticks: i64, time_base: TimeBase, start_time_ticks: i64) {
        let mut inner = self.0.lock().unwrap();
        inner
            .video_drift_seconds
            .get_or_insert_with(|| time_base.ticks_to_seconds(start_time_ticks));
        inner.video_pts_seconds = time_base.ticks_to_seconds(pts_ticks);
        inner.video_observed = true;
    }

    pub fn set_audio_pts(&self, pts_ticks: i64, time_base: TimeBase, start_time_ticks: i64) {
        let mut inner = self.0.lock().unwrap();
        inner
            .audio_drift_seconds
            .get_or_insert_with(|| time_base.ticks_to_seconds(start_time_ticks));
        inner.audio_pts_seconds = time_base.ticks_to_seconds(pts_ticks);
        inner.audio_observed = true;
    }

    pub fn video_seconds(&self) -> f64 {
        let inner = self.0.lock().unwrap();
        inner.video_pts_seconds - inner.video_drift_seconds.unwrap_or(0.0)
    }

    pub fn audio_seconds(&self) -> f64 {
        let inner = self.0.lock().unwrap();
        inner.audio_pts_seconds - inner.audio_drift_seconds.unwrap_or(0.0)
    }

    pub fn video_observed(&self) -> bool {
        self.0.lock().unwrap().video_observed
    }

    pub fn audio_observed(&self) -> bool {
        self.0.lock().unwrap().audio_observed
    }

    /// Audio clock whenever audio has been observed, else video.
    pub fn master_seconds(&self) -> f64 {
        let inner = self.0.lock().unwrap();
        if inner.audio_observed {
            inner.audio_pts_seconds - inner.audio_drift_seconds.unwrap_or(0.0)
        } else {
            inner.video_pts_seconds - inner.video_drift_seconds.unwrap_or(0.0)
        }
    }

    /// Resets all fields; called when a session ends or a seek begins.
    pub fn clear(&self) {
        *self.0.lock().unwrap() = ClockInner::default();
    }
}
