//! Stream descriptors: the immutable facts discovered about a container's
//! selected video and audio streams at open time.

use crate::packet::StreamKind;

/// Rational time base, converting integer pts ticks to seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBase {
    pub num: u32,
    pub den: u32,
}

impl TimeBase {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    pub fn ticks_to_seconds(&self, ticks: i64) -> f64 {
        if self.den == 0 {
            return 0.0;
        }
        ticks as f64 * self.num as f64 / self.den as f64
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::new(1, 1000)
    }
}

/// Facts about one selected stream, populated at open and held fixed
/// until the container is closed (§3 "Stream descriptor").
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    pub kind: StreamKind,
    pub index: u32,
    pub time_base: TimeBase,
    pub start_time_ticks: i64,
    pub codec_id: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl StreamDescriptor {
    pub fn start_time_seconds(&self) -> f64 {
        self.time_base.ticks_to_seconds(self.start_time_ticks)
    }
}
