//! §4.B FrameQueue — same shape as [`super::PacketQueue`] but without
//! flush markers or a byte-size counter.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::frame::Frame;
use crate::stream::TimeBase;

struct Inner {
    items: VecDeque<Frame>,
    duration_ticks: i64,
    time_base: TimeBase,
}

pub struct FrameQueue {
    inner: Mutex<Inner>,
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                duration_ticks: 0,
                time_base: TimeBase::default(),
            }),
        }
    }

    pub fn set_time_base(&self, time_base: TimeBase) {
        self.inner.lock().unwrap().time_base = time_base;
    }

    pub fn append(&self, frame: Frame) {
        let mut inner = self.inner.lock().unwrap();
        inner.duration_ticks += frame.duration_ticks();
        inner.items.push_back(frame);
    }

    pub fn acquire(&self) -> Option<Frame> {
        let mut inner = self.inner.lock().unwrap();
        let frame = inner.items.pop_front()?;
        inner.duration_ticks -= frame.duration_ticks();
        Some(frame)
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.items.clear();
        inner.duration_ticks = 0;
    }

    pub fn size(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn duration_seconds(&self) -> f64 {
        let inner = self.inner.lock().unwrap();
        inner.time_base.ticks_to_seconds(inner.duration_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{AudioFrame, SampleFormat};

    fn audio_frame(duration_ticks: i64) -> Frame {
        Frame::Audio(AudioFrame {
            pts_ticks: 0,
            duration_ticks,
            sample_format: SampleFormat::F32,
            sample_rate: 48_000,
            channels: 2,
            nb_samples: 1024,
            channel_data: vec![vec![0.0; 1024]; 2],
        })
    }

    #[test]
    fn fifo_order_and_duration_tracking() {
        let q = FrameQueue::new();
        q.set_time_base(TimeBase::new(1, 1000));
        q.append(audio_frame(20));
        q.append(audio_frame(20));
        assert_eq!(q.size(), 2);
        assert!((q.duration_seconds() - 0.04).abs() < 1e-9);
        q.acquire().unwrap();
        assert_eq!(q.size(), 1);
        assert!((q.duration_seconds() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn clear_empties_the_queue() {
        let q = FrameQueue::new();
        q.append(audio_frame(10));
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.duration_seconds(), 0.0);
    }
}
