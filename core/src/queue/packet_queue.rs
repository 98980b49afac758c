//! §4.A PacketQueue.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::packet::{DataPacket, Packet};
use crate::stream::TimeBase;

struct Inner {
    items: VecDeque<Packet>,
    byte_size: usize,
    duration_ticks: i64,
    time_base: TimeBase,
}

/// Thread-safe FIFO of encoded packets, with an inline flush marker and
/// running byte-size/duration totals (Invariant 2).
///
/// `acquire` never blocks; callers that find the queue empty poll again
/// after a short sleep, per the design's no-busy-wait suspension points.
pub struct PacketQueue {
    inner: Mutex<Inner>,
}

impl Default for PacketQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                byte_size: 0,
                duration_ticks: 0,
                time_base: TimeBase::default(),
            }),
        }
    }

    pub fn set_time_base(&self, time_base: TimeBase) {
        self.inner.lock().unwrap().time_base = time_base;
    }

    pub fn append(&self, packet: DataPacket) {
        let mut inner = self.inner.lock().unwrap();
        inner.byte_size += packet.bytes.len();
        inner.duration_ticks += packet.duration_ticks;
        inner.items.push_back(Packet::Data(packet));
    }

    pub fn append_flush_marker(&self) {
        self.inner.lock().unwrap().items.push_back(Packet::FlushMarker);
    }

    /// Non-blocking pop; `None` when empty.
    pub fn acquire(&self) -> Option<Packet> {
        let mut inner = self.inner.lock().unwrap();
        let packet = inner.items.pop_front()?;
        if let Packet::Data(ref data) = packet {
            inner.byte_size -= data.bytes.len();
            inner.duration_ticks -= data.duration_ticks;
        }
        Some(packet)
    }

    /// Releases all contained packets (including any markers).
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.items.clear();
        inner.byte_size = 0;
        inner.duration_ticks = 0;
    }

    pub fn size(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn byte_size(&self) -> usize {
        self.inner.lock().unwrap().byte_size
    }

    pub fn duration_seconds(&self) -> f64 {
        let inner = self.inner.lock().unwrap();
        inner.time_base.ticks_to_seconds(inner.duration_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::StreamKind;

    fn packet(bytes: usize, duration_ticks: i64) -> DataPacket {
        DataPacket {
            stream: StreamKind::Video,
            bytes: vec![0u8; bytes],
            duration_ticks,
            pts_ticks: 0,
        }
    }

    #[test]
    fn tracks_byte_size_and_duration() {
        let q = PacketQueue::new();
        q.set_time_base(TimeBase::new(1, 1000));
        q.append(packet(100, 40));
        q.append(packet(200, 40));
        assert_eq!(q.byte_size(), 300);
        assert_eq!(q.size(), 2);
        assert!((q.duration_seconds() - 0.08).abs() < 1e-9);

        let first = q.acquire().unwrap();
        assert_eq!(first.byte_size(), 100);
        assert_eq!(q.byte_size(), 200);
        assert!((q.duration_seconds() - 0.04).abs() < 1e-9);
    }

    #[test]
    fn clear_releases_everything_including_markers() {
        let q = PacketQueue::new();
        q.append(packet(10, 1));
        q.append_flush_marker();
        q.append(packet(10, 1));
        q.clear();
        assert_eq!(q.size(), 0);
        assert_eq!(q.byte_size(), 0);
        assert!(q.acquire().is_none());
    }

    #[test]
    fn flush_marker_carries_no_bytes_or_duration() {
        let q = PacketQueue::new();
        q.append_flush_marker();
        assert_eq!(q.byte_size(), 0);
        let popped = q.acquire().unwrap();
        assert!(popped.is_flush_marker());
    }

    #[test]
    fn acquire_on_empty_queue_returns_none() {
        let q = PacketQueue::new();
        assert!(q.acquire().is_none());
    }
}
