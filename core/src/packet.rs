//! Demuxed, still-encoded units travelling from the demux stage to the
//! per-kind decoder stages.

/// Which media kind a stream, packet, or frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
}

/// One encoded unit read from the container.
#[derive(Debug, Clone)]
pub struct DataPacket {
    pub stream: StreamKind,
    pub bytes: Vec<u8>,
    pub duration_ticks: i64,
    pub pts_ticks: i64,
}

/// A PacketQueue element: real data, or the flush marker.
///
/// The original design used an identity-compared zero-byte sentinel
/// packet sharing the queue with real data; here the marker is its own
/// variant, per the type-safe rewrite this crate follows (a `Packet |
/// FlushMarker` sum type rather than a sentinel pointer).
#[derive(Debug, Clone)]
pub enum Packet {
    Data(DataPacket),
    FlushMarker,
}

impl Packet {
    pub fn is_flush_marker(&self) -> bool {
        matches!(self, Packet::FlushMarker)
    }

    pub fn byte_size(&self) -> usize {
        match self {
            Packet::Data(p) => p.bytes.len(),
            Packet::FlushMarker => 0,
        }
    }

    pub fn duration_ticks(&self) -> i64 {
        match self {
            Packet::Data(p) => p.duration_ticks,
            Packet::FlushMarker => 0,
        }
    }

    pub fn as_data(&self) -> Option<&DataPacket> {
        match self {
            Packet::Data(p) => Some(p),
            Packet::FlushMarker => None,
        }
    }
}
