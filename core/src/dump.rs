//! Read-only diagnostic snapshot (§6 `dump(info)`).

/// A point-in-time snapshot of queue occupancy and clocks, for
/// diagnostics and tests. Never used to drive control flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DumpInfo {
    pub packet_buffer_size: usize,
    pub max_packet_buffer_size: usize,
    pub max_frame_queue_size: usize,
    pub video_packet_queue_size: usize,
    pub audio_packet_queue_size: usize,
    pub video_frame_queue_size: usize,
    pub audio_frame_queue_size: usize,
    pub video_packet_queue_duration: f64,
    pub audio_packet_queue_duration: f64,
    pub video_frame_queue_duration: f64,
    pub audio_frame_queue_duration: f64,
    pub video_clock: f64,
    pub audio_clock: f64,
}
