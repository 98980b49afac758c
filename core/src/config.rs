//! Tunable pipeline parameters, grouped the way the teacher's settings
//! structs group playback tunables: one field per knob, one constructor
//! default per §4.E/§4.F/§4.G/§4.H.

/// Pipeline-wide tunables. All timings are in milliseconds except the
/// byte and duration thresholds, which match the units §4.E/§4.J use.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Back-pressure ceiling on combined video+audio PacketQueue bytes.
    pub max_packet_buffer_size: usize,
    /// Buffered video duration (PacketQueue + FrameQueue) that clears
    /// buffering once a non-empty video FrameQueue is also observed.
    pub max_buffer_duration_secs: f64,
    /// FrameQueue depth ceiling that gates decoder stages.
    pub max_frame_queue_size: usize,
    /// Half-width of the A/V sync handshake window.
    pub sync_window_secs: f64,
    /// Demux stage poll when back-pressured or awaiting a packet.
    pub demux_poll_ms: u64,
    /// Decode stage poll when back-pressured or awaiting a packet.
    pub decode_poll_ms: u64,
    /// Render stage poll when awaiting a frame.
    pub render_poll_ms: u64,
    /// Render stage poll while paused, buffering, or seeking.
    pub render_gate_poll_ms: u64,
    /// Sync handshake retry interval.
    pub sync_poll_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_packet_buffer_size: 5 * 1024 * 1024,
            max_buffer_duration_secs: 5.0,
            max_frame_queue_size: 40,
            sync_window_secs: 0.3,
            demux_poll_ms: 200,
            decode_poll_ms: 16,
            render_poll_ms: 16,
            render_gate_poll_ms: 100,
            sync_poll_ms: 10,
        }
    }
}
