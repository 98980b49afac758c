//! §4.F Decoder stages — one instantiation of this loop per kind.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::warn;

use crate::collab::{DecodeOutcome, StreamDecoder};
use crate::packet::StreamKind;
use crate::queue::{FrameQueue, PacketQueue};

use super::SessionShared;

pub(crate) fn run<Dec: StreamDecoder>(
    kind: StreamKind,
    mut decoder: Dec,
    pq: Arc<PacketQueue>,
    fq: Arc<FrameQueue>,
    shared: Arc<SessionShared>,
) {
    loop {
        if shared.is_aborted() {
            break;
        }

        // Step 1: back-pressure against render.
        if fq.size() > shared.config.max_frame_queue_size {
            thread::sleep(Duration::from_millis(shared.config.decode_poll_ms));
            continue;
        }

        // Step 2: acquire one packet.
        let packet = match pq.acquire() {
            Some(packet) => packet,
            None => {
                thread::sleep(Duration::from_millis(shared.config.decode_poll_ms));
                continue;
            }
        };

        // Step 3: flush marker resets decoder and both of this stream's
        // queues (Invariant 3: no pre-marker frame may follow the marker).
        if packet.is_flush_marker() {
            pq.clear();
            fq.clear();
            decoder.flush();
            continue;
        }

        let data = packet
            .as_data()
            .expect("a non-marker Packet always carries DataPacket");

        // Step 4/5: feed the codec; drop frames produced mid-seek (they
        // belong to the pre-seek position).
        match decoder.decode(data) {
            DecodeOutcome::Frame(frame) => {
                if shared.seek_to.lock().unwrap().is_none() {
                    fq.append(frame);
                }
            }
            DecodeOutcome::NoFrame => {}
            DecodeOutcome::Err(message) => {
                warn!("{kind:?} decode error, dropping packet: {message}");
            }
        }
    }
}
