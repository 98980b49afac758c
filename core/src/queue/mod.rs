//! Bounded producer/consumer FIFOs between pipeline stages (§4.A, §4.B).

mod frame_queue;
mod packet_queue;

pub use frame_queue::FrameQueue;
pub use packet_queue::PacketQueue;
