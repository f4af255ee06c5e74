use std::collections::VecDeque;

use vexlink_frame::Packet;

/// Per-identifier queue of received packets, newest at the back.
///
/// The link carries sensor snapshots and one-shot signals, not a reliable
/// log, so the consumer wants the freshest value: when the queue is capped
/// and full, the oldest packets are evicted to make room.
pub struct PacketBuffer {
    packets: VecDeque<Packet>,
    max_size: usize,
}

impl PacketBuffer {
    pub(crate) fn new() -> Self {
        Self {
            packets: VecDeque::new(),
            // Effectively unlimited until a consumer sets a cap.
            max_size: usize::MAX,
        }
    }

    /// Cap the queue. Existing contents are not trimmed until the next add.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    /// Append a packet, evicting from the front if the cap is reached.
    /// A cap of zero discards everything.
    pub(crate) fn add(&mut self, packet: Packet) {
        if self.max_size == 0 {
            return;
        }
        while self.packets.len() >= self.max_size {
            self.packets.pop_front();
        }
        self.packets.push_back(packet);
    }

    /// Remove and return the most recent packet.
    pub fn pop_latest(&mut self) -> Option<Packet> {
        self.packets.pop_back()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}
