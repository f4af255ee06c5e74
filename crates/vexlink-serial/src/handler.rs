use std::sync::{Arc, Mutex};

use tracing::{trace, warn};
use vexlink_frame::{
    cobs, Header, Kind, Packet, PacketId, HEADER_SIZE, MAX_ENCODED_PACKET_SIZE, MAX_PACKET_SIZE,
};
use vexlink_transport::{Backend, READ_CHUNK_SIZE};

use crate::buffer::PacketBuffer;
use crate::error::Result;

/// Callback fired when a packet with a given identifier arrives.
///
/// Listeners run on the receiving thread, after the handler's internal lock
/// is released, so they may send, pop buffers, and register or remove
/// listeners. They must not call back into `blocking_receive`/`try_receive`.
pub type Listener<B> = Arc<dyn Fn(&SerialHandler<B>, &Packet) + Send + Sync>;

/// Carrier bytes that have not yet formed a complete frame.
struct RecvBuffer {
    buf: [u8; MAX_ENCODED_PACKET_SIZE],
    next_write_index: usize,
}

impl RecvBuffer {
    fn new() -> Self {
        Self {
            buf: [0; MAX_ENCODED_PACKET_SIZE],
            next_write_index: 0,
        }
    }

    /// Position of the first frame delimiter in the buffered bytes.
    fn delimiter(&self) -> Option<usize> {
        self.buf[..self.next_write_index]
            .iter()
            .position(|&b| b == 0x00)
    }

    /// Free space short of one carrier read: the buffered run is longer
    /// than any legal frame encoding and can never terminate.
    fn out_of_room(&self) -> bool {
        self.next_write_index >= MAX_ENCODED_PACKET_SIZE - READ_CHUNK_SIZE
    }

    /// Extract the frame ending at `delimiter` (exclusive) and compact any
    /// bytes after it to the front of the buffer.
    fn take_frame(&mut self, delimiter: usize) -> Vec<u8> {
        let frame = self.buf[..delimiter].to_vec();
        let consumed = delimiter + 1;
        self.buf.copy_within(consumed..self.next_write_index, 0);
        self.next_write_index -= consumed;
        frame
    }
}

/// Buffer and listener state, guarded together by one mutex so a packet is
/// enqueued and its listener fetched in a single critical section.
struct Shared<B> {
    buffers: [PacketBuffer; PacketId::COUNT],
    listeners: [Option<Listener<B>>; PacketId::COUNT],
}

/// The packet link over one carrier backend.
///
/// Owns the backend for its lifetime; dropping the handler closes the
/// carrier. All operations take `&self`, so a handler behind an `Arc` can
/// receive on one thread while another pops buffers, manages listeners, or
/// sends.
pub struct SerialHandler<B> {
    backend: B,
    recv: Mutex<RecvBuffer>,
    shared: Mutex<Shared<B>>,
}

impl<B: Backend> SerialHandler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            recv: Mutex::new(RecvBuffer::new()),
            shared: Mutex::new(Shared {
                buffers: std::array::from_fn(|_| PacketBuffer::new()),
                listeners: std::array::from_fn(|_| None),
            }),
        }
    }

    /// Encode and transmit one packet.
    ///
    /// A short write is logged and the frame abandoned; the carrier offers
    /// no way to resume mid-frame without interleaving risk.
    pub fn send(&self, packet: &Packet) -> Result<()> {
        let bytes = packet.serialize();
        debug_assert!(bytes.len() <= MAX_PACKET_SIZE);
        let Some(encoded) = cobs::encode(&bytes) else {
            return Ok(());
        };

        let written = self.backend.write(&encoded)?;
        if written < encoded.len() {
            warn!(written, len = encoded.len(), "short carrier write, frame lost");
        }
        Ok(())
    }

    /// Block until exactly one frame has been processed: decoded and
    /// dispatched, or rejected and dropped.
    ///
    /// Carrier read errors and end-of-stream do not return; the loop keeps
    /// asking. Callers that need a cancelable receive close the carrier from
    /// outside and wrap this call.
    pub fn blocking_receive(&self) {
        let mut recv = self.recv.lock().unwrap();
        loop {
            if let Some(position) = recv.delimiter() {
                let frame = recv.take_frame(position);
                // Compact before dispatch: the buffer prefix is clean again
                // even while a listener is running.
                drop(recv);
                self.dispatch(&frame);
                return;
            }

            if recv.out_of_room() {
                trace!(
                    discarded = recv.next_write_index,
                    "unterminated frame run, resetting receive buffer"
                );
                recv.next_write_index = 0;
                continue;
            }

            let start = recv.next_write_index;
            match self.backend.read(&mut recv.buf[start..start + READ_CHUNK_SIZE]) {
                Ok(count) => recv.next_write_index += count,
                Err(err) => warn!(%err, "carrier read failed"),
            }
        }
    }

    /// Process at most one frame without committing to block for one.
    ///
    /// Performs at most one carrier read, then runs the same detection and
    /// dispatch pass as [`blocking_receive`](Self::blocking_receive).
    /// Returns true iff a packet was dispatched during this call.
    pub fn try_receive(&self) -> bool {
        let mut recv = self.recv.lock().unwrap();

        if recv.delimiter().is_none() {
            if recv.out_of_room() {
                trace!(
                    discarded = recv.next_write_index,
                    "unterminated frame run, resetting receive buffer"
                );
                recv.next_write_index = 0;
            }
            let start = recv.next_write_index;
            match self.backend.read(&mut recv.buf[start..start + READ_CHUNK_SIZE]) {
                Ok(count) => recv.next_write_index += count,
                Err(err) => warn!(%err, "carrier read failed"),
            }
        }

        match recv.delimiter() {
            Some(position) => {
                let frame = recv.take_frame(position);
                drop(recv);
                self.dispatch(&frame)
            }
            None => false,
        }
    }

    /// Decode one delimited frame and route the packet. Returns true iff a
    /// packet reached its buffer.
    fn dispatch(&self, frame: &[u8]) -> bool {
        let Some(decoded) = cobs::decode(frame) else {
            trace!(len = frame.len(), "dropping frame that failed to decode");
            return false;
        };

        let raw_id = decoded[0];
        let Some(id) = PacketId::from_u8(raw_id) else {
            trace!(raw_id, "dropping frame with unknown packet id");
            return false;
        };

        let header = Header { packet_id: raw_id };
        let packet = match Packet::from_bytes(header, &decoded[HEADER_SIZE..]) {
            Ok(packet) => packet,
            Err(err) => {
                trace!(%err, "dropping frame");
                return false;
            }
        };

        // Fetch the listener and enqueue under one lock, then invoke outside
        // it so the callback can use the handler freely.
        let listener = {
            let mut shared = self.shared.lock().unwrap();
            let listener = shared.listeners[id.index()].clone();
            shared.buffers[id.index()].add(packet.clone());
            listener
        };
        if let Some(listener) = listener {
            listener(self, &packet);
        }
        true
    }

    /// Remove and return the most recently received packet for schema `K`.
    pub fn pop_latest<K: Kind>(&self) -> Option<Packet> {
        self.shared.lock().unwrap().buffers[K::ID.index()].pop_latest()
    }

    /// Cap the receive buffer for schema `K`; older packets are evicted
    /// first once the cap is hit.
    pub fn set_buffer_max_size<K: Kind>(&self, max_size: usize) {
        self.shared.lock().unwrap().buffers[K::ID.index()].set_max_size(max_size);
    }

    /// Register the listener for schema `K`.
    ///
    /// At most one listener per identifier: returns false and leaves the
    /// existing listener untouched if the slot is occupied.
    pub fn add_listener<K: Kind>(
        &self,
        listener: impl Fn(&SerialHandler<B>, &Packet) + Send + Sync + 'static,
    ) -> bool {
        let mut shared = self.shared.lock().unwrap();
        let slot = &mut shared.listeners[K::ID.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(Arc::new(listener));
        true
    }

    /// Remove the listener for schema `K`, returning whether one existed.
    pub fn remove_listener<K: Kind>(&self) -> bool {
        self.shared.lock().unwrap().listeners[K::ID.index()]
            .take()
            .is_some()
    }

    /// The carrier this handler drives.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use vexlink_frame::types::{Encoder, EncoderData, Optical, OpticalData};
    use vexlink_transport::TransportError;

    use super::*;

    /// Records writes, feeds nothing back.
    #[derive(Default)]
    struct SinkBackend {
        written: Mutex<Vec<u8>>,
    }

    impl Backend for SinkBackend {
        fn read(&self, _dst: &mut [u8]) -> vexlink_transport::Result<usize> {
            Err(TransportError::Io(std::io::Error::other("no data")))
        }

        fn write(&self, src: &[u8]) -> vexlink_transport::Result<usize> {
            self.written.lock().unwrap().extend_from_slice(src);
            Ok(src.len())
        }
    }

    #[test]
    fn send_writes_one_delimited_frame() {
        let handler = SerialHandler::new(SinkBackend::default());
        let packet = Packet::new::<Optical>(OpticalData {
            x: 1.0,
            y: 2.0,
            heading: 3.0,
        });

        handler.send(&packet).unwrap();

        let written = handler.backend().written.lock().unwrap().clone();
        assert_eq!(*written.last().unwrap(), 0x00);
        assert!(!written[..written.len() - 1].contains(&0x00));

        let decoded = cobs::decode(&written[..written.len() - 1]).unwrap();
        assert_eq!(decoded, packet.serialize());
    }

    #[test]
    fn listener_slots_hold_at_most_one() {
        let handler = SerialHandler::new(SinkBackend::default());
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        assert!(handler.add_listener::<Encoder>(move |_, _| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        }));
        // Second registration is refused, first stays.
        assert!(!handler.add_listener::<Encoder>(|_, _| {}));

        assert!(handler.remove_listener::<Encoder>());
        assert!(!handler.remove_listener::<Encoder>());

        // A different identifier is an independent slot.
        assert!(handler.add_listener::<Optical>(|_, _| {}));
        assert!(handler.add_listener::<Encoder>(|_, _| {}));
    }

    #[test]
    fn pop_latest_on_empty_buffer_is_none() {
        let handler = SerialHandler::new(SinkBackend::default());
        assert!(handler.pop_latest::<Encoder>().is_none());
    }

    #[test]
    fn dispatch_routes_by_identifier() {
        let handler = SerialHandler::new(SinkBackend::default());
        let packet = Packet::new::<Encoder>(EncoderData { value: 7.0 });
        let encoded = cobs::encode(&packet.serialize()).unwrap();

        assert!(handler.dispatch(&encoded[..encoded.len() - 1]));

        assert!(handler.pop_latest::<Optical>().is_none());
        let received = handler.pop_latest::<Encoder>().unwrap();
        assert_eq!(received.data_as::<Encoder>().unwrap().value, 7.0);
    }

    #[test]
    fn dispatch_drops_unknown_identifier() {
        let handler = SerialHandler::new(SinkBackend::default());
        // A frame that decodes fine but names an identifier outside the set.
        let encoded = cobs::encode(&[100, 1, 2, 3]).unwrap();
        assert!(!handler.dispatch(&encoded[..encoded.len() - 1]));
    }

    #[test]
    fn dispatch_drops_undecodable_frame() {
        let handler = SerialHandler::new(SinkBackend::default());
        assert!(!handler.dispatch(b"hello world!"));
    }
}
