use bytemuck::Pod;
use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::id::PacketId;

/// Largest decoded frame (header + payload) either endpoint will accept.
pub const MAX_PACKET_SIZE: usize = 1024;

/// Serialized size of [`Header`].
pub const HEADER_SIZE: usize = std::mem::size_of::<Header>();

/// Largest payload that still fits a packet alongside its header.
pub const MAX_PACKET_DATA_SIZE: usize = MAX_PACKET_SIZE - HEADER_SIZE;

/// Largest on-wire frame: a max-size packet after byte stuffing, including
/// the delimiter. Sizes the receive engine's scratch buffer.
pub const MAX_ENCODED_PACKET_SIZE: usize = crate::cobs::max_encoded_len(MAX_PACKET_SIZE);

/// Fixed-layout packet header, exactly one byte on the wire.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Raw identifier byte; see [`PacketId`].
    pub packet_id: u8,
}

const _: () = assert!(std::mem::size_of::<Header>() == 1);

/// Compile-time association between a packet identifier and its payload
/// layout. Each schema implements this once; constructing a packet through
/// [`Packet::new`] stamps the matching identifier into the header.
pub trait Kind {
    /// The identifier this schema is sent under.
    const ID: PacketId;
    /// The fixed payload layout.
    type Data: Pod;
}

/// A typed message: one header byte plus an owned byte payload.
#[derive(Debug, Clone)]
pub struct Packet {
    header: Header,
    data: Bytes,
}

impl Packet {
    /// Build a packet for schema `K`, copying the payload's bytes.
    pub fn new<K: Kind>(data: K::Data) -> Self {
        debug_assert!(std::mem::size_of::<K::Data>() <= MAX_PACKET_DATA_SIZE);
        Self {
            header: Header {
                packet_id: K::ID as u8,
            },
            data: Bytes::copy_from_slice(bytemuck::bytes_of(&data)),
        }
    }

    /// Build a packet from a received header and raw payload bytes.
    ///
    /// Used on the receive path where the payload type is not yet known.
    pub fn from_bytes(header: Header, data: &[u8]) -> Result<Self> {
        if data.len() > MAX_PACKET_DATA_SIZE {
            return Err(FrameError::PayloadTooLarge {
                size: data.len(),
                max: MAX_PACKET_DATA_SIZE,
            });
        }
        Ok(Self {
            header,
            data: Bytes::copy_from_slice(data),
        })
    }

    /// Header byte followed by the payload; the input to frame encoding.
    pub fn serialize(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(HEADER_SIZE + self.data.len());
        out.put_u8(self.header.packet_id);
        out.extend_from_slice(&self.data);
        out.freeze()
    }

    /// The raw identifier byte from the header.
    pub fn id(&self) -> u8 {
        self.header.packet_id
    }

    /// The packet header.
    pub fn header(&self) -> Header {
        self.header
    }

    /// The raw payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reinterpret the payload as schema `K`'s layout.
    ///
    /// The payload length must match the schema exactly; pairing the wrong
    /// schema with a packet surfaces as `DataSizeMismatch` rather than a
    /// garbled read. The payload carries no alignment, hence the unaligned
    /// read.
    pub fn data_as<K: Kind>(&self) -> Result<K::Data> {
        let expected = std::mem::size_of::<K::Data>();
        if self.data.len() != expected {
            return Err(FrameError::DataSizeMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(&self.data))
    }
}
