//! The payload schemas both endpoints agree on.
//!
//! Every schema is a plain `#[repr(C)]` record with a stable layout and a
//! marker type tying it to its [`PacketId`]. Layouts only ever grow by
//! appending fields, and both sides must be rebuilt together when they do.

use bytemuck::{Pod, Zeroable};

use crate::id::PacketId;
use crate::packet::{Kind, MAX_PACKET_DATA_SIZE};

/// Pose snapshot reported by the optical sensor.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OpticalData {
    /// Field coordinates, in meters.
    pub x: f64,
    pub y: f64,
    /// Heading, in radians.
    pub heading: f64,
}

const _: () = assert!(std::mem::size_of::<OpticalData>() == 24);

/// Reading from the custom encoders.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct EncoderData {
    /// The encoder value.
    pub value: f64,
}

/// Free-form text payload filling the whole packet budget. Shorter messages
/// are NUL-padded.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct TextData {
    pub text: [u8; MAX_PACKET_DATA_SIZE],
}

impl TextData {
    /// Build a text payload from a string, truncating past the budget.
    pub fn new(s: &str) -> Self {
        let mut data = Self::zeroed();
        let len = s.len().min(MAX_PACKET_DATA_SIZE);
        data.text[..len].copy_from_slice(&s.as_bytes()[..len]);
        data
    }
}

/// Optical sensor pose snapshot, sent by the co-processor.
pub struct Optical;

impl Kind for Optical {
    const ID: PacketId = PacketId::Optical;
    type Data = OpticalData;
}

/// Host request to zero the readings and calibrate the optical sensor.
pub struct InitializeOptical;

impl Kind for InitializeOptical {
    const ID: PacketId = PacketId::InitializeOptical;
    type Data = ();
}

/// Co-processor signal that optical calibration finished.
pub struct InitializeOpticalComplete;

impl Kind for InitializeOpticalComplete {
    const ID: PacketId = PacketId::InitializeOpticalComplete;
    type Data = ();
}

/// Free-form text, mostly for debugging.
pub struct Text;

impl Kind for Text {
    const ID: PacketId = PacketId::Text;
    type Data = TextData;
}

/// Custom encoder reading, sent by the co-processor.
pub struct Encoder;

impl Kind for Encoder {
    const ID: PacketId = PacketId::Encoder;
    type Data = EncoderData;
}
