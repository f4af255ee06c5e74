//! The closed set of packet identifiers shared by both endpoints.

/// Identifies the payload schema of a packet.
///
/// The discriminants are the on-wire header byte; both endpoints must agree
/// on them, so new identifiers are only ever appended.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketId {
    /// Pose snapshot from the optical sensor.
    Optical = 0,
    /// Host request to zero and calibrate the optical sensor.
    InitializeOptical = 1,
    /// Co-processor signal that optical calibration finished.
    InitializeOpticalComplete = 2,
    /// Free-form text, mostly for debugging.
    Text = 3,
    /// Reading from the custom encoders.
    Encoder = 4,
}

impl PacketId {
    /// Number of defined identifiers. Sizes the per-identifier buffer and
    /// listener arrays.
    pub const COUNT: usize = 5;

    /// Map a received header byte back to an identifier.
    ///
    /// Returns `None` for bytes outside the closed set; the receive engine
    /// drops such frames.
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Optical),
            1 => Some(Self::InitializeOptical),
            2 => Some(Self::InitializeOpticalComplete),
            3 => Some(Self::Text),
            4 => Some(Self::Encoder),
            _ => None,
        }
    }

    /// Index into arrays sized by [`PacketId::COUNT`].
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_roundtrips_every_id() {
        for raw in 0..PacketId::COUNT as u8 {
            let id = PacketId::from_u8(raw).unwrap();
            assert_eq!(id as u8, raw);
            assert_eq!(id.index(), raw as usize);
        }
    }

    #[test]
    fn from_u8_rejects_unknown_bytes() {
        assert!(PacketId::from_u8(PacketId::COUNT as u8).is_none());
        assert!(PacketId::from_u8(100).is_none());
        assert!(PacketId::from_u8(u8::MAX).is_none());
    }
}
