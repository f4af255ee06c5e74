//! Carrier backends for vexlink.
//!
//! The link runs over byte streams that do not preserve message boundaries:
//! USB bulk endpoints on the host side, standard input/output on the
//! co-processor side. [`Backend`] is the seam between the framing engine
//! and those carriers — production and test backends are interchangeable,
//! and the engine never knows which it is driving.

pub mod error;
pub mod stdio;
pub mod traits;

#[cfg(feature = "usb")]
pub mod usb;

pub use error::{Result, TransportError};
pub use stdio::StdioBackend;
pub use traits::{Backend, READ_CHUNK_SIZE};

#[cfg(feature = "usb")]
pub use usb::UsbBackend;
