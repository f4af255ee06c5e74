//! The vexlink packet engine: streaming receive, typed routing, send path.
//!
//! [`SerialHandler`] drives one carrier [`Backend`](vexlink_transport::Backend):
//! it accumulates carrier chunks until a frame delimiter appears, decodes the
//! frame, and routes the packet to its per-identifier buffer and listener.
//! Frames that fail to decode or name an unknown identifier are dropped
//! silently — the link favors staying alive over reporting noise.

pub mod buffer;
pub mod error;
pub mod handler;

pub use buffer::PacketBuffer;
pub use error::{Result, SerialError};
pub use handler::{Listener, SerialHandler};
