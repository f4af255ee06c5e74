//! Point-to-point framed packet transport between a host controller and a
//! VEX co-processor.
//!
//! vexlink links two asymmetric endpoints over a byte-stream carrier that
//! does not preserve message boundaries — USB bulk endpoints on the host
//! side, standard input/output on the co-processor side. Either side
//! publishes typed [`Packet`](frame::Packet)s and receives them with bounded
//! memory, unambiguous framing in the presence of inline noise, and correct
//! reassembly when a carrier read splits or batches frames.
//!
//! # Crate Structure
//!
//! - [`transport`] — Carrier backends (stdio, USB bulk behind the `usb`
//!   feature) and the [`Backend`](transport::Backend) seam
//! - [`frame`] — COBS framing codec and the typed packet model
//! - [`serial`] — The [`SerialHandler`](serial::SerialHandler) engine:
//!   streaming receive, per-identifier buffers, listeners, send path

/// Re-export transport types.
pub mod transport {
    pub use vexlink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use vexlink_frame::*;
}

/// Re-export the packet engine.
pub mod serial {
    pub use vexlink_serial::*;
}
