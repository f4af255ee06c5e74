//! Co-processor side loop — answers optical-init requests and echoes text.
//!
//! Run with:
//!   cargo run --example cop-echo
//!
//! The link runs over this process's stdin/stdout, so wire it to the host
//! (or to a pipe for a dry run). Diagnostics go to stderr only.

use vexlink::frame::types::{InitializeOptical, InitializeOpticalComplete, Text};
use vexlink::frame::Packet;
use vexlink::serial::SerialHandler;
use vexlink::transport::StdioBackend;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let handler = SerialHandler::new(StdioBackend::new());

    // Answer a calibration request as soon as it arrives.
    handler.add_listener::<InitializeOptical>(|handler, _packet| {
        tracing::info!("optical init requested, calibrating");
        if let Err(err) = handler.send(&Packet::new::<InitializeOpticalComplete>(())) {
            tracing::warn!(%err, "failed to acknowledge optical init");
        }
    });

    // Echo text packets straight back.
    handler.add_listener::<Text>(|handler, packet| {
        if let Err(err) = handler.send(packet) {
            tracing::warn!(%err, "failed to echo text packet");
        }
    });

    loop {
        handler.blocking_receive();
    }
}
