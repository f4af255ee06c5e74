//! Host side monitor — opens the brain over USB and prints pose updates.
//!
//! Run with:
//!   cargo run --example host-monitor --features usb
//!
//! Requires a connected brain and permission to claim its USB interfaces.

use vexlink::frame::types::{InitializeOptical, InitializeOpticalComplete, Optical};
use vexlink::frame::Packet;
use vexlink::serial::SerialHandler;
use vexlink::transport::UsbBackend;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let backend = UsbBackend::open()?;
    let handler = SerialHandler::new(backend);

    handler.add_listener::<InitializeOpticalComplete>(|_, _| {
        tracing::info!("optical sensor calibrated");
    });

    handler.send(&Packet::new::<InitializeOptical>(()))?;

    loop {
        handler.blocking_receive();
        while let Some(packet) = handler.pop_latest::<Optical>() {
            if let Ok(pose) = packet.data_as::<Optical>() {
                println!("x={:.3} y={:.3} heading={:.3}", pose.x, pose.y, pose.heading);
            }
        }
    }
}
