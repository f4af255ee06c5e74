use std::time::Duration;

use rusb::{Direction, GlobalContext, Recipient, RequestType};
use tracing::{debug, info, warn};

use crate::error::{Result, TransportError};
use crate::traits::{Backend, READ_CHUNK_SIZE};

/// Every brain ships with the same vendor id.
pub const VENDOR_ID: u16 = 0x2888;

/// CDC interface used for firmware communication. Only touched to set the
/// line coding.
const COMMUNICATIONS_INTERFACE: u8 = 0x00;
/// User interface; its line coding must also be set before the brain treats
/// bulk transfers as standard input/output.
const USER_INTERFACE: u8 = 0x02;
/// Interface carrying the user bulk endpoints.
const USER_DATA_INTERFACE: u8 = 0x03;

/// Bulk IN endpoint on the user data interface.
const BULK_ENDPOINT_IN: u8 = 0x85;
/// Bulk OUT endpoint on the user data interface.
const BULK_ENDPOINT_OUT: u8 = 0x06;

/// CDC class request to set the line coding.
const SET_LINE_CODING: u8 = 0x20;
/// 9600 baud little-endian, one stop bit, no parity, eight data bits.
const LINE_CODING: [u8; 7] = [0x80, 0x25, 0x00, 0x00, 0x00, 0x00, 0x08];

const SETUP_TIMEOUT: Duration = Duration::from_secs(1);

/// Host carrier: bulk transfers to the first brain on the bus.
///
/// Transfers block with no timeout; a receive parked in `read` only returns
/// when data arrives or the device goes away.
pub struct UsbBackend {
    handle: rusb::DeviceHandle<GlobalContext>,
}

impl UsbBackend {
    /// Find the first device matching [`VENDOR_ID`], detach kernel drivers
    /// from the user interfaces, claim the bulk interface, and push the line
    /// coding both interfaces require.
    pub fn open() -> Result<Self> {
        for device in rusb::devices()?.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(descriptor) => descriptor,
                Err(_) => continue,
            };
            if descriptor.vendor_id() != VENDOR_ID {
                continue;
            }

            let mut handle = device.open()?;
            for interface in [USER_INTERFACE, USER_DATA_INTERFACE] {
                match handle.detach_kernel_driver(interface) {
                    Ok(()) => debug!(interface, "detached kernel driver"),
                    // Nothing attached, or the platform has no kernel
                    // drivers to detach.
                    Err(rusb::Error::NotFound) | Err(rusb::Error::NotSupported) => {}
                    Err(err) => warn!(interface, %err, "kernel driver detach failed"),
                }
            }
            handle.claim_interface(USER_DATA_INTERFACE)?;

            let request_type =
                rusb::request_type(Direction::Out, RequestType::Class, Recipient::Interface);
            for interface in [COMMUNICATIONS_INTERFACE, USER_INTERFACE] {
                handle.write_control(
                    request_type,
                    SET_LINE_CODING,
                    0,
                    interface as u16,
                    &LINE_CODING,
                    SETUP_TIMEOUT,
                )?;
            }

            info!(
                bus = device.bus_number(),
                address = device.address(),
                "opened brain usb link"
            );
            return Ok(Self { handle });
        }

        warn!(vendor_id = VENDOR_ID, "no brain found on the usb bus");
        Err(TransportError::DeviceNotFound {
            vendor_id: VENDOR_ID,
        })
    }
}

impl Backend for UsbBackend {
    fn read(&self, dst: &mut [u8]) -> Result<usize> {
        // The brain rejects IN transfers shorter than one bus packet, so the
        // engine always offers at least READ_CHUNK_SIZE; never request more
        // than one bus packet either.
        let len = dst.len().min(READ_CHUNK_SIZE);
        Ok(self
            .handle
            .read_bulk(BULK_ENDPOINT_IN, &mut dst[..len], Duration::ZERO)?)
    }

    fn write(&self, src: &[u8]) -> Result<usize> {
        Ok(self
            .handle
            .write_bulk(BULK_ENDPOINT_OUT, src, Duration::ZERO)?)
    }
}

impl Drop for UsbBackend {
    fn drop(&mut self) {
        let _ = self.handle.release_interface(USER_DATA_INTERFACE);
    }
}
