/// Errors that can occur when opening or driving a carrier backend.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the carrier stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A USB transfer or setup call failed.
    #[cfg(feature = "usb")]
    #[error("usb error: {0}")]
    Usb(#[from] rusb::Error),

    /// No connected USB device matched the expected vendor id.
    #[error("no usb device with vendor id {vendor_id:#06x}")]
    DeviceNotFound { vendor_id: u16 },
}

pub type Result<T> = std::result::Result<T, TransportError>;
