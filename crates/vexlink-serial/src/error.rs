/// Errors surfaced by the serial handler's fallible operations.
///
/// Receive-path failures are not errors: a frame that will not decode is
/// silently dropped and the link keeps running.
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    /// Carrier-level error.
    #[error("transport error: {0}")]
    Transport(#[from] vexlink_transport::TransportError),

    /// Packet-level error.
    #[error("frame error: {0}")]
    Frame(#[from] vexlink_frame::FrameError),
}

pub type Result<T> = std::result::Result<T, SerialError>;
