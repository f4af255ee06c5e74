/// Errors that can occur while building or reading packets.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the fixed per-packet budget.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The payload length does not match the requested schema type.
    #[error("payload length mismatch (schema needs {expected} bytes, packet has {actual})")]
    DataSizeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
