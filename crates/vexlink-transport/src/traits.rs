use crate::error::Result;

/// Minimum number of free buffer bytes a caller must have before issuing a
/// read. USB bulk carriers reject transfers with less room than one bus
/// packet, so the receive engine drains or resets before dropping under
/// this.
pub const READ_CHUNK_SIZE: usize = 512;

/// A byte-level carrier between the two endpoints.
///
/// Backends take `&self`: the underlying handles (stdio, libusb device
/// handles) are internally synchronized, which is what lets one thread sit
/// in a blocking `read` while another writes. Message boundaries are not
/// preserved — that is the framing layer's job.
pub trait Backend: Send + Sync {
    /// Read up to `dst.len()` bytes, blocking until at least one byte is
    /// available. Returns `Ok(0)` on end of stream.
    fn read(&self, dst: &mut [u8]) -> Result<usize>;

    /// Write `src`, returning how many bytes the carrier accepted.
    fn write(&self, src: &[u8]) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Loopback carrier: writes become readable, like a wire to yourself.
    struct Loopback {
        bytes: Mutex<VecDeque<u8>>,
    }

    impl Backend for Loopback {
        fn read(&self, dst: &mut [u8]) -> Result<usize> {
            let mut bytes = self.bytes.lock().unwrap();
            let n = dst.len().min(bytes.len());
            for slot in dst[..n].iter_mut() {
                *slot = bytes.pop_front().unwrap();
            }
            Ok(n)
        }

        fn write(&self, src: &[u8]) -> Result<usize> {
            self.bytes.lock().unwrap().extend(src.iter().copied());
            Ok(src.len())
        }
    }

    #[test]
    fn backend_is_object_safe() {
        let loopback = Loopback {
            bytes: Mutex::new(VecDeque::new()),
        };
        let backend: &dyn Backend = &loopback;

        assert_eq!(backend.write(b"ping").unwrap(), 4);
        let mut buf = [0u8; 8];
        assert_eq!(backend.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], b"ping");
        assert_eq!(backend.read(&mut buf).unwrap(), 0);
    }
}
