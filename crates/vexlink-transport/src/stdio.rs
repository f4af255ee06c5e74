use std::io::{ErrorKind, Read, Stdin, Stdout, Write};

use crate::error::Result;
use crate::traits::Backend;

/// Co-processor carrier: raw bytes over standard input/output.
///
/// On the co-processor the host link is wired to the process's stdio, so
/// this backend is just unbuffered binary reads from stdin and flushed
/// writes to stdout. Anything else printed to stdout corrupts the link —
/// diagnostics belong on stderr.
pub struct StdioBackend {
    stdin: Stdin,
    stdout: Stdout,
}

impl StdioBackend {
    pub fn new() -> Self {
        Self {
            stdin: std::io::stdin(),
            stdout: std::io::stdout(),
        }
    }
}

impl Default for StdioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for StdioBackend {
    fn read(&self, dst: &mut [u8]) -> Result<usize> {
        loop {
            match (&self.stdin).read(dst) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn write(&self, src: &[u8]) -> Result<usize> {
        let mut stdout = &self.stdout;
        let mut offset = 0usize;
        while offset < src.len() {
            match stdout.write(&src[offset..]) {
                Ok(0) => break,
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        stdout.flush()?;
        Ok(offset)
    }
}
