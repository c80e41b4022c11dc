//! Use a packet as a plain byte sink or source.
//!
//! A response body accumulator only ever appends raw bytes and clears between
//! requests, so it needs neither typed fields nor a particular byte order.
//! [`std::io::Write`] appends to the payload and [`std::io::Read`] drains the
//! unread bytes from the cursor.

use crate::{config::HttpBody, config::Layout, Error, Packet};
use std::io;

/// Accumulator for HTTP response bodies.
pub type Body = Packet<HttpBody>;

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::AllocationFailure(_) => io::ErrorKind::OutOfMemory,
            Error::TruncatedRead { .. } => io::ErrorKind::UnexpectedEof,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

impl<L: Layout> io::Write for Packet<L> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<L: Layout> io::Read for Packet<L> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.remaining());
        self.read_bytes(&mut buf[..len])?;
        Ok(len)
    }
}
