//! Transport seam and operation deadline
//!
//! A [`Session`](crate::Session) talks to any [`Transport`], which lets tests
//! drive it with a scripted in-memory server instead of a socket.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::{Duration, Instant};

/// Byte stream owned by a session
pub trait Transport: Read + Write {
    /// Bound every subsequent blocking read and write
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> std::io::Result<()>;

    /// Close both directions of the stream
    fn shutdown(&mut self) -> std::io::Result<()>;
}

impl Transport for TcpStream {
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> std::io::Result<()> {
        self.set_read_timeout(timeout)?;
        self.set_write_timeout(timeout)
    }

    fn shutdown(&mut self) -> std::io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// Returns true if an IO error is a socket timeout
///
/// Unix reports an elapsed socket timeout as `WouldBlock`, Windows as `TimedOut`.
pub fn is_timeout(error: &std::io::Error) -> bool {
    matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

/// Transport view that re-arms the IO timeout before every call
///
/// Each `read` and `write` gets only what is left of the deadline, so a peer
/// trickling bytes cannot stretch one frame past it. Once the deadline has
/// passed every call fails with `TimedOut`.
pub struct Bounded<'a, T: Transport + ?Sized> {
    inner: &'a mut T,
    deadline: Deadline,
}

impl<'a, T: Transport + ?Sized> Bounded<'a, T> {
    pub fn new(inner: &'a mut T, deadline: Deadline) -> Self {
        Self { inner, deadline }
    }

    fn arm(&mut self) -> std::io::Result<()> {
        let left = self.deadline.remaining().ok_or_else(|| {
            std::io::Error::new(ErrorKind::TimedOut, "operation deadline exceeded")
        })?;
        self.inner.set_io_timeout(Some(left))
    }
}

impl<T: Transport + ?Sized> Read for Bounded<'_, T> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.arm()?;
        self.inner.read(buf)
    }
}

impl<T: Transport + ?Sized> Write for Bounded<'_, T> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.arm()?;
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.arm()?;
        self.inner.flush()
    }
}

/// Wall-clock budget shared by connect, authenticate and execute
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    /// Start a deadline that expires `limit` from now
    pub fn after(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// Total budget
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Time spent since the deadline was started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left, or None once the deadline has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.limit
            .checked_sub(self.elapsed())
            .filter(|left| !left.is_zero())
    }

    /// Returns true once the deadline has passed
    pub fn is_expired(&self) -> bool {
        self.remaining().is_none()
    }
}
