//! Turns a serial port into an iterator of lines. The pipeline core never
//! touches the device directly; it consumes any
//! `Iterator<Item = Result<String, TransportError>>`, and this module
//! provides the one backed by real hardware. Reconnection and port
//! negotiation are deliberately out of scope; when the device goes away
//! the iterator reports one terminal error and ends.

use log::warn;
use serial2::SerialPort;
use std::{fmt, io, path::Path, str, time::Duration};

/// Terminal failures of the line stream.
#[derive(Debug)]
pub enum TransportError {
    /// The underlying read failed.
    IoError(io::Error),
    /// The device closed the stream (zero-length read).
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportError::IoError(error) => write!(f, "serial io error: {}", error),
            TransportError::Closed => write!(f, "serial stream closed"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<io::Error> for TransportError {
    fn from(value: io::Error) -> Self {
        Self::IoError(value)
    }
}

/// Reads raw bytes from a serial port and yields complete lines. Bytes
/// that do not decode as UTF-8 are dropped with a warning; that happens
/// routinely at the beginning of transmission while the hardware buffer
/// still holds garbage, and the framer would have discarded the line
/// anyway.
pub struct SerialLineSource {
    port: SerialPort,
    pending: Vec<u8>,
    done: bool,
}

impl SerialLineSource {
    /// Opens the device at the given baud rate with an effectively
    /// infinite read timeout, the firmware can stay silent between
    /// sessions for as long as the writer needs.
    pub fn open(path: impl AsRef<Path>, baud_rate: u32) -> Result<Self, TransportError> {
        let mut port = SerialPort::open(path.as_ref(), baud_rate)?;
        port.set_read_timeout(Duration::MAX)?;
        Ok(Self::new(port))
    }

    /// Wraps an already-configured port.
    pub fn new(port: SerialPort) -> Self {
        Self {
            port,
            pending: Vec::new(),
            done: false,
        }
    }

    fn take_line(&mut self) -> Option<String> {
        while let Some(pos) = self.pending.iter().position(|&c| c == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            match str::from_utf8(&raw[..pos]) {
                Ok(s) => return Some(s.trim_end_matches('\r').to_owned()),
                Err(error) => {
                    warn!("dropping undecodable line: {:?}", error);
                }
            }
        }
        None
    }
}

impl Iterator for SerialLineSource {
    type Item = Result<String, TransportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some(line) = self.take_line() {
                return Some(Ok(line));
            }
            let mut chunk = [0; 256];
            match self.port.read(&mut chunk) {
                Ok(0) => {
                    self.done = true;
                    return Some(Err(TransportError::Closed));
                }
                Ok(read_len) => self.pending.extend_from_slice(&chunk[..read_len]),
                Err(error) => {
                    self.done = true;
                    return Some(Err(TransportError::IoError(error)));
                }
            }
        }
    }
}
