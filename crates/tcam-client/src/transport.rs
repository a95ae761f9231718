//! Blocking serial transport.
//!
//! One transport serves exactly one logical operation and is dropped
//! afterwards; the port handle closes on every exit path. A set operation
//! performs two physical exchanges (write, then read-back) over the same
//! open transport.

use std::io::{Read, Write};
use std::time::Duration;

use log::trace;
use serialport::SerialPort;

use tcam_protocol::RESPONSE_FRAME_SIZE;

use crate::error::TransportError;

/// Default exchange timeout. The read blocking up to this long is the only
/// cancellation mechanism an exchange has.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Serial link settings for one session.
#[derive(Debug, Clone)]
pub struct SerialSettings {
    /// Port identifier, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    /// Baud rate.
    pub baud: u32,
    /// Read timeout.
    pub timeout: Duration,
}

impl SerialSettings {
    /// Settings with the default 5 s timeout.
    pub fn new(port: impl Into<String>, baud: u32) -> Self {
        SerialSettings {
            port: port.into(),
            baud,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A byte-exchange seam over the serial link.
///
/// The real implementation drives a serial port; tests substitute
/// [`crate::sim::SimulatedSensor`]. Any byte stream that can answer one
/// request with one frame fits.
pub trait Transport {
    /// Write a full request, then block-read one response frame.
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError>;
}

/// Transport over a physical serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the configured port. The handle is released when the transport
    /// drops, whichever path the exchange takes.
    pub fn open(settings: &SerialSettings) -> Result<Self, TransportError> {
        let port = serialport::new(&settings.port, settings.baud)
            .timeout(settings.timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: settings.port.clone(),
                source,
            })?;
        trace!("opened {} at {} baud", settings.port, settings.baud);
        Ok(SerialTransport { port })
    }
}

impl Transport for SerialTransport {
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.port
            .write_all(request)
            .and_then(|()| self.port.flush())
            .map_err(|source| TransportError::Write { source })?;
        trace!("wrote {} bytes", request.len());

        let mut response = vec![0u8; RESPONSE_FRAME_SIZE];
        self.port
            .read_exact(&mut response)
            .map_err(|source| TransportError::Read { source })?;
        trace!("read {} bytes", response.len());
        Ok(response)
    }
}
