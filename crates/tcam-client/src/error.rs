//! Client error taxonomy.
//!
//! Four failure families, mirroring where in the exchange things went wrong:
//! the parameter name, the requested value, the serial link, the frame, or
//! the device itself. No variant is ever retried; each is terminal for its
//! exchange.

use thiserror::Error;

use tcam_protocol::{ProtocolError, ValueDomainError};

/// Failure of the serial link before a full frame was exchanged.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The port could not be opened.
    #[error("failed to open serial port {port}: {source}")]
    Open {
        /// Port identifier.
        port: String,
        /// Underlying serial error.
        #[source]
        source: serialport::Error,
    },

    /// Writing the request to the port failed.
    #[error("serial write failed: {source}")]
    Write {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The blocking read failed or timed out before a full frame arrived.
    #[error("serial read failed: {source}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The transport produced fewer bytes than one full response frame.
    /// A truncated read is never zero-filled into a frame.
    #[error("short response: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Expected frame length.
        expected: usize,
        /// Bytes actually received.
        actual: usize,
    },
}

/// Failure of a single register operation.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The parameter name does not resolve to a register.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// The requested value falls outside the register's accepted domain.
    #[error(transparent)]
    Value(#[from] ValueDomainError),

    /// The serial link failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response frame failed header or footer validation.
    #[error(transparent)]
    Protocol(ProtocolError),

    /// The device answered with a non-zero command status.
    #[error("communication failed: device status 0x{status:02X}")]
    Device {
        /// Raw status byte from the response frame.
        status: u8,
    },
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        match err {
            // A bad status is the device speaking, not the frame breaking.
            ProtocolError::DeviceStatus { status } => ClientError::Device { status },
            other => ClientError::Protocol(other),
        }
    }
}
