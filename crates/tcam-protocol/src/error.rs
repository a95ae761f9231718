//! Protocol error types.

use thiserror::Error;

use crate::registers::ValueDomain;

/// Errors raised while decoding a response frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is shorter than the fixed response layout.
    #[error("response frame too short: expected {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected frame length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// First byte is not the frame header sentinel.
    #[error("bad frame header: expected 0xE0, found 0x{found:02X}")]
    BadHeader {
        /// Byte found in the header position.
        found: u8,
    },

    /// Closing bytes are not the footer sentinel pair.
    #[error("bad frame footer: expected [FF, FE], found {found:02X?}")]
    BadFooter {
        /// Bytes found in the footer positions.
        found: [u8; 2],
    },

    /// The core answered with a non-zero command status.
    #[error("device reported command status 0x{status:02X}")]
    DeviceStatus {
        /// Raw status byte from the frame.
        status: u8,
    },
}

/// Error for parameter names that do not resolve to a register.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown register name: {0}")]
pub struct UnknownRegister(pub String);

/// Errors raised when a requested write value falls outside a register's
/// accepted domain.
///
/// Out-of-range input is rejected with the accepted domain spelled out,
/// never silently mapped to the register default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueDomainError {
    /// Value is not in the register's accepted domain.
    #[error("{register}: value {value} is outside the accepted domain {domain}")]
    OutOfDomain {
        /// Logical register name.
        register: &'static str,
        /// The rejected value.
        value: i64,
        /// The domain the register accepts.
        domain: ValueDomain,
    },

    /// The register does not accept writes.
    #[error("{register} is read-only")]
    ReadOnly {
        /// Logical register name.
        register: &'static str,
    },
}
