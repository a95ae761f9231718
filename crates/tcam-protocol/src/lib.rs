//! Thermal Sensor Core Register Protocol
//!
//! This crate provides types and utilities for querying and configuring the
//! image-processing registers of a thermal sensor core module over its serial
//! command interface. The protocol is a fixed-layout binary command/response
//! exchange: the host sends a short request frame naming a register (and a
//! value, for writes), the core answers with a 17-byte response frame.
//!
//! # Protocol Overview
//!
//! Every frame opens with the `0xE0` header sentinel. Requests carry a fixed
//! preamble (packet sequence, device id/number, length, command type, request
//! marker) followed by the register address and, for writes, a single value
//! byte. Responses close with the `0xFF 0xFE` footer pair and report the
//! register value in four big-endian data bytes.
//!
//! The crate is pure: it builds and parses byte sequences but performs no
//! I/O. Transports live in `tcam-client`.
//!
//! # Example
//!
//! ```rust,ignore
//! use tcam_protocol::{Register, RegisterRequest, ResponseFrame};
//!
//! // Build a brightness read request
//! let request = RegisterRequest::Read { register: Register::Brightness };
//! let bytes = request.encode();
//!
//! // Parse a response
//! let frame = ResponseFrame::decode(&received)?;
//! println!("brightness = {}", frame.value());
//! ```

mod constants;
mod error;
mod registers;
mod request;
mod response;

pub use constants::*;
pub use error::*;
pub use registers::*;
pub use request::*;
pub use response::*;
