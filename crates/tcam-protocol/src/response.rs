//! Response frames received from the sensor core.

use log::debug;

use crate::constants::*;
use crate::error::ProtocolError;

/// A decoded core → host response frame.
///
/// Wire layout, in order: header(1), packet sequence(2, high/low),
/// device id(1), device number(1), length(1), command type(1),
/// command status(1), register(2, high/low), data(4), checksum(1),
/// footer(2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    /// Header sentinel.
    pub header: u8,
    /// Packet sequence echoed by the core.
    pub packet_sequence: u16,
    /// Device id.
    pub device_id: u8,
    /// Device number.
    pub device_number: u8,
    /// Payload length as reported by the core.
    pub length: u8,
    /// Command type.
    pub cmd_type: u8,
    /// Command status. `0x00` is the sole success value.
    pub cmd_status: u8,
    /// Register address the response answers for.
    pub register: u16,
    /// Raw value bytes, most significant first.
    pub data: [u8; 4],
    /// Checksum as reported by the core. Surfaced for diagnostics; the
    /// vendor's algorithm is unpublished, so it is not recomputed here.
    pub checksum: u8,
    /// Footer sentinel pair.
    pub footer: [u8; 2],
}

impl ResponseFrame {
    /// Decode and validate a raw response.
    ///
    /// Validation order: frame length, header sentinel, footer pair, then
    /// command status. A status other than [`CMD_STATUS_OK`] fails with
    /// [`ProtocolError::DeviceStatus`] no matter what the rest of the frame
    /// holds.
    pub fn decode(raw: &[u8]) -> Result<Self, ProtocolError> {
        if raw.len() < RESPONSE_FRAME_SIZE {
            return Err(ProtocolError::FrameTooShort {
                expected: RESPONSE_FRAME_SIZE,
                actual: raw.len(),
            });
        }
        if raw[0] != FRAME_HEADER {
            debug!("frame rejected: header byte 0x{:02X}", raw[0]);
            return Err(ProtocolError::BadHeader { found: raw[0] });
        }
        if raw[15] != FRAME_FOOTER_1 || raw[16] != FRAME_FOOTER_2 {
            debug!(
                "frame rejected: footer bytes 0x{:02X} 0x{:02X}",
                raw[15], raw[16]
            );
            return Err(ProtocolError::BadFooter {
                found: [raw[15], raw[16]],
            });
        }

        let frame = ResponseFrame {
            header: raw[0],
            packet_sequence: u16::from_be_bytes([raw[1], raw[2]]),
            device_id: raw[3],
            device_number: raw[4],
            length: raw[5],
            cmd_type: raw[6],
            cmd_status: raw[7],
            register: u16::from_be_bytes([raw[8], raw[9]]),
            data: [raw[10], raw[11], raw[12], raw[13]],
            checksum: raw[14],
            footer: [raw[15], raw[16]],
        };

        if frame.cmd_status != CMD_STATUS_OK {
            return Err(ProtocolError::DeviceStatus {
                status: frame.cmd_status,
            });
        }

        Ok(frame)
    }

    /// The 32-bit logical value, reconstructed big-endian from the data
    /// bytes.
    pub fn value(&self) -> u32 {
        u32::from_be_bytes(self.data)
    }

    /// The data bytes read as dotted decimal version components.
    ///
    /// Only the firmware version register is interpreted this way:
    /// `[1, 2, 0, 5]` renders as `"1.2.0.5"`.
    pub fn version_string(&self) -> String {
        let [a, b, c, d] = self.data;
        format!("{a}.{b}.{c}.{d}")
    }

    /// Re-serialize the frame to wire bytes, in layout order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RESPONSE_FRAME_SIZE);
        buf.push(self.header);
        buf.extend_from_slice(&self.packet_sequence.to_be_bytes());
        buf.push(self.device_id);
        buf.push(self.device_number);
        buf.push(self.length);
        buf.push(self.cmd_type);
        buf.push(self.cmd_status);
        buf.extend_from_slice(&self.register.to_be_bytes());
        buf.extend_from_slice(&self.data);
        buf.push(self.checksum);
        buf.extend_from_slice(&self.footer);
        buf
    }
}
