//! Simulated sensor core.
//!
//! An in-memory register file behind the [`Transport`] trait. Tests drive
//! the full client path against it instead of hardware: it answers reads
//! from its register map, applies writes, and can be told to misbehave in
//! the ways a real link does (truncated frames, corrupt sentinels, error
//! statuses).

use std::collections::HashMap;

use tcam_protocol::{
    Register, ResponseFrame, CMD_STATUS_OK, CMD_TYPE_REGISTER, DEVICE_ID, DEVICE_NUMBER,
    FRAME_FOOTER_1, FRAME_FOOTER_2, FRAME_HEADER, PACKET_SEQUENCE, READ_REQUEST_SIZE,
};

use crate::error::TransportError;
use crate::transport::Transport;

/// Ways the simulated link can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimFault {
    /// Reply with only the first `n` bytes of the frame.
    Truncate(usize),
    /// Corrupt the header sentinel.
    BadHeader,
    /// Corrupt the footer sentinel pair.
    BadFooter,
    /// Report this non-zero command status.
    Status(u8),
}

/// In-memory sensor core speaking the register protocol.
#[derive(Debug, Default)]
pub struct SimulatedSensor {
    registers: HashMap<u8, u32>,
    fault: Option<SimFault>,
    /// Every request observed, in order.
    pub requests: Vec<Vec<u8>>,
}

impl SimulatedSensor {
    /// A sensor with every register at its factory default and firmware
    /// version 1.2.0.5.
    pub fn new() -> Self {
        let mut registers = HashMap::new();
        for register in Register::ALL {
            if register.is_writable() {
                registers.insert(register.address(), u32::from(register.default_value()));
            }
        }
        registers.insert(
            Register::FirmwareVersion.address(),
            u32::from_be_bytes([1, 2, 0, 5]),
        );
        SimulatedSensor {
            registers,
            fault: None,
            requests: Vec::new(),
        }
    }

    /// Preload a register value.
    pub fn store(&mut self, register: Register, value: u32) {
        self.registers.insert(register.address(), value);
    }

    /// Current value of a register, if the address is known.
    pub fn load(&self, register: Register) -> Option<u32> {
        self.registers.get(&register.address()).copied()
    }

    /// Arm a fault for subsequent exchanges.
    pub fn inject(&mut self, fault: SimFault) {
        self.fault = Some(fault);
    }

    /// Answer for `address` with its current value.
    fn respond(&self, address: u8) -> Vec<u8> {
        let value = self.registers.get(&address).copied().unwrap_or(0);
        let data = value.to_be_bytes();
        let frame = ResponseFrame {
            header: FRAME_HEADER,
            packet_sequence: PACKET_SEQUENCE,
            device_id: DEVICE_ID,
            device_number: DEVICE_NUMBER,
            length: 0x08,
            cmd_type: CMD_TYPE_REGISTER,
            cmd_status: CMD_STATUS_OK,
            register: u16::from(address),
            data,
            // Placeholder byte; the decoder surfaces but never verifies it.
            checksum: data.iter().fold(address, |acc, b| acc.wrapping_add(*b)),
            footer: [FRAME_FOOTER_1, FRAME_FOOTER_2],
        };
        frame.to_bytes()
    }
}

impl Transport for SimulatedSensor {
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.requests.push(request.to_vec());

        // Preamble (8 bytes), then address, then the value byte for writes.
        let address = request[8];
        if request.len() > READ_REQUEST_SIZE {
            self.registers.insert(address, u32::from(request[9]));
        }

        let mut frame = self.respond(address);
        match self.fault {
            Some(SimFault::Truncate(n)) => frame.truncate(n),
            Some(SimFault::BadHeader) => frame[0] = 0x00,
            Some(SimFault::BadFooter) => frame[16] = 0x00,
            Some(SimFault::Status(status)) => frame[7] = status,
            None => {}
        }
        Ok(frame)
    }
}
