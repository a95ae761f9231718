//! One request/confirm cycle per call.

use log::debug;

use tcam_protocol::{
    Register, RegisterRequest, ResponseFrame, UnknownRegister, RESPONSE_FRAME_SIZE,
};

use crate::error::{ClientError, TransportError};
use crate::portlock::port_lock;
use crate::transport::{SerialSettings, SerialTransport, Transport};

/// The decoded outcome of a register operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadValue {
    /// 32-bit register value, reconstructed big-endian from the data bytes.
    Integer(u32),
    /// Dotted firmware version components.
    Version(String),
}

/// Everything the caller needs to render or diagnose one operation: the
/// decoded value plus the exact bytes that crossed the wire.
#[derive(Debug, Clone)]
pub struct ExchangeReport {
    /// Register the operation targeted.
    pub register: Register,
    /// Decoded read (or read-back) value.
    pub value: ReadValue,
    /// Exact outbound bytes of the initial request. For a set this is the
    /// write frame, issued before the read-back request.
    pub command_sent: Vec<u8>,
    /// Exact inbound bytes of the frame the value was decoded from.
    pub command_response: Vec<u8>,
}

impl ExchangeReport {
    /// Outbound bytes as a comma-separated lowercase-hex string.
    pub fn command_sent_hex(&self) -> String {
        hex_join(&self.command_sent)
    }

    /// Inbound bytes as a comma-separated lowercase-hex string.
    pub fn command_response_hex(&self) -> String {
        hex_join(&self.command_response)
    }

    /// Register address as an `0xd0`-style string.
    pub fn register_hex(&self) -> String {
        format!("{:#04x}", self.register.address())
    }
}

fn hex_join(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{b:02x}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Client for one-shot register exchanges over a serial link.
///
/// Each call resolves the parameter, takes the per-port lock, opens the
/// port, performs the exchange(s), and releases both before returning.
#[derive(Debug, Clone)]
pub struct ProtocolClient {
    settings: SerialSettings,
}

impl ProtocolClient {
    /// Client bound to the given link settings.
    pub fn new(settings: SerialSettings) -> Self {
        ProtocolClient { settings }
    }

    /// Read a register by logical name.
    pub fn get(&self, parameter: &str) -> Result<ExchangeReport, ClientError> {
        let register = resolve(parameter)?;
        let lock = port_lock(&self.settings.port);
        let _held = lock.lock();
        let mut transport = SerialTransport::open(&self.settings)?;
        Self::read_register(&mut transport, register)
    }

    /// Write a register by logical name, then read it back for confirmation.
    ///
    /// The value is validated against the register's domain before anything
    /// touches the port; out-of-domain input is rejected, not clamped.
    pub fn set(&self, parameter: &str, raw_value: i64) -> Result<ExchangeReport, ClientError> {
        let register = resolve(parameter)?;
        let value = register.validate_value(raw_value)?;
        let lock = port_lock(&self.settings.port);
        let _held = lock.lock();
        let mut transport = SerialTransport::open(&self.settings)?;
        Self::write_register(&mut transport, register, value)
    }

    /// Perform a read over an already-open transport.
    pub fn read_register(
        transport: &mut dyn Transport,
        register: Register,
    ) -> Result<ExchangeReport, ClientError> {
        let request = RegisterRequest::Read { register }.encode();
        let raw = exchange_frame(transport, &request)?;
        let frame = ResponseFrame::decode(&raw)?;
        let value = decoded_value(register, &frame);
        debug!("get {} -> {:?}", register.name(), value);
        Ok(ExchangeReport {
            register,
            value,
            command_sent: request,
            command_response: raw,
        })
    }

    /// Perform a validated write over an already-open transport, then read
    /// the register back on the same transport.
    ///
    /// The read-back value is the authoritative result; the write's own
    /// response is decoded for status only.
    pub fn write_register(
        transport: &mut dyn Transport,
        register: Register,
        value: u8,
    ) -> Result<ExchangeReport, ClientError> {
        let request = RegisterRequest::Write { register, value }.encode();
        let raw = exchange_frame(transport, &request)?;
        ResponseFrame::decode(&raw)?;
        debug!("set {} = {}, confirming", register.name(), value);

        let confirm = Self::read_register(transport, register)?;
        Ok(ExchangeReport {
            register,
            value: confirm.value,
            command_sent: request,
            command_response: confirm.command_response,
        })
    }
}

/// One physical request/response, with the short-read guard.
fn exchange_frame(
    transport: &mut dyn Transport,
    request: &[u8],
) -> Result<Vec<u8>, ClientError> {
    let response = transport.exchange(request)?;
    if response.len() < RESPONSE_FRAME_SIZE {
        return Err(ClientError::Transport(TransportError::ShortRead {
            expected: RESPONSE_FRAME_SIZE,
            actual: response.len(),
        }));
    }
    Ok(response)
}

fn decoded_value(register: Register, frame: &ResponseFrame) -> ReadValue {
    if register.decodes_as_version() {
        ReadValue::Version(frame.version_string())
    } else {
        ReadValue::Integer(frame.value())
    }
}

fn resolve(parameter: &str) -> Result<Register, ClientError> {
    parameter
        .parse()
        .map_err(|UnknownRegister(name)| ClientError::UnknownParameter(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimFault, SimulatedSensor};
    use tcam_protocol::{ProtocolError, ValueDomainError};

    #[test]
    fn test_get_decodes_value() {
        let mut sensor = SimulatedSensor::new();
        sensor.store(Register::Brightness, 17);

        let report =
            ProtocolClient::read_register(&mut sensor, Register::Brightness).expect("get");
        assert_eq!(report.value, ReadValue::Integer(17));
        assert_eq!(report.register_hex(), "0xd0");
        assert_eq!(
            report.command_sent_hex(),
            "0xe0,0x00,0x01,0x3e,0xff,0x03,0x52,0x50,0xd0"
        );
    }

    #[test]
    fn test_set_reports_write_frame_and_readback_value() {
        let mut sensor = SimulatedSensor::new();

        let report =
            ProtocolClient::write_register(&mut sensor, Register::Contrast, 100).expect("set");

        // The write frame goes on the wire before the read-back request.
        assert_eq!(
            report.command_sent,
            [0xE0, 0x00, 0x01, 0x3E, 0xFF, 0x03, 0x52, 0x50, 0xD4, 0x64]
        );
        assert_eq!(sensor.requests.len(), 2);
        assert_eq!(sensor.requests[0], report.command_sent);
        assert_eq!(
            sensor.requests[1],
            [0xE0, 0x00, 0x01, 0x3E, 0xFF, 0x03, 0x52, 0x50, 0xD4]
        );
        // The reported value is the read-back, not the write echo.
        assert_eq!(report.value, ReadValue::Integer(100));
    }

    #[test]
    fn test_firmware_version_reads_as_dotted_string() {
        let mut sensor = SimulatedSensor::new();

        let report = ProtocolClient::read_register(&mut sensor, Register::FirmwareVersion)
            .expect("get");
        assert_eq!(report.value, ReadValue::Version("1.2.0.5".to_string()));
    }

    #[test]
    fn test_device_status_maps_to_device_error() {
        let mut sensor = SimulatedSensor::new();
        sensor.inject(SimFault::Status(0x04));

        let err = ProtocolClient::read_register(&mut sensor, Register::Polarity).unwrap_err();
        assert!(matches!(err, ClientError::Device { status: 0x04 }));
    }

    #[test]
    fn test_short_response_is_a_transport_error() {
        let mut sensor = SimulatedSensor::new();
        sensor.inject(SimFault::Truncate(5));

        let err = ProtocolClient::read_register(&mut sensor, Register::Polarity).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::ShortRead {
                expected: RESPONSE_FRAME_SIZE,
                actual: 5,
            })
        ));
    }

    #[test]
    fn test_corrupt_header_is_a_protocol_error() {
        let mut sensor = SimulatedSensor::new();
        sensor.inject(SimFault::BadHeader);

        let err = ProtocolClient::read_register(&mut sensor, Register::AgcMode).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Protocol(ProtocolError::BadHeader { .. })
        ));
    }

    #[test]
    fn test_out_of_domain_set_rejected_before_the_port_opens() {
        // Validation precedes the port lock and open, so no hardware is
        // needed to observe the rejection.
        let client = ProtocolClient::new(SerialSettings::new("TEST_NO_PORT", 115_200));

        let err = client.set("digital_zoom", 9).unwrap_err();
        match err {
            ClientError::Value(ValueDomainError::OutOfDomain {
                register, value, ..
            }) => {
                assert_eq!(register, "digital_zoom");
                assert_eq!(value, 9);
            }
            other => panic!("expected domain rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_parameter_rejected_before_the_port_opens() {
        let client = ProtocolClient::new(SerialSettings::new("TEST_NO_PORT", 115_200));

        let err = client.get("focus").unwrap_err();
        assert!(matches!(err, ClientError::UnknownParameter(name) if name == "focus"));
    }

    #[test]
    fn test_hex_join_format() {
        assert_eq!(hex_join(&[0xE0, 0x00, 0xFE]), "0xe0,0x00,0xfe");
    }
}
