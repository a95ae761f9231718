//! Request handlers and JSON shaping.
//!
//! Every register operation funnels through one dispatch path: the
//! `{parameter}` path segment resolves inside the client, the link settings
//! come from the request, and the response carries the decoded value plus
//! the exact wire bytes for diagnosis.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use tcam_client::{ClientError, ExchangeReport, ProtocolClient, ReadValue, SerialSettings};

/// Link fields every operation needs.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkParams {
    /// Serial port identifier, e.g. `/dev/ttyUSB0` or `COM3`.
    pub com_port: String,
    /// Baud rate.
    pub baud_rate: u32,
}

/// Body of a register write.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    #[serde(flatten)]
    link: LinkParams,
    /// Requested register value.
    value: i64,
}

/// `GET /` — the embedded control panel page.
pub async fn panel() -> Html<&'static str> {
    Html(crate::PANEL_HTML)
}

/// `GET /ports` — enumerate serial ports on the host.
pub async fn list_ports() -> (StatusCode, Json<Value>) {
    match serialport::available_ports() {
        Ok(ports) => {
            let names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
            (
                StatusCode::OK,
                Json(json!({ "status": "success", "com_ports": names })),
            )
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": err.to_string() })),
        ),
    }
}

/// `GET /api/{parameter}` — read a register.
pub async fn get_parameter(
    Path(parameter): Path<String>,
    Query(link): Query<LinkParams>,
) -> (StatusCode, Json<Value>) {
    run_exchange(move || {
        let client = ProtocolClient::new(SerialSettings::new(link.com_port, link.baud_rate));
        client.get(&parameter)
    })
    .await
}

/// `POST /api/{parameter}` — write a register and confirm via read-back.
pub async fn set_parameter(
    Path(parameter): Path<String>,
    Json(request): Json<SetRequest>,
) -> (StatusCode, Json<Value>) {
    run_exchange(move || {
        let client = ProtocolClient::new(SerialSettings::new(
            request.link.com_port,
            request.link.baud_rate,
        ));
        client.set(&parameter, request.value)
    })
    .await
}

/// Run one blocking serial exchange off the async runtime and shape the
/// JSON reply.
async fn run_exchange<F>(operation: F) -> (StatusCode, Json<Value>)
where
    F: FnOnce() -> Result<ExchangeReport, ClientError> + Send + 'static,
{
    match tokio::task::spawn_blocking(operation).await {
        Ok(Ok(report)) => (StatusCode::OK, Json(success_body(&report))),
        Ok(Err(err)) => error_reply(&err),
        Err(join_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": join_err.to_string() })),
        ),
    }
}

fn success_body(report: &ExchangeReport) -> Value {
    let value = match &report.value {
        ReadValue::Integer(v) => json!(v),
        ReadValue::Version(v) => json!(v),
    };
    json!({
        "status": "success",
        "value": value,
        "command_sent": report.command_sent_hex(),
        "command_response": report.command_response_hex(),
        "register": report.register_hex(),
    })
}

fn error_reply(err: &ClientError) -> (StatusCode, Json<Value>) {
    let status = match err {
        ClientError::UnknownParameter(_) => StatusCode::NOT_FOUND,
        ClientError::Value(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ClientError::Transport(_) | ClientError::Protocol(_) | ClientError::Device { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    warn!("exchange failed: {err}");
    (
        status,
        Json(json!({ "status": "error", "message": err.to_string() })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcam_client::sim::SimulatedSensor;
    use tcam_client::TransportError;
    use tcam_protocol::Register;

    #[test]
    fn test_success_body_shape() {
        let mut sensor = SimulatedSensor::new();
        sensor.store(Register::Contrast, 100);
        let report = ProtocolClient::read_register(&mut sensor, Register::Contrast).unwrap();

        let body = success_body(&report);
        assert_eq!(body["status"], "success");
        assert_eq!(body["value"], 100);
        assert_eq!(body["register"], "0xd4");
        assert_eq!(
            body["command_sent"],
            "0xe0,0x00,0x01,0x3e,0xff,0x03,0x52,0x50,0xd4"
        );
    }

    #[test]
    fn test_firmware_version_serializes_as_string() {
        let mut sensor = SimulatedSensor::new();
        let report =
            ProtocolClient::read_register(&mut sensor, Register::FirmwareVersion).unwrap();

        let body = success_body(&report);
        assert_eq!(body["value"], "1.2.0.5");
    }

    #[test]
    fn test_error_status_mapping() {
        let unknown = ClientError::UnknownParameter("focus".into());
        assert_eq!(error_reply(&unknown).0, StatusCode::NOT_FOUND);

        let rejected = ClientError::Value(
            Register::DigitalZoom.validate_value(9).unwrap_err(),
        );
        let (status, Json(body)) = error_reply(&rejected);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("{0, 1, 2}"));

        let transport = ClientError::Transport(TransportError::ShortRead {
            expected: 17,
            actual: 3,
        });
        assert_eq!(error_reply(&transport).0, StatusCode::INTERNAL_SERVER_ERROR);

        let device = ClientError::Device { status: 0x02 };
        assert_eq!(error_reply(&device).0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
