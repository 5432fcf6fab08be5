use serde_json::json;
use shelly_exporter::error::FetchError;
use shelly_exporter::shelly::client::{decode_status, status_url};
use shelly_exporter::shelly::types::*;

#[test]
fn test_deserialize_status() {
    let json = json!({
        "switch:0": {
            "id": 0,
            "source": "HTTP_in",
            "output": false,
            "apower": 0.0,
            "voltage": 229.4,
            "freq": 49.98,
            "current": 0.0,
            "aenergy": { "total": 10.0, "by_minute": [0.0, 0.0, 0.0], "minute_ts": 1 },
            "temperature": { "tC": 29.6, "tF": 85.3 }
        },
        "sys": { "uptime": 3600 }
    });

    let status: ShellyStatus = serde_json::from_value(json).expect("Failed to parse status");
    assert!(!status.switch.output);
    assert_eq!(status.switch.freq, 49.98);
    assert_eq!(status.switch.temperature.celsius, 29.6);
    assert_eq!(status.switch.temperature.fahrenheit, Some(85.3));
}

#[test]
fn test_snapshot_uses_celsius_only() {
    let body = json!({
        "switch:0": {
            "output": true,
            "apower": 100.0,
            "voltage": 230.0,
            "freq": 50.0,
            "current": 0.45,
            "temperature": { "tC": 40.0, "tF": 104.0 }
        }
    })
    .to_string();

    let snapshot = decode_status(body.as_bytes()).expect("Failed to decode");
    assert_eq!(snapshot.temperature_c, 40.0);
    assert!(snapshot.output_on);
    assert_eq!(snapshot.current_a, 0.45);
}

#[test]
fn test_fahrenheit_is_optional() {
    let body = json!({
        "switch:0": {
            "output": true,
            "apower": 1.0,
            "voltage": 230.0,
            "freq": 50.0,
            "current": 0.01,
            "temperature": { "tC": 21.5 }
        }
    })
    .to_string();

    let snapshot = decode_status(body.as_bytes()).expect("Failed to decode");
    assert_eq!(snapshot.temperature_c, 21.5);
}

#[test]
fn test_missing_temperature_is_decode_error() {
    let body = json!({
        "switch:0": {
            "output": true,
            "apower": 1.0,
            "voltage": 230.0,
            "freq": 50.0,
            "current": 0.01
        }
    })
    .to_string();

    let result = decode_status(body.as_bytes());
    assert!(matches!(result, Err(FetchError::Decode(_))));
}

#[test]
fn test_wrong_type_is_decode_error() {
    let body = json!({
        "switch:0": {
            "output": "on",
            "apower": 1.0,
            "voltage": 230.0,
            "freq": 50.0,
            "current": 0.01,
            "temperature": { "tC": 21.5 }
        }
    })
    .to_string();

    assert!(matches!(
        decode_status(body.as_bytes()),
        Err(FetchError::Decode(_))
    ));
}

#[test]
fn test_non_json_body_is_decode_error() {
    assert!(matches!(
        decode_status(b"<html>Unauthorized</html>"),
        Err(FetchError::Decode(_))
    ));
}

#[test]
fn test_status_url() {
    assert_eq!(
        status_url("10.0.0.5"),
        "http://10.0.0.5/rpc/Shelly.GetStatus"
    );
    assert_eq!(
        status_url("plug.local:8080"),
        "http://plug.local:8080/rpc/Shelly.GetStatus"
    );
}
