//! Fake Shelly devices served over loopback

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// How a fake device answers `Shelly.GetStatus`
#[derive(Clone, Debug)]
pub enum Behavior {
    /// 200 with this body
    Respond(String),
    /// Bare status code, empty body
    Status(u16),
    /// Sleep, then 200 with this body
    Delay(Duration, String),
    /// 200 with body only if the Authorization header matches, 401 otherwise
    BasicAuth { expected: String, body: String },
}

#[derive(Clone)]
struct DeviceState {
    behavior: Arc<Mutex<Behavior>>,
    hits: Arc<AtomicUsize>,
}

pub struct FakeDevice {
    pub host: String,
    state: DeviceState,
}

impl FakeDevice {
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.state.behavior.lock().unwrap() = behavior;
    }
}

pub async fn spawn_device(behavior: Behavior) -> FakeDevice {
    let state = DeviceState {
        behavior: Arc::new(Mutex::new(behavior)),
        hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .route("/rpc/Shelly.GetStatus", get(status_handler))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeDevice {
        host: addr.to_string(),
        state,
    }
}

/// A loopback address nothing listens on
pub async fn closed_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

async fn status_handler(State(state): State<DeviceState>, headers: HeaderMap) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let behavior = state.behavior.lock().unwrap().clone();

    match behavior {
        Behavior::Respond(body) => json_response(body),
        Behavior::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        Behavior::Delay(delay, body) => {
            tokio::time::sleep(delay).await;
            json_response(body)
        }
        Behavior::BasicAuth { expected, body } => {
            let provided = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());
            if provided == Some(expected.as_str()) {
                json_response(body)
            } else {
                StatusCode::UNAUTHORIZED.into_response()
            }
        }
    }
}

fn json_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// A realistic `Shelly.GetStatus` body for a Plug S Gen2
pub fn status_body(
    output: bool,
    apower: f64,
    freq: f64,
    voltage: f64,
    current: f64,
    temp_c: f64,
) -> String {
    json!({
        "ble": {},
        "cloud": { "connected": false },
        "mqtt": { "connected": false },
        "switch:0": {
            "id": 0,
            "source": "init",
            "output": output,
            "apower": apower,
            "voltage": voltage,
            "freq": freq,
            "current": current,
            "aenergy": { "total": 1234.567, "by_minute": [0.0, 0.0, 0.0], "minute_ts": 1700000000 },
            "temperature": { "tC": temp_c, "tF": temp_c * 9.0 / 5.0 + 32.0 }
        },
        "sys": { "mac": "AABBCCDDEEFF", "uptime": 1234 },
        "wifi": { "sta_ip": "10.0.0.5", "status": "got ip", "rssi": -60 }
    })
    .to_string()
}

pub fn default_body() -> String {
    status_body(true, 12.5, 50.0, 230.1, 0.054, 34.2)
}
