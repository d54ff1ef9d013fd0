// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process HTTP server standing in for the parking API and image store.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, put};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{ClientConfig, ParkingApiClient};

pub const TEST_TOKEN: &str = "session-abc";

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub fields: HashMap<String, String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    delay: Duration,
    captured: Arc<Mutex<Vec<Captured>>>,
}

/// A running mock server.
pub struct MockServer {
    pub url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockServer {
    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    pub fn only_request(&self) -> Captured {
        let requests: Vec<Captured> = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }

    /// Returns a parking API client pointed at this server.
    pub fn api_client(&self) -> ParkingApiClient {
        ParkingApiClient::new(ClientConfig::new(&self.url).with_bearer_token(TEST_TOKEN)).unwrap()
    }
}

/// Starts a server answering every request with `status` and `body`.
pub async fn spawn_server(status: u16, body: &str) -> MockServer {
    spawn_delayed_server(status, body, Duration::ZERO).await
}

/// Starts a server that waits `delay` before answering.
pub async fn spawn_delayed_server(status: u16, body: &str, delay: Duration) -> MockServer {
    let captured: Arc<Mutex<Vec<Captured>>> = Arc::new(Mutex::new(Vec::new()));
    let state: MockState = MockState {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
        delay,
        captured: Arc::clone(&captured),
    };

    let app: Router = Router::new()
        .route("/", get(handle_query).post(handle_form))
        .route("/store/{*key}", put(handle_put))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer {
        url: format!("http://{addr}/"),
        captured,
    }
}

/// Returns a base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

async fn respond(state: &MockState, captured: Captured) -> (StatusCode, String) {
    state.captured.lock().unwrap().push(captured);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.status, state.body.clone())
}

async fn handle_query(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(fields): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let captured: Captured = Captured {
        method: String::from("GET"),
        path: String::from("/"),
        fields,
        authorization: header_value(&headers, header::AUTHORIZATION),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body: Vec::new(),
    };
    respond(&state, captured).await
}

async fn handle_form(
    State(state): State<MockState>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    let captured: Captured = Captured {
        method: String::from("POST"),
        path: String::from("/"),
        fields,
        authorization: header_value(&headers, header::AUTHORIZATION),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body: Vec::new(),
    };
    respond(&state, captured).await
}

async fn handle_put(
    State(state): State<MockState>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let captured: Captured = Captured {
        method: String::from("PUT"),
        path: key,
        fields: HashMap::new(),
        authorization: header_value(&headers, header::AUTHORIZATION),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body: body.to_vec(),
    };
    respond(&state, captured).await
}

pub fn success(data: &str) -> String {
    format!(r#"{{"success":true,"data":{data}}}"#)
}

pub fn failure(message: &str, code: &str) -> String {
    format!(r#"{{"success":false,"error":{{"message":"{message}","code":"{code}"}}}}"#)
}

pub fn create_test_vehicle_json(id: &str, plate: &str) -> String {
    format!(
        r#"{{"id":"{id}","vehicle_number":"{plate}","mobile_number":"9000000001","status":"parked","registered_at":"2026-03-02T08:05:00Z","vehicle_image_url":"https://storage.test/vehicles/{id}.jpg"}}"#
    )
}
