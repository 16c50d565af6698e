use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

pub const CLAN_TAG: &str = "ABC123";
pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct ApiStubConfig {
    pub members: Value,
    pub river_race: Value,
    /// Answer every request with this status and an API-style error body.
    pub fail_with: Option<u16>,
}

impl ApiStubConfig {
    pub fn new(period_type: &str) -> Self {
        Self {
            members: json!({
                "items": [
                    {"tag": "#P1", "name": "Alice"},
                    {"tag": "#P2", "name": "Bob"},
                    {"tag": "#P3", "name": "Carol"},
                ]
            }),
            river_race: json!({
                "periodType": period_type,
                "clan": {
                    "tag": "#ABC123",
                    "participants": [
                        {"tag": "#P1", "name": "Alice", "decksUsed": 2, "decksUsedToday": 2, "fame": 50},
                        {"tag": "#P2", "name": "Bob", "decksUsed": 3, "decksUsedToday": 3, "fame": 10},
                        {"tag": "#P3", "name": "Carol", "decksUsed": 3, "decksUsedToday": 3, "fame": 10},
                        {"tag": "#GONE", "name": "Former Member", "decksUsed": 4, "decksUsedToday": 4, "fame": 900},
                    ]
                }
            }),
            fail_with: None,
        }
    }
}

pub struct ApiStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ApiStub {
    pub fn spawn(config: ApiStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start api stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/v1");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let members_path = format!("/v1/clans/%23{CLAN_TAG}/members");
            let river_race_path = format!("/v1/clans/%23{CLAN_TAG}/currentriverrace");

            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let authorized = request.headers().iter().any(|h| {
                    h.field.equiv("Authorization") && h.value.as_str() == format!("Bearer {TOKEN}")
                });
                if !authorized {
                    let _ = request.respond(json_response(
                        403,
                        &json!({"reason": "accessDenied", "message": "Invalid authorization"}),
                    ));
                    continue;
                }

                if let Some(status) = config.fail_with {
                    let _ = request.respond(json_response(
                        status,
                        &json!({"reason": "accessDenied.invalidIp", "message": "Invalid authorization: API key does not allow access from IP"}),
                    ));
                    continue;
                }

                let path = request.url().to_string();
                let body = if request.method() != &tiny_http::Method::Get {
                    None
                } else if path == members_path {
                    Some(&config.members)
                } else if path == river_race_path {
                    Some(&config.river_race)
                } else {
                    None
                };

                let response = match body {
                    Some(body) => json_response(200, body),
                    None => json_response(404, &json!({"reason": "notFound"})),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for ApiStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn json_response(status: u16, body: &Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("static header");
    tiny_http::Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(header)
}
