//! Shared fixtures: a wiremock server plus a session logged in against it.
//!
//! The client under test is blocking, so the tests are plain `#[test]`
//! functions. A private tokio runtime is used only to start and program the
//! mock server; requests from the client are answered by wiremock's own
//! server thread.

#![allow(dead_code)]

use serde_json::{Value, json};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use cdnapi::Session;

pub const SESSION_COOKIE: &str = "fastly.session=s3cr3t";
pub const SERVICE_ID: &str = "SU1Z0isxPaozGVKXdv0eY";

pub struct Fixture {
    server: MockServer,
    rt: Runtime,
}

impl Fixture {
    pub fn start() -> Self {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    /// Mounts `METHOD path -> status + JSON body`.
    pub fn respond(&self, verb: &str, route: &str, status: u16, body: Value) {
        self.mount(
            Mock::given(method(verb))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status).set_body_json(body)),
        );
    }

    pub fn requests(&self) -> Vec<Request> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    /// Requests other than the login handshake.
    pub fn api_requests(&self) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() != "/login")
            .collect()
    }

    /// Accepts any login and hands back a session cookie.
    pub fn login(&self) -> Session {
        self.mount(
            Mock::given(method("POST")).and(path("/login")).respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", format!("{SESSION_COOKIE}; Path=/").as_str())
                    .set_body_json(json!({"owner": "user@example.com"})),
            ),
        );
        Session::login("user@example.com", "password", Some(self.uri().as_str())).unwrap()
    }
}

pub fn body_text(req: &Request) -> String {
    String::from_utf8_lossy(&req.body).into_owned()
}

pub fn service_json(id: &str, name: &str, comment: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "comment": comment,
        "customer_id": "x4xCwxxJxGCx123Rx5xTx",
        "publish_key": "3c9f2a1f6c0a1c2b",
        "version": 1,
        "created_at": "2014-05-01T12:30:00+00:00",
        "updated_at": "2014-05-01T12:30:00+00:00"
    })
}

pub fn version_json(number: u64) -> Value {
    json!({
        "number": number,
        "service_id": SERVICE_ID,
        "active": false,
        "locked": false,
        "comment": "",
        "testing": false,
        "staging": false,
        "deployed": false,
        "deleted_at": null
    })
}

pub fn domain_json(name: &str, version: u64, comment: &str) -> Value {
    json!({
        "name": name,
        "comment": comment,
        "service_id": SERVICE_ID,
        "version": version,
        "locked": false
    })
}

pub fn backend_json(name: &str, address: &str, port: u16) -> Value {
    json!({
        "name": name,
        "address": address,
        "port": port,
        "use_ssl": false,
        "connect_timeout": 1000,
        "first_byte_timeout": 15000,
        "between_bytes_timeout": 10000,
        "error_threshold": 0,
        "max_conn": 200,
        "weight": 100,
        "auto_loadbalance": false,
        "healthcheck": null,
        "comment": "",
        "hostname": address,
        "ipv4": null,
        "ipv6": null,
        "service_id": SERVICE_ID,
        "version": 1
    })
}
