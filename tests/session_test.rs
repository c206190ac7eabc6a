mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use cdnapi::{Error, Session, SessionConfig};
use common::{Fixture, SESSION_COOKIE, service_json};

#[test]
fn login_posts_form_credentials() {
    let fx = Fixture::start();
    fx.mount(
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("password=p%40ss+word&user=ops%40example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({}))),
    );

    let session = Session::login("ops@example.com", "p@ss word", Some(fx.uri().as_str())).unwrap();

    assert_eq!(session.user(), "ops@example.com");
    assert_eq!(session.base_url(), fx.uri());
}

#[test]
fn session_cookie_is_sent_on_later_requests() {
    let fx = Fixture::start();
    let session = fx.login();
    fx.mount(
        Mock::given(method("GET"))
            .and(path("/service/abc"))
            .and(header("cookie", SESSION_COOKIE))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(service_json("abc", "svc", "")),
            ),
    );

    let service = session.services().get("abc").unwrap();

    assert_eq!(service.id, "abc");
}

#[test]
fn rejected_login_is_auth_error() {
    let fx = Fixture::start();
    fx.respond(
        "POST",
        "/login",
        401,
        json!({"msg": "Invalid username or password"}),
    );

    let result = Session::login("", "", Some(fx.uri().as_str()));

    assert!(
        matches!(result, Err(Error::Auth { status: 401 })),
        "expected Auth error, got: {result:?}"
    );
}

#[test]
fn login_against_unreachable_host_is_transport_error() {
    let cfg = SessionConfig::new("ops@example.com", "pw")
        .with_url("http://127.0.0.1:1")
        .with_connect_timeout(Duration::from_secs(2))
        .with_read_timeout(Duration::from_secs(5));

    let result = Session::with_config(cfg);

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

#[test]
fn read_timeout_is_enforced() {
    let fx = Fixture::start();
    fx.mount(
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3))),
    );
    let cfg = SessionConfig::new("ops@example.com", "pw")
        .with_url(fx.uri())
        .with_read_timeout(Duration::from_millis(300));

    let result = Session::with_config(cfg);

    match result {
        Err(Error::Transport(e)) => assert!(e.is_timeout(), "expected timeout, got {e}"),
        other => panic!("expected Transport timeout, got: {other:?}"),
    }
}

#[test]
fn api_error_carries_msg_and_detail() {
    let fx = Fixture::start();
    let session = fx.login();
    fx.respond(
        "GET",
        "/service/missing",
        404,
        json!({"msg": "Record not found", "detail": "Cannot find service 'missing'"}),
    );

    let err = session.services().get("missing").unwrap_err();

    assert!(err.is_not_found());
    match err {
        Error::Api {
            status,
            message,
            detail,
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Record not found");
            assert_eq!(detail, "Cannot find service 'missing'");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[test]
fn raw_transport_cleans_paths() {
    let fx = Fixture::start();
    let session = fx.login();
    fx.respond("GET", "/service/abc/details", 200, json!({"ok": true}));

    let body = session.transport().get("service//abc/./details/").unwrap();

    assert_eq!(body, r#"{"ok":true}"#);
}
