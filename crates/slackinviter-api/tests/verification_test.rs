#![allow(clippy::unwrap_used)]
// Integration tests for `RecaptchaClient` and `SessionClient` using wiremock.

use std::net::{IpAddr, Ipv4Addr};

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slackinviter_api::{Error, RecaptchaClient, SessionClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn recaptcha() -> (MockServer, RecaptchaClient) {
    let server = MockServer::start().await;
    let client = RecaptchaClient::with_client(
        reqwest::Client::new(),
        &format!("{}/recaptcha/api/siteverify", server.uri()),
        SecretString::from("captcha-secret".to_owned()),
    )
    .unwrap();
    (server, client)
}

async fn sessions() -> (MockServer, SessionClient) {
    let server = MockServer::start().await;
    let client = SessionClient::with_client(reqwest::Client::new(), &server.uri()).unwrap();
    (server, client)
}

const CALLER: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

// ── reCAPTCHA ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_verify_success_sends_secret_and_ip() {
    let (server, client) = recaptcha().await;

    Mock::given(method("POST"))
        .and(path("/recaptcha/api/siteverify"))
        .and(body_string_contains("secret=captcha-secret"))
        .and(body_string_contains("response=tok"))
        .and(body_string_contains("remoteip=203.0.113.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.verify("tok", Some(CALLER)).await.unwrap());
}

#[tokio::test]
async fn test_verify_not_valid() {
    let (server, client) = recaptcha().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    assert!(!client.verify("tok", Some(CALLER)).await.unwrap());
}

#[tokio::test]
async fn test_verify_error_codes_are_protocol_errors() {
    let (server, client) = recaptcha().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error-codes": ["missing-input-response"]
        })))
        .mount(&server)
        .await;

    let err = client.verify("", None).await.unwrap_err();

    assert!(
        matches!(&err, Error::Captcha { codes } if codes == &["missing-input-response"]),
        "expected Captcha error, got: {err:?}"
    );
}

// ── Sessions ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_whoami_active_session() {
    let (server, client) = sessions().await;

    Mock::given(method("GET"))
        .and(path("/sessions/whoami"))
        .and(header("cookie", "ory_session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "active": true,
            "identity": { "traits": { "email": "ada@example.com", "name": "Ada" } }
        })))
        .mount(&server)
        .await;

    let session = client.whoami("ory_session=abc").await.unwrap().unwrap();

    assert!(session.active);
    assert_eq!(session.email(), Some("ada@example.com"));
    assert_eq!(session.name(), Some("Ada"));
}

#[tokio::test]
async fn test_whoami_unauthorized_is_none() {
    let (server, client) = sessions().await;

    Mock::given(method("GET"))
        .and(path("/sessions/whoami"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(client.whoami("").await.unwrap().is_none());
}

#[tokio::test]
async fn test_whoami_server_error() {
    let (server, client) = sessions().await;

    Mock::given(method("GET"))
        .and(path("/sessions/whoami"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.whoami("x=y").await.unwrap_err();
    assert!(matches!(err, Error::Http { status: 500, .. }), "got: {err:?}");
}
