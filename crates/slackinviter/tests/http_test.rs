#![allow(clippy::unwrap_used)]
// End-to-end tests for the HTTP surface: the router is served on an
// ephemeral port with connect-info and driven with reqwest.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slackinviter::{AppState, SiteSettings, build_router};
use slackinviter_api::SessionClient;
use slackinviter_core::{
    Admission, CaptchaVerifier, CoreError, DirectorySnapshot, Inviter, Metrics, SessionVerifier, SnapshotStore,
};

// ── Fakes ───────────────────────────────────────────────────────────

struct Captcha {
    accept: bool,
    seen: Mutex<Vec<IpAddr>>,
}

#[async_trait]
impl CaptchaVerifier for Captcha {
    async fn verify(&self, _token: &str, remote_ip: IpAddr) -> Result<bool, CoreError> {
        self.seen.lock().unwrap().push(remote_ip);
        Ok(self.accept)
    }
}

#[derive(Default)]
struct Invites {
    domains: Mutex<Vec<String>>,
}

#[async_trait]
impl Inviter for Invites {
    async fn invite(&self, domain: &str, _first: &str, _last: &str, _email: &str) -> Result<(), CoreError> {
        self.domains.lock().unwrap().push(domain.to_owned());
        Ok(())
    }
}

// ── Harness ─────────────────────────────────────────────────────────

struct Harness {
    base: String,
    store: Arc<SnapshotStore>,
    captcha: Arc<Captcha>,
    invites: Arc<Invites>,
}

struct Options {
    accept_captcha: bool,
    enforce_https: bool,
    trust_forwarded_for: bool,
    sessions: Option<Arc<dyn SessionVerifier>>,
    static_dir: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            accept_captcha: true,
            enforce_https: false,
            trust_forwarded_for: false,
            sessions: None,
            static_dir: PathBuf::from("./static"),
        }
    }
}

async fn spawn_app(opts: Options) -> Harness {
    let store = Arc::new(SnapshotStore::new());
    store.publish(DirectorySnapshot {
        total_count: 42,
        active_count: 0,
        workspace_name: "Gophers".into(),
        workspace_domain: "gophers".into(),
        ..DirectorySnapshot::default()
    });
    let metrics = Arc::new(Metrics::new());
    let captcha = Arc::new(Captcha {
        accept: opts.accept_captcha,
        seen: Mutex::new(Vec::new()),
    });
    let invites = Arc::new(Invites::default());
    let admission = Arc::new(Admission::new(
        Arc::clone(&captcha) as _,
        Arc::clone(&invites) as _,
        Arc::clone(&store),
        Arc::clone(&metrics),
    ));

    let state = AppState {
        store: Arc::clone(&store),
        metrics,
        admission,
        sessions: opts.sessions,
        site: Arc::new(SiteSettings {
            captcha_sitekey: "site-key".into(),
            coc_url: "http://coc.golangbridge.org/".into(),
            enforce_https: opts.enforce_https,
            trust_forwarded_for: opts.trust_forwarded_for,
            static_dir: opts.static_dir,
        }),
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });

    Harness {
        base: format!("http://127.0.0.1:{port}"),
        store,
        captcha,
        invites,
    }
}

fn valid_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("fname", "Ada"),
        ("lname", "Lovelace"),
        ("email", "ada@example.com"),
        ("coc", "1"),
        ("g-recaptcha-response", "tok"),
    ]
}

async fn debug_vars(base: &str) -> Value {
    reqwest::get(format!("{base}/debug/vars"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

// ── Invite ──────────────────────────────────────────────────────────

#[tokio::test]
async fn invite_rejects_non_post() {
    let h = spawn_app(Options::default()).await;

    for route in ["/invite", "/invite/"] {
        let resp = reqwest::get(format!("{}{route}", h.base)).await.unwrap();
        assert_eq!(resp.status(), 404, "GET {route}");
    }
}

#[tokio::test]
async fn invite_missing_first_name() {
    let h = spawn_app(Options::default()).await;
    let mut form = valid_form();
    form[0].1 = "";

    let resp = reqwest::Client::new()
        .post(format!("{}/invite/", h.base))
        .form(&form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 412);
    assert_eq!(resp.text().await.unwrap(), "Missing first name");

    let vars = debug_vars(&h.base).await;
    assert_eq!(vars["metrics"]["missing_first_name"], 1);
    assert_eq!(vars["metrics"]["successful_invites"], 0);
    assert!(h.captcha.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn invite_without_form_body_is_missing_email() {
    let h = spawn_app(Options::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/invite", h.base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 412);
    assert_eq!(resp.text().await.unwrap(), "Missing email");
}

#[tokio::test]
async fn invite_success_targets_snapshot_workspace() {
    let h = spawn_app(Options::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/invite/", h.base))
        .form(&valid_form())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "");
    assert_eq!(*h.invites.domains.lock().unwrap(), vec!["gophers".to_owned()]);
    assert_eq!(
        *h.captcha.seen.lock().unwrap(),
        vec!["127.0.0.1".parse::<IpAddr>().unwrap()]
    );

    let vars = debug_vars(&h.base).await;
    assert_eq!(vars["metrics"]["successful_invites"], 1);
}

#[tokio::test]
async fn invite_invalid_captcha() {
    let h = spawn_app(Options {
        accept_captcha: false,
        ..Options::default()
    })
    .await;

    let resp = reqwest::Client::new()
        .post(format!("{}/invite/", h.base))
        .form(&valid_form())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 412);
    assert_eq!(resp.text().await.unwrap(), "Invalid recaptcha");
    assert!(h.invites.domains.lock().unwrap().is_empty());
}

#[tokio::test]
async fn trusted_forwarded_for_supplies_caller_ip() {
    let h = spawn_app(Options {
        trust_forwarded_for: true,
        ..Options::default()
    })
    .await;

    let resp = reqwest::Client::new()
        .post(format!("{}/invite/", h.base))
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .form(&valid_form())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        *h.captcha.seen.lock().unwrap(),
        vec!["203.0.113.9".parse::<IpAddr>().unwrap()]
    );
}

#[tokio::test]
async fn unparsable_caller_address_is_a_server_error() {
    let h = spawn_app(Options {
        trust_forwarded_for: true,
        ..Options::default()
    })
    .await;

    let resp = reqwest::Client::new()
        .post(format!("{}/invite/", h.base))
        .header("x-forwarded-for", "unknown")
        .form(&valid_form())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let vars = debug_vars(&h.base).await;
    assert_eq!(vars["metrics"]["bad_remote_addr"], 1);
}

// ── Badge ───────────────────────────────────────────────────────────

#[tokio::test]
async fn badge_shows_total_then_active_over_total() {
    let h = spawn_app(Options::default()).await;

    let resp = reqwest::get(format!("{}/badge.svg", h.base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "image/svg+xml; charset=utf-8"
    );
    let svg = resp.text().await.unwrap();
    assert!(svg.contains(">42</text>"));
    assert!(svg.contains(">slack</text>"));

    h.store.publish(DirectorySnapshot {
        total_count: 42,
        active_count: 7,
        workspace_domain: "gophers".into(),
        ..DirectorySnapshot::default()
    });

    let svg = reqwest::get(format!("{}/badge", h.base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(svg.contains(">7/42</text>"));
}

#[tokio::test]
async fn badge_rejects_post() {
    let h = spawn_app(Options::default()).await;
    let resp = reqwest::Client::new()
        .post(format!("{}/badge.svg", h.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

// ── Home ────────────────────────────────────────────────────────────

#[tokio::test]
async fn home_renders_form_and_counts_hits() {
    let h = spawn_app(Options::default()).await;

    let resp = reqwest::get(format!("{}/", h.base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = resp.text().await.unwrap();
    assert!(html.contains("Join <b>Gophers</b> on Slack."));
    assert!(html.contains(r#"data-sitekey="site-key""#));

    let vars = debug_vars(&h.base).await;
    assert_eq!(vars["metrics"]["requests"], 1);
    assert_eq!(vars["metrics"]["hits_per_minute"], 1);
    assert_eq!(vars["metrics"]["user_count"], 42);
    assert_eq!(vars["sync"]["generation"], 1);
}

#[tokio::test]
async fn plain_http_is_redirected_when_enforced() {
    let h = spawn_app(Options {
        enforce_https: true,
        ..Options::default()
    })
    .await;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let resp = client
        .get(format!("{}/?ref=badge", h.base))
        .header("x-forwarded-proto", "http")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 301);
    let location = resp.headers()["location"].to_str().unwrap().to_owned();
    let host = h.base.trim_start_matches("http://");
    assert_eq!(location, format!("https://{host}/?ref=badge"));

    let resp = client
        .get(format!("{}/", h.base))
        .header("x-forwarded-proto", "https")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn session_gate_shows_sign_in_without_session() {
    let ory = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions/whoami"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ory)
        .await;
    let sessions = SessionClient::with_client(reqwest::Client::new(), &ory.uri()).unwrap();
    let h = spawn_app(Options {
        sessions: Some(Arc::new(sessions)),
        ..Options::default()
    })
    .await;

    let resp = reqwest::get(format!("{}/", h.base)).await.unwrap();

    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("You need to sign in"));
    assert!(!html.contains("g-recaptcha"));

    let vars = debug_vars(&h.base).await;
    assert_eq!(vars["metrics"]["requests"], 0);
}

#[tokio::test]
async fn session_gate_passes_active_session() {
    let ory = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions/whoami"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "active": true,
            "identity": { "traits": { "email": "ada@example.com", "name": "Ada" } }
        })))
        .mount(&ory)
        .await;
    let sessions = SessionClient::with_client(reqwest::Client::new(), &ory.uri()).unwrap();
    let h = spawn_app(Options {
        sessions: Some(Arc::new(sessions)),
        ..Options::default()
    })
    .await;

    let html = reqwest::Client::new()
        .get(format!("{}/", h.base))
        .header("cookie", "ory_session=abc")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains(r#"value="ada@example.com""#));
    assert!(html.contains("Signed in as Ada"));
}

// ── Misc ────────────────────────────────────────────────────────────

#[tokio::test]
async fn static_assets_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("client.js"), "console.log('hi');").unwrap();
    let h = spawn_app(Options {
        static_dir: dir.path().to_path_buf(),
        ..Options::default()
    })
    .await;

    let resp = reqwest::get(format!("{}/static/client.js", h.base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "console.log('hi');");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let h = spawn_app(Options::default()).await;
    let resp = reqwest::get(format!("{}/nope", h.base)).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn debug_vars_reports_sync_state() {
    let h = spawn_app(Options::default()).await;
    let vars = debug_vars(&h.base).await;

    assert_eq!(vars["sync"]["phase"], "idle");
    assert_eq!(vars["sync"]["generation"], 1);
    assert_eq!(vars["sync"]["synced_at"], Value::Null);
    for name in [
        "requests",
        "missing_email",
        "missing_first_name",
        "missing_last_name",
        "missing_coc",
        "failed_captcha",
        "invalid_captcha",
        "invite_errors",
        "successful_invites",
        "hits_per_minute",
        "user_count",
        "active_user_count",
    ] {
        assert!(vars["metrics"].get(name).is_some(), "missing {name}");
    }
}
