use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use slackinviter::cli::Cli;
use slackinviter::error::CliError;
use slackinviter::shutdown::shutdown_signal;
use slackinviter::{AppState, SiteSettings, build_router};
use slackinviter_api::{RecaptchaClient, SessionClient, SlackClient};
use slackinviter_config::Settings;
use slackinviter_core::{Admission, Metrics, SessionVerifier, SnapshotStore, Syncer};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, json: bool, debug_clients: bool) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let fallback = if debug_clients && verbosity == 0 {
        format!("{level},slackinviter_api=debug")
    } else {
        level.to_owned()
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = slackinviter_config::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, cli.json_logs || settings.log_json, settings.debug);

    if cli.check {
        info!(
            port = settings.port,
            session_gate = settings.session_url.is_some(),
            "configuration OK"
        );
        return Ok(());
    }

    serve(settings).await
}

async fn serve(settings: Settings) -> Result<(), CliError> {
    let site = Arc::new(SiteSettings::from(&settings));
    let transport = settings.transport();
    let port = settings.port;

    let slack = Arc::new(
        SlackClient::new(settings.slack_token, &transport)
            .map_err(|source| CliError::Client { client: "Slack", source })?,
    );
    let captcha = Arc::new(
        RecaptchaClient::new(settings.captcha_secret, &transport)
            .map_err(|source| CliError::Client { client: "reCAPTCHA", source })?,
    );
    let sessions = settings
        .session_url
        .map(|url| SessionClient::new(url.as_str(), &transport))
        .transpose()
        .map_err(|source| CliError::Client { client: "session", source })?
        .map(|client| Arc::new(client) as Arc<dyn SessionVerifier>);

    let store = Arc::new(SnapshotStore::new());
    let metrics = Arc::new(Metrics::new());
    let admission = Arc::new(Admission::new(
        captcha,
        Arc::clone(&slack) as _,
        Arc::clone(&store),
        Arc::clone(&metrics),
    ));

    let cancel = CancellationToken::new();
    let syncer = Syncer::new(slack, Arc::clone(&store), Arc::clone(&metrics), settings.sync);
    let sync_task = syncer.spawn(cancel.clone());

    let state = AppState {
        store,
        metrics,
        admission,
        sessions,
        site,
    };
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await.map_err(|source| CliError::Bind {
        addr: addr.to_string(),
        port,
        source,
    })?;
    info!(%addr, "listening");

    let shutdown = {
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    };
    let served = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(CliError::Serve);

    cancel.cancel();
    if let Err(e) = sync_task.await {
        warn!(error = %e, "directory sync task ended abnormally");
    }
    info!("server stopped");
    served
}
