// ABOUTME: Gateway binary that keeps one SMPP session bound and serves POST /send-sms
// ABOUTME: Parses options with argh, logs with tracing, and unbinds cleanly on Ctrl-C

use argh::FromArgs;
use smpp_gateway::gateway::{
    Dispatcher, SessionConfig, SessionManager, TcpConnector, spawn_bulk_worker,
};
use smpp_gateway::server::{AppState, ServerConfig, create_router, guess_public_ipv4};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// HTTP to SMPP gateway holding a single bound session to an SMSC
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debug logging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the hostname or IP address of the SMSC (default: localhost)
    #[argh(option, default = "String::from(\"localhost\")")]
    host: String,

    /// the port to use when connecting to the SMSC (default: 2775)
    #[argh(option, default = "2775")]
    port: u16,

    /// the system id
    #[argh(option)]
    system_id: String,

    /// the password (default: $SMPP_PASSWORD)
    #[argh(option)]
    password: Option<String>,

    /// the system type presented when binding
    #[argh(option, default = "String::new()")]
    system_type: String,

    /// the port the HTTP server listens on (default: 3000)
    #[argh(option, default = "3000")]
    http_port: u16,

    /// seconds between enquire_link PDUs (default: 10)
    #[argh(option, default = "10")]
    keepalive_interval: u64,

    /// seconds to wait for a submit_sm response (default: 30)
    #[argh(option, default = "30")]
    submit_timeout: u64,
}

#[tokio::main]
async fn main() -> smpp_gateway::Result<()> {
    let cli_args: CliArgs = argh::from_env();

    let log_level = if cli_args.debugging { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    let password = cli_args
        .password
        .or_else(|| std::env::var("SMPP_PASSWORD").ok())
        .unwrap_or_default();

    let session_config = Arc::new(
        SessionConfig::new(cli_args.host, cli_args.port, cli_args.system_id, password)
            .with_system_type(cli_args.system_type)
            .with_keepalive_interval(Duration::from_secs(cli_args.keepalive_interval))
            .with_submit_timeout(Duration::from_secs(cli_args.submit_timeout)),
    );
    let server_config = ServerConfig::default().with_port(cli_args.http_port);
    info!(config = ?session_config, "starting gateway");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let manager = SessionManager::new(session_config.clone(), TcpConnector);
    let handle = manager.handle();
    let manager_task = tokio::spawn(manager.run(wait_for_shutdown(shutdown_rx.clone())));

    let session = handle.watch_state();
    let dispatcher = Dispatcher::new(handle, session_config);
    let bulk = spawn_bulk_worker(dispatcher, server_config.queue_depth);
    let app = create_router(AppState::new(bulk, session));

    let listener = TcpListener::bind(server_config.addr).await?;
    info!(
        "SMS gateway listening on http://{}:{}",
        guess_public_ipv4(),
        server_config.addr.port()
    );

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            // Dropping the sender would read as a shutdown request.
            std::future::pending::<()>().await;
        }
        info!("shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
        .await?;

    if let Err(e) = manager_task.await {
        error!(error = %e, "session manager task failed");
    }
    info!("gateway stopped");

    Ok(())
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
