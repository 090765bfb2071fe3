//! fbsig demo server.
//!
//! Serves an echo handler behind the signed-request interceptor. Every
//! response describes the request as the application saw it, including the
//! published `facebook.*` values, which makes the binary handy for checking a
//! canvas setup end to end.
//!
//! # Usage
//!
//! ```text
//! FACEBOOK_SECRET=123456789 FACEBOOK_API_KEY=616313 fbsig-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FACEBOOK_SECRET` | *(required)* | Application secret |
//! | `FACEBOOK_API_KEY` | *(unset)* | API key, enables cookie verification |
//! | `FACEBOOK_APP_NAME` | *(unset)* | Published as `facebook.app_name` |
//! | `FACEBOOK_PUBLISH_METADATA` | `true` | Publish app name, api key and secret |
//! | `FACEBOOK_PATH_PREFIX` | *(unset)* | Only inspect requests under this path |
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod echo;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use fbsig_core::{FacebookConfig, ServerConfig};
use fbsig_http::{FacebookHttpService, Interceptor, PathPrefix};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::echo::EchoHandler;

/// Server version logged at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the interceptor, restricting it to `path_prefix` when one is configured.
fn build_interceptor(facebook: FacebookConfig, server: &ServerConfig) -> Interceptor {
    let interceptor = Interceptor::new(facebook);
    match &server.path_prefix {
        Some(prefix) => interceptor.with_admission(PathPrefix::new(prefix.clone())),
        None => interceptor,
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: FacebookHttpService<EchoHandler>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let server_config = ServerConfig::from_env();

    init_tracing(&server_config.log_level)?;

    let facebook_config =
        FacebookConfig::from_env().context("failed to load Facebook configuration")?;
    info!(
        api_key = ?facebook_config.api_key,
        application_name = ?facebook_config.application_name,
        publish_metadata = facebook_config.publish_metadata,
        path_prefix = ?server_config.path_prefix,
        "initializing signature interceptor",
    );

    let interceptor = build_interceptor(facebook_config, &server_config);
    let service = FacebookHttpService::new(Arc::new(EchoHandler), interceptor);

    let addr: SocketAddr = server_config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", server_config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting fbsig server");

    serve(listener, service).await
}
