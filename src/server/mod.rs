//! HTTP surface: conversion, delivery, single-use downloads and sweeping.
//!
//! Routes:
//! - `POST /api/convert` - image bytes in, text and PNG out
//! - `POST /api/send` - store the PNG and email it
//! - `GET /api/download/{name}` - serve an artifact once
//! - `GET /api/cleanup` - sweep expired artifacts on demand
//! - `GET /api/images/list` - retrieval URLs of stored artifacts

mod handlers;

pub use handlers::{
    CleanupResponse, ConvertQuery, ConvertResponse, ListResponse, SendBody, SendResponse,
};

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::ascii::ConversionConfig;
use crate::config::Config;
use crate::delivery::MailClient;
use crate::messages::Locale;
use crate::render::GlyphRaster;
use crate::store::ArtifactStore;

/// Largest accepted request body (10 MiB).
pub const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Errors that can occur while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("Failed to bind server: {0}")]
    Bind(#[from] warp::Error),
}

/// Shared state of all handlers.
pub struct AppState {
    pub store: ArtifactStore,
    /// `None` when mail credentials are not configured.
    pub mailer: Option<MailClient>,
    pub raster: Arc<dyn GlyphRaster + Send + Sync>,
    pub conversion: ConversionConfig,
    pub locale: Locale,
}

impl AppState {
    /// Build the state from configuration.
    ///
    /// Missing mail credentials are logged and leave delivery disabled;
    /// every send then reports a configuration error.
    pub fn from_config(config: &Config, raster: Arc<dyn GlyphRaster + Send + Sync>) -> Self {
        let store = ArtifactStore::new(
            config.store.effective_dir(),
            config.server.effective_base_url(),
        );
        let mailer = match MailClient::from_config(&config.mail) {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("Email delivery disabled: {}", e);
                None
            }
        };
        Self {
            store,
            mailer,
            raster,
            conversion: config.conversion,
            locale: config.ui.locale,
        }
    }
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&state))
}

/// All API routes, with rejections turned into JSON errors.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let convert = warp::path!("api" / "convert")
        .and(warp::post())
        .and(warp::query::<ConvertQuery>())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_state(Arc::clone(&state)))
        .and_then(handlers::convert);

    let send = warp::path!("api" / "send")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json::<SendBody>())
        .and(with_state(Arc::clone(&state)))
        .and_then(handlers::send);

    let download = warp::path!("api" / "download" / String)
        .and(warp::get())
        .and(with_state(Arc::clone(&state)))
        .and_then(handlers::download);

    let cleanup = warp::path!("api" / "cleanup")
        .and(warp::get())
        .and(with_state(Arc::clone(&state)))
        .and_then(handlers::cleanup);

    let list = warp::path!("api" / "images" / "list")
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::list);

    convert
        .or(send)
        .or(download)
        .or(cleanup)
        .or(list)
        .recover(handle_rejection)
}

#[derive(Serialize)]
struct RejectionBody {
    error: String,
}

async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    let (status, error) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some() {
        (StatusCode::BAD_REQUEST, "Malformed request body")
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Malformed query string")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    };

    Ok(handlers::json_reply(
        &RejectionBody {
            error: error.to_string(),
        },
        status,
    ))
}

/// Sweep `store` every `every`, starting immediately.
pub fn spawn_sweeper(store: ArtifactStore, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let store = store.clone();
            match tokio::task::spawn_blocking(move || store.sweep()).await {
                Ok(Ok(report)) if report.deleted_count > 0 => {
                    log::info!("Background sweep deleted {} artifact(s)", report.deleted_count)
                }
                Ok(Ok(_)) => log::debug!("Background sweep found nothing to delete"),
                Ok(Err(e)) => log::error!("Background sweep failed: {}", e),
                Err(e) => log::error!("Background sweep task failed: {}", e),
            }
        }
    })
}

/// Run the server until Ctrl+C.
pub async fn serve(
    config: &Config,
    raster: Arc<dyn GlyphRaster + Send + Sync>,
) -> Result<(), ServerError> {
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|_| ServerError::InvalidBind(config.server.bind.clone()))?;

    let state = Arc::new(AppState::from_config(config, raster));
    let sweeper = spawn_sweeper(
        state.store.clone(),
        Duration::from_secs(config.server.sweep_interval_secs),
    );

    log::info!(
        "Artifacts in {}, download links via {}",
        state.store.dir().display(),
        state.store.base_url()
    );

    let (bound, server) =
        warp::serve(routes(state)).try_bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })?;
    log::info!("Listening on {}", bound);

    server.await;
    sweeper.abort();
    log::info!("Server stopped");
    Ok(())
}
