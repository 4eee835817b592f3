//! Request handlers for the HTTP surface.

use std::convert::Infallible;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

use super::AppState;
use crate::ascii::{self, CharSet, ConversionConfig, ConvertError, SourceImage};
use crate::delivery::{
    decode_png_data_url, validate_recipient, DeliveryError, DeliveryFailure, DeliveryOutcome,
    DeliveryRequest,
};
use crate::messages::Message;
use crate::render::{self, CellMetrics};
use crate::store::StoreError;

/// Query parameters of `POST /api/convert`; unset fields keep the server defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
    pub resolution: Option<f64>,
    pub invert: Option<bool>,
    pub grayscale: Option<bool>,
    pub charset: Option<String>,
}

impl ConvertQuery {
    pub fn apply(&self, base: ConversionConfig) -> Result<ConversionConfig, ConvertError> {
        let mut config = base;
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(invert) = self.invert {
            config.invert = invert;
        }
        if let Some(grayscale) = self.grayscale {
            config.grayscale = grayscale;
        }
        if let Some(name) = &self.charset {
            config.charset =
                CharSet::from_name(name).ok_or_else(|| ConvertError::UnknownCharset(name.clone()))?;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub message: String,
    pub text: Option<String>,
    pub png_base64: Option<String>,
    pub columns: usize,
    pub rows: usize,
}

/// Body of `POST /api/send`. Missing fields deserialize as empty and are
/// reported by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SendBody {
    pub email: String,
    pub username: String,
    pub text: String,
    pub png_data_url: String,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(super) fn json_reply<T: Serialize>(body: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

enum ConvertFailure {
    Convert(ConvertError),
    Render(render::RenderError),
    Join,
}

/// `POST /api/convert`
pub async fn convert(
    query: ConvertQuery,
    body: Bytes,
    state: Arc<AppState>,
) -> Result<Response, Infallible> {
    let locale = state.locale;
    let failure = |message: Message, status: StatusCode| {
        json_reply(
            &ConvertResponse {
                success: false,
                message: message.text(locale),
                text: None,
                png_base64: None,
                columns: 0,
                rows: 0,
            },
            status,
        )
    };

    let config = match query.apply(state.conversion) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Rejected conversion options: {}", e);
            return Ok(failure(Message::ConversionFailed, StatusCode::BAD_REQUEST));
        }
    };

    let raster = Arc::clone(&state.raster);
    let result = tokio::task::spawn_blocking(move || {
        let image = SourceImage::decode(&body).map_err(ConvertFailure::Convert)?;
        let frame = ascii::convert(&image, &config).map_err(ConvertFailure::Convert)?;
        let png = render::render_png(&frame, &*raster, CellMetrics::default())
            .map_err(ConvertFailure::Render)?;
        Ok::<_, ConvertFailure>((frame, png))
    })
    .await
    .unwrap_or(Err(ConvertFailure::Join));

    match result {
        Ok((frame, png)) => {
            log::info!(
                "Converted image to {}x{} glyphs",
                frame.columns(),
                frame.row_count()
            );
            Ok(json_reply(
                &ConvertResponse {
                    success: true,
                    message: Message::Converted.text(locale),
                    text: Some(frame.to_text()),
                    png_base64: Some(BASE64.encode(png)),
                    columns: frame.columns(),
                    rows: frame.row_count(),
                },
                StatusCode::OK,
            ))
        }
        Err(ConvertFailure::Convert(ConvertError::Decode(e))) => {
            log::warn!("Could not decode uploaded image: {}", e);
            Ok(failure(Message::InvalidImage, StatusCode::BAD_REQUEST))
        }
        Err(ConvertFailure::Convert(e)) => {
            log::warn!("Conversion failed: {}", e);
            Ok(failure(
                Message::ConversionFailed,
                StatusCode::UNPROCESSABLE_ENTITY,
            ))
        }
        Err(ConvertFailure::Render(e)) => {
            log::error!("Rendering failed: {}", e);
            Ok(failure(
                Message::ConversionFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
        Err(ConvertFailure::Join) => {
            log::error!("Conversion task panicked");
            Ok(failure(
                Message::ConversionFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// `POST /api/send`
///
/// The artifact is stored before mailing and kept when delivery fails.
pub async fn send(body: SendBody, state: Arc<AppState>) -> Result<Response, Infallible> {
    let locale = state.locale;
    let reply = |outcome: DeliveryOutcome, download_url: Option<String>, status: StatusCode| {
        json_reply(
            &SendResponse {
                success: outcome.success,
                message: outcome.message,
                download_url,
            },
            status,
        )
    };

    let request = match build_request(&body) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected delivery request: {}", e);
            return Ok(reply(
                DeliveryOutcome::failed(&e, locale),
                None,
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    let store = state.store.clone();
    let png = request.png().to_vec();
    let download_url = match tokio::task::spawn_blocking(move || store.store(&png)).await {
        Ok(Ok(artifact)) => {
            log::info!("Stored artifact {}", artifact.name);
            Some(artifact.url)
        }
        Ok(Err(e)) => {
            log::error!("Failed to store artifact, sending without link: {}", e);
            None
        }
        Err(e) => {
            log::error!("Store task failed: {}", e);
            None
        }
    };

    let Some(mailer) = state.mailer.as_ref() else {
        let e = DeliveryError::MissingCredentials;
        log::error!("Email delivery failed: {}", e);
        return Ok(reply(
            DeliveryOutcome::failed(&e, locale),
            download_url,
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    };

    match mailer.send(&request, locale, download_url.as_deref()).await {
        Ok(()) => Ok(reply(
            DeliveryOutcome::sent(locale),
            download_url,
            StatusCode::OK,
        )),
        Err(e) => {
            log::error!("Email delivery failed: {}", e);
            let status = match e.category() {
                DeliveryFailure::Validation | DeliveryFailure::Payload => StatusCode::BAD_REQUEST,
                DeliveryFailure::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_GATEWAY,
            };
            Ok(reply(
                DeliveryOutcome::failed(&e, locale),
                download_url,
                status,
            ))
        }
    }
}

fn build_request(body: &SendBody) -> Result<DeliveryRequest, DeliveryError> {
    let (email, display_name) = validate_recipient(&body.email, &body.username)?;
    if body.png_data_url.trim().is_empty() {
        return Err(DeliveryError::MissingField("png"));
    }
    let png = decode_png_data_url(&body.png_data_url)?;
    DeliveryRequest::new(email, display_name, body.text.clone(), png)
}

/// `GET /api/download/{name}`
pub async fn download(name: String, state: Arc<AppState>) -> Result<Response, Infallible> {
    let locale = state.locale;
    let store = state.store.clone();
    let lookup = name.clone();
    let result = tokio::task::spawn_blocking(move || store.retrieve_and_remove(&lookup)).await;

    let error = |message: Message, status: StatusCode| {
        json_reply(
            &ErrorResponse {
                error: message.text(locale),
            },
            status,
        )
    };

    match result {
        Ok(Ok(payload)) => {
            let reply = warp::reply::with_header(payload, "content-type", "image/png");
            let reply = warp::reply::with_header(
                reply,
                "content-disposition",
                format!("attachment; filename=\"{}\"", name),
            );
            Ok(reply.into_response())
        }
        Ok(Err(StoreError::InvalidName { name })) => {
            log::warn!("Rejected download of invalid name {:?}", name);
            Ok(error(Message::InvalidFileName, StatusCode::BAD_REQUEST))
        }
        Ok(Err(StoreError::NotFound { name })) => {
            log::info!("Download requested for missing artifact {}", name);
            Ok(error(Message::FileNotFound, StatusCode::NOT_FOUND))
        }
        Ok(Err(e)) => {
            log::error!("Error retrieving {}: {}", name, e);
            Ok(error(Message::FileNotFound, StatusCode::NOT_FOUND))
        }
        Err(e) => {
            log::error!("Download task failed: {}", e);
            Ok(error(
                Message::FileNotFound,
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// `GET /api/cleanup`
pub async fn cleanup(state: Arc<AppState>) -> Result<Response, Infallible> {
    let locale = state.locale;
    let store = state.store.clone();

    match tokio::task::spawn_blocking(move || store.sweep()).await {
        Ok(Ok(report)) => {
            let message = if report.deleted_count == 0 {
                Message::NoImagesToClean
            } else {
                Message::Cleaned(report.deleted_count)
            };
            Ok(json_reply(
                &CleanupResponse {
                    message: message.text(locale),
                    deleted_count: Some(report.deleted_count),
                },
                StatusCode::OK,
            ))
        }
        Ok(Err(e)) => {
            log::error!("Error during image cleanup: {}", e);
            Ok(cleanup_failed(locale))
        }
        Err(e) => {
            log::error!("Cleanup task failed: {}", e);
            Ok(cleanup_failed(locale))
        }
    }
}

fn cleanup_failed(locale: crate::messages::Locale) -> Response {
    json_reply(
        &CleanupResponse {
            message: Message::CleanupFailed.text(locale),
            deleted_count: None,
        },
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

/// `GET /api/images/list`
pub async fn list(state: Arc<AppState>) -> Result<Response, Infallible> {
    let locale = state.locale;
    let store = state.store.clone();

    match tokio::task::spawn_blocking(move || store.list()).await {
        Ok(Ok(images)) => Ok(json_reply(&ListResponse { images }, StatusCode::OK)),
        Ok(Err(e)) => {
            log::error!("Error listing images: {}", e);
            Ok(list_failed(locale))
        }
        Err(e) => {
            log::error!("List task failed: {}", e);
            Ok(list_failed(locale))
        }
    }
}

fn list_failed(locale: crate::messages::Locale) -> Response {
    json_reply(
        &ErrorResponse {
            error: Message::ListFailed.text(locale),
        },
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_overrides_defaults() {
        let query = ConvertQuery {
            resolution: Some(0.2),
            invert: Some(true),
            grayscale: Some(false),
            charset: Some("minimal".into()),
        };
        let config = query.apply(ConversionConfig::default()).unwrap();
        assert_eq!(config.resolution, 0.2);
        assert!(config.invert);
        assert!(!config.grayscale);
        assert_eq!(config.charset, CharSet::Minimal);
    }

    #[test]
    fn test_empty_query_keeps_defaults() {
        let config = ConvertQuery::default()
            .apply(ConversionConfig::default())
            .unwrap();
        assert_eq!(config, ConversionConfig::default());
    }

    #[test]
    fn test_query_rejects_unknown_charset_and_bad_resolution() {
        let query = ConvertQuery {
            charset: Some("braille".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.apply(ConversionConfig::default()),
            Err(ConvertError::UnknownCharset(_))
        ));

        let query = ConvertQuery {
            resolution: Some(0.5),
            ..Default::default()
        };
        assert!(matches!(
            query.apply(ConversionConfig::default()),
            Err(ConvertError::ResolutionOutOfRange(_))
        ));
    }

    #[test]
    fn test_build_request_checks_recipient_before_image() {
        let body = SendBody {
            email: "bad".into(),
            username: "Sam".into(),
            text: "x".into(),
            png_data_url: "garbage".into(),
        };
        assert!(matches!(
            build_request(&body),
            Err(DeliveryError::InvalidEmail(_))
        ));

        let body = SendBody {
            email: "a@b.co".into(),
            username: "Sam".into(),
            text: "x".into(),
            png_data_url: String::new(),
        };
        assert!(matches!(
            build_request(&body),
            Err(DeliveryError::MissingField("png"))
        ));
    }
}
