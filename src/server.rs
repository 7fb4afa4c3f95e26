//! HTTP boundary for the pose angle pipeline.
//!
//! One route accepts a multipart upload with a `frame` field and answers with
//! JSON. Any other method on that route gets a 405 before the body is read.
//! Decoding, inference, drawing, and encoding run on the blocking pool.

use crate::config::ServerConfig;
use crate::constants::FRAME_FIELD;
use crate::pipeline::{analyze_frame, FrameOutcome};
use crate::provider::LandmarkProviderFactory;
use crate::{Error, Result};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

/// Body returned for every non-success outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human-readable reason
    pub error: &'static str,
}

pub const MSG_METHOD_NOT_ALLOWED: &str = "Only POST allowed";
pub const MSG_NO_FRAME: &str = "No frame provided";
pub const MSG_INVALID_IMAGE: &str = "Invalid image data";
pub const MSG_NO_PERSON: &str = "No person/landmarks detected";
pub const MSG_ENCODE_FAILED: &str = "Failed to encode image";
pub const MSG_DETECTION_FAILED: &str = "Pose detection failed";

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

/// Map a pipeline result onto its HTTP response
#[must_use]
pub fn outcome_response(result: Result<FrameOutcome>) -> Response {
    match result {
        Ok(FrameOutcome::Success(report)) => (StatusCode::OK, Json(report)).into_response(),
        Ok(FrameOutcome::NoPerson) => {
            debug!("No person detected in frame");
            error_response(StatusCode::OK, MSG_NO_PERSON)
        }
        Err(Error::Decode(msg)) => {
            warn!("Rejected frame: {}", msg);
            error_response(StatusCode::BAD_REQUEST, MSG_INVALID_IMAGE)
        }
        Err(Error::Encode(msg)) => {
            warn!("Failed to encode overlay: {}", msg);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_ENCODE_FAILED)
        }
        Err(e) => {
            warn!("Pose detection failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_DETECTION_FAILED)
        }
    }
}

async fn read_frame(mut multipart: Multipart) -> Option<Vec<u8>> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(FRAME_FIELD) => {
                return match field.bytes().await {
                    Ok(bytes) => Some(bytes.to_vec()),
                    Err(e) => {
                        warn!("Failed to read frame field: {}", e);
                        None
                    }
                };
            }
            Ok(Some(_)) => {}
            Ok(None) => return None,
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return None;
            }
        }
    }
}

async fn detect_pose<F: LandmarkProviderFactory>(
    State(factory): State<Arc<F>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Rejected request: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, MSG_NO_FRAME);
        }
    };

    let Some(bytes) = read_frame(multipart).await else {
        return error_response(StatusCode::BAD_REQUEST, MSG_NO_FRAME);
    };

    debug!("Received frame of {} bytes", bytes.len());

    match tokio::task::spawn_blocking(move || outcome_response(analyze_frame(factory.as_ref(), &bytes))).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Pose detection worker failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_DETECTION_FAILED)
        }
    }
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, MSG_METHOD_NOT_ALLOWED)
}

/// Build the router serving the pose endpoint
///
/// The configured route is served both with and without a trailing slash.
pub fn router<F: LandmarkProviderFactory>(factory: Arc<F>, config: &ServerConfig) -> Router {
    let route = config.route.as_str();
    let alternate = match route.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => format!("{route}/"),
    };

    let mut router = Router::new().route(route, post(detect_pose::<F>).fallback(method_not_allowed));
    if !alternate.is_empty() && alternate != route {
        router = router.route(&alternate, post(detect_pose::<F>).fallback(method_not_allowed));
    }

    router
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(factory)
}

/// Bind the configured address and serve until the process exits
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn serve<F: LandmarkProviderFactory>(config: &ServerConfig, factory: F) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on http://{}{}", listener.local_addr()?, config.route);

    axum::serve(listener, router(Arc::new(factory), config)).await?;

    Ok(())
}
