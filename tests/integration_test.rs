//! End-to-end tests of the pose detection endpoint with a fixed landmark provider


use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use pose_angles::{
    codec::decode_data_uri,
    config::ServerConfig,
    constants::PNG_DATA_URI_PREFIX,
    joints::JOINT_ANGLE_TRIPLES,
    provider::StaticProvider,
    server::router,
};
use opencv::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use test_helpers::{multipart_body, multipart_content_type, png_frame, standing_pose};
use tower::ServiceExt;

fn app(provider: StaticProvider) -> Router {
    router(Arc::new(provider), &ServerConfig::default())
}

fn upload(uri: &str, field: &str, bytes: &[u8]) -> Request<Body> {
    Request::post(uri)
        .header("content-type", multipart_content_type())
        .body(Body::from(multipart_body(field, bytes)))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_success_returns_angles_and_overlay() {
    let png = png_frame(300, 200).unwrap();
    let (status, body) = send(app(StaticProvider::new(Some(standing_pose()))), upload("/pose-detect/", "frame", &png)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("error").is_none());

    let angles = body["angles"].as_object().unwrap();
    assert_eq!(angles.len(), JOINT_ANGLE_TRIPLES.len());
    for triple in &JOINT_ANGLE_TRIPLES {
        let value = angles[triple.name].as_f64().unwrap();
        assert!((0.0..=180.0).contains(&value), "{} = {value}", triple.name);
    }
    assert_eq!(angles["left_knee"].as_f64(), Some(180.0));
    assert_eq!(angles["right_knee"].as_f64(), Some(180.0));

    let uri = body["annotated_image"].as_str().unwrap();
    assert!(uri.starts_with(PNG_DATA_URI_PREFIX));
    let annotated = decode_data_uri(uri).unwrap();
    assert_eq!((annotated.rows(), annotated.cols()), (300, 200));
}

#[tokio::test]
async fn test_success_is_deterministic() {
    let png = png_frame(120, 160).unwrap();
    let provider = StaticProvider::new(Some(standing_pose()));

    let (_, first) = send(app(provider.clone()), upload("/pose-detect/", "frame", &png)).await;
    let (_, second) = send(app(provider), upload("/pose-detect/", "frame", &png)).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_no_person() {
    let png = png_frame(64, 64).unwrap();
    let (status, body) = send(app(StaticProvider::new(None)), upload("/pose-detect/", "frame", &png)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "error": "No person/landmarks detected" }));
}

#[tokio::test]
async fn test_invalid_image_data() {
    let (status, body) = send(
        app(StaticProvider::new(Some(standing_pose()))),
        upload("/pose-detect/", "frame", b"definitely not an image"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid image data");
}

#[tokio::test]
async fn test_empty_frame_is_invalid_image() {
    let (status, body) = send(app(StaticProvider::new(None)), upload("/pose-detect/", "frame", &[])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid image data");
}

#[tokio::test]
async fn test_missing_frame_field() {
    let png = png_frame(32, 32).unwrap();
    let (status, body) = send(app(StaticProvider::new(None)), upload("/pose-detect/", "image", &png)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No frame provided");
}

#[tokio::test]
async fn test_methods_other_than_post() {
    for method in ["GET", "PUT", "DELETE"] {
        let request = Request::builder()
            .method(method)
            .uri("/pose-detect/")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(StaticProvider::new(None)), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(body["error"], "Only POST allowed");
    }
}

#[tokio::test]
async fn test_route_without_trailing_slash() {
    let png = png_frame(64, 64).unwrap();
    let (status, body) = send(app(StaticProvider::new(None)), upload("/pose-detect", "frame", &png)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "No person/landmarks detected");
}

#[tokio::test]
async fn test_custom_route() {
    let config = ServerConfig {
        route: "/v1/angles".to_string(),
        ..ServerConfig::default()
    };
    let png = png_frame(64, 64).unwrap();

    let app = router(Arc::new(StaticProvider::new(None)), &config);
    let (status, _) = send(app.clone(), upload("/v1/angles/", "frame", &png)).await;
    assert_eq!(status, StatusCode::OK);

    let response = app.oneshot(upload("/pose-detect/", "frame", &png)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let config = ServerConfig {
        max_upload_bytes: 64,
        ..ServerConfig::default()
    };
    let png = png_frame(200, 200).unwrap();
    assert!(png.len() > 64);

    let app = router(Arc::new(StaticProvider::new(Some(standing_pose()))), &config);
    let response = app.oneshot(upload("/pose-detect/", "frame", &png)).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_are_independent() {
    let png = Arc::new(png_frame(120, 90).unwrap());
    let app = app(StaticProvider::new(Some(standing_pose())));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            let png = png.clone();
            tokio::spawn(async move { send(app, upload("/pose-detect/", "frame", &png)).await })
        })
        .collect();

    let mut bodies = Vec::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        bodies.push(body);
    }
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}
