//! Shared helpers for API integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pixhive_api::setup::routes::setup_routes;
use pixhive_api::state::AppState;
use pixhive_api::users::InMemoryUserStore;
use pixhive_core::Config;
use pixhive_storage::ImageStorage;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const MULTIPART_BOUNDARY: &str = "pixhive-test-boundary";

/// A fully wired application backed by a temporary upload directory.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    // Held so the upload directory outlives the test.
    _upload_dir: TempDir,
}

/// Build the app with test configuration and the given raw upload options.
pub async fn setup_test_app_with_options(raw_options: Option<Value>) -> TestApp {
    let upload_dir = TempDir::new().expect("create temp upload dir");
    let config = Config::for_tests(
        upload_dir.path().display().to_string(),
        "http://localhost:3000/uploads".to_string(),
    );

    let storage = ImageStorage::new(
        raw_options.as_ref(),
        config.storage_path(),
        config.base_url(),
        config.allowed_content_types().to_vec(),
    )
    .await
    .expect("initialize storage");

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(InMemoryUserStore::new()),
        Arc::new(storage),
    ));
    let router = setup_routes(&config, state.clone()).expect("build router");

    TestApp {
        router,
        state,
        _upload_dir: upload_dir,
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_options(None).await
}

impl TestApp {
    /// Send a request and return status plus parsed JSON body (Null when the
    /// body is empty or not JSON).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request handled");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// Sign up and sign in a fresh user, returning their bearer token.
    pub async fn signed_in_user(&self, email: &str) -> String {
        let (status, _) = self
            .send(json_request(
                "POST",
                "/api/v1/signup",
                None,
                json!({ "email": email, "password": "hunter2" }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/v1/signin",
                None,
                json!({ "email": email, "password": "hunter2" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().expect("token in response").to_string()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("build request")
}

/// Build a multipart/form-data request with a single file field.
pub fn multipart_upload_request(
    uri: &str,
    token: &str,
    field_name: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"upload.bin\"\r\n",
            field_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        )
        .body(Body::from(body))
        .expect("build request")
}

pub mod fixtures {
    use image::{DynamicImage, Rgba, RgbaImage};

    /// Encode a solid-color PNG of the given dimensions.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([30, 120, 210, 255]),
        ));
        let mut buffer = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .expect("encode png");
        buffer
    }
}
