//! Upload and delete API integration tests.
//!
//! Run with: `cargo test -p pixhive-api --test upload_test`

mod helpers;

use axum::http::StatusCode;
use helpers::{
    empty_request, fixtures, multipart_upload_request, setup_test_app,
    setup_test_app_with_options,
};
use serde_json::json;

#[tokio::test]
async fn test_upload_requires_auth() {
    let app = setup_test_app().await;

    let request = multipart_upload_request(
        "/api/v1/single_upload",
        "not-a-token",
        "image",
        "image/png",
        &fixtures::png_bytes(32, 32),
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_upload_png_stores_one_rendition() {
    let app = setup_test_app().await;
    let token = app.signed_in_user("a@b.com").await;

    let request = multipart_upload_request(
        "/api/v1/single_upload",
        &token,
        "image",
        "image/png",
        &fixtures::png_bytes(100, 100),
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::CREATED);
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);

    let filename = files[0]["filename"].as_str().unwrap();
    assert!(filename.ends_with(".png"));
    assert_eq!(files[0]["storage"], "local");
    assert!(files[0]["url"]
        .as_str()
        .unwrap()
        .ends_with(&format!("/{}", filename)));

    assert!(app.state.storage.exists(filename).await.unwrap());
}

#[tokio::test]
async fn test_responsive_upload_stores_three_renditions() {
    let app = setup_test_app_with_options(Some(json!({ "responsive": true }))).await;
    let token = app.signed_in_user("a@b.com").await;

    let request = multipart_upload_request(
        "/api/v1/single_upload",
        &token,
        "image",
        "image/png",
        &fixtures::png_bytes(800, 800),
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::CREATED);
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 3);

    for suffix in ["_lg.png", "_md.png", "_sm.png"] {
        assert!(
            files
                .iter()
                .any(|f| f["filename"].as_str().unwrap().ends_with(suffix)),
            "missing {} rendition",
            suffix
        );
    }
}

#[tokio::test]
async fn test_upload_wrong_content_type_is_rejected() {
    let app = setup_test_app().await;
    let token = app.signed_in_user("a@b.com").await;

    let request = multipart_upload_request(
        "/api/v1/single_upload",
        &token,
        "image",
        "application/pdf",
        b"%PDF-1.4 not an image",
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_undecodable_image_is_rejected() {
    let app = setup_test_app().await;
    let token = app.signed_in_user("a@b.com").await;

    // Declared type is allowed but the bytes are not a decodable image.
    let request =
        multipart_upload_request("/api/v1/single_upload", &token, "image", "image/png", b"garbage bytes");
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "IMAGE_PROCESSING_ERROR");
}

#[tokio::test]
async fn test_upload_with_wrong_field_name_is_rejected() {
    let app = setup_test_app().await;
    let token = app.signed_in_user("a@b.com").await;

    let request = multipart_upload_request(
        "/api/v1/single_upload",
        &token,
        "attachment",
        "image/png",
        &fixtures::png_bytes(32, 32),
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_delete_removes_stored_file() {
    let app = setup_test_app().await;
    let token = app.signed_in_user("a@b.com").await;

    let request = multipart_upload_request(
        "/api/v1/single_upload",
        &token,
        "image",
        "image/png",
        &fixtures::png_bytes(64, 64),
    );
    let (_, body) = app.send(request).await;
    let filename = body["files"][0]["filename"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(empty_request(
            "DELETE",
            &format!("/api/v1/media/{}", filename),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"][0], filename.as_str());
    assert!(!app.state.storage.exists(&filename).await.unwrap());

    // Deleting again reports not found.
    let (status, _) = app
        .send(empty_request(
            "DELETE",
            &format!("/api/v1/media/{}", filename),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_responsive_removes_all_siblings() {
    let app = setup_test_app_with_options(Some(json!({ "responsive": true }))).await;
    let token = app.signed_in_user("a@b.com").await;

    let request = multipart_upload_request(
        "/api/v1/single_upload",
        &token,
        "image",
        "image/png",
        &fixtures::png_bytes(600, 600),
    );
    let (_, body) = app.send(request).await;
    let files = body["files"].as_array().unwrap();

    // Delete by any one variant's name.
    let small = files
        .iter()
        .map(|f| f["filename"].as_str().unwrap())
        .find(|f| f.contains("_sm"))
        .unwrap()
        .to_string();

    let (status, body) = app
        .send(empty_request(
            "DELETE",
            &format!("/api/v1/media/{}", small),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"].as_array().unwrap().len(), 3);

    for file in files {
        let filename = file["filename"].as_str().unwrap();
        assert!(!app.state.storage.exists(filename).await.unwrap());
    }
}

#[tokio::test]
async fn test_delete_unknown_filename_is_404() {
    let app = setup_test_app().await;
    let token = app.signed_in_user("a@b.com").await;

    let (status, body) = app
        .send(empty_request(
            "DELETE",
            "/api/v1/media/0123456789abcdef0123456789abcdef.png",
            Some(&token),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
