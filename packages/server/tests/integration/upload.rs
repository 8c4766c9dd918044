use crate::common::{TestApp, noisy_jpeg_over, png_bytes, routes};

#[tokio::test]
async fn upload_stores_png_and_reports_metadata() {
    let app = TestApp::spawn().await;
    let bytes = png_bytes(32, 24);
    let original_size = bytes.len() as u64;

    let res = app
        .upload(
            routes::UPLOAD,
            "team photo.png",
            "image/png",
            bytes,
            "lifeblood",
            None,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    let url = res.body["url"].as_str().unwrap();
    assert!(url.starts_with("/api/v1/assets/files/project-assets/lifeblood/"));
    assert!(url.ends_with(".png"));
    assert_eq!(res.body["originalName"], "team photo.png");
    assert_eq!(res.body["originalSize"], original_size);
    assert_eq!(res.body["mimeType"], "image/png");
    assert!(
        res.body["compressionRatio"]
            .as_str()
            .unwrap()
            .ends_with('%')
    );

    // The reported URL must serve the stored bytes back.
    let served = app.get(url).await;
    assert_eq!(served.status, 200);
}

#[tokio::test]
async fn upload_respects_namespace_field() {
    let app = TestApp::spawn().await;

    let res = app
        .upload(
            routes::UPLOAD,
            "banner.png",
            "image/png",
            png_bytes(16, 16),
            "launch",
            Some("news-assets"),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    let url = res.body["url"].as_str().unwrap();
    assert!(url.contains("/news-assets/launch/"));
    assert!(app.root.join("news-assets/launch").is_dir());
}

#[tokio::test]
async fn upload_rejects_unknown_namespace() {
    let app = TestApp::spawn().await;

    let res = app
        .upload(
            routes::UPLOAD,
            "banner.png",
            "image/png",
            png_bytes(16, 16),
            "launch",
            Some("secret-assets"),
        )
        .await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.error_code(), "INVALID_IDENTIFIER");
}

#[tokio::test]
async fn upload_rejects_non_image_media_type() {
    let app = TestApp::spawn().await;

    let res = app
        .upload(
            routes::UPLOAD,
            "report.pdf",
            "application/pdf",
            b"%PDF-1.4 not an image".to_vec(),
            "lifeblood",
            None,
        )
        .await;

    assert_eq!(res.status, 415, "{}", res.text);
    assert_eq!(res.error_code(), "INVALID_MEDIA_TYPE");
    // Nothing may be written for a rejected upload.
    assert!(!app.root.join("project-assets").exists());
}

#[tokio::test]
async fn upload_rejects_missing_group_id() {
    let app = TestApp::spawn().await;

    let part = reqwest::multipart::Part::bytes(png_bytes(8, 8))
        .file_name("photo.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let res = app
        .client
        .post(format!("http://{}{}", app.addr, routes::UPLOAD))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let res = crate::common::TestResponse::from_response(res).await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn large_jpeg_is_converted_to_webp() {
    let app = TestApp::spawn().await;
    let bytes = noisy_jpeg_over(2 * 1024 * 1024);

    let res = app
        .upload(
            routes::UPLOAD,
            "hero.jpg",
            "image/jpeg",
            bytes,
            "lifeblood",
            None,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    let url = res.body["url"].as_str().unwrap().to_string();
    assert!(url.ends_with(".webp"), "expected webp url, got {url}");
    assert_eq!(res.body["mimeType"], "image/webp");

    let served = app.get(&url).await;
    assert_eq!(served.status, 200);
    // RIFF....WEBP container magic.
    assert_eq!(&served.text.as_bytes()[..4], b"RIFF");
}

#[tokio::test]
async fn widget_endpoint_enforces_stricter_limit() {
    let app = TestApp::spawn().await;
    // A real PNG padded past 5 MiB. The size check fires before decoding, so
    // the padding never reaches the image decoder.
    let mut bytes = png_bytes(16, 16);
    bytes.resize(5 * 1024 * 1024 + 1, 0);

    let res = app
        .upload(
            routes::UPLOAD_WIDGET,
            "hero.png",
            "image/png",
            bytes,
            "lifeblood",
            None,
        )
        .await;

    assert_eq!(res.status, 413, "{}", res.text);
    assert_eq!(res.error_code(), "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn payload_over_transport_limit_is_still_a_413() {
    let app = TestApp::spawn().await;
    // Big enough to trip the route body limit itself, not just the
    // configured ingest ceiling.
    let mut bytes = png_bytes(16, 16);
    bytes.resize(23 * 1024 * 1024, 0);

    let res = app
        .upload(
            routes::UPLOAD,
            "huge.png",
            "image/png",
            bytes,
            "lifeblood",
            None,
        )
        .await;

    assert_eq!(res.status, 413, "{}", res.text);
    assert_eq!(res.error_code(), "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn widget_endpoint_accepts_small_uploads() {
    let app = TestApp::spawn().await;

    let res = app
        .upload(
            routes::UPLOAD_WIDGET,
            "icon.png",
            "image/png",
            png_bytes(24, 24),
            "lifeblood",
            None,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
}

#[tokio::test]
async fn filename_is_sanitized_and_timestamped() {
    let app = TestApp::spawn().await;

    let res = app
        .upload(
            routes::UPLOAD,
            "../../../etc/passwd.png",
            "image/png",
            png_bytes(8, 8),
            "lifeblood",
            None,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    let filename = res.body["filename"].as_str().unwrap();
    assert!(!filename.contains(".."));
    assert!(!filename.contains('/'));
    // Leading millisecond timestamp keeps listings chronological.
    let stamp: String = filename.chars().take_while(|c| c.is_ascii_digit()).collect();
    assert!(stamp.len() >= 13, "unexpected filename: {filename}");
}

#[tokio::test]
async fn repeated_uploads_of_same_name_never_collide() {
    let app = TestApp::spawn().await;
    let mut urls = Vec::new();

    for _ in 0..5 {
        let res = app
            .upload(
                routes::UPLOAD,
                "photo.png",
                "image/png",
                png_bytes(8, 8),
                "lifeblood",
                None,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        urls.push(res.body["url"].as_str().unwrap().to_string());
    }

    let unique: std::collections::HashSet<_> = urls.iter().collect();
    assert_eq!(unique.len(), urls.len(), "duplicate storage paths: {urls:?}");
}
