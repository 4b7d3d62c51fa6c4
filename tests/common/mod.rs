#![allow(dead_code)]

// In-process stand-in for the analysis service.
//
// Binds an axum router to an ephemeral localhost port. Each route answers
// in one of the shapes (or failure modes) the real service can produce.

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use lucid_trace::media::sha256_hex;

/// Start the fake service and return its base URL.
pub async fn spawn_service() -> String {
    let app = Router::new()
        .route("/analyze-video", post(paired))
        .route("/flat", post(flat))
        .route("/broken", post(broken))
        .route("/garbage", post(garbage))
        .route("/envelope", post(envelope));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn dead_service() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

struct Upload {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
    parts: usize,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, (StatusCode, String)> {
    let mut first: Option<Upload> = None;
    let mut parts = 0;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        parts += 1;
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        if first.is_none() {
            first = Some(Upload {
                field: name,
                file_name,
                content_type,
                bytes: bytes.to_vec(),
                parts: 0,
            });
        }
    }
    let mut upload = first.ok_or((StatusCode::UNPROCESSABLE_ENTITY, "no parts".to_string()))?;
    upload.parts = parts;
    Ok(upload)
}

/// Paired shape. Echoes what arrived so tests can check the wire format:
/// frames_analyzed is the byte count, the review carries the real hash.
async fn paired(multipart: Multipart) -> Result<Json<Value>, (StatusCode, String)> {
    let upload = read_upload(multipart).await?;
    if upload.field != "file" || upload.parts != 1 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("expected one part named file, got {} ({})", upload.field, upload.parts),
        ));
    }
    let Some(file_name) = upload.file_name else {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "part has no filename".to_string()));
    };
    if file_name.ends_with(".mp4") && upload.content_type.as_deref() != Some("video/mp4") {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("unexpected content type {:?}", upload.content_type),
        ));
    }
    Ok(Json(json!([
        {
            "frames_analyzed": upload.bytes.len(),
            "details": {"ai_image_branch": 80, "deepfake_branch": 65},
            "verdict": "synthetic"
        },
        {
            "risk_level": "high",
            "color_code": "#ff0000",
            "confidence_avg": 91.47,
            "filename": file_name,
            "file_hash": sha256_hex(&upload.bytes)
        }
    ])))
}

async fn flat(multipart: Multipart) -> Result<Json<Value>, (StatusCode, String)> {
    read_upload(multipart).await?;
    Ok(Json(json!({
        "frames_analyzed": 42,
        "ai_probability": 17.3,
        "verdict": "likely authentic"
    })))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "model crashed")
}

async fn garbage() -> &'static str {
    "definitely not json"
}

async fn envelope() -> Json<Value> {
    Json(json!({"status": "error", "message": "No frames extracted"}))
}
