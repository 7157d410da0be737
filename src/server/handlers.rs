//! HTTP handlers for the receipt API.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::AppState;

struct UploadedFile {
    original_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// Pull the single `file` field out of the multipart form.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("malformed multipart body: {}", e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("failed to read upload: {}", e))?;

        return Ok(Some(UploadedFile {
            original_name,
            mime_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// POST /receipt/extract-receipt-details
///
/// Accepts one multipart `file` field and returns the extracted receipt
/// record. Client-input problems map to 400, everything else to 500 with
/// a generic per-stage message; causes stay in the server logs.
pub async fn extract_receipt_details(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let upload = match read_file_field(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return error_body(StatusCode::BAD_REQUEST, "Missing file field"),
        Err(msg) => {
            tracing::warn!("rejected upload: {}", msg);
            return error_body(StatusCode::BAD_REQUEST, "Invalid upload");
        }
    };

    match state
        .pipeline
        .run(&upload.bytes, &upload.mime_type, &upload.original_name)
        .await
    {
        Ok(receipt) => Json(receipt).into_response(),
        Err(e) if e.is_client_error() => error_body(StatusCode::BAD_REQUEST, e.public_message()),
        Err(e) => error_body(StatusCode::INTERNAL_SERVER_ERROR, e.public_message()),
    }
}

/// GET /receipts - the full ledger as a JSON array.
pub async fn list_receipts(State(state): State<AppState>) -> Response {
    match state.ledger.load().await {
        Ok(receipts) => Json(receipts).into_response(),
        Err(e) => {
            tracing::error!("failed to load ledger: {}", e);
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load receipt data",
            )
        }
    }
}
