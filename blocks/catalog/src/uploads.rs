//! Upload endpoints of the admin panel.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lambda_http::{http::StatusCode, Body, Error, Response};
use paperworks_atoms::http;
use paperworks_atoms::media::upload::CredentialRequest;
use paperworks_atoms::media::{
    DestinationCategory, FileUpload, StorageCollaborator, UploadGateway,
};
use serde::{Deserialize, Serialize};

use crate::editor::UploadFailure;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUploadRequest {
    pub destination_category: DestinationCategory,
    pub files: Vec<EncodedFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFile {
    pub file_name: String,
    pub file_type: String,
    /// Base64 file contents.
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub index: usize,
    pub file_name: String,
    pub url: String,
    pub suggested_alt_text: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchUploadResponse {
    /// Successful uploads in completion order.
    pub uploaded: Vec<UploadedFile>,
    pub failures: Vec<IndexedFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedFailure {
    pub index: usize,
    #[serde(flatten)]
    pub failure: UploadFailure,
}

/// HTTP Handler: POST /admin/uploads/credential
///
/// Hands out a single-use presigned write target. Non-image types are refused before
/// storage is contacted.
pub async fn request_credential_handler<S: StorageCollaborator>(
    storage: &S,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let request: CredentialRequest = match http::parse_body(body) {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };

    if !request.file_type.starts_with("image/") {
        return http::error(
            StatusCode::BAD_REQUEST,
            format!("{}: not an image file", request.file_name),
        );
    }

    match storage.request_upload_credential(&request).await {
        Ok(credential) => {
            tracing::info!(
                "🔑 Upload credential issued: file={}, destination={}",
                request.file_name,
                request.destination_category
            );
            http::json(StatusCode::OK, &credential)
        }
        Err(e) => {
            tracing::error!(
                "❌ request_credential_handler failed: file={}, error={}",
                request.file_name,
                e
            );
            http::error(StatusCode::BAD_GATEWAY, "could not obtain upload URL")
        }
    }
}

/// HTTP Handler: POST /admin/uploads
///
/// Runs every file through the gateway independently and reports each one.
pub async fn batch_upload_handler<S: StorageCollaborator>(
    gateway: &UploadGateway<S>,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let request: BatchUploadRequest = match http::parse_body(body) {
        Ok(r) => r,
        Err(resp) => return Ok(resp),
    };

    let response = upload_encoded(gateway, request).await;
    tracing::info!(
        "📤 Batch upload finished: uploaded={}, failed={}",
        response.uploaded.len(),
        response.failures.len()
    );
    http::json(StatusCode::OK, &response)
}

pub async fn upload_encoded<S: StorageCollaborator>(
    gateway: &UploadGateway<S>,
    request: BatchUploadRequest,
) -> BatchUploadResponse {
    let mut response = BatchUploadResponse::default();

    // Files that don't decode never reach the gateway; the rest keep their request index.
    let mut decoded = Vec::new();
    let mut positions = Vec::new();
    for (index, file) in request.files.into_iter().enumerate() {
        match STANDARD.decode(file.data.trim()) {
            Ok(bytes) => {
                positions.push(index);
                decoded.push(FileUpload::new(file.file_name, file.file_type, bytes));
            }
            Err(e) => response.failures.push(IndexedFailure {
                index,
                failure: UploadFailure {
                    file_name: file.file_name,
                    stage: "validation",
                    message: format!("file data is not valid base64: {}", e),
                },
            }),
        }
    }

    for outcome in gateway
        .upload_batch(decoded, request.destination_category)
        .await
    {
        let index = positions[outcome.index];
        match outcome.result {
            Ok(uploaded) => response.uploaded.push(UploadedFile {
                index,
                file_name: outcome.file_name,
                url: uploaded.url,
                suggested_alt_text: uploaded.suggested_alt_text,
            }),
            Err(e) => response.failures.push(IndexedFailure {
                index,
                failure: UploadFailure {
                    file_name: outcome.file_name,
                    stage: e.stage(),
                    message: e.to_string(),
                },
            }),
        }
    }

    response
}
