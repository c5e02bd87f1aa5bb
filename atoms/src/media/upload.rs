//! Upload gateway: turns a local file into a stored, publicly reachable image.
//!
//! Each file goes credential -> transfer -> record, strictly in that order. Files in a
//! batch run independently and are reported in the order they finish.

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ceiling observed on the admin blog-image path, applied to every destination.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DestinationCategory {
    ProductImages,
    HeroCarousel,
    BlogImages,
    CategoryImages,
}

impl DestinationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationCategory::ProductImages => "product-images",
            DestinationCategory::HeroCarousel => "hero-carousel",
            DestinationCategory::BlogImages => "blog-images",
            DestinationCategory::CategoryImages => "category-images",
        }
    }
}

impl fmt::Display for DestinationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw file handed to the gateway.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    pub file_name: String,
    pub file_type: String,
    pub destination_category: DestinationCategory,
}

/// Time limited, pre-authorized write target for exactly one file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadCredential {
    pub upload_url: String,
    pub public_url: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    pub suggested_alt_text: String,
}

/// Object storage as seen by the gateway.
#[async_trait]
pub trait StorageCollaborator: Send + Sync {
    async fn request_upload_credential(
        &self,
        request: &CredentialRequest,
    ) -> Result<UploadCredential, String>;

    /// PUTs `bytes` to `upload_url` with the given content type.
    async fn transfer(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), String>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("{file_name}: {reason}")]
    Validation { file_name: String, reason: String },

    #[error("{file_name}: could not obtain upload URL ({message})")]
    Gateway { file_name: String, message: String },

    #[error("{file_name}: upload to storage failed ({message})")]
    Transfer { file_name: String, message: String },
}

impl UploadError {
    pub fn file_name(&self) -> &str {
        match self {
            UploadError::Validation { file_name, .. }
            | UploadError::Gateway { file_name, .. }
            | UploadError::Transfer { file_name, .. } => file_name,
        }
    }

    /// Which step failed, for the admin UI's inline message.
    pub fn stage(&self) -> &'static str {
        match self {
            UploadError::Validation { .. } => "validation",
            UploadError::Gateway { .. } => "credential",
            UploadError::Transfer { .. } => "transfer",
        }
    }
}

/// Per-file result of a batch. `index` is the file's position in the request.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub index: usize,
    pub file_name: String,
    pub result: Result<UploadedImage, UploadError>,
}

pub struct UploadGateway<S> {
    storage: S,
    max_bytes: usize,
}

impl<S: StorageCollaborator> UploadGateway<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Checks done before any network call.
    pub fn validate(&self, file: &FileUpload) -> Result<(), UploadError> {
        let reject = |reason: String| UploadError::Validation {
            file_name: file.file_name.clone(),
            reason,
        };

        if !file.content_type.starts_with("image/") {
            return Err(reject("not an image file".to_string()));
        }
        if file.bytes.is_empty() {
            return Err(reject("file is empty".to_string()));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(reject(format!(
                "file is {} bytes, limit is {} bytes",
                file.bytes.len(),
                self.max_bytes
            )));
        }
        Ok(())
    }

    pub async fn upload(
        &self,
        file: FileUpload,
        destination: DestinationCategory,
    ) -> Result<UploadedImage, UploadError> {
        self.validate(&file)?;

        let request = CredentialRequest {
            file_name: file.file_name.clone(),
            file_type: file.content_type.clone(),
            destination_category: destination,
        };

        let credential = self
            .storage
            .request_upload_credential(&request)
            .await
            .map_err(|message| UploadError::Gateway {
                file_name: file.file_name.clone(),
                message,
            })?;

        tracing::info!(
            "📤 Transferring {} ({} bytes) to {}",
            file.file_name,
            file.bytes.len(),
            destination
        );

        self.storage
            .transfer(&credential.upload_url, &file.content_type, file.bytes)
            .await
            .map_err(|message| UploadError::Transfer {
                file_name: file.file_name.clone(),
                message,
            })?;

        Ok(UploadedImage {
            url: credential.public_url,
            suggested_alt_text: alt_text_from_file_name(&file.file_name),
        })
    }

    /// Uploads every file independently; outcomes come back in completion order.
    pub async fn upload_batch(
        &self,
        files: Vec<FileUpload>,
        destination: DestinationCategory,
    ) -> Vec<UploadOutcome> {
        let mut in_flight: FuturesUnordered<_> = files
            .into_iter()
            .enumerate()
            .map(|(index, file)| async move {
                let file_name = file.file_name.clone();
                let result = self.upload(file, destination).await;
                UploadOutcome {
                    index,
                    file_name,
                    result,
                }
            })
            .collect();

        let mut outcomes = Vec::with_capacity(in_flight.len());
        while let Some(outcome) = in_flight.next().await {
            if let Err(e) = &outcome.result {
                tracing::warn!("⚠️ Upload failed at {} stage: {}", e.stage(), e);
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// `Kraft Bag.large.png` -> `Kraft Bag.large`
pub fn alt_text_from_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(dot) if dot > 0 => base[..dot].to_string(),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Fake storage: counts calls, fails selected files, and can delay transfers.
    #[derive(Default)]
    struct FakeStorage {
        credential_calls: AtomicUsize,
        transfer_calls: AtomicUsize,
        refuse_credential_for: Option<&'static str>,
        fail_transfer_for: Option<&'static str>,
        delays_ms: Vec<(&'static str, u64)>,
    }

    #[async_trait]
    impl StorageCollaborator for FakeStorage {
        async fn request_upload_credential(
            &self,
            request: &CredentialRequest,
        ) -> Result<UploadCredential, String> {
            self.credential_calls.fetch_add(1, Ordering::SeqCst);
            if self.refuse_credential_for == Some(request.file_name.as_str()) {
                return Err("presign denied".to_string());
            }
            Ok(UploadCredential {
                upload_url: format!("https://upload.example/{}", request.file_name),
                public_url: format!(
                    "https://assets.example/{}/{}",
                    request.destination_category, request.file_name
                ),
            })
        }

        async fn transfer(
            &self,
            upload_url: &str,
            _content_type: &str,
            _bytes: Vec<u8>,
        ) -> Result<(), String> {
            self.transfer_calls.fetch_add(1, Ordering::SeqCst);
            let name = upload_url.rsplit('/').next().unwrap_or_default();
            if let Some((_, ms)) = self.delays_ms.iter().find(|(n, _)| *n == name) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.fail_transfer_for == Some(name) {
                return Err("status 403".to_string());
            }
            Ok(())
        }
    }

    fn png(name: &str) -> FileUpload {
        FileUpload::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    #[tokio::test]
    async fn non_image_is_rejected_without_network_calls() {
        let gateway = UploadGateway::new(FakeStorage::default());

        let err = gateway
            .upload(
                FileUpload::new("notes.txt", "text/plain", b"hello".to_vec()),
                DestinationCategory::ProductImages,
            )
            .await
            .unwrap_err();

        assert_eq!(err.stage(), "validation");
        assert!(err.to_string().contains("not an image file"));
        assert_eq!(gateway.storage().credential_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.storage().transfer_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_credential() {
        let gateway = UploadGateway::new(FakeStorage::default()).with_max_bytes(3);

        let err = gateway
            .upload(png("big.png"), DestinationCategory::BlogImages)
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Validation { .. }));
        assert_eq!(gateway.storage().credential_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_upload_returns_public_url_and_alt_text() {
        let gateway = UploadGateway::new(FakeStorage::default());

        let uploaded = gateway
            .upload(png("Kraft Bag.png"), DestinationCategory::ProductImages)
            .await
            .unwrap();

        assert_eq!(uploaded.url, "https://assets.example/product-images/Kraft Bag.png");
        assert_eq!(uploaded.suggested_alt_text, "Kraft Bag");
    }

    #[tokio::test]
    async fn credential_failure_skips_transfer() {
        let storage = FakeStorage {
            refuse_credential_for: Some("a.png"),
            ..Default::default()
        };
        let gateway = UploadGateway::new(storage);

        let err = gateway
            .upload(png("a.png"), DestinationCategory::HeroCarousel)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), "credential");
        assert_eq!(err.file_name(), "a.png");
        assert_eq!(gateway.storage().transfer_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn batch_reports_each_file_and_keeps_going_after_a_failure() {
        let storage = FakeStorage {
            fail_transfer_for: Some("two.png"),
            delays_ms: vec![("one.png", 40), ("three.png", 5)],
            ..Default::default()
        };
        let gateway = UploadGateway::new(storage);

        let outcomes = gateway
            .upload_batch(
                vec![png("one.png"), png("two.png"), png("three.png")],
                DestinationCategory::ProductImages,
            )
            .await;

        assert_eq!(outcomes.len(), 3);
        let succeeded: Vec<&str> = outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.file_name.as_str())
            .collect();
        assert_eq!(succeeded, vec!["three.png", "one.png"]);

        let failed: Vec<&UploadError> =
            outcomes.iter().filter_map(|o| o.result.as_ref().err()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].file_name(), "two.png");
        assert_eq!(failed[0].stage(), "transfer");
    }

    #[test]
    fn alt_text_strips_only_the_last_extension() {
        assert_eq!(alt_text_from_file_name("cup.large.jpg"), "cup.large");
        assert_eq!(alt_text_from_file_name("C:\\pics\\napkin.webp"), "napkin");
        assert_eq!(alt_text_from_file_name(".hidden"), ".hidden");
        assert_eq!(alt_text_from_file_name("plain"), "plain");
    }

    #[test]
    fn destination_categories_use_kebab_case_on_the_wire() {
        let parsed: DestinationCategory = serde_json::from_str("\"hero-carousel\"").unwrap();
        assert_eq!(parsed, DestinationCategory::HeroCarousel);
        assert_eq!(DestinationCategory::BlogImages.to_string(), "blog-images");
    }
}
