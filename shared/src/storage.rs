//! S3 side of the upload gateway: presigned PUT targets and the transfer itself.

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client as S3Client;
use paperworks_atoms::media::upload::CredentialRequest;
use paperworks_atoms::media::{StorageCollaborator, UploadCredential};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct S3Storage {
    client: S3Client,
    http: reqwest::Client,
    bucket_name: String,
    public_base_url: String,
    url_ttl: Duration,
}

impl S3Storage {
    pub fn new(
        client: S3Client,
        bucket_name: impl Into<String>,
        public_base_url: impl Into<String>,
        url_ttl_secs: u64,
    ) -> Self {
        Self {
            client,
            http: reqwest::Client::new(),
            bucket_name: bucket_name.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            url_ttl: Duration::from_secs(url_ttl_secs),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// `{destination}/{uuid}-{name}` with the name reduced to a URL-safe form.
pub fn object_key(request: &CredentialRequest) -> String {
    format!(
        "{}/{}-{}",
        request.destination_category,
        uuid::Uuid::new_v4(),
        sanitize_file_name(&request.file_name)
    )
}

pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let mut out = String::with_capacity(base.len());
    for c in base.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl StorageCollaborator for S3Storage {
    async fn request_upload_credential(
        &self,
        request: &CredentialRequest,
    ) -> Result<UploadCredential, String> {
        let key = object_key(request);
        let presign = PresigningConfig::expires_in(self.url_ttl)
            .map_err(|e| format!("invalid presign ttl: {}", e))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(&request.file_type)
            .presigned(presign)
            .await
            .map_err(|e| format!("presign failed: {}", e))?;

        tracing::info!(
            "🔗 Presigned upload: bucket={}, key={}",
            self.bucket_name,
            key
        );

        Ok(UploadCredential {
            upload_url: presigned.uri().to_string(),
            public_url: self.public_url(&key),
        })
    }

    async fn transfer(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), String> {
        let response = self
            .http
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| format!("upload request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("storage answered {}: {}", status, body));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperworks_atoms::media::DestinationCategory;

    #[test]
    fn file_names_are_made_url_safe() {
        assert_eq!(sanitize_file_name("Kraft Bag (large).JPG"), "kraft-bag-large-.jpg");
        assert_eq!(sanitize_file_name("C:\\photos\\cup.png"), "cup.png");
        assert_eq!(sanitize_file_name("???"), "upload");
    }

    #[test]
    fn keys_are_grouped_by_destination() {
        let key = object_key(&CredentialRequest {
            file_name: "hero one.webp".to_string(),
            file_type: "image/webp".to_string(),
            destination_category: DestinationCategory::HeroCarousel,
        });

        assert!(key.starts_with("hero-carousel/"));
        assert!(key.ends_with("-hero-one.webp"));
    }
}
