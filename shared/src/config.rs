use std::{env, fmt::Display, str::FromStr};

use paperworks_atoms::media::upload::DEFAULT_MAX_UPLOAD_BYTES;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
}

/// Runtime configuration, read once per cold start.
#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub bucket_name: String,
    pub region: String,
    /// Base for public asset URLs. Falls back to the bucket's virtual-hosted URL.
    pub public_asset_base_url: String,
    pub admin_username: String,
    pub admin_password: String,
    pub session_secret: String,
    pub session_ttl_secs: i64,
    pub upload_url_ttl_secs: u64,
    pub max_upload_bytes: usize,
    pub contact_to_email: String,
    pub contact_from_email: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| {
            var(key).unwrap_or_else(|| {
                info!("{key} not set, using default: {default}");
                default.to_string()
            })
        };

        let bucket_name = or_default("S3_BUCKET_NAME", "paperworks-assets");
        let region = or_default("AWS_REGION", "ap-southeast-2");
        let public_asset_base_url = var("PUBLIC_ASSET_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}.s3.{}.amazonaws.com", bucket_name, region));

        let contact_to_email = or_default("CONTACT_TO_EMAIL", "sales@paperworks.example");
        let contact_from_email = var("CONTACT_FROM_EMAIL").unwrap_or_else(|| contact_to_email.clone());

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            table_name: or_default("TABLE_NAME", "paperworks"),
            bucket_name,
            region,
            public_asset_base_url,
            admin_username: or_default("ADMIN_USERNAME", "admin"),
            admin_password: var("ADMIN_PASSWORD").ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?,
            session_secret: var("SESSION_SECRET").ok_or(ConfigError::Missing("SESSION_SECRET"))?,
            session_ttl_secs: parse_or(var("SESSION_TTL_SECS"), "SESSION_TTL_SECS", 8 * 60 * 60),
            upload_url_ttl_secs: parse_or(var("UPLOAD_URL_TTL_SECS"), "UPLOAD_URL_TTL_SECS", 300),
            max_upload_bytes: parse_or(
                var("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            ),
            contact_to_email,
            contact_from_email,
            allowed_origins,
        })
    }

    /// Origin to echo in CORS headers. With no allow-list configured every origin is echoed.
    pub fn cors_origin(&self, request_origin: Option<&str>) -> String {
        match request_origin {
            Some(origin)
                if self.allowed_origins.is_empty()
                    || self.allowed_origins.iter().any(|o| o == origin) =>
            {
                origin.to_string()
            }
            _ => self
                .allowed_origins
                .first()
                .cloned()
                .unwrap_or_else(|| "*".to_string()),
        }
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> T
where
    T::Err: Display,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {value:?}: {e}, using default");
            default
        }),
        None => default,
    }
}
