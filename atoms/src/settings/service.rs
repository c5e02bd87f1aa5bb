use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{SiteSettings, UpdateSettingsPayload};
use crate::dynamo::{self, s};
use crate::error::PersistenceError;

const SETTINGS_PK: &str = "SETTINGS";
const SETTINGS_SK: &str = "SETTINGS#site";
const DEFAULT_SITE_NAME: &str = "Paperworks";

/// Site settings live in one item holding a JSON document. A fresh table yields defaults.
pub async fn get_settings(
    client: &DynamoClient,
    table_name: &str,
) -> Result<SiteSettings, PersistenceError> {
    let Some(item) = dynamo::get(client, table_name, SETTINGS_PK, SETTINGS_SK).await? else {
        return Ok(SiteSettings {
            site_name: DEFAULT_SITE_NAME.to_string(),
            ..Default::default()
        });
    };

    let document = dynamo::string(&item, "document");
    serde_json::from_str(&document)
        .map_err(|e| PersistenceError::InvalidPayload(format!("stored settings are corrupt: {}", e)))
}

pub async fn update_settings(
    client: &DynamoClient,
    table_name: &str,
    payload: UpdateSettingsPayload,
) -> Result<SiteSettings, PersistenceError> {
    let mut settings = get_settings(client, table_name).await?.merge(payload);
    settings.updated_at = Some(chrono::Utc::now().to_rfc3339());

    let document = serde_json::to_string(&settings)
        .map_err(|e| PersistenceError::InvalidPayload(e.to_string()))?;

    client
        .put_item()
        .table_name(table_name)
        .item("PK", s(SETTINGS_PK))
        .item("SK", s(SETTINGS_SK))
        .item("document", s(document))
        .send()
        .await
        .map_err(|e| PersistenceError::backend("put_item", e))?;

    Ok(settings)
}
