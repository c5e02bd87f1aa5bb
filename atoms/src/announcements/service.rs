use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{Announcement, CreateAnnouncementPayload, UpdateAnnouncementPayload};
use crate::dynamo::{self, s, Item, UpdateSet};
use crate::error::PersistenceError;

const ANNOUNCEMENT_PK: &str = "ANNOUNCEMENT";
const ANNOUNCEMENT_SK_PREFIX: &str = "ANNOUNCEMENT#";

/// Newest first.
pub async fn list_announcements(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<Announcement>, PersistenceError> {
    let items =
        dynamo::query_prefix(client, table_name, ANNOUNCEMENT_PK, ANNOUNCEMENT_SK_PREFIX).await?;

    let mut announcements: Vec<Announcement> = items
        .iter()
        .filter_map(|item| {
            let id = dynamo::id_from_sk(item, ANNOUNCEMENT_SK_PREFIX)?;
            Some(announcement_from_item(id, item))
        })
        .collect();
    announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(announcements)
}

pub async fn get_announcement(
    client: &DynamoClient,
    table_name: &str,
    announcement_id: &str,
) -> Result<Announcement, PersistenceError> {
    let sk = format!("{}{}", ANNOUNCEMENT_SK_PREFIX, announcement_id);
    let item = dynamo::get(client, table_name, ANNOUNCEMENT_PK, &sk)
        .await?
        .ok_or_else(|| PersistenceError::not_found("announcement", announcement_id))?;
    Ok(announcement_from_item(announcement_id, &item))
}

pub async fn create_announcement(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateAnnouncementPayload,
) -> Result<Announcement, PersistenceError> {
    let message = payload.message.trim().to_string();
    if message.is_empty() {
        return Err(PersistenceError::InvalidPayload("announcement message is required".to_string()));
    }

    let announcement_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let is_active = payload.is_active.unwrap_or(true);

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", s(ANNOUNCEMENT_PK))
        .item("SK", s(format!("{}{}", ANNOUNCEMENT_SK_PREFIX, announcement_id)))
        .item("message", s(&message))
        .item("is_active", AttributeValue::Bool(is_active))
        .item("created_at", s(&now));

    if let Some(link_url) = &payload.link_url {
        builder = builder.item("link_url", s(link_url));
    }
    if let Some(link_text) = &payload.link_text {
        builder = builder.item("link_text", s(link_text));
    }

    builder
        .send()
        .await
        .map_err(|e| PersistenceError::backend("put_item", e))?;

    Ok(Announcement {
        announcement_id,
        message,
        link_url: payload.link_url,
        link_text: payload.link_text,
        is_active,
        created_at: now,
    })
}

pub async fn update_announcement(
    client: &DynamoClient,
    table_name: &str,
    announcement_id: &str,
    payload: UpdateAnnouncementPayload,
) -> Result<Announcement, PersistenceError> {
    let mut update = UpdateSet::new();
    if let Some(message) = payload.message.as_deref().map(str::trim) {
        if message.is_empty() {
            return Err(PersistenceError::InvalidPayload("announcement message is required".to_string()));
        }
        update.set("message", s(message));
    }
    update
        .set_opt("link_url", payload.link_url.map(s))
        .set_opt("link_text", payload.link_text.map(s))
        .set_opt("is_active", payload.is_active.map(AttributeValue::Bool));

    let sk = format!("{}{}", ANNOUNCEMENT_SK_PREFIX, announcement_id);
    update
        .apply(client, table_name, ANNOUNCEMENT_PK, &sk, "announcement", announcement_id)
        .await?;

    get_announcement(client, table_name, announcement_id).await
}

pub async fn delete_announcement(
    client: &DynamoClient,
    table_name: &str,
    announcement_id: &str,
) -> Result<(), PersistenceError> {
    get_announcement(client, table_name, announcement_id).await?;
    let sk = format!("{}{}", ANNOUNCEMENT_SK_PREFIX, announcement_id);
    dynamo::delete(client, table_name, ANNOUNCEMENT_PK, &sk).await
}

fn announcement_from_item(announcement_id: &str, item: &Item) -> Announcement {
    Announcement {
        announcement_id: announcement_id.to_string(),
        message: dynamo::string(item, "message"),
        link_url: dynamo::opt_string(item, "link_url"),
        link_text: dynamo::opt_string(item, "link_text"),
        is_active: dynamo::boolean(item, "is_active", false),
        created_at: dynamo::string(item, "created_at"),
    }
}
