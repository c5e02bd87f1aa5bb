use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{Category, CreateCategoryPayload, UpdateCategoryPayload};
use crate::dynamo::{self, n, s, Item, UpdateSet};
use crate::error::PersistenceError;
use crate::slug;

const CATEGORY_PK: &str = "CATEGORY";
const CATEGORY_SK_PREFIX: &str = "CATEGORY#";

/// All categories, ordered by `sort_order` then name.
pub async fn list_categories(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<Category>, PersistenceError> {
    let items =
        dynamo::query_prefix(client, table_name, CATEGORY_PK, CATEGORY_SK_PREFIX).await?;

    let mut categories: Vec<Category> = items
        .iter()
        .filter_map(|item| {
            let id = dynamo::id_from_sk(item, CATEGORY_SK_PREFIX)?;
            Some(category_from_item(id, item))
        })
        .collect();

    categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
    Ok(categories)
}

pub async fn get_category(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
) -> Result<Category, PersistenceError> {
    let sk = format!("{}{}", CATEGORY_SK_PREFIX, category_id);
    let item = dynamo::get(client, table_name, CATEGORY_PK, &sk)
        .await?
        .ok_or_else(|| PersistenceError::not_found("category", category_id))?;
    Ok(category_from_item(category_id, &item))
}

/// Storefront lookup. Categories are few, so this scans the partition.
pub async fn get_category_by_slug(
    client: &DynamoClient,
    table_name: &str,
    slug: &str,
) -> Result<Category, PersistenceError> {
    list_categories(client, table_name)
        .await?
        .into_iter()
        .find(|c| c.slug == slug)
        .ok_or_else(|| PersistenceError::not_found("category", slug))
}

pub async fn create_category(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateCategoryPayload,
) -> Result<Category, PersistenceError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(PersistenceError::InvalidPayload("category name is required".to_string()));
    }
    let slug = checked_slug(payload.slug.as_deref(), &name)?;

    let category_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", s(CATEGORY_PK))
        .item("SK", s(format!("{}{}", CATEGORY_SK_PREFIX, category_id)))
        .item("name", s(&name))
        .item("slug", s(&slug))
        .item("sort_order", n(payload.sort_order))
        .item("is_active", AttributeValue::Bool(payload.is_active.unwrap_or(true)))
        .item("created_at", s(&now));

    if let Some(description) = &payload.description {
        builder = builder.item("description", s(description));
    }
    if let Some(image_url) = &payload.image_url {
        builder = builder.item("image_url", s(image_url));
    }

    builder
        .send()
        .await
        .map_err(|e| PersistenceError::backend("put_item", e))?;

    Ok(Category {
        category_id,
        name,
        slug,
        description: payload.description,
        image_url: payload.image_url,
        sort_order: payload.sort_order,
        is_active: payload.is_active.unwrap_or(true),
        created_at: now,
    })
}

pub async fn update_category(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
    payload: UpdateCategoryPayload,
) -> Result<Category, PersistenceError> {
    let mut update = UpdateSet::new();

    if let Some(name) = payload.name.as_deref().map(str::trim) {
        if name.is_empty() {
            return Err(PersistenceError::InvalidPayload("category name is required".to_string()));
        }
        update.set("name", s(name));
    }
    if let Some(raw) = payload.slug.as_deref() {
        if !slug::is_valid(raw) {
            return Err(PersistenceError::InvalidPayload(format!("invalid category slug '{}'", raw)));
        }
        update.set("slug", s(raw));
    }
    update
        .set_opt("description", payload.description.map(s))
        .set_opt("image_url", payload.image_url.map(s))
        .set_opt("sort_order", payload.sort_order.map(n))
        .set_opt("is_active", payload.is_active.map(AttributeValue::Bool));

    let sk = format!("{}{}", CATEGORY_SK_PREFIX, category_id);
    update
        .apply(client, table_name, CATEGORY_PK, &sk, "category", category_id)
        .await?;

    get_category(client, table_name, category_id).await
}

pub async fn delete_category(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
) -> Result<(), PersistenceError> {
    // 404 rather than a silent success for unknown ids
    get_category(client, table_name, category_id).await?;
    let sk = format!("{}{}", CATEGORY_SK_PREFIX, category_id);
    dynamo::delete(client, table_name, CATEGORY_PK, &sk).await
}

fn checked_slug(requested: Option<&str>, name: &str) -> Result<String, PersistenceError> {
    let slug = match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slug::slugify(name),
    };
    if !slug::is_valid(&slug) {
        return Err(PersistenceError::InvalidPayload(format!("invalid category slug '{}'", slug)));
    }
    Ok(slug)
}

fn category_from_item(category_id: &str, item: &Item) -> Category {
    Category {
        category_id: category_id.to_string(),
        name: dynamo::string(item, "name"),
        slug: dynamo::string(item, "slug"),
        description: dynamo::opt_string(item, "description"),
        image_url: dynamo::opt_string(item, "image_url"),
        sort_order: dynamo::number(item, "sort_order").unwrap_or(0),
        is_active: dynamo::boolean(item, "is_active", true),
        created_at: dynamo::string(item, "created_at"),
    }
}
