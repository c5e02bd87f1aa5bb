use async_trait::async_trait;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, TransactWriteItem};
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{Product, ProductFields, ProductQuery, SaveProductPayload};
use crate::dynamo::{self, n, s, Item};
use crate::error::PersistenceError;
use crate::media::model::pending_id;
use crate::media::{validate_images, ImageRecord};

const PRODUCT_PK: &str = "PRODUCT";
const PRODUCT_SK_PREFIX: &str = "PRODUCT#";
const IMAGE_SK_PREFIX: &str = "IMAGE#";

/// Upper bound DynamoDB puts on one `TransactWriteItems` call.
const MAX_TRANSACT_ITEMS: usize = 100;

/// Persistence collaborator for products and their image lists.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get_product(&self, product_id: &str) -> Result<Product, PersistenceError>;

    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, PersistenceError>;

    /// Creates (`product_id == None`) or updates a product. The stored image set is fully
    /// replaced by `payload.product_images`; nothing is merged.
    async fn save_product(
        &self,
        product_id: Option<&str>,
        payload: SaveProductPayload,
    ) -> Result<Product, PersistenceError>;

    async fn delete_product(&self, product_id: &str) -> Result<(), PersistenceError>;
}

#[derive(Clone)]
pub struct DynamoProductStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoProductStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    async fn load_images(&self, product_id: &str) -> Result<Vec<ImageRecord>, PersistenceError> {
        let pk = format!("{}{}", PRODUCT_SK_PREFIX, product_id);
        let items = dynamo::query_prefix(&self.client, &self.table_name, &pk, IMAGE_SK_PREFIX).await?;

        let mut images: Vec<ImageRecord> = items.iter().map(image_from_item).collect();
        images.sort_by_key(|i| i.sequence);
        Ok(images)
    }

    /// Sort keys of the image items currently stored under the product.
    async fn image_keys(&self, product_id: &str) -> Result<Vec<String>, PersistenceError> {
        let pk = format!("{}{}", PRODUCT_SK_PREFIX, product_id);
        let items = dynamo::query_prefix(&self.client, &self.table_name, &pk, IMAGE_SK_PREFIX).await?;
        Ok(items.iter().map(|item| dynamo::string(item, "SK")).collect())
    }
}

#[async_trait]
impl ProductStore for DynamoProductStore {
    async fn get_product(&self, product_id: &str) -> Result<Product, PersistenceError> {
        let sk = format!("{}{}", PRODUCT_SK_PREFIX, product_id);
        let item = dynamo::get(&self.client, &self.table_name, PRODUCT_PK, &sk)
            .await?
            .ok_or_else(|| PersistenceError::not_found("product", product_id))?;

        let mut product = product_from_item(product_id, &item);
        product.product_images = self.load_images(product_id).await?;
        Ok(product)
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, PersistenceError> {
        let items =
            dynamo::query_prefix(&self.client, &self.table_name, PRODUCT_PK, PRODUCT_SK_PREFIX)
                .await?;

        let mut products = Vec::new();
        for item in &items {
            let Some(product_id) = dynamo::id_from_sk(item, PRODUCT_SK_PREFIX) else {
                continue;
            };
            let mut product = product_from_item(product_id, item);
            if !query.matches(&product) {
                continue;
            }
            product.product_images = self.load_images(product_id).await?;
            products.push(product);
        }

        products.sort_by(|a, b| a.fields.name.to_lowercase().cmp(&b.fields.name.to_lowercase()));
        Ok(products)
    }

    async fn save_product(
        &self,
        product_id: Option<&str>,
        payload: SaveProductPayload,
    ) -> Result<Product, PersistenceError> {
        let fields = payload.fields.normalized()?;
        validate_images(&payload.product_images)?;
        let now = chrono::Utc::now().to_rfc3339();

        let (product_id, created_at, expected_version, existing_keys) = match product_id {
            Some(id) => {
                let sk = format!("{}{}", PRODUCT_SK_PREFIX, id);
                let existing = dynamo::get(&self.client, &self.table_name, PRODUCT_PK, &sk)
                    .await?
                    .ok_or_else(|| PersistenceError::not_found("product", id))?;
                let stored_version = dynamo::number::<u64>(&existing, "version").unwrap_or(0);
                let expected = payload.version.unwrap_or(stored_version);
                if expected != stored_version {
                    return Err(PersistenceError::conflict("product", id));
                }
                let created_at =
                    dynamo::opt_string(&existing, "created_at").unwrap_or_else(|| now.clone());
                (id.to_string(), created_at, Some(expected), self.image_keys(id).await?)
            }
            None => (uuid::Uuid::new_v4().to_string(), now.clone(), None, Vec::new()),
        };

        let mut product_images = payload.product_images;
        product_images.sort_by_key(|i| i.sequence);
        for (index, image) in product_images.iter_mut().enumerate() {
            image.sequence = index as u32;
            if image.is_pending() {
                image.id = uuid::Uuid::new_v4().to_string();
            }
        }

        let product = Product {
            product_id,
            fields,
            image_url: payload.image_url,
            product_images,
            created_at,
            updated_at: now,
            version: expected_version.map_or(1, |v| v + 1),
        };

        let writes = save_writes(&self.table_name, &product, expected_version, &existing_keys)?;
        let write_count = writes.len();

        self.client
            .transact_write_items()
            .set_transact_items(Some(writes))
            .send()
            .await
            .map_err(|e| {
                let lost_race = match e.as_service_error() {
                    Some(TransactWriteItemsError::TransactionCanceledException(cancelled)) => {
                        cancelled_by_condition(
                            cancelled.cancellation_reasons().iter().map(|r| r.code()),
                        )
                    }
                    _ => false,
                };
                if lost_race {
                    tracing::warn!(
                        "⚠️ Concurrent save rejected: product_id={}, expected_version={:?}",
                        product.product_id,
                        expected_version
                    );
                    PersistenceError::conflict("product", &product.product_id)
                } else {
                    PersistenceError::backend("transact_write_items", e)
                }
            })?;

        tracing::info!(
            "🖼️ Saved product {}: version={}, images={}, writes={}",
            product.product_id,
            product.version,
            product.product_images.len(),
            write_count
        );

        Ok(product)
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), PersistenceError> {
        let sk = format!("{}{}", PRODUCT_SK_PREFIX, product_id);
        if dynamo::get(&self.client, &self.table_name, PRODUCT_PK, &sk)
            .await?
            .is_none()
        {
            return Err(PersistenceError::not_found("product", product_id));
        }

        let pk = format!("{}{}", PRODUCT_SK_PREFIX, product_id);
        dynamo::delete_prefix(&self.client, &self.table_name, &pk, IMAGE_SK_PREFIX).await?;
        dynamo::delete(&self.client, &self.table_name, PRODUCT_PK, &sk).await?;

        tracing::info!("🗑️ Deleted product {}", product_id);
        Ok(())
    }
}

fn product_from_item(product_id: &str, item: &Item) -> Product {
    let features = item
        .get("features")
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_s().ok().cloned())
                .collect()
        })
        .unwrap_or_default();

    Product {
        product_id: product_id.to_string(),
        fields: ProductFields {
            name: dynamo::string(item, "name"),
            slug: dynamo::string(item, "slug"),
            description: dynamo::opt_string(item, "description"),
            category_id: dynamo::opt_string(item, "category_id"),
            sku: dynamo::opt_string(item, "sku"),
            price: dynamo::number(item, "price"),
            features,
            is_active: dynamo::boolean(item, "is_active", true),
            is_featured: dynamo::boolean(item, "is_featured", false),
        },
        image_url: dynamo::opt_string(item, "image_url"),
        product_images: Vec::new(),
        created_at: dynamo::string(item, "created_at"),
        updated_at: dynamo::string(item, "updated_at"),
        version: dynamo::number(item, "version").unwrap_or(0),
    }
}

fn image_from_item(item: &Item) -> ImageRecord {
    ImageRecord {
        id: dynamo::opt_string(item, "image_id").unwrap_or_else(pending_id),
        url: dynamo::string(item, "url"),
        alt_text: dynamo::opt_string(item, "alt_text"),
        sequence: dynamo::number(item, "sequence").unwrap_or(0),
        is_active: dynamo::boolean(item, "is_active", true),
    }
}

fn product_item(product: &Product) -> Item {
    let fields = &product.fields;
    let mut item = Item::new();
    item.insert("PK".to_string(), s(PRODUCT_PK));
    item.insert("SK".to_string(), s(format!("{}{}", PRODUCT_SK_PREFIX, product.product_id)));
    item.insert("name".to_string(), s(&fields.name));
    item.insert("slug".to_string(), s(&fields.slug));
    item.insert("is_active".to_string(), AttributeValue::Bool(fields.is_active));
    item.insert("is_featured".to_string(), AttributeValue::Bool(fields.is_featured));
    item.insert("created_at".to_string(), s(&product.created_at));
    item.insert("updated_at".to_string(), s(&product.updated_at));
    item.insert("version".to_string(), n(product.version));

    // Optional attributes are only written when present
    for (attribute, value) in [
        ("description", &fields.description),
        ("category_id", &fields.category_id),
        ("sku", &fields.sku),
        ("image_url", &product.image_url),
    ] {
        if let Some(value) = value {
            item.insert(attribute.to_string(), s(value));
        }
    }
    if let Some(price) = fields.price {
        item.insert("price".to_string(), n(price));
    }
    if !fields.features.is_empty() {
        item.insert(
            "features".to_string(),
            AttributeValue::L(fields.features.iter().map(s).collect()),
        );
    }
    item
}

fn image_item(pk: &str, image: &ImageRecord) -> Item {
    let mut item = Item::new();
    item.insert("PK".to_string(), s(pk));
    item.insert("SK".to_string(), s(dynamo::sequence_sk(IMAGE_SK_PREFIX, image.sequence)));
    item.insert("image_id".to_string(), s(&image.id));
    item.insert("url".to_string(), s(&image.url));
    item.insert("sequence".to_string(), n(image.sequence));
    item.insert("is_active".to_string(), AttributeValue::Bool(image.is_active));
    if let Some(alt_text) = &image.alt_text {
        item.insert("alt_text".to_string(), s(alt_text));
    }
    item
}

/// Stored image keys that the new list does not overwrite.
fn stale_image_keys(existing: &[String], images: &[ImageRecord]) -> Vec<String> {
    let kept: Vec<String> = images
        .iter()
        .map(|i| dynamo::sequence_sk(IMAGE_SK_PREFIX, i.sequence))
        .collect();
    existing
        .iter()
        .filter(|sk| !kept.contains(sk))
        .cloned()
        .collect()
}

/// Condition on the product item: absent for a create, at `expected` for an update.
/// Items written before versioning have no `version` attribute and count as 0.
fn version_condition(expected_version: Option<u64>) -> &'static str {
    match expected_version {
        None => "attribute_not_exists(PK)",
        Some(0) => "attribute_exists(PK) AND (attribute_not_exists(#version) OR #version = :expected)",
        Some(_) => "#version = :expected",
    }
}

/// The whole save as one transaction: the product put (conditional on its version), a put
/// per image and a delete per stale image key.
fn save_writes(
    table_name: &str,
    product: &Product,
    expected_version: Option<u64>,
    existing_keys: &[String],
) -> Result<Vec<TransactWriteItem>, PersistenceError> {
    let pk = format!("{}{}", PRODUCT_SK_PREFIX, product.product_id);
    let stale = stale_image_keys(existing_keys, &product.product_images);

    let total = 1 + product.product_images.len() + stale.len();
    if total > MAX_TRANSACT_ITEMS {
        return Err(PersistenceError::InvalidPayload(format!(
            "saving product {} needs {} writes, more than one save can hold",
            product.product_id, total
        )));
    }

    let mut put = Put::builder()
        .table_name(table_name)
        .set_item(Some(product_item(product)))
        .condition_expression(version_condition(expected_version));
    if let Some(expected) = expected_version {
        put = put
            .expression_attribute_names("#version", "version")
            .expression_attribute_values(":expected", n(expected));
    }
    let put = put
        .build()
        .map_err(|e| PersistenceError::backend("transact_write_items", e))?;

    let mut writes = Vec::with_capacity(total);
    writes.push(TransactWriteItem::builder().put(put).build());

    for image in &product.product_images {
        let put = Put::builder()
            .table_name(table_name)
            .set_item(Some(image_item(&pk, image)))
            .build()
            .map_err(|e| PersistenceError::backend("transact_write_items", e))?;
        writes.push(TransactWriteItem::builder().put(put).build());
    }

    for sk in stale {
        let delete = Delete::builder()
            .table_name(table_name)
            .key("PK", s(&pk))
            .key("SK", s(sk))
            .build()
            .map_err(|e| PersistenceError::backend("transact_write_items", e))?;
        writes.push(TransactWriteItem::builder().delete(delete).build());
    }

    Ok(writes)
}

/// True when a cancelled transaction failed on a condition rather than on throttling or
/// a conflicting transaction.
fn cancelled_by_condition<'a>(codes: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    codes
        .into_iter()
        .any(|code| code == Some("ConditionalCheckFailed"))
}
