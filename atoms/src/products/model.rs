use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::media::ImageRecord;
use crate::slug;

/// Product as stored, with its image list in sequence order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    #[serde(flatten)]
    pub fields: ProductFields,
    /// Denormalized primary image: the url of the image at sequence 0. Older products
    /// only have this field and no image list.
    pub image_url: Option<String>,
    pub product_images: Vec<ImageRecord>,
    pub created_at: String,
    pub updated_at: String,
    /// Bumped on every save. Items written before versioning read as 0.
    #[serde(default)]
    pub version: u64,
}

/// Editable scalar fields of a product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

impl ProductFields {
    /// Trims, derives a missing slug from the name, and rejects what the storefront can't route.
    pub fn normalized(mut self) -> Result<Self, PersistenceError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(PersistenceError::InvalidPayload(
                "product name is required".to_string(),
            ));
        }
        self.slug = self.slug.trim().to_string();
        if self.slug.is_empty() {
            self.slug = slug::slugify(&self.name);
        }
        if !slug::is_valid(&self.slug) {
            return Err(PersistenceError::InvalidPayload(format!(
                "invalid product slug '{}'",
                self.slug
            )));
        }
        if matches!(self.price, Some(p) if p < 0.0 || !p.is_finite()) {
            return Err(PersistenceError::InvalidPayload(
                "price must be a non-negative number".to_string(),
            ));
        }
        self.category_id = self.category_id.filter(|c| !c.trim().is_empty());
        Ok(self)
    }
}

/// One product-update request: fields, the full ordered image list and the derived
/// primary image. The store replaces every stored image with `product_images`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveProductPayload {
    #[serde(flatten)]
    pub fields: ProductFields,
    #[serde(default)]
    pub product_images: Vec<ImageRecord>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Version the client loaded. A save against a newer stored version is refused; when
    /// absent the version read at the start of the save is used.
    #[serde(default)]
    pub version: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category_id: Option<String>,
    #[serde(default)]
    pub featured_only: bool,
    #[serde(default)]
    pub active_only: bool,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        if self.active_only && !product.fields.is_active {
            return false;
        }
        if self.featured_only && !product.fields.is_featured {
            return false;
        }
        match &self.category_id {
            Some(category_id) => product.fields.category_id.as_deref() == Some(category_id),
            None => true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_the_admin_ui_field_names() {
        let payload: SaveProductPayload = serde_json::from_str(
            r#"{
                "name": "Kraft Bag",
                "categoryId": "bags",
                "isFeatured": true,
                "imageUrl": "https://a/1.png",
                "productImages": [
                    {"url": "https://a/1.png", "altText": "front", "sequence": 0, "isActive": true}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.fields.name, "Kraft Bag");
        assert!(payload.fields.is_active);
        assert!(payload.fields.is_featured);
        assert_eq!(payload.product_images.len(), 1);
        assert_eq!(payload.image_url.as_deref(), Some("https://a/1.png"));
        assert_eq!(payload.version, None);
    }

    #[test]
    fn normalized_derives_slug_and_rejects_bad_input() {
        let fields = ProductFields {
            name: "  Paper Cups 12oz ".to_string(),
            category_id: Some("  ".to_string()),
            ..Default::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(fields.slug, "paper-cups-12oz");
        assert_eq!(fields.category_id, None);

        let nameless = ProductFields::default().normalized();
        assert!(matches!(nameless, Err(PersistenceError::InvalidPayload(_))));

        let negative = ProductFields {
            name: "Cup".to_string(),
            price: Some(-1.0),
            ..Default::default()
        }
        .normalized();
        assert!(negative.is_err());
    }
}
