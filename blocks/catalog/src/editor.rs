//! Product editor: the image section of the admin product form plus the save payload.
//!
//! The editor owns the in-memory image list for one product and keeps the denormalized
//! primary image (`image_url`) in step with it after every mutation. Nothing is persisted
//! until [`ProductEditor::save`], which hands the full list to the store for a full replace.
//! Saves carry the version the editor was loaded at, so a save racing another editor of the
//! same product loses with [`EditorError::SaveInProgress`] instead of overwriting it.

use paperworks_atoms::media::{
    validate_images, DestinationCategory, FileUpload, ImageList, ImageRecord,
    StorageCollaborator, UploadGateway,
};
use paperworks_atoms::products::{Product, ProductFields, ProductStore, SaveProductPayload};
use paperworks_atoms::PersistenceError;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

pub const MAX_IMAGES_PER_PRODUCT: usize = 20;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("a save is already in progress for this product")]
    SaveInProgress,

    #[error("a product can have at most {max} images")]
    TooManyImages { max: usize },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Per-file result of an upload action.
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    /// Records appended to the list, in the order their uploads finished.
    pub uploaded: Vec<ImageRecord>,
    pub failures: Vec<UploadFailure>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadFailure {
    pub file_name: String,
    pub stage: &'static str,
    pub message: String,
}

/// Serialized view of the editor for the admin UI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState<'a> {
    pub product_id: Option<&'a str>,
    #[serde(flatten)]
    pub fields: &'a ProductFields,
    pub image_url: Option<&'a str>,
    pub product_images: &'a [ImageRecord],
    pub version: Option<u64>,
}

#[derive(Debug, Default)]
pub struct ProductEditor {
    product_id: Option<String>,
    fields: ProductFields,
    images: ImageList,
    image_url: Option<String>,
    version: Option<u64>,
    saving: AtomicBool,
}

impl ProductEditor {
    pub fn new_product() -> Self {
        Self::default()
    }

    /// Editor for an existing product, initialised from whatever the store returns.
    pub async fn load<S: ProductStore>(store: &S, product_id: &str) -> Result<Self, EditorError> {
        let product = store.get_product(product_id).await?;
        Ok(Self::from_product(product))
    }

    /// Images sorted by sequence. Products saved before image lists existed only carry
    /// `image_url`; they get one synthetic record built from it.
    pub fn from_product(product: Product) -> Self {
        let mut records = product.product_images;
        if records.is_empty() {
            if let Some(legacy_url) = product.image_url.filter(|u| !u.trim().is_empty()) {
                records.push(ImageRecord::pending(legacy_url, Some(product.fields.name.clone())));
            }
        }

        let mut editor = Self {
            product_id: Some(product.product_id),
            fields: product.fields,
            images: ImageList::from_records(records),
            image_url: None,
            version: Some(product.version),
            saving: AtomicBool::new(false),
        };
        editor.refresh_primary();
        editor
    }

    /// Server side normalisation of a save request: records are sorted by the `sequence`
    /// the client sent and renumbered densely from 0, and the primary image is derived,
    /// never trusted. Blank urls and repeated ids are rejected.
    pub fn from_payload(
        product_id: Option<String>,
        payload: SaveProductPayload,
    ) -> Result<Self, EditorError> {
        if payload.product_images.len() > MAX_IMAGES_PER_PRODUCT {
            return Err(EditorError::TooManyImages {
                max: MAX_IMAGES_PER_PRODUCT,
            });
        }
        validate_images(&payload.product_images)?;

        let mut editor = Self {
            product_id,
            fields: payload.fields,
            images: ImageList::from_records(payload.product_images),
            image_url: None,
            version: payload.version,
            saving: AtomicBool::new(false),
        };
        editor.refresh_primary();
        Ok(editor)
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    pub fn fields(&self) -> &ProductFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut ProductFields {
        &mut self.fields
    }

    pub fn images(&self) -> &ImageList {
        &self.images
    }

    /// The tracked primary image field.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> EditorState<'_> {
        EditorState {
            product_id: self.product_id(),
            fields: &self.fields,
            image_url: self.image_url(),
            product_images: self.images.items(),
            version: self.version,
        }
    }

    pub fn append_image(&mut self, record: ImageRecord) -> Result<(), EditorError> {
        if self.images.len() >= MAX_IMAGES_PER_PRODUCT {
            return Err(EditorError::TooManyImages {
                max: MAX_IMAGES_PER_PRODUCT,
            });
        }
        self.images.append(record);
        self.refresh_primary();
        Ok(())
    }

    pub fn remove_image(&mut self, id: &str) -> Option<ImageRecord> {
        let removed = self.images.remove(id);
        self.refresh_primary();
        removed
    }

    pub fn reorder_images(&mut self, from: usize, to: usize) -> bool {
        let moved = self.images.reorder(from, to);
        self.refresh_primary();
        moved
    }

    pub fn update_alt_text(&mut self, id: &str, text: &str) -> bool {
        self.images.update_alt_text(id, text)
    }

    pub fn set_image_active(&mut self, id: &str, is_active: bool) -> bool {
        self.images.set_active(id, is_active)
    }

    /// Uploads `files` into product storage and appends each success as it finishes.
    ///
    /// Files beyond the per-product cap are refused up front; other failures are reported
    /// per file and never undo the uploads that worked.
    pub async fn upload_images<S: StorageCollaborator>(
        &mut self,
        gateway: &UploadGateway<S>,
        files: Vec<FileUpload>,
    ) -> UploadReport {
        let mut report = UploadReport::default();

        let capacity = MAX_IMAGES_PER_PRODUCT.saturating_sub(self.images.len());
        let mut accepted = files;
        let refused = if accepted.len() > capacity {
            accepted.split_off(capacity)
        } else {
            Vec::new()
        };
        for file in refused {
            report.failures.push(UploadFailure {
                file_name: file.file_name,
                stage: "validation",
                message: format!("a product can have at most {} images", MAX_IMAGES_PER_PRODUCT),
            });
        }

        for outcome in gateway
            .upload_batch(accepted, DestinationCategory::ProductImages)
            .await
        {
            match outcome.result {
                Ok(uploaded) => {
                    let record = ImageRecord::pending(uploaded.url, Some(uploaded.suggested_alt_text));
                    self.images.append(record.clone());
                    report.uploaded.push(record);
                }
                Err(e) => report.failures.push(UploadFailure {
                    file_name: e.file_name().to_string(),
                    stage: e.stage(),
                    message: e.to_string(),
                }),
            }
        }

        self.refresh_primary();
        report
    }

    /// The one product-update request sent on save.
    pub fn save_payload(&self) -> SaveProductPayload {
        SaveProductPayload {
            fields: self.fields.clone(),
            product_images: self.images.items().to_vec(),
            image_url: self.image_url.clone(),
            version: self.version,
        }
    }

    /// Sends the payload to the store. A second call on this editor while one is in flight
    /// is refused, and so is a save that loses the version check to another editor.
    /// On failure the in-memory list is untouched so the user can retry without
    /// uploading again.
    pub async fn save<S: ProductStore>(&self, store: &S) -> Result<Product, EditorError> {
        let _guard = SaveGuard::acquire(&self.saving)?;

        let payload = self.save_payload();
        let product = match store.save_product(self.product_id.as_deref(), payload).await {
            Ok(product) => product,
            Err(PersistenceError::Conflict { .. }) => {
                tracing::warn!(
                    "⚠️ Product save lost to a concurrent save: product_id={:?}, version={:?}",
                    self.product_id,
                    self.version
                );
                return Err(EditorError::SaveInProgress);
            }
            Err(e) => {
                tracing::error!(
                    "❌ Product save failed: product_id={:?}, error={}",
                    self.product_id,
                    e
                );
                return Err(e.into());
            }
        };

        tracing::info!(
            "✅ Product saved: product_id={}, images={}, primary={:?}",
            product.product_id,
            product.product_images.len(),
            product.image_url
        );
        Ok(product)
    }

    /// Adopts what the store returned from a save: the product id and persisted image ids.
    pub fn mark_saved(&mut self, product: Product) {
        let saved = Self::from_product(product);
        self.product_id = saved.product_id;
        self.fields = saved.fields;
        self.images = saved.images;
        self.version = saved.version;
        self.refresh_primary();
    }

    fn refresh_primary(&mut self) {
        self.image_url = self.images.primary_image_url().map(str::to_string);
    }
}

/// Holds the in-flight flag for the duration of one save.
struct SaveGuard<'a>(&'a AtomicBool);

impl<'a> SaveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, EditorError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| EditorError::SaveInProgress)?;
        Ok(SaveGuard(flag))
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            url: format!("https://assets.example/{}.png", id),
            alt_text: None,
            sequence: 0,
            is_active: true,
        }
    }

    fn product(images: Vec<ImageRecord>, image_url: Option<&str>) -> Product {
        Product {
            product_id: "p1".to_string(),
            fields: ProductFields {
                name: "Kraft Bag".to_string(),
                slug: "kraft-bag".to_string(),
                is_active: true,
                ..Default::default()
            },
            image_url: image_url.map(str::to_string),
            product_images: images,
            created_at: String::new(),
            updated_at: String::new(),
            version: 3,
        }
    }

    #[test]
    fn every_mutation_refreshes_the_primary_field() {
        let mut editor = ProductEditor::new_product();
        assert_eq!(editor.image_url(), None);

        editor.append_image(record("a")).unwrap();
        editor.append_image(record("b")).unwrap();
        assert_eq!(editor.image_url(), Some("https://assets.example/a.png"));

        editor.reorder_images(1, 0);
        assert_eq!(editor.image_url(), Some("https://assets.example/b.png"));

        editor.remove_image("b");
        assert_eq!(editor.image_url(), Some("https://assets.example/a.png"));

        editor.remove_image("a");
        assert_eq!(editor.image_url(), None);
        assert_eq!(editor.save_payload().image_url, None);
    }

    #[test]
    fn legacy_single_image_becomes_one_record() {
        let editor = ProductEditor::from_product(product(vec![], Some("https://legacy/cup.jpg")));

        assert_eq!(editor.images().len(), 1);
        let only = &editor.images().items()[0];
        assert_eq!(only.url, "https://legacy/cup.jpg");
        assert_eq!(only.sequence, 0);
        assert_eq!(only.alt_text.as_deref(), Some("Kraft Bag"));
        assert_eq!(editor.image_url(), Some("https://legacy/cup.jpg"));
    }

    #[test]
    fn stored_list_wins_over_legacy_field() {
        let mut b = record("b");
        b.sequence = 1;
        let mut a = record("a");
        a.sequence = 0;
        let editor =
            ProductEditor::from_product(product(vec![b, a], Some("https://legacy/stale.jpg")));

        let ids: Vec<&str> = editor.images().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(editor.image_url(), Some("https://assets.example/a.png"));
    }

    #[test]
    fn payload_primary_is_derived_not_trusted() {
        let mut first = record("first");
        first.sequence = 5;
        let mut second = record("second");
        second.sequence = 9;

        let editor = ProductEditor::from_payload(
            None,
            SaveProductPayload {
                fields: product(vec![], None).fields,
                product_images: vec![second, first],
                image_url: Some("https://somewhere/else.png".to_string()),
                version: None,
            },
        )
        .unwrap();

        let payload = editor.save_payload();
        assert_eq!(payload.image_url.as_deref(), Some("https://assets.example/first.png"));
        let sequences: Vec<u32> = payload.product_images.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![0, 1]);
    }

    #[test]
    fn image_cap_is_enforced() {
        let images: Vec<ImageRecord> = (0..=MAX_IMAGES_PER_PRODUCT)
            .map(|i| record(&format!("r{}", i)))
            .collect();
        let payload = SaveProductPayload {
            fields: ProductFields::default(),
            product_images: images,
            image_url: None,
            version: None,
        };

        assert!(matches!(
            ProductEditor::from_payload(None, payload),
            Err(EditorError::TooManyImages { .. })
        ));
    }

    #[test]
    fn payload_with_blank_url_or_repeated_id_is_rejected() {
        let blank = ImageRecord {
            url: String::new(),
            ..record("dup")
        };
        let payload = SaveProductPayload {
            fields: product(vec![], None).fields,
            product_images: vec![blank, record("dup")],
            image_url: None,
            version: None,
        };
        assert!(matches!(
            ProductEditor::from_payload(Some("p1".to_string()), payload),
            Err(EditorError::Persistence(PersistenceError::InvalidPayload(_)))
        ));

        let payload = SaveProductPayload {
            fields: product(vec![], None).fields,
            product_images: vec![record("dup"), record("dup")],
            image_url: None,
            version: None,
        };
        assert!(matches!(
            ProductEditor::from_payload(Some("p1".to_string()), payload),
            Err(EditorError::Persistence(PersistenceError::InvalidPayload(_)))
        ));
    }

    #[test]
    fn version_travels_from_load_to_payload() {
        let mut editor = ProductEditor::from_product(product(vec![record("a")], None));
        assert_eq!(editor.save_payload().version, Some(3));

        let mut saved = product(vec![record("a")], None);
        saved.version = 4;
        editor.mark_saved(saved);
        assert_eq!(editor.state().version, Some(4));
    }
}
