//! Catalog block: composes the product, media and category atoms into the admin product
//! editor, the upload endpoints and the public storefront read models.

pub mod editor;
pub mod products;
pub mod storefront;
pub mod uploads;

pub use editor::{EditorError, ProductEditor, UploadFailure, UploadReport, MAX_IMAGES_PER_PRODUCT};
