// Re-export model types, the ordering manager and the upload gateway
pub mod model;
pub mod list;
pub mod upload;

pub use model::{validate_images, ImageRecord, ReorderRequest, Sequenced};
pub use list::{ImageList, OrderedList};
pub use upload::{
    DestinationCategory, FileUpload, StorageCollaborator, UploadCredential, UploadError,
    UploadGateway, UploadOutcome, UploadedImage,
};
