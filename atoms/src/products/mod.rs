// Re-export model types and service functions
pub mod model;
pub mod service;
pub mod http;

pub use model::{Product, ProductFields, SaveProductPayload, ProductQuery};
pub use service::{DynamoProductStore, ProductStore};
pub use http::*;
