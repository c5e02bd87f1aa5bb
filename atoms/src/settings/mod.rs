pub mod model;
pub mod service;
pub mod http;

pub use model::{SiteSettings, UpdateSettingsPayload};
pub use service::*;
pub use http::*;
