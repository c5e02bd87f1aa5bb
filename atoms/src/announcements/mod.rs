pub mod model;
pub mod service;
pub mod http;

pub use model::{Announcement, CreateAnnouncementPayload, UpdateAnnouncementPayload};
pub use service::*;
pub use http::*;
