pub mod model;
pub mod service;
pub mod http;

pub use model::{BlogPost, CreateBlogPostPayload, UpdateBlogPostPayload};
pub use service::*;
pub use http::*;
