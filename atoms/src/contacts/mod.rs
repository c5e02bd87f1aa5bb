pub mod model;
pub mod service;
pub mod http;

pub use model::{ContactRequest, ContactSubmission, UpdateSubmissionPayload};
pub use service::*;
pub use http::*;
