//! Domain atoms for the Paperworks storefront and back-office.
//!
//! Every atom is split the same way: `model` holds the serde types, `service` talks to
//! DynamoDB and `http` turns service results into Lambda responses. Atoms take their
//! clients as arguments and never reach for global state.

pub mod announcements;
pub mod blog;
pub mod categories;
pub mod contacts;
pub mod dynamo;
pub mod error;
pub mod hero;
pub mod http;
pub mod media;
pub mod products;
pub mod settings;
pub mod slug;

pub use error::PersistenceError;
