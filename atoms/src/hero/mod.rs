pub mod model;
pub mod service;
pub mod http;

pub use model::{HeroCarousel, HeroSlide};
pub use service::*;
pub use http::*;
