use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{HeroCarousel, HeroSlide};
use super::service::{load_carousel, save_carousel};
use crate::http;
use crate::media::ReorderRequest;

/// HTTP Handler: GET /hero-slides (active slides only)
pub async fn list_active_slides_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    match load_carousel(client, table_name).await {
        Ok(carousel) => {
            let active: Vec<&HeroSlide> = carousel.iter().filter(|s| s.is_active).collect();
            http::json(StatusCode::OK, &active)
        }
        Err(e) => http::persistence_error("list_active_slides", &e),
    }
}

/// HTTP Handler: GET /admin/hero-slides
pub async fn list_slides_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    match load_carousel(client, table_name).await {
        Ok(carousel) => http::json(StatusCode::OK, carousel.items()),
        Err(e) => http::persistence_error("list_slides", &e),
    }
}

/// HTTP Handler: PUT /admin/hero-slides
///
/// The body is the whole carousel. Sequences are normalised before the full replace.
pub async fn replace_slides_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let slides: Vec<HeroSlide> = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match save_carousel(client, table_name, HeroCarousel::from_records(slides)).await {
        Ok(carousel) => http::json(StatusCode::OK, carousel.items()),
        Err(e) => http::persistence_error("replace_slides", &e),
    }
}

/// HTTP Handler: POST /admin/hero-slides/reorder
pub async fn reorder_slides_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let request: ReorderRequest = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    let mut carousel = match load_carousel(client, table_name).await {
        Ok(carousel) => carousel,
        Err(e) => return http::persistence_error("reorder_slides", &e),
    };

    let moved = request
        .indices()
        .map(|(from, to)| carousel.reorder(from, to))
        .unwrap_or(false);
    if !moved {
        // Spurious drag events are not errors
        return http::json(StatusCode::OK, carousel.items());
    }

    match save_carousel(client, table_name, carousel).await {
        Ok(carousel) => http::json(StatusCode::OK, carousel.items()),
        Err(e) => http::persistence_error("reorder_slides", &e),
    }
}
