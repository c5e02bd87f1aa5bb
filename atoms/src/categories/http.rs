use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{CreateCategoryPayload, UpdateCategoryPayload};
use super::service::{create_category, delete_category, get_category, list_categories, update_category};
use crate::http;

/// HTTP Handler: GET /admin/categories
pub async fn list_categories_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    match list_categories(client, table_name).await {
        Ok(categories) => http::json(StatusCode::OK, &categories),
        Err(e) => http::persistence_error("list_categories", &e),
    }
}

/// HTTP Handler: POST /admin/categories
pub async fn create_category_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateCategoryPayload = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match create_category(client, table_name, payload).await {
        Ok(category) => {
            tracing::info!("✅ Created category {} ({})", category.slug, category.category_id);
            http::json(StatusCode::CREATED, &category)
        }
        Err(e) => http::persistence_error("create_category", &e),
    }
}

/// HTTP Handler: GET /admin/categories/{id}
pub async fn get_category_handler(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
) -> Result<Response<Body>, Error> {
    match get_category(client, table_name, category_id).await {
        Ok(category) => http::json(StatusCode::OK, &category),
        Err(e) => http::persistence_error("get_category", &e),
    }
}

/// HTTP Handler: PUT /admin/categories/{id}
pub async fn update_category_handler(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateCategoryPayload = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match update_category(client, table_name, category_id, payload).await {
        Ok(category) => http::json(StatusCode::OK, &category),
        Err(e) => http::persistence_error("update_category", &e),
    }
}

/// HTTP Handler: DELETE /admin/categories/{id}
pub async fn delete_category_handler(
    client: &DynamoClient,
    table_name: &str,
    category_id: &str,
) -> Result<Response<Body>, Error> {
    match delete_category(client, table_name, category_id).await {
        Ok(()) => http::no_content(),
        Err(e) => http::persistence_error("delete_category", &e),
    }
}
