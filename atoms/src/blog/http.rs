use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{CreateBlogPostPayload, UpdateBlogPostPayload};
use super::service::{
    create_post, delete_post, get_post, get_published_post_by_slug, list_posts, update_post,
};
use crate::http;

/// HTTP Handler: GET /blog and GET /admin/blog
pub async fn list_posts_handler(
    client: &DynamoClient,
    table_name: &str,
    published_only: bool,
) -> Result<Response<Body>, Error> {
    match list_posts(client, table_name, published_only).await {
        Ok(posts) => http::json(StatusCode::OK, &posts),
        Err(e) => http::persistence_error("list_posts", &e),
    }
}

/// HTTP Handler: GET /blog/{slug}
pub async fn get_published_post_handler(
    client: &DynamoClient,
    table_name: &str,
    slug: &str,
) -> Result<Response<Body>, Error> {
    match get_published_post_by_slug(client, table_name, slug).await {
        Ok(post) => http::json(StatusCode::OK, &post),
        Err(e) => http::persistence_error("get_published_post", &e),
    }
}

/// HTTP Handler: GET /admin/blog/{id}
pub async fn get_post_handler(
    client: &DynamoClient,
    table_name: &str,
    post_id: &str,
) -> Result<Response<Body>, Error> {
    match get_post(client, table_name, post_id).await {
        Ok(post) => http::json(StatusCode::OK, &post),
        Err(e) => http::persistence_error("get_post", &e),
    }
}

/// HTTP Handler: POST /admin/blog
pub async fn create_post_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateBlogPostPayload = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match create_post(client, table_name, payload).await {
        Ok(post) => {
            tracing::info!("📝 Created blog post {} published={}", post.slug, post.is_published);
            http::json(StatusCode::CREATED, &post)
        }
        Err(e) => http::persistence_error("create_post", &e),
    }
}

/// HTTP Handler: PUT /admin/blog/{id}
pub async fn update_post_handler(
    client: &DynamoClient,
    table_name: &str,
    post_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateBlogPostPayload = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match update_post(client, table_name, post_id, payload).await {
        Ok(post) => http::json(StatusCode::OK, &post),
        Err(e) => http::persistence_error("update_post", &e),
    }
}

/// HTTP Handler: DELETE /admin/blog/{id}
pub async fn delete_post_handler(
    client: &DynamoClient,
    table_name: &str,
    post_id: &str,
) -> Result<Response<Body>, Error> {
    match delete_post(client, table_name, post_id).await {
        Ok(()) => http::no_content(),
        Err(e) => http::persistence_error("delete_post", &e),
    }
}
