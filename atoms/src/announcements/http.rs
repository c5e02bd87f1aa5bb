use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{current_banner, CreateAnnouncementPayload, UpdateAnnouncementPayload};
use super::service::{create_announcement, delete_announcement, list_announcements, update_announcement};
use crate::http;

/// HTTP Handler: GET /announcement (public banner, `null` when nothing is active)
pub async fn current_announcement_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    match list_announcements(client, table_name).await {
        Ok(announcements) => http::json(StatusCode::OK, &current_banner(&announcements)),
        Err(e) => http::persistence_error("current_announcement", &e),
    }
}

/// HTTP Handler: GET /admin/announcements
pub async fn list_announcements_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    match list_announcements(client, table_name).await {
        Ok(announcements) => http::json(StatusCode::OK, &announcements),
        Err(e) => http::persistence_error("list_announcements", &e),
    }
}

/// HTTP Handler: POST /admin/announcements
pub async fn create_announcement_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateAnnouncementPayload = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match create_announcement(client, table_name, payload).await {
        Ok(announcement) => http::json(StatusCode::CREATED, &announcement),
        Err(e) => http::persistence_error("create_announcement", &e),
    }
}

/// HTTP Handler: PUT /admin/announcements/{id}
pub async fn update_announcement_handler(
    client: &DynamoClient,
    table_name: &str,
    announcement_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateAnnouncementPayload = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match update_announcement(client, table_name, announcement_id, payload).await {
        Ok(announcement) => http::json(StatusCode::OK, &announcement),
        Err(e) => http::persistence_error("update_announcement", &e),
    }
}

/// HTTP Handler: DELETE /admin/announcements/{id}
pub async fn delete_announcement_handler(
    client: &DynamoClient,
    table_name: &str,
    announcement_id: &str,
) -> Result<Response<Body>, Error> {
    match delete_announcement(client, table_name, announcement_id).await {
        Ok(()) => http::no_content(),
        Err(e) => http::persistence_error("delete_announcement", &e),
    }
}
