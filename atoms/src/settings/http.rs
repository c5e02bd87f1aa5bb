use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::UpdateSettingsPayload;
use super::service::{get_settings, update_settings};
use crate::http;

/// HTTP Handler: GET /settings and GET /admin/settings
pub async fn get_settings_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    match get_settings(client, table_name).await {
        Ok(settings) => http::json(StatusCode::OK, &settings),
        Err(e) => http::persistence_error("get_settings", &e),
    }
}

/// HTTP Handler: PUT /admin/settings
pub async fn update_settings_handler(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateSettingsPayload = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match update_settings(client, table_name, payload).await {
        Ok(settings) => {
            tracing::info!("⚙️ Site settings updated");
            http::json(StatusCode::OK, &settings)
        }
        Err(e) => http::persistence_error("update_settings", &e),
    }
}
