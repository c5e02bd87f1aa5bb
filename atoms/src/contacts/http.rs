use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::UpdateSubmissionPayload;
use super::service::{delete_submission, list_submissions, mark_submission_read};
use crate::http;

/// HTTP Handler: GET /admin/contacts
pub async fn list_submissions_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    match list_submissions(client, table_name).await {
        Ok(submissions) => http::json(StatusCode::OK, &submissions),
        Err(e) => http::persistence_error("list_submissions", &e),
    }
}

/// HTTP Handler: PATCH /admin/contacts/{id}
pub async fn update_submission_handler(
    client: &DynamoClient,
    table_name: &str,
    submission_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateSubmissionPayload = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    match mark_submission_read(client, table_name, submission_id, payload.is_read).await {
        Ok(submission) => http::json(StatusCode::OK, &submission),
        Err(e) => http::persistence_error("update_submission", &e),
    }
}

/// HTTP Handler: DELETE /admin/contacts/{id}
pub async fn delete_submission_handler(
    client: &DynamoClient,
    table_name: &str,
    submission_id: &str,
) -> Result<Response<Body>, Error> {
    match delete_submission(client, table_name, submission_id).await {
        Ok(()) => http::no_content(),
        Err(e) => http::persistence_error("delete_submission", &e),
    }
}
