use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_sesv2::Client as SesClient;
use lambda_http::{http::StatusCode, Body, Error, Response};
use paperworks_atoms::contacts::{self, ContactRequest};
use paperworks_atoms::http;
use serde::Serialize;

use crate::config::Config;
use crate::email::send_contact_email;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactResponse {
    message: String,
    submission_id: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Handle contact form submission
///
/// The submission is stored first; the email to the sales inbox is best effort.
pub async fn handle_contact(
    dynamo_client: &DynamoClient,
    ses_client: &SesClient,
    config: &Config,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    tracing::info!("Contact form submission received");

    let request: ContactRequest = match http::parse_body(body) {
        Ok(req) => req,
        Err(resp) => return Ok(resp),
    };

    if let Err((code, message)) = request.validate() {
        let error = ErrorResponse {
            error: code.to_string(),
            message: message.to_string(),
        };
        return http::json(StatusCode::BAD_REQUEST, &error);
    }

    let submission =
        match contacts::store_submission(dynamo_client, &config.table_name, &request).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("❌ Failed to store contact submission: {}", e);
                let error = ErrorResponse {
                    error: "SubmissionFailed".to_string(),
                    message: "Failed to send message. Please try again later.".to_string(),
                };
                return http::json(StatusCode::INTERNAL_SERVER_ERROR, &error);
            }
        };

    if let Err(e) = send_contact_email(
        ses_client,
        &config.contact_from_email,
        &config.contact_to_email,
        &submission,
    )
    .await
    {
        tracing::error!(
            "Failed to send contact email: submission_id={}, error={}",
            submission.submission_id,
            e
        );
    }

    let response = ContactResponse {
        message: "Message sent successfully".to_string(),
        submission_id: submission.submission_id,
    };
    http::json(StatusCode::OK, &response)
}
