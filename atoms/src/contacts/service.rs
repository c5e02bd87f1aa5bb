use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{ContactRequest, ContactSubmission};
use crate::dynamo::{self, s, Item, UpdateSet};
use crate::error::PersistenceError;

const CONTACT_PK: &str = "CONTACT";
const SUBMISSION_SK_PREFIX: &str = "SUBMISSION#";

pub async fn store_submission(
    client: &DynamoClient,
    table_name: &str,
    request: &ContactRequest,
) -> Result<ContactSubmission, PersistenceError> {
    let submission_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    let submission = ContactSubmission {
        submission_id,
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        phone: request.phone.clone(),
        company: request.company.clone(),
        subject: request.subject.clone(),
        message: request.message.trim().to_string(),
        is_read: false,
        created_at: now,
    };

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", s(CONTACT_PK))
        .item("SK", s(format!("{}{}", SUBMISSION_SK_PREFIX, submission.submission_id)))
        .item("name", s(&submission.name))
        .item("email", s(&submission.email))
        .item("message", s(&submission.message))
        .item("is_read", AttributeValue::Bool(false))
        .item("created_at", s(&submission.created_at));

    if let Some(phone) = &submission.phone {
        builder = builder.item("phone", s(phone));
    }
    if let Some(company) = &submission.company {
        builder = builder.item("company", s(company));
    }
    if let Some(subject) = &submission.subject {
        builder = builder.item("subject", s(subject));
    }

    builder
        .send()
        .await
        .map_err(|e| PersistenceError::backend("put_item", e))?;

    Ok(submission)
}

/// Newest first.
pub async fn list_submissions(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<ContactSubmission>, PersistenceError> {
    let items =
        dynamo::query_prefix(client, table_name, CONTACT_PK, SUBMISSION_SK_PREFIX).await?;

    let mut submissions: Vec<ContactSubmission> = items
        .iter()
        .filter_map(|item| {
            let id = dynamo::id_from_sk(item, SUBMISSION_SK_PREFIX)?;
            Some(submission_from_item(id, item))
        })
        .collect();
    submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(submissions)
}

pub async fn get_submission(
    client: &DynamoClient,
    table_name: &str,
    submission_id: &str,
) -> Result<ContactSubmission, PersistenceError> {
    let sk = format!("{}{}", SUBMISSION_SK_PREFIX, submission_id);
    let item = dynamo::get(client, table_name, CONTACT_PK, &sk)
        .await?
        .ok_or_else(|| PersistenceError::not_found("contact submission", submission_id))?;
    Ok(submission_from_item(submission_id, &item))
}

pub async fn mark_submission_read(
    client: &DynamoClient,
    table_name: &str,
    submission_id: &str,
    is_read: bool,
) -> Result<ContactSubmission, PersistenceError> {
    let mut update = UpdateSet::new();
    update.set("is_read", AttributeValue::Bool(is_read));

    let sk = format!("{}{}", SUBMISSION_SK_PREFIX, submission_id);
    update
        .apply(client, table_name, CONTACT_PK, &sk, "contact submission", submission_id)
        .await?;

    get_submission(client, table_name, submission_id).await
}

pub async fn delete_submission(
    client: &DynamoClient,
    table_name: &str,
    submission_id: &str,
) -> Result<(), PersistenceError> {
    get_submission(client, table_name, submission_id).await?;
    let sk = format!("{}{}", SUBMISSION_SK_PREFIX, submission_id);
    dynamo::delete(client, table_name, CONTACT_PK, &sk).await
}

fn submission_from_item(submission_id: &str, item: &Item) -> ContactSubmission {
    ContactSubmission {
        submission_id: submission_id.to_string(),
        name: dynamo::string(item, "name"),
        email: dynamo::string(item, "email"),
        phone: dynamo::opt_string(item, "phone"),
        company: dynamo::opt_string(item, "company"),
        subject: dynamo::opt_string(item, "subject"),
        message: dynamo::string(item, "message"),
        is_read: dynamo::boolean(item, "is_read", false),
        created_at: dynamo::string(item, "created_at"),
    }
}
