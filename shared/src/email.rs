use aws_sdk_sesv2::types::{Body as EmailBody, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client as SesClient;
use paperworks_atoms::contacts::ContactSubmission;

pub fn contact_subject(submission: &ContactSubmission) -> String {
    match submission.subject.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(subject) => format!("Website enquiry: {}", subject.trim()),
        None => format!("Website enquiry from {}", submission.name),
    }
}

pub fn contact_text(submission: &ContactSubmission) -> String {
    let mut text = format!("Name: {}\nEmail: {}\n", submission.name, submission.email);
    if let Some(phone) = &submission.phone {
        text.push_str(&format!("Phone: {}\n", phone));
    }
    if let Some(company) = &submission.company {
        text.push_str(&format!("Company: {}\n", company));
    }
    text.push_str(&format!("\n{}\n", submission.message));
    text
}

/// Forwards a stored contact submission to the sales inbox. Replies go to the customer.
pub async fn send_contact_email(
    ses_client: &SesClient,
    from: &str,
    to: &str,
    submission: &ContactSubmission,
) -> Result<(), String> {
    let subject = Content::builder()
        .data(contact_subject(submission))
        .charset("UTF-8")
        .build()
        .map_err(|e| e.to_string())?;
    let text = Content::builder()
        .data(contact_text(submission))
        .charset("UTF-8")
        .build()
        .map_err(|e| e.to_string())?;

    let message = Message::builder()
        .subject(subject)
        .body(EmailBody::builder().text(text).build())
        .build();

    ses_client
        .send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .reply_to_addresses(&submission.email)
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await
        .map_err(|e| e.to_string())?;

    tracing::info!(
        "📧 Contact email sent: submission_id={}, to={}",
        submission.submission_id,
        to
    );
    Ok(())
}
