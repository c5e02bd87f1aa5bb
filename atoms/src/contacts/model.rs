use serde::{Deserialize, Serialize};

/// Public contact form body.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// Why a contact request was refused, as `(error code, user facing message)`.
pub type ContactRejection = (&'static str, &'static str);

impl ContactRequest {
    pub fn validate(&self) -> Result<(), ContactRejection> {
        let email = self.email.trim();
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
            None => false,
        };
        if !valid_email {
            return Err(("InvalidEmail", "Please provide a valid email address"));
        }
        if self.message.trim().is_empty() {
            return Err(("InvalidMessage", "Please provide a message"));
        }
        if self.message.len() > 5000 {
            return Err(("InvalidMessage", "Message is too long"));
        }
        Ok(())
    }
}

/// Stored contact form submission, reviewed in the admin panel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub submission_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmissionPayload {
    pub is_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: "Sam".to_string(),
            email: email.to_string(),
            phone: None,
            company: None,
            subject: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn validation_rejects_bad_email_and_empty_message() {
        assert!(request("buyer@shop.com", "Need 5000 cups").validate().is_ok());
        assert_eq!(request("buyer", "hi").validate().unwrap_err().0, "InvalidEmail");
        assert_eq!(request("@shop.com", "hi").validate().unwrap_err().0, "InvalidEmail");
        assert_eq!(request("a@b.com", "   ").validate().unwrap_err().0, "InvalidMessage");
    }
}
