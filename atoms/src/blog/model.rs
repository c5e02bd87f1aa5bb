use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub post_id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub author: Option<String>,
    pub is_published: bool,
    /// Stamped the first time the post is published and kept afterwards.
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogPostPayload {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    pub cover_image_url: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogPostPayload {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
    pub author: Option<String>,
    pub is_published: Option<bool>,
}

/// When a post should carry `published_at` after an update.
pub fn publication_stamp(
    existing: Option<&str>,
    is_published: bool,
    now: &str,
) -> Option<String> {
    match (existing, is_published) {
        (Some(at), _) => Some(at.to_string()),
        (None, true) => Some(now.to_string()),
        (None, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_publication_is_stamped_once() {
        let now = "2024-05-01T00:00:00+00:00";
        assert_eq!(publication_stamp(None, false, now), None);
        assert_eq!(publication_stamp(None, true, now).as_deref(), Some(now));
        assert_eq!(
            publication_stamp(Some("2023-01-01T00:00:00+00:00"), true, now).as_deref(),
            Some("2023-01-01T00:00:00+00:00")
        );
        // unpublishing keeps the original date for when it goes live again
        assert!(publication_stamp(Some("2023-01-01T00:00:00+00:00"), false, now).is_some());
    }
}
