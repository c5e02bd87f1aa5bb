use serde::{Deserialize, Serialize};

/// Banner shown across the top of the storefront.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub announcement_id: String,
    pub message: String,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementPayload {
    pub message: String,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementPayload {
    pub message: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub is_active: Option<bool>,
}

/// The banner to show: the newest active announcement.
pub fn current_banner(announcements: &[Announcement]) -> Option<&Announcement> {
    announcements
        .iter()
        .filter(|a| a.is_active)
        .max_by(|a, b| a.created_at.cmp(&b.created_at))
}
