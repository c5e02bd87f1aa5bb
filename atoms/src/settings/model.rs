use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub site_name: String,
    pub tagline: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub business_hours: Option<String>,
    /// Network name -> profile URL.
    pub social_links: BTreeMap<String, String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    pub site_name: Option<String>,
    pub tagline: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub business_hours: Option<String>,
    pub social_links: Option<BTreeMap<String, String>>,
}

impl SiteSettings {
    /// Applies a partial update. Empty strings clear optional fields.
    pub fn merge(mut self, payload: UpdateSettingsPayload) -> Self {
        fn clearable(current: &mut Option<String>, incoming: Option<String>) {
            if let Some(value) = incoming {
                let value = value.trim().to_string();
                *current = (!value.is_empty()).then_some(value);
            }
        }

        if let Some(site_name) = payload.site_name.map(|s| s.trim().to_string()) {
            if !site_name.is_empty() {
                self.site_name = site_name;
            }
        }
        clearable(&mut self.tagline, payload.tagline);
        clearable(&mut self.contact_email, payload.contact_email);
        clearable(&mut self.contact_phone, payload.contact_phone);
        clearable(&mut self.address, payload.address);
        clearable(&mut self.business_hours, payload.business_hours);
        if let Some(links) = payload.social_links {
            self.social_links = links.into_iter().filter(|(_, url)| !url.trim().is_empty()).collect();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_updates_only_given_fields() {
        let current = SiteSettings {
            site_name: "Paperworks".to_string(),
            tagline: Some("Paper, done well".to_string()),
            contact_phone: Some("555-0100".to_string()),
            ..Default::default()
        };

        let merged = current.merge(UpdateSettingsPayload {
            site_name: Some("   ".to_string()),
            tagline: Some(String::new()),
            contact_email: Some("hello@paperworks.example".to_string()),
            social_links: Some(BTreeMap::from([
                ("instagram".to_string(), "https://instagram.com/pw".to_string()),
                ("x".to_string(), " ".to_string()),
            ])),
            ..Default::default()
        });

        assert_eq!(merged.site_name, "Paperworks");
        assert_eq!(merged.tagline, None);
        assert_eq!(merged.contact_phone.as_deref(), Some("555-0100"));
        assert_eq!(merged.contact_email.as_deref(), Some("hello@paperworks.example"));
        assert_eq!(merged.social_links.len(), 1);
    }
}
