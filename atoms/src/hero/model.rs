use serde::{Deserialize, Serialize};

use crate::media::model::pending_id;
use crate::media::{OrderedList, Sequenced};

/// One slide of the storefront hero carousel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    #[serde(default = "pending_id")]
    pub slide_id: String,
    pub image_url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub sequence: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Sequenced for HeroSlide {
    fn id(&self) -> &str {
        &self.slide_id
    }

    fn sequence(&self) -> u32 {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: u32) {
        self.sequence = sequence;
    }
}

pub type HeroCarousel = OrderedList<HeroSlide>;

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(id: &str, sequence: u32) -> HeroSlide {
        HeroSlide {
            slide_id: id.to_string(),
            image_url: format!("https://assets.example/hero-carousel/{}.jpg", id),
            alt_text: None,
            title: None,
            subtitle: None,
            link_url: None,
            sequence,
            is_active: true,
        }
    }

    #[test]
    fn slides_share_the_ordering_rules() {
        let mut carousel = HeroCarousel::from_records(vec![slide("b", 4), slide("a", 1)]);
        carousel.append(slide("c", 0));

        assert!(carousel.reorder(2, 0));
        let order: Vec<(&str, u32)> = carousel
            .iter()
            .map(|s| (s.slide_id.as_str(), s.sequence))
            .collect();
        assert_eq!(order, vec![("c", 0), ("a", 1), ("b", 2)]);
    }
}
