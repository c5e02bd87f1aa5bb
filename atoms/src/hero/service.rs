use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{HeroCarousel, HeroSlide};
use crate::dynamo::{self, n, s, Item};
use crate::error::PersistenceError;
use crate::media::model::pending_id;

const HERO_PK: &str = "HERO";
const SLIDE_SK_PREFIX: &str = "SLIDE#";

pub async fn load_carousel(
    client: &DynamoClient,
    table_name: &str,
) -> Result<HeroCarousel, PersistenceError> {
    let items = dynamo::query_prefix(client, table_name, HERO_PK, SLIDE_SK_PREFIX).await?;
    Ok(HeroCarousel::from_records(items.iter().map(slide_from_item).collect()))
}

/// Full replace of the stored carousel with `carousel`, in its current order.
pub async fn save_carousel(
    client: &DynamoClient,
    table_name: &str,
    carousel: HeroCarousel,
) -> Result<HeroCarousel, PersistenceError> {
    if let Some(blank) = carousel.iter().find(|s| s.image_url.trim().is_empty()) {
        return Err(PersistenceError::InvalidPayload(format!(
            "slide {} has no image",
            blank.slide_id
        )));
    }

    dynamo::delete_prefix(client, table_name, HERO_PK, SLIDE_SK_PREFIX).await?;

    let mut stored = Vec::with_capacity(carousel.len());
    for mut slide in carousel.into_items() {
        if slide.slide_id.starts_with(crate::media::model::PENDING_ID_PREFIX) {
            slide.slide_id = uuid::Uuid::new_v4().to_string();
        }

        let mut builder = client
            .put_item()
            .table_name(table_name)
            .item("PK", s(HERO_PK))
            .item("SK", s(dynamo::sequence_sk(SLIDE_SK_PREFIX, slide.sequence)))
            .item("slide_id", s(&slide.slide_id))
            .item("image_url", s(&slide.image_url))
            .item("sequence", n(slide.sequence))
            .item("is_active", AttributeValue::Bool(slide.is_active));

        for (attribute, value) in [
            ("alt_text", &slide.alt_text),
            ("title", &slide.title),
            ("subtitle", &slide.subtitle),
            ("link_url", &slide.link_url),
        ] {
            if let Some(value) = value {
                builder = builder.item(attribute, s(value));
            }
        }

        builder
            .send()
            .await
            .map_err(|e| PersistenceError::backend("put_item", e))?;
        stored.push(slide);
    }

    tracing::info!("🎞️ Hero carousel saved with {} slides", stored.len());
    Ok(HeroCarousel::from_records(stored))
}

fn slide_from_item(item: &Item) -> HeroSlide {
    HeroSlide {
        slide_id: dynamo::opt_string(item, "slide_id").unwrap_or_else(pending_id),
        image_url: dynamo::string(item, "image_url"),
        alt_text: dynamo::opt_string(item, "alt_text"),
        title: dynamo::opt_string(item, "title"),
        subtitle: dynamo::opt_string(item, "subtitle"),
        link_url: dynamo::opt_string(item, "link_url"),
        sequence: dynamo::number(item, "sequence").unwrap_or(0),
        is_active: dynamo::boolean(item, "is_active", true),
    }
}
