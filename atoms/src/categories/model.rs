use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: String,
}

impl Category {
    pub fn render_strategy(&self) -> RenderStrategy {
        RenderStrategy::for_slug(&self.slug)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryPayload {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// How the storefront lays out a category page.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RenderStrategy {
    /// Plain product card grid.
    Grid,
    /// Products compared by size/capacity in a table.
    SizeMatrix,
    /// Pack quantities front and centre.
    PackGrid,
    /// Large imagery, one product per row.
    Showcase,
}

const RENDER_STRATEGIES: [(&str, RenderStrategy); 6] = [
    ("paper-cups", RenderStrategy::SizeMatrix),
    ("paper-bags", RenderStrategy::SizeMatrix),
    ("food-containers", RenderStrategy::SizeMatrix),
    ("napkins", RenderStrategy::PackGrid),
    ("tissue", RenderStrategy::PackGrid),
    ("custom-printing", RenderStrategy::Showcase),
];

impl RenderStrategy {
    /// Exact slug lookup; unknown slugs get the default grid.
    pub fn for_slug(slug: &str) -> Self {
        RENDER_STRATEGIES
            .iter()
            .find(|(s, _)| *s == slug)
            .map(|(_, strategy)| *strategy)
            .unwrap_or(RenderStrategy::Grid)
    }
}
