//! Public read models for the storefront. Only active products, categories and images
//! are ever exposed here.

use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};
use paperworks_atoms::categories::{self, Category, RenderStrategy};
use paperworks_atoms::http;
use paperworks_atoms::media::ImageRecord;
use paperworks_atoms::products::{Product, ProductQuery, ProductStore};
use paperworks_atoms::PersistenceError;
use serde::Serialize;

/// Product as the storefront renders it.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicProduct {
    pub product_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub features: Vec<String>,
    pub is_featured: bool,
    /// First visible image; products without an image list fall back to the legacy field.
    pub image_url: Option<String>,
    pub images: Vec<PublicImage>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicImage {
    pub url: String,
    pub alt_text: Option<String>,
}

impl From<&ImageRecord> for PublicImage {
    fn from(record: &ImageRecord) -> Self {
        Self {
            url: record.url.clone(),
            alt_text: record.alt_text.clone(),
        }
    }
}

impl From<Product> for PublicProduct {
    fn from(product: Product) -> Self {
        let mut visible: Vec<&ImageRecord> =
            product.product_images.iter().filter(|r| r.is_active).collect();
        visible.sort_by_key(|r| r.sequence);

        let image_url = match visible.first() {
            Some(first) => Some(first.url.clone()),
            None if product.product_images.is_empty() => product.image_url.clone(),
            None => None,
        };
        let images = visible.into_iter().map(PublicImage::from).collect();

        Self {
            product_id: product.product_id,
            name: product.fields.name,
            slug: product.fields.slug,
            description: product.fields.description,
            category_id: product.fields.category_id,
            sku: product.fields.sku,
            price: product.fields.price,
            features: product.fields.features,
            is_featured: product.fields.is_featured,
            image_url,
            images,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    pub category: Category,
    pub render_strategy: RenderStrategy,
    pub products: Vec<PublicProduct>,
}

pub async fn active_products<S: ProductStore>(
    store: &S,
    category_id: Option<String>,
    featured_only: bool,
) -> Result<Vec<PublicProduct>, PersistenceError> {
    let query = ProductQuery {
        category_id,
        featured_only,
        active_only: true,
    };
    let products = store.list_products(&query).await?;
    Ok(products.into_iter().map(PublicProduct::from).collect())
}

pub async fn category_page<S: ProductStore>(
    client: &DynamoClient,
    table_name: &str,
    store: &S,
    slug: &str,
) -> Result<CategoryPage, PersistenceError> {
    let category = categories::get_category_by_slug(client, table_name, slug).await?;
    if !category.is_active {
        return Err(PersistenceError::not_found("category", slug));
    }

    let products = active_products(store, Some(category.category_id.clone()), false).await?;
    Ok(CategoryPage {
        render_strategy: category.render_strategy(),
        category,
        products,
    })
}

/// HTTP Handler: GET /products?category={slug}&featured=true
pub async fn list_products_handler<S: ProductStore>(
    client: &DynamoClient,
    table_name: &str,
    store: &S,
    category_slug: Option<&str>,
    featured_only: bool,
) -> Result<Response<Body>, Error> {
    let category_id = match category_slug {
        Some(slug) => match categories::get_category_by_slug(client, table_name, slug).await {
            Ok(category) => Some(category.category_id),
            Err(e) => return http::persistence_error("list_products", &e),
        },
        None => None,
    };

    match active_products(store, category_id, featured_only).await {
        Ok(products) => http::json(StatusCode::OK, &products),
        Err(e) => http::persistence_error("list_products", &e),
    }
}

/// HTTP Handler: GET /products/{slug}
pub async fn get_product_handler<S: ProductStore>(
    store: &S,
    slug: &str,
) -> Result<Response<Body>, Error> {
    match active_products(store, None, false).await {
        Ok(products) => match products.into_iter().find(|p| p.slug == slug) {
            Some(product) => http::json(StatusCode::OK, &product),
            None => http::not_found(),
        },
        Err(e) => http::persistence_error("get_product", &e),
    }
}

/// HTTP Handler: GET /categories
pub async fn list_categories_handler(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    match categories::list_categories(client, table_name).await {
        Ok(all) => {
            let active: Vec<Category> = all.into_iter().filter(|c| c.is_active).collect();
            http::json(StatusCode::OK, &active)
        }
        Err(e) => http::persistence_error("list_categories", &e),
    }
}

/// HTTP Handler: GET /categories/{slug}
pub async fn category_page_handler<S: ProductStore>(
    client: &DynamoClient,
    table_name: &str,
    store: &S,
    slug: &str,
) -> Result<Response<Body>, Error> {
    match category_page(client, table_name, store, slug).await {
        Ok(page) => http::json(StatusCode::OK, &page),
        Err(e) => http::persistence_error("category_page", &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperworks_atoms::products::ProductFields;

    fn image(id: &str, sequence: u32, is_active: bool) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            url: format!("https://assets.example/{}.png", id),
            alt_text: Some(id.to_uppercase()),
            sequence,
            is_active,
        }
    }

    fn product(images: Vec<ImageRecord>, image_url: Option<&str>) -> Product {
        Product {
            product_id: "p1".to_string(),
            fields: ProductFields {
                name: "Napkins".to_string(),
                slug: "napkins".to_string(),
                is_active: true,
                ..Default::default()
            },
            image_url: image_url.map(str::to_string),
            product_images: images,
            created_at: String::new(),
            updated_at: String::new(),
            version: 1,
        }
    }

    #[test]
    fn inactive_images_are_hidden_from_the_gallery() {
        let public = PublicProduct::from(product(
            vec![image("c", 2, true), image("a", 0, false), image("b", 1, true)],
            Some("https://assets.example/a.png"),
        ));

        let urls: Vec<&str> = public.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["https://assets.example/b.png", "https://assets.example/c.png"]);
        assert_eq!(public.image_url.as_deref(), Some("https://assets.example/b.png"));
    }

    #[test]
    fn legacy_image_used_only_without_a_list() {
        let legacy = PublicProduct::from(product(vec![], Some("https://legacy/n.jpg")));
        assert_eq!(legacy.image_url.as_deref(), Some("https://legacy/n.jpg"));

        let all_hidden = PublicProduct::from(product(
            vec![image("a", 0, false)],
            Some("https://assets.example/a.png"),
        ));
        assert_eq!(all_hidden.image_url, None);
        assert!(all_hidden.images.is_empty());
    }
}
