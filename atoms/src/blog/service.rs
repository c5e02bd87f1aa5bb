use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{publication_stamp, BlogPost, CreateBlogPostPayload, UpdateBlogPostPayload};
use crate::dynamo::{self, s, Item, UpdateSet};
use crate::error::PersistenceError;
use crate::slug;

const BLOG_PK: &str = "BLOG";
const POST_SK_PREFIX: &str = "POST#";

/// Newest first. Drafts are included unless `published_only`.
pub async fn list_posts(
    client: &DynamoClient,
    table_name: &str,
    published_only: bool,
) -> Result<Vec<BlogPost>, PersistenceError> {
    let items = dynamo::query_prefix(client, table_name, BLOG_PK, POST_SK_PREFIX).await?;

    let mut posts: Vec<BlogPost> = items
        .iter()
        .filter_map(|item| {
            let id = dynamo::id_from_sk(item, POST_SK_PREFIX)?;
            Some(post_from_item(id, item))
        })
        .filter(|p| !published_only || p.is_published)
        .collect();

    posts.sort_by(|a, b| {
        let a_at = a.published_at.as_deref().unwrap_or(&a.created_at);
        let b_at = b.published_at.as_deref().unwrap_or(&b.created_at);
        b_at.cmp(a_at)
    });
    Ok(posts)
}

pub async fn get_post(
    client: &DynamoClient,
    table_name: &str,
    post_id: &str,
) -> Result<BlogPost, PersistenceError> {
    let sk = format!("{}{}", POST_SK_PREFIX, post_id);
    let item = dynamo::get(client, table_name, BLOG_PK, &sk)
        .await?
        .ok_or_else(|| PersistenceError::not_found("blog post", post_id))?;
    Ok(post_from_item(post_id, &item))
}

pub async fn get_published_post_by_slug(
    client: &DynamoClient,
    table_name: &str,
    slug: &str,
) -> Result<BlogPost, PersistenceError> {
    list_posts(client, table_name, true)
        .await?
        .into_iter()
        .find(|p| p.slug == slug)
        .ok_or_else(|| PersistenceError::not_found("blog post", slug))
}

pub async fn create_post(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateBlogPostPayload,
) -> Result<BlogPost, PersistenceError> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(PersistenceError::InvalidPayload("post title is required".to_string()));
    }
    let slug = match payload.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slug::slugify(&title),
    };
    if !slug::is_valid(&slug) {
        return Err(PersistenceError::InvalidPayload(format!("invalid post slug '{}'", slug)));
    }

    let post_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let published_at = publication_stamp(None, payload.is_published, &now);

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", s(BLOG_PK))
        .item("SK", s(format!("{}{}", POST_SK_PREFIX, post_id)))
        .item("title", s(&title))
        .item("slug", s(&slug))
        .item("content", s(&payload.content))
        .item("is_published", AttributeValue::Bool(payload.is_published))
        .item("created_at", s(&now))
        .item("updated_at", s(&now));

    if let Some(excerpt) = &payload.excerpt {
        builder = builder.item("excerpt", s(excerpt));
    }
    if let Some(cover_image_url) = &payload.cover_image_url {
        builder = builder.item("cover_image_url", s(cover_image_url));
    }
    if let Some(author) = &payload.author {
        builder = builder.item("author", s(author));
    }
    if let Some(published_at) = &published_at {
        builder = builder.item("published_at", s(published_at));
    }

    builder
        .send()
        .await
        .map_err(|e| PersistenceError::backend("put_item", e))?;

    Ok(BlogPost {
        post_id,
        title,
        slug,
        excerpt: payload.excerpt,
        content: payload.content,
        cover_image_url: payload.cover_image_url,
        author: payload.author,
        is_published: payload.is_published,
        published_at,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn update_post(
    client: &DynamoClient,
    table_name: &str,
    post_id: &str,
    payload: UpdateBlogPostPayload,
) -> Result<BlogPost, PersistenceError> {
    let existing = get_post(client, table_name, post_id).await?;
    let now = chrono::Utc::now().to_rfc3339();

    let mut update = UpdateSet::new();
    if let Some(title) = payload.title.as_deref().map(str::trim) {
        if title.is_empty() {
            return Err(PersistenceError::InvalidPayload("post title is required".to_string()));
        }
        update.set("title", s(title));
    }
    if let Some(raw) = payload.slug.as_deref() {
        if !slug::is_valid(raw) {
            return Err(PersistenceError::InvalidPayload(format!("invalid post slug '{}'", raw)));
        }
        update.set("slug", s(raw));
    }
    if let Some(is_published) = payload.is_published {
        update.set("is_published", AttributeValue::Bool(is_published));
        let stamp = publication_stamp(existing.published_at.as_deref(), is_published, &now);
        update.set_opt("published_at", stamp.map(s));
    }
    update
        .set_opt("excerpt", payload.excerpt.map(s))
        .set_opt("content", payload.content.map(s))
        .set_opt("cover_image_url", payload.cover_image_url.map(s))
        .set_opt("author", payload.author.map(s))
        .set("updated_at", s(&now));

    let sk = format!("{}{}", POST_SK_PREFIX, post_id);
    update
        .apply(client, table_name, BLOG_PK, &sk, "blog post", post_id)
        .await?;

    get_post(client, table_name, post_id).await
}

pub async fn delete_post(
    client: &DynamoClient,
    table_name: &str,
    post_id: &str,
) -> Result<(), PersistenceError> {
    get_post(client, table_name, post_id).await?;
    let sk = format!("{}{}", POST_SK_PREFIX, post_id);
    dynamo::delete(client, table_name, BLOG_PK, &sk).await
}

fn post_from_item(post_id: &str, item: &Item) -> BlogPost {
    BlogPost {
        post_id: post_id.to_string(),
        title: dynamo::string(item, "title"),
        slug: dynamo::string(item, "slug"),
        excerpt: dynamo::opt_string(item, "excerpt"),
        content: dynamo::string(item, "content"),
        cover_image_url: dynamo::opt_string(item, "cover_image_url"),
        author: dynamo::opt_string(item, "author"),
        is_published: dynamo::boolean(item, "is_published", false),
        published_at: dynamo::opt_string(item, "published_at"),
        created_at: dynamo::string(item, "created_at"),
        updated_at: dynamo::string(item, "updated_at"),
    }
}
