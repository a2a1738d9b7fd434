//! Shared domain records for the 3125 Media backend.
//!
//! These structs mirror the rows held by the hosted database service. The
//! schema itself (tables, indices, policies) lives with that service; this
//! crate only fixes the shapes the rest of the workspace reads and writes.

mod slug;

pub use slug::{Slug, SlugError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to an account by the hosted auth service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

/// A registered reader or author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category. Categories form a tree via `parent_id`; siblings are sorted
/// by the `order` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Publication state of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
}

/// An article row. `content` is the editor's document tree, stored opaque;
/// the shape is fixed by `media-core`'s document module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: serde_json::Value,
    pub excerpt: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub author_id: Uuid,
    pub status: ArticleStatus,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub article_id: Uuid,
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub article_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One recorded page view with dwell time. `duration` is seconds on page,
/// written after the fact; `session_id` is an opaque browser session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Impression {
    pub id: Uuid,
    pub article_id: Uuid,
    pub user_id: Option<Uuid>,
    pub session_id: String,
    pub referrer: Option<String>,
    pub duration: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// One recorded call to the text-generation API, with token counts and the
/// estimated cost in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiUsage {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub model: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
    pub estimated_cost: f64,
    pub request_type: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `articles`. Columns the database defaults (id,
/// timestamps, views) are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub content: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub author_id: Uuid,
    pub status: ArticleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub article_id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewLike {
    pub article_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewImpression {
    pub article_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    pub duration: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAiUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub model: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
    pub estimated_cost: f64,
    pub request_type: String,
    pub metadata: serde_json::Value,
}

/// Like and comment totals attached to an article for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub likes: u64,
    pub comments: u64,
}

/// An article joined with its embedded relations, as returned by the hosted
/// database when the select string embeds `category` and `author`.
/// `counts` is filled in by the caller, not by the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleWithRelations {
    #[serde(flatten)]
    pub article: Article,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub counts: EngagementCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ArticleStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!(
            serde_json::from_str::<ArticleStatus>("\"draft\"").unwrap(),
            ArticleStatus::Draft
        );
    }

    #[test]
    fn new_comment_omits_absent_parent() {
        let row = NewComment {
            article_id: Uuid::nil(),
            user_id: Uuid::nil(),
            parent_id: None,
            content: "hello".into(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("parent_id").is_none());
    }

    #[test]
    fn article_with_relations_decodes_embedded_rows() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "title": "Hands on with the new handheld",
            "slug": "hands-on-new-handheld",
            "content": {"type": "doc", "content": []},
            "excerpt": null,
            "thumbnail_url": null,
            "category_id": null,
            "author_id": "550e8400-e29b-41d4-a716-446655440001",
            "status": "published",
            "published_at": "2026-01-22T10:30:00Z",
            "views": 42,
            "created_at": "2026-01-22T10:30:00Z",
            "updated_at": "2026-01-22T10:30:00Z",
            "category": null,
            "author": null
        });
        let joined: ArticleWithRelations = serde_json::from_value(json).unwrap();
        assert_eq!(joined.article.views, Some(42));
        assert!(joined.category.is_none());
        assert_eq!(joined.counts, EngagementCounts::default());
    }
}
