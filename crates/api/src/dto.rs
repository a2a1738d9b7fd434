//! Request and response bodies for the REST API.

use media_core::categories::CategoryNode;
use media_core::comments::CommentNode;
use media_core::document::Node;
use media_core::usage::UsageStats;
use media_types::{AiUsage, ArticleWithRelations, Category, Comment};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleListRes {
    #[schema(value_type = Vec<Object>)]
    pub articles: Vec<ArticleWithRelations>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleRes {
    #[schema(value_type = Object)]
    pub article: ArticleWithRelations,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArticleReq {
    pub title: String,
    /// Explicit slug; derived from the title when omitted.
    pub slug: Option<String>,
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
    pub excerpt: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub author_id: Uuid,
    /// Publish immediately instead of saving a draft.
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateArticleRes {
    pub id: Uuid,
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListRes {
    #[schema(value_type = Vec<Object>)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryTreeRes {
    #[schema(value_type = Vec<Object>)]
    pub categories: Vec<CategoryNode>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentTreeRes {
    #[schema(value_type = Vec<Object>)]
    pub comments: Vec<CommentNode>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentReq {
    pub user_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentRes {
    #[schema(value_type = Object)]
    pub comment: Comment,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LikeReq {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessRes {
    pub success: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImpressionReq {
    pub article_id: Uuid,
    pub user_id: Option<Uuid>,
    pub session_id: String,
    pub referrer: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImpressionRes {
    pub id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImpressionDurationReq {
    /// Seconds the reader stayed on the page.
    pub duration: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RankingRes {
    pub period: String,
    #[schema(value_type = Vec<Object>)]
    pub articles: Vec<ArticleWithRelations>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateArticleReq {
    pub title: String,
    pub prompt: String,
    /// Author the usage is recorded against, when known.
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateArticleRes {
    #[schema(value_type = Object)]
    pub content: Node,
    pub excerpt: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AiUsageRes {
    #[schema(value_type = Object)]
    pub stats: UsageStats,
    #[schema(value_type = Vec<Object>)]
    pub recent: Vec<AiUsage>,
}
