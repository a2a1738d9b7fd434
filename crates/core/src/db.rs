//! Client for the hosted database service.
//!
//! Persistence, auth and row-level security are delegated to a hosted
//! relational database exposed over a PostgREST-style REST interface; this
//! module is the thin data-access layer on top of it. [`Query`] builds the
//! filter/order/limit parameters, [`Db`] owns the HTTP client and the
//! typed operations the API and CLI call.

use chrono::{DateTime, Utc};
use media_types::{
    AiUsage, Article, ArticleWithRelations, Category, Comment, EngagementCounts, Impression,
    NewAiUsage, NewArticle, NewComment, NewImpression, NewLike,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::{MediaError, MediaResult};
use crate::ranking::RankingPeriod;

/// Select string embedding the category and author rows with each article.
const ARTICLE_RELATIONS: &str = "*,category:categories(*),author:users(*)";

/// Builder for the filter/order/limit parameters of one table request.
#[derive(Debug, Clone, Default)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns (and embedded relations) to return.
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".into(), columns.into()));
        self
    }

    /// `column = value`
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.into(), format!("eq.{}", value.to_string())));
        self
    }

    /// `column >= value`
    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.params
            .push((column.into(), format!("gte.{}", value.to_string())));
        self
    }

    /// `column IS NULL`
    pub fn is_null(mut self, column: &str) -> Self {
        self.params.push((column.into(), "is.null".into()));
        self
    }

    /// Ascending order.
    pub fn order_asc(mut self, column: &str) -> Self {
        self.params.push(("order".into(), format!("{column}.asc")));
        self
    }

    /// Descending order with NULLs last.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.params
            .push(("order".into(), format!("{column}.desc.nullslast")));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.params.push(("limit".into(), limit.to_string()));
        self
    }

    /// Key/value pairs in insertion order, ready for the querystring.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Handle to the hosted database's REST interface.
#[derive(Debug, Clone)]
pub struct Db {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl Db {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: cfg.database_url.trim_end_matches('/').to_owned(),
            service_key: cfg.database_service_key.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// GET matching rows.
    async fn rows<T: DeserializeOwned>(&self, table: &str, query: Query) -> MediaResult<Vec<T>> {
        let response = self
            .request(Method::GET, self.table_url(table))
            .query(query.params())
            .send()
            .await
            .map_err(MediaError::DatabaseRequest)?;
        let response = check_status(response).await?;
        response.json().await.map_err(MediaError::DatabaseDecode)
    }

    /// POST one row, returning the stored representation.
    async fn insert_returning<T, R>(&self, table: &str, row: &T) -> MediaResult<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(MediaError::DatabaseRequest)?;
        let response = check_status(response).await?;
        let mut rows: Vec<R> = response.json().await.map_err(MediaError::DatabaseDecode)?;
        rows.pop().ok_or_else(|| MediaError::DatabaseStatus {
            status: 200,
            message: format!("insert into {table} returned no representation"),
        })
    }

    /// POST one row, discarding the representation.
    async fn insert<T: Serialize>(&self, table: &str, row: &T) -> MediaResult<()> {
        let response = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(MediaError::DatabaseRequest)?;
        check_status(response).await?;
        Ok(())
    }

    /// PATCH matching rows.
    async fn update(
        &self,
        table: &str,
        query: Query,
        patch: &serde_json::Value,
    ) -> MediaResult<()> {
        let response = self
            .request(Method::PATCH, self.table_url(table))
            .header("Prefer", "return=minimal")
            .query(query.params())
            .json(patch)
            .send()
            .await
            .map_err(MediaError::DatabaseRequest)?;
        check_status(response).await?;
        Ok(())
    }

    /// DELETE matching rows.
    async fn delete(&self, table: &str, query: Query) -> MediaResult<()> {
        let response = self
            .request(Method::DELETE, self.table_url(table))
            .query(query.params())
            .send()
            .await
            .map_err(MediaError::DatabaseRequest)?;
        check_status(response).await?;
        Ok(())
    }

    /// Exact row count via a HEAD request and the `Content-Range` header.
    async fn count(&self, table: &str, query: Query) -> MediaResult<u64> {
        let response = self
            .request(Method::HEAD, self.table_url(table))
            .header("Prefer", "count=exact")
            .query(query.params())
            .send()
            .await
            .map_err(MediaError::DatabaseRequest)?;
        let response = check_status(response).await?;
        let header = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| MediaError::MalformedCount("missing content-range".to_owned()))?;
        parse_content_range(header)
    }

    /// POST to a database function.
    async fn rpc(&self, function: &str, args: &serde_json::Value) -> MediaResult<()> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        let response = self
            .request(Method::POST, url)
            .json(args)
            .send()
            .await
            .map_err(MediaError::DatabaseRequest)?;
        check_status(response).await?;
        Ok(())
    }

    // Articles

    /// Latest published articles, newest first, with embedded relations.
    pub async fn latest_articles(&self, limit: usize) -> MediaResult<Vec<ArticleWithRelations>> {
        self.rows(
            "articles",
            Query::new()
                .select(ARTICLE_RELATIONS)
                .eq("status", "published")
                .order_desc("published_at")
                .limit(limit),
        )
        .await
    }

    /// One published article by slug.
    pub async fn article_by_slug(&self, slug: &str) -> MediaResult<Option<ArticleWithRelations>> {
        let mut rows: Vec<ArticleWithRelations> = self
            .rows(
                "articles",
                Query::new()
                    .select(ARTICLE_RELATIONS)
                    .eq("slug", slug)
                    .eq("status", "published")
                    .limit(1),
            )
            .await?;
        Ok(rows.pop())
    }

    /// The ranking query: published articles created inside the period
    /// window, most viewed first. Falls back to the latest published
    /// articles when the window holds nothing.
    pub async fn popular_articles(
        &self,
        period: RankingPeriod,
        now: DateTime<Utc>,
        limit: usize,
    ) -> MediaResult<Vec<ArticleWithRelations>> {
        let since = period.window_start(now);
        let ranked: Vec<ArticleWithRelations> = self
            .rows(
                "articles",
                Query::new()
                    .select(ARTICLE_RELATIONS)
                    .eq("status", "published")
                    .gte("created_at", since.to_rfc3339())
                    .order_desc("views")
                    .limit(limit),
            )
            .await?;
        if !ranked.is_empty() {
            return Ok(ranked);
        }
        tracing::debug!("{} ranking window empty, falling back to latest", period);
        self.latest_articles(limit).await
    }

    pub async fn insert_article(&self, row: &NewArticle) -> MediaResult<Article> {
        self.insert_returning("articles", row).await
    }

    /// Bumps the view counter through the database function, so concurrent
    /// readers do not lose increments.
    pub async fn increment_views(&self, article_id: Uuid) -> MediaResult<()> {
        self.rpc("increment_article_views", &json!({ "article_id": article_id }))
            .await
    }

    // Engagement

    pub async fn like_count(&self, article_id: Uuid) -> MediaResult<u64> {
        self.count("likes", Query::new().eq("article_id", article_id))
            .await
    }

    pub async fn comment_count(&self, article_id: Uuid) -> MediaResult<u64> {
        self.count("comments", Query::new().eq("article_id", article_id))
            .await
    }

    pub async fn engagement_counts(&self, article_id: Uuid) -> MediaResult<EngagementCounts> {
        Ok(EngagementCounts {
            likes: self.like_count(article_id).await?,
            comments: self.comment_count(article_id).await?,
        })
    }

    pub async fn insert_like(&self, row: &NewLike) -> MediaResult<()> {
        self.insert("likes", row).await
    }

    pub async fn delete_like(&self, article_id: Uuid, user_id: Uuid) -> MediaResult<()> {
        self.delete(
            "likes",
            Query::new()
                .eq("article_id", article_id)
                .eq("user_id", user_id),
        )
        .await
    }

    pub async fn insert_impression(&self, row: &NewImpression) -> MediaResult<Impression> {
        self.insert_returning("impressions", row).await
    }

    pub async fn set_impression_duration(&self, id: Uuid, duration: i64) -> MediaResult<()> {
        self.update(
            "impressions",
            Query::new().eq("id", id),
            &json!({ "duration": duration }),
        )
        .await
    }

    // Comments

    /// All comments for an article, oldest first, ready for threading.
    pub async fn comments_for_article(&self, article_id: Uuid) -> MediaResult<Vec<Comment>> {
        self.rows(
            "comments",
            Query::new()
                .eq("article_id", article_id)
                .order_asc("created_at"),
        )
        .await
    }

    pub async fn insert_comment(&self, row: &NewComment) -> MediaResult<Comment> {
        self.insert_returning("comments", row).await
    }

    // Categories

    /// All categories sorted by their `order` column.
    pub async fn categories_ordered(&self) -> MediaResult<Vec<Category>> {
        self.rows("categories", Query::new().order_asc("order")).await
    }

    /// Root categories only, as the home page links them.
    pub async fn root_categories(&self) -> MediaResult<Vec<Category>> {
        self.rows(
            "categories",
            Query::new().is_null("parent_id").order_asc("order"),
        )
        .await
    }

    // AI usage

    pub async fn insert_ai_usage(&self, row: &NewAiUsage) -> MediaResult<()> {
        self.insert("ai_usage", row).await
    }

    pub async fn recent_ai_usage(&self, limit: usize) -> MediaResult<Vec<AiUsage>> {
        self.rows(
            "ai_usage",
            Query::new().order_desc("created_at").limit(limit),
        )
        .await
    }

    pub async fn all_ai_usage(&self) -> MediaResult<Vec<AiUsage>> {
        self.rows("ai_usage", Query::new().order_asc("created_at"))
            .await
    }
}

async fn check_status(response: reqwest::Response) -> MediaResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(MediaError::DatabaseStatus {
        status: status.as_u16(),
        message,
    })
}

/// Parses the total out of a `Content-Range` header (`0-9/57` or `*/57`).
fn parse_content_range(header: &str) -> MediaResult<u64> {
    match header.split('/').nth(1) {
        Some(total) if total != "*" => total
            .parse()
            .map_err(|_| MediaError::MalformedCount(header.to_owned())),
        _ => Err(MediaError::MalformedCount(header.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &Query) -> Vec<(&str, &str)> {
        query
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn query_builds_filters_in_order() {
        let query = Query::new()
            .select("*")
            .eq("status", "published")
            .gte("created_at", "2026-08-01T00:00:00+00:00")
            .order_desc("views")
            .limit(10);
        assert_eq!(
            pairs(&query),
            vec![
                ("select", "*"),
                ("status", "eq.published"),
                ("created_at", "gte.2026-08-01T00:00:00+00:00"),
                ("order", "views.desc.nullslast"),
                ("limit", "10"),
            ]
        );
    }

    #[test]
    fn null_filter_and_ascending_order() {
        let query = Query::new().is_null("parent_id").order_asc("order");
        assert_eq!(
            pairs(&query),
            vec![("parent_id", "is.null"), ("order", "order.asc")]
        );
    }

    #[test]
    fn eq_accepts_uuids() {
        let id = Uuid::nil();
        let query = Query::new().eq("article_id", id);
        assert_eq!(
            pairs(&query),
            vec![("article_id", "eq.00000000-0000-0000-0000-000000000000")]
        );
    }

    #[test]
    fn content_range_totals_parse() {
        assert_eq!(parse_content_range("0-9/57").unwrap(), 57);
        assert_eq!(parse_content_range("*/0").unwrap(), 0);
        assert!(parse_content_range("0-9/*").is_err());
        assert!(parse_content_range("garbage").is_err());
    }
}
