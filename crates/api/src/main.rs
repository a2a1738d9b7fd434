//! REST API server binary.
//!
//! ## Purpose
//! Serves the public read endpoints (articles, categories, comments,
//! rankings), the engagement write endpoints (views, likes, impressions),
//! and the admin surfaces (article creation, AI drafting, usage reporting).
//!
//! Persistence and auth are delegated: rows live in the hosted database
//! service and admin calls are gated by a shared API key.

use axum::{
    extract::{Path as AxumPath, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use media_api::dto::{
    AiUsageRes, ArticleListRes, ArticleRes, CategoryListRes, CategoryTreeRes, CommentRes,
    CommentTreeRes, CreateArticleReq, CreateArticleRes, CreateCommentReq, GenerateArticleReq,
    GenerateArticleRes, HealthRes, ImpressionDurationReq, ImpressionReq, ImpressionRes, LikeReq,
    RankingRes, SuccessRes,
};
use media_core::db::Db;
use media_core::openai::ChatClient;
use media_core::ranking::{RankingPeriod, RANKING_LIMIT};
use media_core::{categories, comments, drafting, usage, CoreConfig};
use media_types::{
    ArticleStatus, ArticleWithRelations, NewArticle, NewComment, NewImpression, NewLike, Slug,
};

/// Number of articles the list endpoint returns.
const ARTICLE_LIST_LIMIT: usize = 20;

/// Number of root categories the home page links.
const HOME_CATEGORY_LIMIT: usize = 8;

/// Number of usage rows the admin report returns.
const USAGE_RECENT_LIMIT: usize = 50;

/// Application state for the REST API server
///
/// Shared by all request handlers: configuration, the hosted-database
/// client, and the generation client when one is configured.
#[derive(Clone)]
struct AppState {
    cfg: Arc<CoreConfig>,
    db: Arc<Db>,
    chat: Option<Arc<ChatClient>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_articles,
        article_by_slug,
        create_article,
        article_comments,
        create_comment,
        record_view,
        like_article,
        unlike_article,
        record_impression,
        set_impression_duration,
        category_tree,
        category_roots,
        ranking,
        generate_article,
        ai_usage,
    ),
    components(schemas(
        HealthRes,
        ArticleListRes,
        ArticleRes,
        CreateArticleReq,
        CreateArticleRes,
        CategoryListRes,
        CategoryTreeRes,
        CommentTreeRes,
        CreateCommentReq,
        CommentRes,
        LikeReq,
        SuccessRes,
        ImpressionReq,
        ImpressionRes,
        ImpressionDurationReq,
        RankingRes,
        GenerateArticleReq,
        GenerateArticleRes,
        AiUsageRes,
    ))
)]
struct ApiDoc;

/// Main entry point for the 3125 Media REST API server
///
/// # Environment Variables
/// - `MEDIA_API_ADDR`: server address (default: "0.0.0.0:3000")
/// - plus everything `CoreConfig::from_env` reads
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - required configuration is missing,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("media_api=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDIA_API_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting 3125 Media REST API on {}", addr);

    let cfg = Arc::new(CoreConfig::from_env()?);
    let db = Arc::new(Db::new(&cfg));
    let chat = match ChatClient::new(&cfg) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!("Article drafting disabled: {}", e);
            None
        }
    };

    let state = AppState { cfg, db, chat };

    let app = Router::new()
        .route("/health", get(health))
        .route("/articles", get(list_articles))
        .route("/articles", post(create_article))
        .route("/articles/slug/:slug", get(article_by_slug))
        .route("/articles/:id/comments", get(article_comments))
        .route("/articles/:id/comments", post(create_comment))
        .route("/articles/:id/views", post(record_view))
        .route("/articles/:id/likes", post(like_article))
        .route("/articles/:id/likes/:user_id", delete(unlike_article))
        .route("/impressions", post(record_impression))
        .route("/impressions/:id", put(set_impression_duration))
        .route("/categories", get(category_tree))
        .route("/categories/roots", get(category_roots))
        .route("/rankings/:period", get(ranking))
        .route("/ai/generate-article", post(generate_article))
        .route("/admin/ai-usage", get(ai_usage))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Validates the shared admin API key from the `x-api-key` header.
fn require_api_key(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(), (StatusCode, &'static str)> {
    let expected = state.cfg.admin_api_key.as_deref().ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "MEDIA_ADMIN_API_KEY not set",
    ))?;
    let provided = headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if provided == expected {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "Invalid API key"))
    }
}

/// Fills in like/comment totals. A failed count logs a warning and leaves
/// the zero default, the same way the pages render missing counts as 0.
async fn attach_counts(db: &Db, articles: &mut [ArticleWithRelations]) {
    for article in articles.iter_mut() {
        match db.engagement_counts(article.article.id).await {
            Ok(counts) => article.counts = counts,
            Err(e) => tracing::warn!("Failed to count engagement: {:?}", e),
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "3125 Media API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/articles",
    responses(
        (status = 200, description = "Latest published articles", body = ArticleListRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Latest published articles with their engagement counts.
#[axum::debug_handler]
async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<ArticleListRes>, (StatusCode, &'static str)> {
    let mut articles = match state.db.latest_articles(ARTICLE_LIST_LIMIT).await {
        Ok(articles) => articles,
        Err(e) => {
            tracing::error!("List articles error: {:?}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
        }
    };
    attach_counts(&state.db, &mut articles).await;
    Ok(Json(ArticleListRes { articles }))
}

#[utoipa::path(
    get,
    path = "/articles/slug/{slug}",
    responses(
        (status = 200, description = "Article found", body = ArticleRes),
        (status = 404, description = "Article not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// One published article by slug.
#[axum::debug_handler]
async fn article_by_slug(
    State(state): State<AppState>,
    AxumPath(slug): AxumPath<String>,
) -> Result<Json<ArticleRes>, (StatusCode, &'static str)> {
    let article = match state.db.article_by_slug(&slug).await {
        Ok(Some(article)) => article,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "Article not found")),
        Err(e) => {
            tracing::error!("Article by slug error: {:?}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
        }
    };
    let mut articles = [article];
    attach_counts(&state.db, &mut articles).await;
    let [article] = articles;
    Ok(Json(ArticleRes { article }))
}

#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleReq,
    responses(
        (status = 200, description = "Article created", body = CreateArticleRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
/// Creates an article (admin). The slug is derived from the title when the
/// request does not carry one; `publish` stamps `published_at` now.
#[axum::debug_handler]
async fn create_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateArticleReq>,
) -> Result<Json<CreateArticleRes>, (StatusCode, &'static str)> {
    require_api_key(&state, &headers)?;

    if req.title.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Title is required"));
    }

    let slug = match &req.slug {
        Some(slug) => Slug::parse(slug),
        None => Slug::from_title(&req.title),
    };
    let slug = match slug {
        Ok(slug) => slug,
        Err(e) => {
            tracing::error!("Invalid slug: {:?}", e);
            return Err((StatusCode::BAD_REQUEST, "Invalid slug"));
        }
    };

    let (status, published_at) = if req.publish {
        (ArticleStatus::Published, Some(Utc::now()))
    } else {
        (ArticleStatus::Draft, None)
    };

    let row = NewArticle {
        title: req.title,
        slug: slug.as_str().to_owned(),
        content: req.content,
        excerpt: req.excerpt,
        thumbnail_url: req.thumbnail_url,
        category_id: req.category_id,
        author_id: req.author_id,
        status,
        published_at,
    };

    match state.db.insert_article(&row).await {
        Ok(article) => Ok(Json(CreateArticleRes {
            id: article.id,
            slug: article.slug,
        })),
        Err(e) => {
            tracing::error!("Create article error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/articles/{id}/comments",
    responses(
        (status = 200, description = "Threaded comments", body = CommentTreeRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Comments for an article, threaded into reply trees.
#[axum::debug_handler]
async fn article_comments(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Json<CommentTreeRes>, (StatusCode, &'static str)> {
    match state.db.comments_for_article(id).await {
        Ok(rows) => Ok(Json(CommentTreeRes {
            comments: comments::thread_comments(rows),
        })),
        Err(e) => {
            tracing::error!("Article comments error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/articles/{id}/comments",
    request_body = CreateCommentReq,
    responses(
        (status = 200, description = "Comment stored", body = CommentRes),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Stores a comment or a reply.
#[axum::debug_handler]
async fn create_comment(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<CreateCommentReq>,
) -> Result<Json<CommentRes>, (StatusCode, &'static str)> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Comment content is required"));
    }

    let row = NewComment {
        article_id: id,
        user_id: req.user_id,
        parent_id: req.parent_id,
        content: content.to_owned(),
    };
    match state.db.insert_comment(&row).await {
        Ok(comment) => Ok(Json(CommentRes { comment })),
        Err(e) => {
            tracing::error!("Create comment error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/articles/{id}/views",
    responses(
        (status = 200, description = "View counted", body = SuccessRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Counts one article view.
#[axum::debug_handler]
async fn record_view(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
) -> Result<Json<SuccessRes>, (StatusCode, &'static str)> {
    match state.db.increment_views(id).await {
        Ok(()) => Ok(Json(SuccessRes { success: true })),
        Err(e) => {
            tracing::error!("Increment views error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/articles/{id}/likes",
    request_body = LikeReq,
    responses(
        (status = 200, description = "Like stored", body = SuccessRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Likes an article for a user.
#[axum::debug_handler]
async fn like_article(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<LikeReq>,
) -> Result<Json<SuccessRes>, (StatusCode, &'static str)> {
    let row = NewLike {
        article_id: id,
        user_id: req.user_id,
    };
    match state.db.insert_like(&row).await {
        Ok(()) => Ok(Json(SuccessRes { success: true })),
        Err(e) => {
            tracing::error!("Like error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/articles/{id}/likes/{user_id}",
    responses(
        (status = 200, description = "Like removed", body = SuccessRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Removes a user's like from an article.
#[axum::debug_handler]
async fn unlike_article(
    State(state): State<AppState>,
    AxumPath((id, user_id)): AxumPath<(Uuid, Uuid)>,
) -> Result<Json<SuccessRes>, (StatusCode, &'static str)> {
    match state.db.delete_like(id, user_id).await {
        Ok(()) => Ok(Json(SuccessRes { success: true })),
        Err(e) => {
            tracing::error!("Unlike error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/impressions",
    request_body = ImpressionReq,
    responses(
        (status = 200, description = "Impression recorded", body = ImpressionRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Records a page impression; the returned id takes the dwell-time update.
#[axum::debug_handler]
async fn record_impression(
    State(state): State<AppState>,
    Json(req): Json<ImpressionReq>,
) -> Result<Json<ImpressionRes>, (StatusCode, &'static str)> {
    let row = NewImpression {
        article_id: req.article_id,
        user_id: req.user_id,
        session_id: req.session_id,
        referrer: req.referrer,
        duration: 0,
    };
    match state.db.insert_impression(&row).await {
        Ok(impression) => Ok(Json(ImpressionRes { id: impression.id })),
        Err(e) => {
            tracing::error!("Record impression error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    put,
    path = "/impressions/{id}",
    request_body = ImpressionDurationReq,
    responses(
        (status = 200, description = "Duration updated", body = SuccessRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Updates the dwell time of a recorded impression.
#[axum::debug_handler]
async fn set_impression_duration(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<Uuid>,
    Json(req): Json<ImpressionDurationReq>,
) -> Result<Json<SuccessRes>, (StatusCode, &'static str)> {
    match state.db.set_impression_duration(id, req.duration).await {
        Ok(()) => Ok(Json(SuccessRes { success: true })),
        Err(e) => {
            tracing::error!("Impression duration error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Category tree", body = CategoryTreeRes),
        (status = 500, description = "Internal server error")
    )
)]
/// All categories as a tree, siblings in display order.
#[axum::debug_handler]
async fn category_tree(
    State(state): State<AppState>,
) -> Result<Json<CategoryTreeRes>, (StatusCode, &'static str)> {
    match state.db.categories_ordered().await {
        Ok(rows) => Ok(Json(CategoryTreeRes {
            categories: categories::build_tree(rows),
        })),
        Err(e) => {
            tracing::error!("Category tree error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/categories/roots",
    responses(
        (status = 200, description = "Linkable root categories", body = CategoryListRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Root categories the home page links: ASCII slugs only, display order,
/// capped at eight.
#[axum::debug_handler]
async fn category_roots(
    State(state): State<AppState>,
) -> Result<Json<CategoryListRes>, (StatusCode, &'static str)> {
    match state.db.root_categories().await {
        Ok(rows) => {
            let categories = categories::ascii_roots(&rows, HOME_CATEGORY_LIMIT)
                .into_iter()
                .cloned()
                .collect();
            Ok(Json(CategoryListRes { categories }))
        }
        Err(e) => {
            tracing::error!("Category roots error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/rankings/{period}",
    responses(
        (status = 200, description = "Ranked articles", body = RankingRes),
        (status = 400, description = "Unknown period"),
        (status = 500, description = "Internal server error")
    )
)]
/// Most-viewed published articles for a period, falling back to the latest
/// articles when the window is empty.
#[axum::debug_handler]
async fn ranking(
    State(state): State<AppState>,
    AxumPath(period): AxumPath<String>,
) -> Result<Json<RankingRes>, (StatusCode, &'static str)> {
    let period: RankingPeriod = match period.parse() {
        Ok(period) => period,
        Err(e) => {
            tracing::error!("Invalid ranking period: {:?}", e);
            return Err((StatusCode::BAD_REQUEST, "Invalid ranking period"));
        }
    };

    let mut articles = match state
        .db
        .popular_articles(period, Utc::now(), RANKING_LIMIT)
        .await
    {
        Ok(articles) => articles,
        Err(e) => {
            tracing::error!("Ranking error: {:?}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
        }
    };
    attach_counts(&state.db, &mut articles).await;

    Ok(Json(RankingRes {
        period: period.as_str().to_owned(),
        articles,
    }))
}

#[utoipa::path(
    post,
    path = "/ai/generate-article",
    request_body = GenerateArticleReq,
    responses(
        (status = 200, description = "Draft generated", body = GenerateArticleRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
/// Generates an article draft from a title and outline (admin).
///
/// The completion is converted into the editor document tree and an
/// excerpt. Token usage is recorded best-effort: a failed insert is logged
/// and swallowed because the draft itself already succeeded.
#[axum::debug_handler]
async fn generate_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GenerateArticleReq>,
) -> Result<Json<GenerateArticleRes>, (StatusCode, &'static str)> {
    require_api_key(&state, &headers)?;

    if req.title.trim().is_empty() || req.prompt.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Title and prompt are required"));
    }

    let chat = state.chat.as_ref().ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "Article drafting is not configured",
    ))?;

    let completion = match chat
        .complete(
            drafting::SYSTEM_PROMPT,
            &drafting::user_prompt(&req.title, &req.prompt),
        )
        .await
    {
        Ok(completion) => completion,
        Err(e) => {
            tracing::error!("Article generation error: {:?}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Article generation failed"));
        }
    };

    let draft = drafting::build_draft(&completion.text);

    if let Some(token_usage) = completion.usage {
        let row = drafting::usage_record(
            req.user_id,
            chat.model(),
            token_usage,
            &req.title,
            req.prompt.chars().count(),
        );
        match state.db.insert_ai_usage(&row).await {
            Ok(()) => tracing::info!(
                prompt_tokens = token_usage.prompt_tokens,
                completion_tokens = token_usage.completion_tokens,
                estimated_cost = row.estimated_cost,
                "AI usage recorded"
            ),
            Err(e) => tracing::error!("Failed to record AI usage: {:?}", e),
        }
    }

    Ok(Json(GenerateArticleRes {
        content: draft.content,
        excerpt: draft.excerpt,
    }))
}

#[utoipa::path(
    get,
    path = "/admin/ai-usage",
    responses(
        (status = 200, description = "Usage totals and recent calls", body = AiUsageRes),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
/// Aggregated AI usage and the most recent calls (admin).
#[axum::debug_handler]
async fn ai_usage(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AiUsageRes>, (StatusCode, &'static str)> {
    require_api_key(&state, &headers)?;

    let all = match state.db.all_ai_usage().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("AI usage error: {:?}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
        }
    };
    let stats = usage::summarize(&all, Utc::now());

    let recent = match state.db.recent_ai_usage(USAGE_RECENT_LIMIT).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Recent AI usage error: {:?}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
        }
    };

    Ok(Json(AiUsageRes { stats, recent }))
}
