//! Article handlers.

use super::{ListArticlesQuery, MAX_PAGE_SIZE, RefreshResponse};
use crate::api::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// GET /api/articles - Paginated article list with optional search
#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "articles",
    params(ListArticlesQuery),
    responses(
        (status = 200, description = "One page of articles", body = crate::types::ArticleListing),
        (status = 400, description = "Invalid page size", body = ApiError)
    )
)]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ListArticlesQuery>,
) -> Response {
    if let Some(size) = query.page_size.filter(|size| !(1..=MAX_PAGE_SIZE).contains(size)) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {size}"
            ))),
        )
            .into_response();
    }

    let listing = state.blog.list(
        query.q.as_deref(),
        query.page.unwrap_or(1),
        query.page_size,
    );

    (StatusCode::OK, Json(listing)).into_response()
}

/// GET /api/articles/:id - Article detail page
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    tag = "articles",
    params(
        ("id" = String, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Article with hero image and related articles", body = crate::types::ArticleDetail),
        (status = 404, description = "Article not found", body = ApiError),
        (status = 502, description = "Article source failed", body = ApiError),
        (status = 504, description = "Article source timed out", body = ApiError)
    )
)]
pub async fn get_article(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.blog.article_detail(&id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/articles/refresh - Re-fetch articles from the source
#[utoipa::path(
    post,
    path = "/api/articles/refresh",
    tag = "articles",
    responses(
        (status = 200, description = "Store replaced with the fetched articles", body = RefreshResponse),
        (status = 502, description = "Article source failed; store unchanged", body = ApiError),
        (status = 504, description = "Article source timed out; store unchanged", body = ApiError)
    )
)]
pub async fn refresh_articles(State(state): State<AppState>) -> Response {
    match state.blog.refresh_articles().await {
        Ok(source) => (
            StatusCode::OK,
            Json(RefreshResponse {
                count: state.blog.store().len(),
                source,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// DELETE /api/store - Clear the store and erase its snapshot
#[utoipa::path(
    delete,
    path = "/api/store",
    tag = "articles",
    responses(
        (status = 204, description = "Store cleared"),
        (status = 500, description = "Snapshot could not be erased", body = ApiError)
    )
)]
pub async fn reset_store(State(state): State<AppState>) -> Response {
    match state.blog.reset().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
