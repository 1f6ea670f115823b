//! OpenAPI documentation and schema generation

use utoipa::OpenApi;

/// OpenAPI documentation for the quick-blog REST API
///
/// Served as JSON at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "quick-blog REST API",
        version = "0.1.0",
        description = "Paginated article listing, search and article detail pages backed by a persisted article store",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:6790", description = "Local development server")
    ),
    paths(
        // Articles
        crate::api::routes::list_articles,
        crate::api::routes::get_article,
        crate::api::routes::refresh_articles,
        crate::api::routes::reset_store,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
        crate::api::routes::shutdown,
    ),
    components(schemas(
        crate::types::Article,
        crate::types::ArticleCard,
        crate::types::ArticleDetail,
        crate::types::ArticleListing,
        crate::types::LoadSource,
        crate::types::Event,

        crate::api::routes::RefreshResponse,

        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "articles", description = "Article list, search, detail pages and store maintenance"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events, shutdown"),
    )
)]
pub struct ApiDoc;
