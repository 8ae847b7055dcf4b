//! # API REST
//!
//! REST API implementation for Quill.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, bearer tokens)
//!
//! Uses `api-shared` for request/response bodies and `quill-core` for everything else.

#![warn(rust_2018_idioms)]

use api_shared::auth::bearer_token;
use api_shared::{
    ArticleDetailRes, ArticleSummaryRes, AuthRes, AuthorRes, CategoriesRes, CommentRes, ErrorRes,
    FeedRes, FieldErrorsRes, FilterOptionRes, HealthRes, HealthService, ListCommentsRes,
    PostCommentReq, PostCommentRes, SelectCategoryReq, SelectCategoryRes, SessionRes,
    ShareLinksRes, SignInReq, SignUpReq, SubscribeReq, SubscribeRes,
};
use axum::{
    extract::{Path, RawQuery, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use quill_core::constants::{COMMENT_POSTED, NEWSLETTER_THANKS};
use quill_core::{
    config::{resolve_content_file, submit_delay_from_env_value},
    constants::{DEFAULT_REST_ADDR, DEFAULT_SITE_URL},
    BlogService, CoreConfig, FilterSelection, QuillError, SessionContext,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Error half of every fallible handler.
pub type ApiError = (StatusCode, Json<ErrorRes>);

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
}

impl AppState {
    pub fn new(blog: BlogService) -> Self {
        Self { blog }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_categories,
        feed,
        select_category,
        get_article,
        list_comments,
        post_comment,
        sign_in,
        sign_up,
        sign_out,
        current_session,
        subscribe,
    ),
    components(schemas(
        HealthRes,
        CategoriesRes,
        AuthorRes,
        ArticleSummaryRes,
        FilterOptionRes,
        FeedRes,
        SelectCategoryReq,
        SelectCategoryRes,
        CommentRes,
        ListCommentsRes,
        PostCommentReq,
        PostCommentRes,
        ShareLinksRes,
        ArticleDetailRes,
        SignInReq,
        SignUpReq,
        SessionRes,
        AuthRes,
        SubscribeReq,
        SubscribeRes,
        FieldErrorsRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Resolve runtime configuration from the environment.
///
/// # Environment Variables
/// - `QUILL_SUBMIT_DELAY_MS`: simulated submission delay (default: 500)
/// - `QUILL_SITE_URL`: public base URL for share links (default: "http://localhost:3000")
/// - `QUILL_CONTENT_FILE`: optional YAML content file replacing the built-in articles
///
/// # Errors
/// Returns an error if any variable is set to an invalid value.
pub fn config_from_env() -> anyhow::Result<CoreConfig> {
    let submit_delay = submit_delay_from_env_value(std::env::var("QUILL_SUBMIT_DELAY_MS").ok())?;
    let site_url = std::env::var("QUILL_SITE_URL").unwrap_or_else(|_| DEFAULT_SITE_URL.into());
    let content_file =
        resolve_content_file(std::env::var("QUILL_CONTENT_FILE").ok().map(PathBuf::from))?;

    Ok(CoreConfig::new(submit_delay, site_url, content_file)?)
}

/// Bind address from `QUILL_REST_ADDR` (default: "0.0.0.0:3000").
pub fn rest_addr_from_env() -> String {
    std::env::var("QUILL_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into())
}

/// Build the service state for `cfg`.
///
/// # Errors
/// Returns an error if the configured content cannot be loaded.
pub fn build_state(cfg: CoreConfig) -> anyhow::Result<AppState> {
    let blog = BlogService::new(Arc::new(cfg))?;
    Ok(AppState::new(blog))
}

/// The full REST router, including Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(list_categories))
        .route("/feed", get(feed))
        .route("/feed/selection", post(select_category))
        .route("/articles/:id", get(get_article))
        .route("/articles/:id/comments", get(list_comments).post(post_comment))
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/session", get(current_session))
        .route("/newsletter", post(subscribe))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Map a core error to a status code and JSON body, logging it on the way.
fn api_error(err: QuillError) -> ApiError {
    let status = match &err {
        QuillError::InvalidForm(_)
        | QuillError::EmptyComment
        | QuillError::CommentTooLong { .. }
        | QuillError::InvalidEmail => StatusCode::BAD_REQUEST,
        QuillError::Unauthenticated | QuillError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        QuillError::ArticleNotFound(_) => StatusCode::NOT_FOUND,
        QuillError::AlreadyRegistered => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {:?}", err);
    } else {
        tracing::debug!("Request rejected: {}", err);
    }

    (status, Json(ErrorRes::from(&err)))
}

async fn session_from_headers(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<SessionContext, ApiError> {
    let token = bearer_token(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()));
    state.blog.session(token.as_ref()).await.map_err(api_error)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Selectable feed categories", body = CategoriesRes)
    )
)]
#[axum::debug_handler]
async fn list_categories(State(_state): State<AppState>) -> Json<CategoriesRes> {
    Json(CategoriesRes {
        categories: FilterSelection::options()
            .map(|option| option.label().to_string())
            .collect(),
    })
}

#[utoipa::path(
    get,
    path = "/feed",
    params(
        ("category" = Option<String>, Query, description = "Category filter; absent or unknown shows all")
    ),
    responses(
        (status = 200, description = "Feed view", body = FeedRes)
    )
)]
/// Feed view
///
/// The `category` query parameter is the deep link: `/feed?category=Design` shows the same
/// state as selecting "Design" in the filter control.
#[axum::debug_handler]
async fn feed(State(state): State<AppState>, RawQuery(query): RawQuery) -> Json<FeedRes> {
    let view = state.blog.feed(query.as_deref().unwrap_or_default());
    Json(FeedRes::from(&view))
}

#[utoipa::path(
    post,
    path = "/feed/selection",
    request_body = SelectCategoryReq,
    responses(
        (status = 200, description = "New selection and canonical location", body = SelectCategoryRes)
    )
)]
/// Apply a category selection to the query the reader was looking at
///
/// Selecting `All` removes the parameter entirely; unknown categories behave like `All`.
#[axum::debug_handler]
async fn select_category(
    State(state): State<AppState>,
    Json(req): Json<SelectCategoryReq>,
) -> Json<SelectCategoryRes> {
    let change = state
        .blog
        .select_category(&req.current_query, &req.category);
    Json(SelectCategoryRes {
        selected_category: change.selected.to_string(),
        query: change.query,
        location: change.location,
    })
}

#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = String, Path, description = "Article identifier")),
    responses(
        (status = 200, description = "Article detail view", body = ArticleDetailRes),
        (status = 404, description = "Article not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleDetailRes>, ApiError> {
    let view = state.blog.article(&id).map_err(api_error)?;
    Ok(Json(ArticleDetailRes::from(&view)))
}

#[utoipa::path(
    get,
    path = "/articles/{id}/comments",
    params(("id" = String, Path, description = "Article identifier")),
    responses(
        (status = 200, description = "Comments, newest first", body = ListCommentsRes),
        (status = 404, description = "Article not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListCommentsRes>, ApiError> {
    let comments = state.blog.comments(&id).map_err(api_error)?;
    Ok(Json(ListCommentsRes::from(comments.as_slice())))
}

#[utoipa::path(
    post,
    path = "/articles/{id}/comments",
    params(("id" = String, Path, description = "Article identifier")),
    request_body = PostCommentReq,
    responses(
        (status = 201, description = "Comment posted", body = PostCommentRes),
        (status = 400, description = "Empty or overlong comment", body = ErrorRes),
        (status = 401, description = "Not signed in; redirect to /auth", body = ErrorRes),
        (status = 404, description = "Article not found", body = ErrorRes)
    )
)]
/// Post a comment as the signed-in reader
///
/// Requires `Authorization: Bearer <token>`. The comment appears at the top of the list.
#[axum::debug_handler]
async fn post_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<PostCommentReq>,
) -> Result<(StatusCode, Json<PostCommentRes>), ApiError> {
    let session = session_from_headers(&state, &headers).await?;
    let comment = state
        .blog
        .post_comment(&session, &id, &req.content)
        .await
        .map_err(api_error)?;

    Ok((
        StatusCode::CREATED,
        Json(PostCommentRes {
            message: COMMENT_POSTED.to_string(),
            comment: CommentRes::from(&comment),
        }),
    ))
}

fn auth_response(session: &SessionContext, message: &str) -> Result<Json<AuthRes>, ApiError> {
    AuthRes::from_session(session, message)
        .map(Json)
        .ok_or_else(|| {
            api_error(QuillError::InvalidInput(
                "auth provider returned a session without a token".into(),
            ))
        })
}

#[utoipa::path(
    post,
    path = "/auth/sign-in",
    request_body = SignInReq,
    responses(
        (status = 200, description = "Signed in", body = AuthRes),
        (status = 400, description = "Invalid form input", body = ErrorRes),
        (status = 401, description = "Invalid email or password", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInReq>,
) -> Result<Json<AuthRes>, ApiError> {
    let session = state
        .blog
        .sign_in(&req.email, &req.password)
        .await
        .map_err(api_error)?;
    auth_response(&session, "Welcome back!")
}

#[utoipa::path(
    post,
    path = "/auth/sign-up",
    request_body = SignUpReq,
    responses(
        (status = 201, description = "Account created and signed in", body = AuthRes),
        (status = 400, description = "Invalid form input", body = ErrorRes),
        (status = 409, description = "Email already registered", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpReq>,
) -> Result<(StatusCode, Json<AuthRes>), ApiError> {
    let session = state
        .blog
        .sign_up(&req.email, &req.password, &req.display_name)
        .await
        .map_err(api_error)?;
    let res = auth_response(&session, "Account created successfully!")?;
    Ok((StatusCode::CREATED, res))
}

#[utoipa::path(
    post,
    path = "/auth/sign-out",
    responses(
        (status = 204, description = "Session cleared")
    )
)]
/// Clear the caller's session
///
/// Always succeeds; a missing or unknown token is a no-op.
#[axum::debug_handler]
async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    if let Some(token) = bearer_token(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())) {
        state.blog.sign_out(&token).await.map_err(api_error)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session projection", body = SessionRes)
    )
)]
#[axum::debug_handler]
async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SessionRes>, ApiError> {
    let session = session_from_headers(&state, &headers).await?;
    Ok(Json(SessionRes::from(session.identity())))
}

#[utoipa::path(
    post,
    path = "/newsletter",
    request_body = SubscribeReq,
    responses(
        (status = 200, description = "Subscribed", body = SubscribeRes),
        (status = 400, description = "Invalid email address", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscribeReq>,
) -> Result<Json<SubscribeRes>, ApiError> {
    let subscribed = state.blog.subscribe(&req.email).await.map_err(api_error)?;
    Ok(Json(SubscribeRes {
        message: NEWSLETTER_THANKS.to_string(),
        already_subscribed: subscribed.already_subscribed,
    }))
}
