//! Request and response bodies for the Quill APIs.
//!
//! Field names are the JSON names. Conversions from core views live next to each type so every
//! API surface renders a view the same way.

use quill_core::constants::{AUTH_PATH, FEED_PATH};
use quill_core::feed::article_path;
use quill_core::{
    Article, ArticleView, Comment, FeedView, FilterOption, FormErrors, QuillError,
    SessionContext, SessionIdentity, ShareLinks,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoriesRes {
    /// `All` first, then every category.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorRes {
    pub name: String,
    pub avatar: String,
}

/// Article card as shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleSummaryRes {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub author: AuthorRes,
    pub category: String,
    pub image: String,
    pub date: String,
    pub read_time: String,
    pub featured: bool,
    pub href: String,
}

impl From<&Article> for ArticleSummaryRes {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            excerpt: article.excerpt.clone(),
            author: AuthorRes {
                name: article.author.name.clone(),
                avatar: article.author.avatar.clone(),
            },
            category: article.category.to_string(),
            image: article.image.clone(),
            date: article.display_date(),
            read_time: article.read_time.clone(),
            featured: article.featured,
            href: article_path(&article.id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FilterOptionRes {
    pub label: String,
    pub selected: bool,
    pub href: String,
}

impl From<&FilterOption> for FilterOptionRes {
    fn from(option: &FilterOption) -> Self {
        Self {
            label: option.label.to_string(),
            selected: option.selected,
            href: option.href.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedRes {
    pub selected_category: String,
    pub heading: String,
    pub featured: Option<ArticleSummaryRes>,
    pub articles: Vec<ArticleSummaryRes>,
    pub empty_message: Option<String>,
    pub filters: Vec<FilterOptionRes>,
    pub location: String,
}

impl From<&FeedView<'_>> for FeedRes {
    fn from(view: &FeedView<'_>) -> Self {
        Self {
            selected_category: view.selection.to_string(),
            heading: view.heading.clone(),
            featured: view.featured.map(ArticleSummaryRes::from),
            articles: view.articles.iter().map(|a| ArticleSummaryRes::from(*a)).collect(),
            empty_message: view.empty_message.map(str::to_string),
            filters: view.options.iter().map(FilterOptionRes::from).collect(),
            location: view.location.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectCategoryReq {
    /// Query string the reader was looking at, e.g. `category=Design`.
    #[serde(default)]
    pub current_query: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectCategoryRes {
    pub selected_category: String,
    /// `None` when the feed is unfiltered.
    pub query: Option<String>,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentRes {
    pub id: String,
    pub article_id: String,
    pub author: String,
    pub content: String,
    pub date: String,
    /// RFC 3339 timestamp.
    pub posted_at: String,
    pub avatar: String,
}

impl From<&Comment> for CommentRes {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            article_id: comment.article_id.clone(),
            author: comment.author.clone(),
            content: comment.content.clone(),
            date: comment.display_date(),
            posted_at: comment.posted_at.to_rfc3339(),
            avatar: comment.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListCommentsRes {
    pub count: usize,
    pub comments: Vec<CommentRes>,
}

impl From<&[Comment]> for ListCommentsRes {
    fn from(comments: &[Comment]) -> Self {
        Self {
            count: comments.len(),
            comments: comments.iter().map(CommentRes::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostCommentReq {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostCommentRes {
    pub message: String,
    pub comment: CommentRes,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShareLinksRes {
    pub page_url: String,
    pub twitter: String,
    pub linkedin: String,
    pub facebook: String,
}

impl From<&ShareLinks> for ShareLinksRes {
    fn from(share: &ShareLinks) -> Self {
        Self {
            page_url: share.page_url.clone(),
            twitter: share.twitter.clone(),
            linkedin: share.linkedin.clone(),
            facebook: share.facebook.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleDetailRes {
    pub article: ArticleSummaryRes,
    /// HTML body.
    pub content: String,
    pub comments: ListCommentsRes,
    pub related: Vec<ArticleSummaryRes>,
    pub share: ShareLinksRes,
    pub back_href: String,
}

impl From<&ArticleView<'_>> for ArticleDetailRes {
    fn from(view: &ArticleView<'_>) -> Self {
        Self {
            article: ArticleSummaryRes::from(view.article),
            content: view.article.content.clone(),
            comments: ListCommentsRes::from(view.comments.as_slice()),
            related: view.related.iter().map(|a| ArticleSummaryRes::from(*a)).collect(),
            share: ShareLinksRes::from(&view.share),
            back_href: view.back_href.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignInReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignUpReq {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionRes {
    pub authenticated: bool,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
}

impl From<SessionIdentity> for SessionRes {
    fn from(identity: SessionIdentity) -> Self {
        Self {
            authenticated: identity.authenticated,
            display_name: identity.display_name,
            avatar: identity.avatar,
            email: identity.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthRes {
    pub message: String,
    /// Bearer token for subsequent requests.
    pub token: String,
    pub session: SessionRes,
    pub redirect: String,
}

impl AuthRes {
    /// `None` if the session carries no token.
    pub fn from_session(session: &SessionContext, message: &str) -> Option<Self> {
        Some(Self {
            message: message.to_string(),
            token: session.token()?.as_str().to_string(),
            session: SessionRes::from(session.identity()),
            redirect: FEED_PATH.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscribeReq {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscribeRes {
    pub message: String,
    pub already_subscribed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorsRes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<&FormErrors> for FieldErrorsRes {
    fn from(errors: &FormErrors) -> Self {
        Self {
            email: errors.email.clone(),
            password: errors.password.clone(),
            display_name: errors.display_name.clone(),
        }
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    /// Where the client should go next, if anywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrorsRes>,
}

impl ErrorRes {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            redirect: None,
            fields: None,
        }
    }
}

impl From<&QuillError> for ErrorRes {
    fn from(err: &QuillError) -> Self {
        match err {
            QuillError::Unauthenticated => Self {
                message: err.to_string(),
                redirect: Some(AUTH_PATH.to_string()),
                fields: None,
            },
            QuillError::ArticleNotFound(_) => Self {
                message: "Article Not Found".to_string(),
                redirect: Some(FEED_PATH.to_string()),
                fields: None,
            },
            QuillError::InvalidForm(errors) => Self {
                message: err.to_string(),
                redirect: None,
                fields: Some(FieldErrorsRes::from(errors)),
            },
            _ if is_internal(err) => Self::message("Internal error"),
            _ => Self::message(err.to_string()),
        }
    }
}

/// Errors whose details must not reach clients.
pub fn is_internal(err: &QuillError) -> bool {
    matches!(
        err,
        QuillError::InvalidInput(_)
            | QuillError::FileRead(_)
            | QuillError::YamlDeserialization(_)
            | QuillError::InvalidFixture(_)
            | QuillError::PasswordHash(_)
            | QuillError::LockPoisoned
    )
}
