//! The blog service: one handle over content, comments, newsletter and auth.
//!
//! API layers hold a cloned `BlogService` and call into it; they never touch the individual
//! stores directly.

use crate::auth::{AuthProvider, InMemoryAuthProvider, SignInForm, SignUpForm};
use crate::comments::CommentService;
use crate::config::CoreConfig;
use crate::content::{Comment, ContentStore};
use crate::feed::{ArticleView, FeedView};
use crate::filter::FilterReconciler;
use crate::newsletter::{NewsletterService, Subscribed};
use crate::session::{SessionContext, SessionToken};
use crate::QuillResult;
use std::sync::Arc;

/// Outcome of a reader picking a category in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub selected: &'static str,
    /// Query string without the leading `?`; `None` when empty.
    pub query: Option<String>,
    pub location: String,
}

#[derive(Clone)]
pub struct BlogService {
    cfg: Arc<CoreConfig>,
    store: Arc<ContentStore>,
    comments: Arc<CommentService>,
    newsletter: Arc<NewsletterService>,
    auth: Arc<dyn AuthProvider>,
}

impl BlogService {
    /// Load content per `cfg` and start with an empty in-memory account list.
    pub fn new(cfg: Arc<CoreConfig>) -> QuillResult<Self> {
        let store = ContentStore::load(cfg.content_file())?;
        Ok(Self::with_parts(
            cfg,
            store,
            Arc::new(InMemoryAuthProvider::new()),
        ))
    }

    pub fn with_parts(
        cfg: Arc<CoreConfig>,
        store: ContentStore,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let comments = CommentService::from_store(&store, cfg.submit_delay());
        let newsletter = NewsletterService::new(cfg.submit_delay());
        Self {
            cfg,
            store: Arc::new(store),
            comments: Arc::new(comments),
            newsletter: Arc::new(newsletter),
            auth,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Feed view for a raw query string such as `category=Design`.
    pub fn feed(&self, raw_query: &str) -> FeedView<'_> {
        let reconciler = FilterReconciler::from_query(raw_query);
        FeedView::build(&self.store, &reconciler)
    }

    /// Apply a reader's category choice to the query they were looking at.
    pub fn select_category(&self, current_query: &str, category: &str) -> SelectionChange {
        let mut reconciler = FilterReconciler::from_query(current_query);
        let selection = reconciler.select(category);
        let query = reconciler.params().to_query_string();
        SelectionChange {
            selected: selection.label(),
            query: (!query.is_empty()).then_some(query),
            location: reconciler.location(crate::constants::FEED_PATH),
        }
    }

    pub fn article(&self, id: &str) -> QuillResult<ArticleView<'_>> {
        let comments = self.comments.for_article(id)?;
        ArticleView::build(&self.store, comments, id, self.cfg.site_url())
    }

    pub fn comments(&self, article_id: &str) -> QuillResult<Vec<Comment>> {
        if self.store.get(article_id).is_none() {
            return Err(crate::QuillError::ArticleNotFound(article_id.to_string()));
        }
        self.comments.for_article(article_id)
    }

    pub async fn post_comment(
        &self,
        session: &SessionContext,
        article_id: &str,
        text: &str,
    ) -> QuillResult<Comment> {
        self.comments
            .submit(&self.store, session, article_id, text)
            .await
    }

    pub async fn subscribe(&self, email: &str) -> QuillResult<Subscribed> {
        self.newsletter.subscribe(email).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> QuillResult<SessionContext> {
        let form = SignInForm::parse(email, password)?;
        self.auth.sign_in(&form).await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> QuillResult<SessionContext> {
        let form = SignUpForm::parse(email, password, display_name)?;
        self.auth.sign_up(&form).await
    }

    pub async fn sign_out(&self, token: &SessionToken) -> QuillResult<()> {
        self.auth.sign_out(token).await
    }

    /// Resolve the session for an optional client token.
    pub async fn session(&self, token: Option<&SessionToken>) -> QuillResult<SessionContext> {
        match token {
            Some(token) => self.auth.session(token).await,
            None => Ok(SessionContext::anonymous()),
        }
    }
}
