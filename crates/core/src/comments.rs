//! Comment composer: validates submissions and keeps the in-memory comment list.

use crate::constants::MAX_COMMENT_LEN;
use crate::content::{Comment, ContentStore};
use crate::session::SessionContext;
use crate::{QuillError, QuillResult};
use chrono::Utc;
use quill_types::NonEmptyText;
use std::sync::RwLock;
use std::time::Duration;

/// Ordered comment list, newest first.
#[derive(Debug)]
pub struct CommentService {
    comments: RwLock<Vec<Comment>>,
    submit_delay: Duration,
}

impl CommentService {
    /// Seed the list. `seed` is expected newest first, as stored in the fixture.
    pub fn new(seed: Vec<Comment>, submit_delay: Duration) -> Self {
        Self {
            comments: RwLock::new(seed),
            submit_delay,
        }
    }

    pub fn from_store(store: &ContentStore, submit_delay: Duration) -> Self {
        Self::new(store.seed_comments().to_vec(), submit_delay)
    }

    /// Comments on `article_id`, newest first.
    pub fn for_article(&self, article_id: &str) -> QuillResult<Vec<Comment>> {
        Ok(self
            .comments
            .read()
            .map_err(|_| QuillError::LockPoisoned)?
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect())
    }

    /// Total number of comments across all articles.
    #[cfg(test)]
    fn len(&self) -> QuillResult<usize> {
        Ok(self
            .comments
            .read()
            .map_err(|_| QuillError::LockPoisoned)?
            .len())
    }

    /// Post a comment on behalf of `session`.
    ///
    /// Nothing is created unless every check passes: the text must be non-blank and at most
    /// [`MAX_COMMENT_LEN`] characters, the session must be authenticated and the article must
    /// exist. After the simulated delay the comment goes to the head of the list. Its timestamp
    /// is never earlier than the newest existing comment.
    pub async fn submit(
        &self,
        store: &ContentStore,
        session: &SessionContext,
        article_id: &str,
        text: &str,
    ) -> QuillResult<Comment> {
        let text = NonEmptyText::new(text).map_err(|_| QuillError::EmptyComment)?;
        if text.char_len() > MAX_COMMENT_LEN {
            return Err(QuillError::CommentTooLong {
                max: MAX_COMMENT_LEN,
            });
        }
        if !session.is_authenticated() {
            tracing::warn!(article_id, "comment rejected: not signed in");
            return Err(QuillError::Unauthenticated);
        }
        if store.get(article_id).is_none() {
            return Err(QuillError::ArticleNotFound(article_id.to_string()));
        }

        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }

        let mut comments = self.comments.write().map_err(|_| QuillError::LockPoisoned)?;
        let newest = comments.iter().map(|c| c.posted_at).max();
        let now = Utc::now();
        let posted_at = newest.map_or(now, |newest| newest.max(now));

        let comment = Comment {
            id: format!("c{}", uuid::Uuid::new_v4().simple()),
            article_id: article_id.to_string(),
            author: session.author_name(),
            content: text.into_inner(),
            posted_at,
            avatar: session.author_avatar(),
        };
        comments.insert(0, comment.clone());

        tracing::info!(article_id, comment_id = %comment.id, "comment posted");
        Ok(comment)
    }
}
