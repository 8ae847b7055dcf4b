//! Read-only blog content: articles and the seed comments that ship with them.
//!
//! Content is loaded once at startup, either from the fixture embedded in the binary or from a
//! YAML file with the same shape, and is never modified afterwards. New comments are held by
//! [`crate::comments::CommentService`], not here.

use crate::category::Category;
use crate::{QuillError, QuillResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const EMBEDDED_FIXTURE: &str = include_str!("../fixtures/content.yaml");

/// The byline of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleAuthor {
    pub name: String,
    pub avatar: String,
}

/// One published article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    /// Short summary shown on cards.
    pub excerpt: String,
    /// HTML body.
    pub content: String,
    pub author: ArticleAuthor,
    pub category: Category,
    /// Cover image reference.
    pub image: String,
    /// Publish date.
    pub date: NaiveDate,
    pub read_time: String,
    #[serde(default)]
    pub featured: bool,
}

impl Article {
    /// Publish date formatted for readers, e.g. `Dec 15, 2025`.
    pub fn display_date(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }
}

/// A reader comment attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub article_id: String,
    /// Display name of the commenter.
    pub author: String,
    pub content: String,
    pub posted_at: DateTime<Utc>,
    pub avatar: String,
}

impl Comment {
    pub fn display_date(&self) -> String {
        self.posted_at.format("%b %-d, %Y").to_string()
    }
}

#[derive(Debug, Deserialize)]
struct ContentFixture {
    articles: Vec<Article>,
    #[serde(default)]
    comments: Vec<Comment>,
}

/// Immutable store of articles and seed comments.
#[derive(Debug, Clone)]
pub struct ContentStore {
    articles: Vec<Article>,
    seed_comments: Vec<Comment>,
}

impl ContentStore {
    /// Build a store from already-parsed content, validating it.
    ///
    /// # Errors
    /// Returns `QuillError::InvalidFixture` if article ids repeat or a comment points at an
    /// article that does not exist.
    pub fn new(articles: Vec<Article>, seed_comments: Vec<Comment>) -> QuillResult<Self> {
        let mut ids = HashSet::new();
        for article in &articles {
            if article.id.trim().is_empty() {
                return Err(QuillError::InvalidFixture("article with empty id".into()));
            }
            if !ids.insert(article.id.as_str()) {
                return Err(QuillError::InvalidFixture(format!(
                    "duplicate article id {:?}",
                    article.id
                )));
            }
        }

        for comment in &seed_comments {
            if !ids.contains(comment.article_id.as_str()) {
                return Err(QuillError::InvalidFixture(format!(
                    "comment {:?} references unknown article {:?}",
                    comment.id, comment.article_id
                )));
            }
        }

        Ok(Self {
            articles,
            seed_comments,
        })
    }

    /// The content compiled into the binary.
    pub fn embedded() -> QuillResult<Self> {
        Self::from_yaml_str(EMBEDDED_FIXTURE)
    }

    pub fn from_yaml_str(yaml: &str) -> QuillResult<Self> {
        let fixture: ContentFixture =
            serde_yaml::from_str(yaml).map_err(QuillError::YamlDeserialization)?;
        Self::new(fixture.articles, fixture.comments)
    }

    pub fn from_yaml_file(path: &Path) -> QuillResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(QuillError::FileRead)?;
        Self::from_yaml_str(&yaml)
    }

    /// Load from `override_file` if given, otherwise from the embedded fixture.
    pub fn load(override_file: Option<&Path>) -> QuillResult<Self> {
        let store = match override_file {
            Some(path) => {
                tracing::info!("loading content from {}", path.display());
                Self::from_yaml_file(path)?
            }
            None => Self::embedded()?,
        };
        tracing::info!(
            articles = store.articles.len(),
            comments = store.seed_comments.len(),
            "content loaded"
        );
        Ok(store)
    }

    /// All articles in fixture order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn seed_comments(&self) -> &[Comment] {
        &self.seed_comments
    }

    /// Other articles in the same category as `article`, in fixture order.
    pub fn related(&self, article: &Article, limit: usize) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|a| a.id != article.id && a.category == article.category)
            .take(limit)
            .collect()
    }
}
