//! Feed and article-detail projections.
//!
//! These are pure functions of the content store, the comment list and the filter state. They
//! decide *what* a view shows; serialising it is left to the API layer.

use crate::category::FilterSelection;
use crate::constants::{
    ARTICLE_PATH, FEED_EMPTY_MESSAGE, FEED_HEADING_ALL, FEED_PATH, RELATED_ARTICLES_LIMIT,
};
use crate::content::{Article, Comment, ContentStore};
use crate::filter::FilterReconciler;
use crate::{QuillError, QuillResult};

/// Articles listed under `selection`, in fixture order.
///
/// Featured articles never appear here; they are surfaced separately by [`featured_article`].
pub fn filter_articles(items: &[Article], selection: FilterSelection) -> Vec<&Article> {
    items
        .iter()
        .filter(|a| !a.featured)
        .filter(|a| selection.category().map_or(true, |category| a.category == category))
        .collect()
}

/// The featured article, shown only when nothing is filtered.
pub fn featured_article(items: &[Article], selection: FilterSelection) -> Option<&Article> {
    if selection.is_all() {
        items.iter().find(|a| a.featured)
    } else {
        None
    }
}

/// One entry in the category filter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: &'static str,
    pub selected: bool,
    /// Where choosing this option leads.
    pub href: String,
}

/// Everything the feed view shows.
#[derive(Debug, Clone)]
pub struct FeedView<'a> {
    pub selection: FilterSelection,
    pub heading: String,
    pub featured: Option<&'a Article>,
    pub articles: Vec<&'a Article>,
    /// Set when `articles` is empty.
    pub empty_message: Option<&'static str>,
    pub options: Vec<FilterOption>,
    /// Canonical location of this view.
    pub location: String,
}

impl<'a> FeedView<'a> {
    pub fn build(store: &'a ContentStore, reconciler: &FilterReconciler) -> Self {
        let selection = reconciler.selection();
        let articles = filter_articles(store.articles(), selection);
        let heading = match selection {
            FilterSelection::All => FEED_HEADING_ALL.to_string(),
            FilterSelection::Only(category) => category.to_string(),
        };
        let options = FilterSelection::options()
            .map(|option| FilterOption {
                label: option.label(),
                selected: option == selection,
                href: reconciler.location_for(FEED_PATH, option),
            })
            .collect();

        Self {
            selection,
            heading,
            featured: featured_article(store.articles(), selection),
            empty_message: articles.is_empty().then_some(FEED_EMPTY_MESSAGE),
            articles,
            options,
            location: reconciler.location(FEED_PATH),
        }
    }
}

/// Share targets for an article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    /// The page itself, for copying.
    pub page_url: String,
    pub twitter: String,
    pub linkedin: String,
    pub facebook: String,
}

impl ShareLinks {
    pub fn for_article(site_url: &str, article: &Article) -> Self {
        let page_url = format!("{site_url}{}", article_path(&article.id));
        let url = urlencoding::encode(&page_url);
        let text = urlencoding::encode(&article.title);
        Self {
            twitter: format!("https://twitter.com/intent/tweet?text={text}&url={url}"),
            linkedin: format!("https://www.linkedin.com/sharing/share-offsite/?url={url}"),
            facebook: format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
            page_url,
        }
    }
}

pub fn article_path(id: &str) -> String {
    format!("{ARTICLE_PATH}/{}", urlencoding::encode(id))
}

/// Everything the article detail view shows.
#[derive(Debug, Clone)]
pub struct ArticleView<'a> {
    pub article: &'a Article,
    /// Newest first.
    pub comments: Vec<Comment>,
    pub related: Vec<&'a Article>,
    pub share: ShareLinks,
    pub back_href: &'static str,
}

impl<'a> ArticleView<'a> {
    /// # Errors
    /// `QuillError::ArticleNotFound` if `id` is not in the store.
    pub fn build(
        store: &'a ContentStore,
        comments: Vec<Comment>,
        id: &str,
        site_url: &str,
    ) -> QuillResult<Self> {
        let article = store
            .get(id)
            .ok_or_else(|| QuillError::ArticleNotFound(id.to_string()))?;
        Ok(Self {
            article,
            comments,
            related: store.related(article, RELATED_ARTICLES_LIMIT),
            share: ShareLinks::for_article(site_url, article),
            back_href: FEED_PATH,
        })
    }
}
