//! Constants used throughout the Quill core crate.
//!
//! Route paths, query keys and user-facing defaults live here so the REST layer, the CLI and the
//! core projections agree on them.

use std::time::Duration;

/// Default bind address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default public base URL used when building share links.
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Default simulated delay before a comment or newsletter submission is acknowledged.
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 500;

/// Query parameter that carries the feed's category filter.
pub const CATEGORY_PARAM: &str = "category";

/// Label of the "show everything" filter sentinel.
pub const ALL_LABEL: &str = "All";

/// Path of the feed view.
pub const FEED_PATH: &str = "/feed";

/// Path prefix of the article detail view.
pub const ARTICLE_PATH: &str = "/articles";

/// Path of the authentication view.
pub const AUTH_PATH: &str = "/auth";

/// Maximum comment length, in characters.
pub const MAX_COMMENT_LEN: usize = 500;

/// Maximum number of related articles shown under an article.
pub const RELATED_ARTICLES_LIMIT: usize = 3;

/// How long a signed-in session stays valid after it is issued.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Author name used when the session has no display name.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Generated avatar service used when a reader has no avatar of their own.
pub const FALLBACK_AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

pub const FEED_HEADING_ALL: &str = "Latest Articles";
pub const FEED_EMPTY_MESSAGE: &str = "No articles found in this category.";
pub const NEWSLETTER_THANKS: &str = "Thank you for subscribing!";
pub const COMMENT_POSTED: &str = "Comment posted successfully!";
