//! # Quill Core
//!
//! Core domain logic for the Quill blog.
//!
//! This crate contains:
//! - The closed category set and the feed's filter selection
//! - Query-string / filter reconciliation for deep-linkable feeds
//! - The read-only content store and the feed / article projections
//! - The in-memory comment composer and newsletter list
//! - Session identity and the auth provider seam
//!
//! **No API concerns**: HTTP servers, wire DTOs and OpenAPI docs belong in `api-rest` and
//! `api-shared`.

pub mod auth;
pub mod category;
pub mod comments;
pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod feed;
pub mod filter;
pub mod newsletter;
pub mod service;
pub mod session;

pub use auth::{AuthProvider, FormErrors, InMemoryAuthProvider, SignInForm, SignUpForm};
pub use category::{Category, FilterSelection};
pub use config::CoreConfig;
pub use content::{Article, ArticleAuthor, Comment, ContentStore};
pub use error::{QuillError, QuillResult};
pub use feed::{ArticleView, FeedView, FilterOption, ShareLinks};
pub use filter::{FilterReconciler, QueryParams};
pub use quill_types::{DisplayName, EmailAddress, NonEmptyText, Password, TextError};
pub use service::{BlogService, SelectionChange};
pub use session::{Profile, SessionContext, SessionIdentity, SessionToken};
