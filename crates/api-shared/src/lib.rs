//! # API Shared
//!
//! Shared utilities and definitions for Quill APIs.
//!
//! Contains:
//! - Request/response bodies with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//! - Session token extraction (usable by any HTTP surface)
//!
//! Used by `api-rest` and the main `quill-run` binary.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
