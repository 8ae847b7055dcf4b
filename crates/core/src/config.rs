//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_SITE_URL, DEFAULT_SUBMIT_DELAY_MS};
use crate::{QuillError, QuillResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    submit_delay: Duration,
    site_url: String,
    content_file: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `site_url` must be an absolute `http(s)` URL; a trailing slash is dropped so that paths can
    /// be appended directly.
    pub fn new(
        submit_delay: Duration,
        site_url: impl Into<String>,
        content_file: Option<PathBuf>,
    ) -> QuillResult<Self> {
        let site_url = site_url.into();
        let site_url = parse_site_url(site_url.trim())?;

        Ok(Self {
            submit_delay,
            site_url,
            content_file,
        })
    }

    pub fn submit_delay(&self) -> Duration {
        self.submit_delay
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn content_file(&self) -> Option<&Path> {
        self.content_file.as_deref()
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
            site_url: DEFAULT_SITE_URL.to_string(),
            content_file: None,
        }
    }
}

/// Validate a public base URL and render it without a trailing slash.
fn parse_site_url(raw: &str) -> QuillResult<String> {
    let invalid = |reason: &str| QuillError::InvalidInput(format!("site url {raw:?} {reason}"));

    let url = url::Url::parse(raw).map_err(|e| invalid(&format!("is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("must use http or https"));
    }
    // The parser skips extra slashes, so `https:///path` would otherwise yield host `path`.
    let authority = raw.split_once("://").map(|(_, rest)| rest);
    if !authority.is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/')) {
        return Err(invalid("has no host"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("has no host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment"));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Parse the simulated submission delay from an optional string value (milliseconds).
///
/// If `value` is `None` or empty/whitespace, returns the default delay.
pub fn submit_delay_from_env_value(value: Option<String>) -> QuillResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let millis = match value {
        Some(v) => v.parse::<u64>().map_err(|e| {
            QuillError::InvalidInput(format!("QUILL_SUBMIT_DELAY_MS must be a whole number: {e}"))
        })?,
        None => DEFAULT_SUBMIT_DELAY_MS,
    };

    Ok(Duration::from_millis(millis))
}

/// Resolve the optional content fixture override without reading environment variables.
///
/// `None` means the embedded fixture is used. An override must point at an existing file.
pub fn resolve_content_file(override_file: Option<PathBuf>) -> QuillResult<Option<PathBuf>> {
    match override_file {
        None => Ok(None),
        Some(path) if path.as_os_str().is_empty() => Ok(None),
        Some(path) if path.is_file() => Ok(Some(path)),
        Some(path) => Err(QuillError::InvalidInput(format!(
            "QUILL_CONTENT_FILE does not point at a file: {}",
            path.display()
        ))),
    }
}
