//! Category filter / query-string reconciliation.
//!
//! The feed keeps one working [`FilterSelection`] and mirrors it into the `category` query
//! parameter so that a filtered feed can be linked to and shared. The query parameters are the
//! source of truth; the selection is derived from them.
//!
//! There are two triggers:
//! - [`FilterReconciler::on_params_changed`]: navigation replaced the query (a link was followed).
//!   The selection is re-derived with [`selection_from_params`].
//! - [`FilterReconciler::select`]: the reader picked a category. The selection changes and the
//!   query is rewritten with [`apply_selection`] in the same call.
//!
//! Canonical form: "no filter" is the *absence* of `category`, never `category=All`.

use crate::category::FilterSelection;
use crate::constants::CATEGORY_PARAM;
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Param {
    key: String,
    value: String,
    /// The pair exactly as received; `None` once the value has been rewritten.
    raw: Option<String>,
}

/// Ordered query-string parameters.
///
/// Keeps insertion order and any parameters the feed does not understand, byte for byte, so
/// rewriting the category leaves the rest of a shared link intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<Param>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string. A leading `?` is ignored.
    ///
    /// Keys and values are decoded as `application/x-www-form-urlencoded`; invalid UTF-8 decodes
    /// lossily for lookups but the original text is what gets written back.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let params = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| {
                let (key, value) = form_urlencoded::parse(pair.as_bytes()).next()?;
                Some(Param {
                    key: key.into_owned(),
                    value: value.into_owned(),
                    raw: Some(pair.to_string()),
                })
            })
            .collect();
        Self(params)
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Set `key` to `value`, replacing the first occurrence in place and dropping any repeats.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut seen = false;
        self.0.retain_mut(|p| {
            if p.key != key {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            if p.value != value {
                p.value = value.to_string();
                p.raw = None;
            }
            true
        });
        if !seen {
            self.0.push(Param {
                key: key.to_string(),
                value: value.to_string(),
                raw: None,
            });
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|p| p.key != key);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|p| match &p.raw {
                Some(raw) => raw.clone(),
                None => form_urlencoded::Serializer::new(String::new())
                    .append_pair(&p.key, &p.value)
                    .finish(),
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Derive the selection from the persisted parameters.
pub fn selection_from_params(params: &QueryParams) -> FilterSelection {
    FilterSelection::parse_or_all(params.get(CATEGORY_PARAM))
}

/// Write `selection` into `params` in canonical form.
pub fn apply_selection(params: &mut QueryParams, selection: FilterSelection) {
    match selection {
        FilterSelection::All => params.remove(CATEGORY_PARAM),
        FilterSelection::Only(category) => params.set(CATEGORY_PARAM, category.as_str()),
    }
}

/// Keeps the feed's working selection and its query parameters in step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReconciler {
    params: QueryParams,
    selection: FilterSelection,
}

impl FilterReconciler {
    /// Enter the feed with the given parameters.
    ///
    /// An absent or unrecognised `category` yields [`FilterSelection::All`]. The parameters are
    /// kept as given; a stale `category=Cooking` stays in the URL until the reader selects
    /// something.
    pub fn activate(params: QueryParams) -> Self {
        let selection = selection_from_params(&params);
        Self { params, selection }
    }

    /// Shorthand for `activate(QueryParams::parse(raw))`.
    pub fn from_query(raw: &str) -> Self {
        Self::activate(QueryParams::parse(raw))
    }

    /// Navigation replaced the query while the feed stayed mounted.
    pub fn on_params_changed(&mut self, params: QueryParams) {
        self.selection = selection_from_params(&params);
        self.params = params;
    }

    /// The reader picked `value`. Unrecognised values select everything.
    ///
    /// Returns the new selection.
    pub fn select(&mut self, value: &str) -> FilterSelection {
        let selection = FilterSelection::parse_or_all(Some(value));
        self.select_filter(selection);
        selection
    }

    pub fn select_filter(&mut self, selection: FilterSelection) {
        self.selection = selection;
        apply_selection(&mut self.params, selection);
        tracing::debug!(
            selection = %selection,
            query = %self.params.to_query_string(),
            "feed filter selected"
        );
    }

    pub fn selection(&self) -> FilterSelection {
        self.selection
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// `path` with the current query appended, e.g. `/feed?category=Design`.
    pub fn location(&self, path: &str) -> String {
        if self.params.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.params.to_query_string())
        }
    }

    /// The location the feed would move to if the reader picked `selection`.
    pub fn location_for(&self, path: &str, selection: FilterSelection) -> String {
        let mut next = self.clone();
        next.select_filter(selection);
        next.location(path)
    }

    /// Whether the selection is what the parameters say it should be.
    pub fn is_consistent(&self) -> bool {
        selection_from_params(&self.params) == self.selection
    }
}
