//! Request-level search configuration.

use serde::Deserialize;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Default upper bound for a requested page size.
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 1000;

/// Configuration for reading paging and sorting from request parameters.
///
/// Deserializable so it can live in a service's own config file:
///
/// ```toml
/// [search]
/// default_page_size = 50
/// max_page_size = 200
/// sort_param = "sort"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Page size used when the request does not specify one.
    pub default_page_size: i64,
    /// Requested sizes above this are clamped. `None` disables clamping.
    pub max_page_size: Option<i64>,
    /// Name of the zero-based page index parameter.
    pub page_param: String,
    /// Name of the page size parameter.
    pub size_param: String,
    /// Name of the sort token parameter.
    pub sort_param: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: Some(DEFAULT_MAX_PAGE_SIZE),
            page_param: "page".to_string(),
            size_param: "size".to_string(),
            sort_param: "sortBy".to_string(),
        }
    }
}

impl SearchConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default page size.
    pub fn default_page_size(mut self, size: i64) -> Self {
        self.default_page_size = size;
        self
    }

    /// Set the maximum page size.
    pub fn max_page_size(mut self, size: i64) -> Self {
        self.max_page_size = Some(size);
        self
    }

    /// Allow arbitrarily large pages.
    pub fn no_max_page_size(mut self) -> Self {
        self.max_page_size = None;
        self
    }

    /// Set the page index parameter name.
    pub fn page_param(mut self, name: impl Into<String>) -> Self {
        self.page_param = name.into();
        self
    }

    /// Set the page size parameter name.
    pub fn size_param(mut self, name: impl Into<String>) -> Self {
        self.size_param = name.into();
        self
    }

    /// Set the sort token parameter name.
    pub fn sort_param(mut self, name: impl Into<String>) -> Self {
        self.sort_param = name.into();
        self
    }

    /// Clamp a requested page size to `max_page_size`.
    pub(crate) fn clamp_page_size(&self, size: i64) -> i64 {
        match self.max_page_size {
            Some(max) if size > max => max,
            _ => size,
        }
    }
}
