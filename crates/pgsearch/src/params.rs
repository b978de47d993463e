//! Request parameter source for search filters.
//!
//! [`SearchParams`] is a multi-value map of request parameters (the shape of a
//! URL query string). A parameter that is missing, or whose first value is the
//! empty string, is treated as absent everywhere in this crate.

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::page::PageRequest;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// Multi-valued request parameters, looked up by name.
///
/// # Example
/// ```ignore
/// use pgsearch::SearchParams;
///
/// let params = SearchParams::from_query("stage=KYC&loanType=GOLD&page=2");
/// assert_eq!(params.opt("stage"), Some("KYC"));
/// assert!(params.req("userId").is_err());
/// let page: Option<i64> = params.opt_parse("page")?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    values: HashMap<String, Vec<String>>,
}

impl SearchParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs; repeated names accumulate values.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Parse a URL query string (`a=1&b=x%20y&a=2`), with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Append a value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Append a value for `name` (consuming version of [`insert`](Self::insert)).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Whether `name` has a non-empty value.
    pub fn contains(&self, name: &str) -> bool {
        self.opt(name).is_some()
    }

    /// First value of `name`, or `None` if it is missing or empty.
    pub fn opt(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)?
            .first()
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// First value of `name`, failing with [`SearchError::MissingParameter`] if absent.
    pub fn req(&self, name: &str) -> SearchResult<&str> {
        self.opt(name).ok_or_else(|| SearchError::missing(name))
    }

    /// Decode the value of `name` if present.
    ///
    /// A decode failure is reported as [`SearchError::InvalidParameter`].
    pub fn opt_as<T, E>(
        &self,
        name: &str,
        decode: impl FnOnce(&str) -> Result<T, E>,
    ) -> SearchResult<Option<T>>
    where
        E: Display,
    {
        self.opt(name)
            .map(|v| decode(v).map_err(|e| SearchError::invalid(name, e.to_string())))
            .transpose()
    }

    /// Decode the value of `name`, failing if it is absent.
    pub fn req_as<T, E>(&self, name: &str, decode: impl FnOnce(&str) -> Result<T, E>) -> SearchResult<T>
    where
        E: Display,
    {
        let value = self.req(name)?;
        decode(value).map_err(|e| SearchError::invalid(name, e.to_string()))
    }

    /// Parse the value of `name` with [`FromStr`] if present.
    pub fn opt_parse<T>(&self, name: &str) -> SearchResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.opt_as(name, str::parse::<T>)
    }

    /// All non-empty values of `name`, in the order they were supplied.
    pub fn opt_list(&self, name: &str) -> Vec<String> {
        self.values
            .get(name)
            .map(|values| values.iter().filter(|v| !v.is_empty()).cloned().collect())
            .unwrap_or_default()
    }

    /// The caller-requested sort token, read from `config.sort_param`.
    pub fn sort_token(&self, config: &SearchConfig) -> Option<&str> {
        self.opt(&config.sort_param)
    }

    /// The page request described by these parameters.
    pub fn page_request(&self, config: &SearchConfig) -> SearchResult<PageRequest> {
        PageRequest::from_params(self, config)
    }
}

impl<K, V> FromIterator<(K, V)> for SearchParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
