//! Sort token resolution for ORDER BY.
//!
//! Callers send a *sort token*: a logical key, optionally prefixed with `-`
//! for descending order (`"loanAmount"`, `"-loanAmount"`). A [`SortSpec`]
//! maps logical keys to physical column expressions and may carry a fallback
//! used when the token is blank or unknown.
//!
//! # Example
//! ```ignore
//! use pgsearch::{SortSpec, SortDir};
//!
//! let spec = SortSpec::new()
//!     .default_desc("l.created_at")
//!     .column("loanAmount", "l.loan_amount");
//!
//! assert_eq!(spec.resolve(Some("-loanAmount")).unwrap().to_sql(), "l.loan_amount DESC");
//! assert_eq!(spec.resolve(Some("bogus")).unwrap().to_sql(), "l.created_at DESC");
//! ```

use std::collections::HashMap;

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// A resolved ORDER BY term: column expression plus direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    column: String,
    dir: SortDir,
}

impl OrderTerm {
    /// Create a new order term.
    pub fn new(column: impl Into<String>, dir: SortDir) -> Self {
        Self {
            column: column.into(),
            dir,
        }
    }

    /// Ascending term.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDir::Asc)
    }

    /// Descending term.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDir::Desc)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn dir(&self) -> SortDir {
        self.dir
    }

    /// Render as `column ASC|DESC`.
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.dir.as_sql())
    }
}

/// An enumerated set of sort keys.
///
/// Implement this for an enum to build a [`SortSpec`] from typed keys instead
/// of string maps:
///
/// ```ignore
/// #[derive(Clone, Copy)]
/// enum LoanSort { Stage, LoanAmount }
///
/// impl SortKey for LoanSort {
///     const ALL: &'static [Self] = &[LoanSort::Stage, LoanSort::LoanAmount];
///     fn name(self) -> &'static str {
///         match self { LoanSort::Stage => "stage", LoanSort::LoanAmount => "loanAmount" }
///     }
///     fn column(self) -> &'static str {
///         match self { LoanSort::Stage => "l.current_stage", LoanSort::LoanAmount => "l.loan_amount" }
///     }
/// }
///
/// let spec = SortSpec::from_keys::<LoanSort>().default_desc("l.created_at");
/// ```
pub trait SortKey: Copy + 'static {
    /// Every key.
    const ALL: &'static [Self];

    /// The token callers use for this key.
    fn name(self) -> &'static str;

    /// The column expression this key sorts by.
    fn column(self) -> &'static str;
}

/// Mapping from logical sort keys to column expressions, with an optional fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    columns: HashMap<String, String>,
    default_asc: Option<String>,
    default_desc: Option<String>,
}

impl SortSpec {
    /// Create an empty spec (every token resolves to nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a typed key set.
    pub fn from_keys<K: SortKey>() -> Self {
        K::ALL
            .iter()
            .fold(Self::new(), |spec, key| spec.column(key.name(), key.column()))
    }

    /// Build from `(key, column)` pairs.
    ///
    /// The keys `"default"` and `"-default"` set the ascending and descending
    /// fallback respectively.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |spec, (key, column)| match key.as_ref() {
                "default" => spec.default_asc(column),
                "-default" => spec.default_desc(column),
                other => spec.column(other, column),
            })
    }

    /// Map a logical key to a column expression.
    pub fn column(mut self, key: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(key.into(), column.into());
        self
    }

    /// Fall back to `column ASC` for blank or unknown tokens.
    pub fn default_asc(mut self, column: impl Into<String>) -> Self {
        self.default_asc = Some(column.into());
        self
    }

    /// Fall back to `column DESC` for blank or unknown tokens.
    ///
    /// Used only when no ascending fallback is set.
    pub fn default_desc(mut self, column: impl Into<String>) -> Self {
        self.default_desc = Some(column.into());
        self
    }

    /// Column expression for a logical key.
    pub fn column_for(&self, key: &str) -> Option<&str> {
        self.columns.get(key).map(String::as_str)
    }

    /// The fallback term, if any.
    pub fn fallback(&self) -> Option<OrderTerm> {
        if let Some(column) = &self.default_asc {
            return Some(OrderTerm::asc(column.clone()));
        }
        self.default_desc.as_ref().map(|c| OrderTerm::desc(c.clone()))
    }

    /// Resolve one sort token.
    ///
    /// A leading `-` selects DESC. A blank or unknown key resolves to the
    /// fallback; with no fallback the token resolves to `None`.
    pub fn resolve(&self, token: Option<&str>) -> Option<OrderTerm> {
        let token = token.unwrap_or("");
        let (dir, key) = match token.strip_prefix('-') {
            Some(rest) => (SortDir::Desc, rest),
            None => (SortDir::Asc, token),
        };

        if !key.trim().is_empty() {
            if let Some(column) = self.columns.get(key) {
                return Some(OrderTerm::new(column.clone(), dir));
            }
        }
        self.fallback()
    }

    /// Resolve a mandatory token followed by an optional caller token.
    ///
    /// Returns at most two terms. If `always` resolves to nothing, the result
    /// is empty regardless of `requested`. A secondary term equal to the
    /// primary (same column and direction) is dropped.
    pub fn resolve_pair(&self, always: &str, requested: Option<&str>) -> Vec<OrderTerm> {
        let Some(primary) = self.resolve(Some(always)) else {
            return Vec::new();
        };
        let secondary = self.resolve(requested).filter(|term| *term != primary);

        let mut terms = vec![primary];
        terms.extend(secondary);
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan_spec() -> SortSpec {
        SortSpec::from_pairs([
            ("-default", "l.created_at"),
            ("stage", "l.current_stage"),
            ("loanAmount", "l.loan_amount"),
            ("status", "l.status"),
        ])
    }

    #[test]
    fn minus_prefix_selects_desc() {
        let spec = loan_spec();
        assert_eq!(spec.resolve(Some("stage")), Some(OrderTerm::asc("l.current_stage")));
        assert_eq!(spec.resolve(Some("-loanAmount")), Some(OrderTerm::desc("l.loan_amount")));
    }

    #[test]
    fn blank_or_unknown_token_uses_fallback() {
        let spec = loan_spec();
        let fallback = Some(OrderTerm::desc("l.created_at"));
        assert_eq!(spec.resolve(None), fallback);
        assert_eq!(spec.resolve(Some("")), fallback);
        assert_eq!(spec.resolve(Some("-")), fallback);
        assert_eq!(spec.resolve(Some("  ")), fallback);
        assert_eq!(spec.resolve(Some("nope")), fallback);
    }

    #[test]
    fn ascending_fallback_wins_over_descending() {
        let spec = SortSpec::new().default_desc("a").default_asc("b");
        assert_eq!(spec.resolve(None), Some(OrderTerm::asc("b")));
    }

    #[test]
    fn no_fallback_resolves_to_none() {
        let spec = SortSpec::new().column("stage", "l.current_stage");
        assert_eq!(spec.resolve(Some("unknown")), None);
        assert_eq!(spec.resolve(None), None);
    }

    #[test]
    fn pair_drops_duplicate_secondary() {
        let spec = loan_spec();
        let terms = spec.resolve_pair("-default", None);
        assert_eq!(terms, vec![OrderTerm::desc("l.created_at")]);
    }

    #[test]
    fn pair_keeps_distinct_secondary() {
        let spec = loan_spec();
        let terms = spec.resolve_pair("stage", Some("-loanAmount"));
        assert_eq!(
            terms,
            vec![OrderTerm::asc("l.current_stage"), OrderTerm::desc("l.loan_amount")]
        );

        // Same column, different direction is not a duplicate.
        let terms = spec.resolve_pair("stage", Some("-stage"));
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn pair_without_primary_is_empty() {
        let spec = SortSpec::new().column("stage", "l.current_stage");
        assert!(spec.resolve_pair("unknown", Some("stage")).is_empty());
    }

    #[derive(Clone, Copy)]
    enum TaskSort {
        Name,
        DueDate,
    }

    impl SortKey for TaskSort {
        const ALL: &'static [Self] = &[TaskSort::Name, TaskSort::DueDate];

        fn name(self) -> &'static str {
            match self {
                TaskSort::Name => "name",
                TaskSort::DueDate => "dueDate",
            }
        }

        fn column(self) -> &'static str {
            match self {
                TaskSort::Name => "t.name",
                TaskSort::DueDate => "t.due_date",
            }
        }
    }

    #[test]
    fn typed_keys_build_spec() {
        let spec = SortSpec::from_keys::<TaskSort>().default_asc("t.created_at");
        assert_eq!(spec.column_for("dueDate"), Some("t.due_date"));
        assert_eq!(spec.resolve(Some("-name")), Some(OrderTerm::desc("t.name")));
        assert_eq!(spec.resolve(None), Some(OrderTerm::asc("t.created_at")));
    }
}
