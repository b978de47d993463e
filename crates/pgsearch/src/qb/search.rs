//! Search query builder: conditional clause composition for filterable,
//! sortable, paginated queries.

use crate::error::{SearchError, SearchResult};
use crate::params::SearchParams;
use crate::qb::expr::{push_where, Placeholders, Predicate, Slot};
use crate::qb::param::{Param, ParamMap};
use crate::qb::sort::{OrderTerm, SortSpec};
use crate::qb::value::{Binding, FilterValue, LikePattern, OptionalText};
use chrono::NaiveDate;
use std::fmt::Display;

/// Date format accepted by [`SearchQb::where_between`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accumulated clause state.
#[derive(Debug, Clone, Default)]
struct SearchState {
    select_cols: Vec<String>,
    from: Option<String>,
    joins: Vec<String>,
    predicates: Vec<Predicate>,
    group_by: Option<String>,
    order_terms: Vec<OrderTerm>,
    count_expr: Option<String>,
    params: ParamMap,
}

impl SearchState {
    fn bind(&mut self, key: impl Into<String>, param: Param) -> Slot {
        let key = key.into();
        let index = self.params.insert(key.clone(), param);
        Slot::new(key, index)
    }

    fn push_binding(&mut self, column: &str, key: &str, binding: Binding) {
        match binding {
            Binding::Absent => {
                sql_event!(trace, key = key, "filter skipped: no value");
            }
            Binding::One(param) => {
                let slot = self.bind(key, param);
                self.push_compare(column, "=", slot);
            }
            Binding::Many(params) => {
                let slots = params
                    .into_iter()
                    .enumerate()
                    .map(|(i, param)| self.bind(format!("{key}{i}"), param))
                    .collect();
                self.predicates.push(Predicate::InList {
                    column: column.to_string(),
                    slots,
                });
            }
        }
    }

    fn push_compare(&mut self, column: &str, op: &'static str, slot: Slot) {
        self.predicates.push(Predicate::Compare {
            column: column.to_string(),
            op,
            slot,
        });
    }

    fn push_between(&mut self, column: &str, from_key: &str, to_key: &str, from: NaiveDate, to: NaiveDate) {
        if from > to {
            sql_event!(trace, key = from_key, "filter skipped: reversed date range");
            return;
        }
        let from = self.bind(from_key, Param::new(from));
        let to = self.bind(to_key, Param::new(to));
        self.predicates.push(Predicate::Between {
            column: column.to_string(),
            from,
            to,
        });
    }

    // FROM, joins, WHERE and GROUP BY: the part shared by row and count queries.
    fn push_body(&self, out: &mut String, style: Placeholders) {
        if let Some(from) = &self.from {
            out.push_str(" FROM ");
            out.push_str(from);
        }
        for join in &self.joins {
            out.push(' ');
            out.push_str(join);
        }
        push_where(out, &self.predicates, style);
        if let Some(group_by) = &self.group_by {
            out.push_str(" GROUP BY ");
            out.push_str(group_by);
        }
    }

    fn push_select(&self, out: &mut String) {
        out.push_str("SELECT ");
        if self.select_cols.is_empty() {
            out.push('*');
        } else {
            out.push_str(&self.select_cols.join(", "));
        }
    }

    fn push_order_by(&self, out: &mut String) {
        for (i, term) in self.order_terms.iter().enumerate() {
            out.push_str(if i == 0 { " ORDER BY " } else { ", " });
            out.push_str(&term.to_sql());
        }
    }
}

fn parse_date(key: &str, value: &str) -> SearchResult<NaiveDate> {
    // chrono skips padding and accepts signs inside fields; the wire format is exactly `dddd-dd-dd`.
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(SearchError::malformed_date(key, value));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| SearchError::malformed_date(key, value))
}

/// Dynamic search query builder.
///
/// Every filter is conditional: an absent governing value (None, empty
/// string, empty collection) leaves the query untouched. Filter values are
/// always bound as parameters; table and column names are caller literals.
///
/// # Example
/// ```ignore
/// use pgsearch::{LikePattern, SearchQb, SortSpec};
///
/// let sort = SortSpec::new().default_desc("l.created_at").column("stage", "l.current_stage");
///
/// let query = SearchQb::new()
///     .select(&["l.id", "l.status"])
///     .from("loans l")
///     .where_eq("l.status", "status", Some("OPEN"))
///     .where_eq("l.loan_type", "loanType", vec!["GOLD", "HOME"])
///     .where_like("l.name", "name", "ann", LikePattern::Both)
///     .order_by_always(&sort, "-default", Some("stage"))
///     .finish()?;
///
/// let page = query.fetch_page::<_, LoanRow>(&client, PageRequest::new(0, 20)?).await?;
/// ```
#[must_use]
#[derive(Debug)]
pub struct SearchQb<'p> {
    state: SearchState,
    source: Option<&'p SearchParams>,
    build_error: Option<String>,
}

impl SearchQb<'static> {
    /// Create an empty builder with no parameter source.
    pub fn new() -> Self {
        Self {
            state: SearchState::default(),
            source: None,
            build_error: None,
        }
    }
}

impl Default for SearchQb<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> SearchQb<'p> {
    /// Create a builder that reads filter values from `params`.
    ///
    /// Enables the `*_param` methods.
    pub fn with_params(params: &'p SearchParams) -> Self {
        Self {
            state: SearchState::default(),
            source: Some(params),
            build_error: None,
        }
    }

    /// Parameters bound so far.
    pub fn params(&self) -> &ParamMap {
        &self.state.params
    }

    /// WHERE predicates added so far.
    pub fn predicates(&self) -> &[Predicate] {
        &self.state.predicates
    }

    // ==================== SELECT / FROM ====================

    /// Set the SELECT columns, replacing any previous ones.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.state.select_cols = columns
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Append one SELECT column.
    pub fn add_select(mut self, column: &str) -> Self {
        let column = column.trim();
        if !column.is_empty() {
            self.state.select_cols.push(column.to_string());
        }
        self
    }

    /// Projection of the count subquery (defaults to `1`).
    ///
    /// Useful with GROUP BY or DISTINCT, e.g. `count_expr("DISTINCT l.id")`.
    pub fn count_expr(mut self, expr: &str) -> Self {
        let expr = expr.trim();
        if !expr.is_empty() {
            self.state.count_expr = Some(expr.to_string());
        }
        self
    }

    /// Set the FROM table or expression. A blank value is ignored.
    pub fn from(mut self, table: &str) -> Self {
        let table = table.trim();
        if !table.is_empty() {
            self.state.from = Some(table.to_string());
        }
        self
    }

    /// Add INNER JOIN.
    pub fn inner_join(mut self, table: &str, on: &str) -> Self {
        self.state.joins.push(format!("INNER JOIN {table} ON {on}"));
        self
    }

    /// Add LEFT JOIN.
    pub fn left_join(mut self, table: &str, on: &str) -> Self {
        self.state.joins.push(format!("LEFT JOIN {table} ON {on}"));
        self
    }

    // ==================== WHERE (value-driven) ====================

    /// Add `column = :key`, or `column IN (:key0, :key1, ...)` for a
    /// collection of two or more values.
    ///
    /// A one-element collection binds a plain equality under `key`.
    pub fn where_eq<V: FilterValue>(mut self, column: &str, key: &str, value: V) -> Self {
        self.state.push_binding(column, key, value.into_binding());
        self
    }

    /// Add `column LIKE :key`, with wildcards added to the bound value.
    pub fn where_like(mut self, column: &str, key: &str, value: impl OptionalText, pattern: LikePattern) -> Self {
        match value.into_text() {
            Some(text) => {
                let slot = self.state.bind(key, Param::new(pattern.apply(&text)));
                self.state.push_compare(column, "LIKE", slot);
            }
            None => {
                sql_event!(trace, key = key, "filter skipped: no value");
            }
        }
        self
    }

    /// Add `column BETWEEN :from_key AND :to_key` for `yyyy-MM-dd` endpoints.
    ///
    /// Skipped if either endpoint is absent or if `from` is after `to`. A
    /// present endpoint that is not a valid date fails with
    /// [`SearchError::MalformedDate`].
    pub fn where_between(
        mut self,
        column: &str,
        from_key: &str,
        to_key: &str,
        from: impl OptionalText,
        to: impl OptionalText,
    ) -> SearchResult<Self> {
        let (Some(from), Some(to)) = (from.into_text(), to.into_text()) else {
            sql_event!(trace, key = from_key, "filter skipped: open date range");
            return Ok(self);
        };
        let from = parse_date(from_key, &from)?;
        let to = parse_date(to_key, &to)?;
        self.state.push_between(column, from_key, to_key, from, to);
        Ok(self)
    }

    /// Typed form of [`where_between`](Self::where_between).
    pub fn where_between_dates(
        mut self,
        column: &str,
        from_key: &str,
        to_key: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        match (from, to) {
            (Some(from), Some(to)) => self.state.push_between(column, from_key, to_key, from, to),
            _ => {
                sql_event!(trace, key = from_key, "filter skipped: open date range");
            }
        }
        self
    }

    /// Add a raw WHERE fragment, AND-joined with the others.
    pub fn where_raw(mut self, sql: &str) -> Self {
        let sql = sql.trim();
        if !sql.is_empty() {
            self.state.predicates.push(Predicate::Raw(sql.to_string()));
        }
        self
    }

    // ==================== WHERE (source-driven) ====================

    fn source(&mut self, op: &str) -> Option<&'p SearchParams> {
        if self.source.is_none() && self.build_error.is_none() {
            self.build_error = Some(format!("{op} requires a parameter source (SearchQb::with_params)"));
        }
        self.source
    }

    fn require_source(&self, op: &str) -> SearchResult<&'p SearchParams> {
        self.source.ok_or_else(|| {
            SearchError::validation(format!("{op} requires a parameter source (SearchQb::with_params)"))
        })
    }

    /// [`where_eq`](Self::where_eq) with the value of request parameter `key`.
    pub fn where_param(mut self, column: &str, key: &str) -> Self {
        if let Some(source) = self.source("where_param") {
            self = self.where_eq(column, key, source.opt(key));
        }
        self
    }

    /// [`where_eq`](Self::where_eq) with every value of request parameter `key`.
    pub fn where_param_list(mut self, column: &str, key: &str) -> Self {
        if let Some(source) = self.source("where_param_list") {
            self = self.where_eq(column, key, source.opt_list(key));
        }
        self
    }

    /// [`where_eq`](Self::where_eq) with the value of `key` decoded by `decode`.
    pub fn where_param_as<T, E>(
        self,
        column: &str,
        key: &str,
        decode: impl FnOnce(&str) -> Result<T, E>,
    ) -> SearchResult<Self>
    where
        T: FilterValue,
        E: Display,
    {
        let value = self.require_source("where_param_as")?.opt_as(key, decode)?;
        Ok(self.where_eq(column, key, value))
    }

    /// Like [`where_param`](Self::where_param), but fails with
    /// [`SearchError::MissingParameter`] when `key` is absent.
    pub fn where_param_required(self, column: &str, key: &str) -> SearchResult<Self> {
        let value = self.require_source("where_param_required")?.req(key)?;
        Ok(self.where_eq(column, key, value))
    }

    /// [`where_like`](Self::where_like) with the value of request parameter `key`.
    pub fn where_like_param(mut self, column: &str, key: &str, pattern: LikePattern) -> Self {
        if let Some(source) = self.source("where_like_param") {
            self = self.where_like(column, key, source.opt(key), pattern);
        }
        self
    }

    /// [`where_between`](Self::where_between) with the values of `from_key` and `to_key`.
    pub fn where_between_param(self, column: &str, from_key: &str, to_key: &str) -> SearchResult<Self> {
        let source = self.require_source("where_between_param")?;
        self.where_between(column, from_key, to_key, source.opt(from_key), source.opt(to_key))
    }

    // ==================== GROUP BY / ORDER BY ====================

    /// Set GROUP BY expression. A blank expression is ignored.
    pub fn group_by(mut self, expr: &str) -> Self {
        let expr = expr.trim();
        if !expr.is_empty() {
            self.state.group_by = Some(expr.to_string());
        }
        self
    }

    /// Order by one sort token resolved against `spec`.
    ///
    /// Replaces any previously resolved ORDER BY terms.
    pub fn order_by(mut self, spec: &SortSpec, token: Option<&str>) -> Self {
        self.state.order_terms = spec.resolve(token).into_iter().collect();
        self
    }

    /// Order by `always`, then by the caller's `requested` token.
    ///
    /// See [`SortSpec::resolve_pair`].
    pub fn order_by_always(mut self, spec: &SortSpec, always: &str, requested: Option<&str>) -> Self {
        self.state.order_terms = spec.resolve_pair(always, requested);
        self
    }

    /// [`order_by`](Self::order_by) with the token in request parameter `param`.
    pub fn order_by_param(mut self, spec: &SortSpec, param: &str) -> Self {
        if let Some(source) = self.source("order_by_param") {
            self = self.order_by(spec, source.opt(param));
        }
        self
    }

    /// [`order_by_always`](Self::order_by_always) with the requested token in
    /// request parameter `param`.
    pub fn order_by_always_param(mut self, spec: &SortSpec, always: &str, param: &str) -> Self {
        if let Some(source) = self.source("order_by_always_param") {
            self = self.order_by_always(spec, always, source.opt(param));
        }
        self
    }

    // ==================== Terminal ====================

    /// Freeze the builder into an immutable [`SearchQuery`].
    pub fn finish(self) -> SearchResult<SearchQuery> {
        if let Some(message) = self.build_error {
            return Err(SearchError::Validation(message));
        }
        if self.state.from.is_none() {
            return Err(SearchError::validation("search query requires a FROM clause"));
        }
        Ok(SearchQuery { state: self.state })
    }
}

/// A finished search query.
///
/// Rendering is pure: every `to_*` call derives its text from the same
/// frozen state.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    state: SearchState,
}

impl SearchQuery {
    /// Bound parameters in slot order.
    pub fn params(&self) -> &ParamMap {
        &self.state.params
    }

    /// WHERE predicates.
    pub fn predicates(&self) -> &[Predicate] {
        &self.state.predicates
    }

    /// Resolved ORDER BY terms (at most two).
    pub fn order_terms(&self) -> &[OrderTerm] {
        &self.state.order_terms
    }

    /// Row query without LIMIT/OFFSET.
    pub fn to_sql(&self, style: Placeholders) -> String {
        let mut out = String::new();
        self.state.push_select(&mut out);
        self.state.push_body(&mut out, style);
        self.state.push_order_by(&mut out);
        out
    }

    /// `SELECT COUNT(*) FROM (...) AS x` over the same FROM/WHERE/GROUP BY.
    pub fn to_count_sql(&self, style: Placeholders) -> String {
        let mut out = String::from("SELECT COUNT(*) FROM (SELECT ");
        out.push_str(self.state.count_expr.as_deref().unwrap_or("1"));
        self.state.push_body(&mut out, style);
        out.push_str(") AS x");
        out
    }

    /// Row query with LIMIT/OFFSET bound to the two slots after the
    /// accumulated parameters.
    pub fn to_page_sql(&self, style: Placeholders) -> String {
        let mut out = self.to_sql(style);
        style.push_limit_offset(&mut out, self.state.params.len() + 1);
        out
    }
}
