//! Search query builder (QB).
//!
//! Builds parameterized, sortable, paginated queries from optional filter
//! criteria. Filters whose value is absent are skipped, so a single chain can
//! serve every combination of request parameters.
//!
//! # Features
//!
//! - **Conditional filters**: None, empty strings and empty collections add nothing
//! - **IN-list expansion**: collections of two or more values bind `key0, key1, ...`
//! - **Structured WHERE**: predicates reference parameter slots; placeholders are chosen at render time
//! - **Two-level sort**: a mandatory sort plus an optional caller sort, never duplicated
//!
//! # Usage
//!
//! ```ignore
//! use pgsearch::qb::{self, LikePattern, SortSpec};
//!
//! let sort = SortSpec::new()
//!     .default_desc("l.created_at")
//!     .column("loanAmount", "l.loan_amount");
//!
//! let page = qb::search()
//!     .select(&["l.id", "l.loan_amount"])
//!     .from("loans l")
//!     .where_eq("l.stage", "stage", vec!["KYC", "UNDERWRITING"])
//!     .where_like("l.customer_name", "name", name, LikePattern::Both)
//!     .where_between("l.created_at::date", "fromDate", "toDate", from, to)?
//!     .order_by_always(&sort, "-default", sort_token)
//!     .fetch_page::<_, LoanRow>(&client, PageRequest::new(0, 20)?)
//!     .await?;
//! ```

mod expr;
mod param;
mod search;
mod sort;
mod value;

pub use expr::{Placeholders, Predicate, Slot, LIMIT_PARAM, OFFSET_PARAM};
pub use param::{Param, ParamMap};
pub use search::{SearchQb, SearchQuery, DATE_FORMAT};
pub use sort::{OrderTerm, SortDir, SortKey, SortSpec};
pub use value::{Binding, FilterValue, IntoParam, LikePattern, OptionalText};

use crate::params::SearchParams;

/// Create an empty search builder.
///
/// # Example
/// ```ignore
/// let query = pgsearch::qb::search().from("loans l").where_eq("l.status", "status", "OPEN");
/// ```
pub fn search() -> SearchQb<'static> {
    SearchQb::new()
}

/// Create a search builder reading filter values from `params`.
///
/// # Example
/// ```ignore
/// let params = SearchParams::from_query(query_string);
/// let qb = pgsearch::qb::search_with(&params)
///     .from("loans l")
///     .where_param("l.status", "status");
/// ```
pub fn search_with(params: &SearchParams) -> SearchQb<'_> {
    SearchQb::with_params(params)
}
