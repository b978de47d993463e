//! # pgsearch
//!
//! Dynamic, parameterized search queries for Postgres.
//!
//! ## Features
//!
//! - **Optional filters**: a filter whose value is absent is skipped, so one builder chain serves every request
//! - **Always bound**: filter values are parameters, never SQL text
//! - **IN-list expansion**: multi-valued filters become `IN ($n, ...)`
//! - **Sort tokens**: `"field"` / `"-field"` resolved against a whitelist, with a fallback
//! - **Count + page**: one call issues the count query and, if anything matched, the page query
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//!
//! ## Search builder (qb)
//!
//! ```ignore
//! use pgsearch::prelude::*;
//!
//! let params = SearchParams::from_query("stage=KYC&stage=SANCTION&firstName=ann&sortBy=-loanAmount");
//! let config = SearchConfig::default();
//! let sort = SortSpec::new()
//!     .default_desc("l.created_at")
//!     .column("loanAmount", "l.loan_amount");
//!
//! let page: Page<LoanRow> = qb::search_with(&params)
//!     .select(&["l.id", "l.loan_amount", "c.first_name"])
//!     .from("loan_accounts l")
//!     .left_join("customer c", "l.customer_id = c.id")
//!     .where_param_list("l.current_stage", "stage")
//!     .where_like_param("c.first_name", "firstName", LikePattern::End)
//!     .order_by_param(&sort, &config.sort_param)
//!     .fetch_page(&client, params.page_request(&config)?)
//!     .await?;
//! ```

#[macro_use]
mod logging;

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod page;
pub mod params;
pub mod prelude;
pub mod qb;
pub mod row;

pub use client::GenericClient;
pub use config::SearchConfig;
pub use error::{SearchError, SearchResult};
pub use executor::QueryExecutor;
pub use page::{Page, PageRequest};
pub use params::SearchParams;
pub use row::{FromRow, RowExt};

// Re-export qb module for easy access
pub use qb::{
    search, search_with, FilterValue, IntoParam, LikePattern, OptionalText, OrderTerm, Param, ParamMap,
    Placeholders, Predicate, SearchQb, SearchQuery, SortDir, SortKey, SortSpec,
};
