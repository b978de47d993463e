//! Convenient imports for typical `pgsearch` usage.
//!
//! ```ignore
//! use pgsearch::prelude::*;
//! ```

pub use crate::qb;
pub use crate::{
    FromRow, GenericClient, LikePattern, Page, PageRequest, QueryExecutor, RowExt, SearchConfig,
    SearchError, SearchParams, SearchQb, SearchResult, SortKey, SortSpec,
};
