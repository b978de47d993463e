//! Paginated execution of search queries.

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::executor::QueryExecutor;
use crate::params::SearchParams;
use crate::qb::{SearchQb, SearchQuery};
use crate::row::FromRow;
use serde::Serialize;

/// A zero-based page index and a positive page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    index: i64,
    size: i64,
}

impl PageRequest {
    /// Create a page request.
    ///
    /// Fails if `size` is not positive, `index` is negative, or the offset
    /// does not fit in an `i64`.
    pub fn new(index: i64, size: i64) -> SearchResult<Self> {
        if size <= 0 {
            return Err(SearchError::validation(format!("page size must be positive, got {size}")));
        }
        if index < 0 {
            return Err(SearchError::validation(format!("page index must not be negative, got {index}")));
        }
        if index.checked_mul(size).is_none() {
            return Err(SearchError::validation("page offset overflows"));
        }
        Ok(Self { index, size })
    }

    /// The first page of `size` rows.
    pub fn first(size: i64) -> SearchResult<Self> {
        Self::new(0, size)
    }

    /// Read `page` and `size` request parameters (names from `config`).
    ///
    /// Missing values default to page 0 and `config.default_page_size`; the
    /// size is clamped to `config.max_page_size`.
    pub fn from_params(params: &SearchParams, config: &SearchConfig) -> SearchResult<Self> {
        let index = params.opt_parse::<i64>(&config.page_param)?.unwrap_or(0);
        if index < 0 {
            return Err(SearchError::invalid(&config.page_param, "must not be negative"));
        }
        let size = params
            .opt_parse::<i64>(&config.size_param)?
            .unwrap_or(config.default_page_size);
        if size <= 0 {
            return Err(SearchError::invalid(&config.size_param, "must be positive"));
        }
        Self::new(index, config.clamp_page_size(size))
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// Rows to skip: `index * size`.
    pub fn offset(&self) -> i64 {
        self.index * self.size
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total: i64,
    #[serde(flatten)]
    request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// A page with no rows and a total of zero.
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    /// Rows on this page, in query order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total matching rows across all pages.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// The request this page answers.
    pub fn request(&self) -> PageRequest {
        self.request
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages needed for `total` rows.
    pub fn total_pages(&self) -> i64 {
        if self.total <= 0 {
            return 0;
        }
        let size = self.request.size;
        self.total / size + i64::from(self.total % size != 0)
    }

    pub fn has_next(&self) -> bool {
        self.request.index + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.request.index > 0
    }

    /// Convert every row, keeping total and request.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

impl SearchQuery {
    /// Count matching rows, then fetch the requested page.
    ///
    /// When the count is zero the row query is not issued.
    pub async fn fetch_page<E, T>(&self, executor: &E, page: PageRequest) -> SearchResult<Page<T>>
    where
        E: QueryExecutor,
        T: FromRow<E::Row>,
    {
        let style = executor.placeholders();

        let count_sql = self.to_count_sql(style);
        sql_event!(
            debug,
            sql = %crate::logging::truncate_sql(&count_sql, crate::logging::MAX_LOGGED_SQL),
            param_count = self.params().len(),
            "search count"
        );
        let total = executor.fetch_count(&count_sql, self.params()).await?;

        if total <= 0 {
            sql_event!(debug, total, "search rows skipped: nothing matched");
            return Ok(Page::empty(page));
        }

        let sql = self.to_page_sql(style);
        sql_event!(
            debug,
            sql = %crate::logging::truncate_sql(&sql, crate::logging::MAX_LOGGED_SQL),
            param_count = self.params().len() + 2,
            limit = page.size(),
            offset = page.offset(),
            "search rows"
        );
        let rows = executor
            .fetch_rows(&sql, self.params(), page.size(), page.offset())
            .await?;
        let items = rows.iter().map(T::from_row).collect::<SearchResult<Vec<T>>>()?;

        Ok(Page::new(items, total, page))
    }
}

impl SearchQb<'_> {
    /// [`finish`](SearchQb::finish) the builder and fetch one page.
    pub async fn fetch_page<E, T>(self, executor: &E, page: PageRequest) -> SearchResult<Page<T>>
    where
        E: QueryExecutor,
        T: FromRow<E::Row>,
    {
        self.finish()?.fetch_page(executor, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_validation() {
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, -5).is_err());
        assert!(PageRequest::new(-1, 10).is_err());
        assert!(PageRequest::new(i64::MAX, 2).is_err());

        let page = PageRequest::new(3, 25).unwrap();
        assert_eq!(page.offset(), 75);
        assert_eq!(PageRequest::first(10).unwrap().offset(), 0);
    }

    #[test]
    fn page_request_from_params() {
        let config = SearchConfig::default().max_page_size(50);

        let page = PageRequest::from_params(&SearchParams::new(), &config).unwrap();
        assert_eq!((page.index(), page.size()), (0, 20));

        let params = SearchParams::from_query("page=2&size=500");
        let page = params.page_request(&config).unwrap();
        assert_eq!((page.index(), page.size()), (2, 50));

        let err = PageRequest::from_params(&SearchParams::from_query("size=abc"), &config).unwrap_err();
        assert!(matches!(err, SearchError::InvalidParameter { ref name, .. } if name == "size"));

        let err = PageRequest::from_params(&SearchParams::from_query("page=-1"), &config).unwrap_err();
        assert!(err.is_client_fault());
    }

    #[test]
    fn page_navigation() {
        let request = PageRequest::new(1, 10).unwrap();
        let page = Page::new(vec![1, 2, 3], 23, request);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page::new(vec![1, 2, 3], 23, PageRequest::new(2, 10).unwrap());
        assert!(!last.has_next());

        let empty: Page<i32> = Page::empty(PageRequest::first(10).unwrap());
        assert_eq!(empty.total_pages(), 0);
        assert!(empty.is_empty());
        assert!(!empty.has_next());
    }

    #[test]
    fn page_map_and_serialize() {
        let page = Page::new(vec![1, 2], 2, PageRequest::first(10).unwrap()).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20]);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "items": [10, 20], "total": 2, "index": 0, "size": 10 })
        );
    }
}
