//! `tracing` integration.
//!
//! Events go to the `pgsearch.sql` target. Without the `tracing` feature the
//! macro expands to nothing.

/// Maximum number of SQL bytes written into a log field.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) const MAX_LOGGED_SQL: usize = 200;

#[cfg(feature = "tracing")]
macro_rules! sql_event {
    ($level:ident, $($field:tt)*) => {
        tracing::$level!(target: "pgsearch.sql", $($field)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sql_event {
    ($level:ident, $($field:tt)*) => {
        ()
    };
}

/// Truncate `sql` to at most `max` bytes on a char boundary, marking the cut with `...`.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql(sql: &str, max: usize) -> std::borrow::Cow<'_, str> {
    if sql.len() <= max {
        return std::borrow::Cow::Borrowed(sql);
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    std::borrow::Cow::Owned(format!("{}...", &sql[..end]))
}
