//! Filter value categories.
//!
//! A filter's governing value decides whether a predicate is added at all:
//! absent values (None, empty strings, empty collections) contribute nothing,
//! single values bind one parameter, and collections of two or more values
//! expand into an `IN` list.

use crate::qb::param::Param;

/// What a filter value binds to.
#[derive(Debug, Clone)]
pub enum Binding {
    /// Nothing to filter on.
    Absent,
    /// One value: `column = $n`.
    One(Param),
    /// Two or more values: `column IN ($n, $m, ...)`.
    Many(Vec<Param>),
}

/// A value that may govern a filter predicate.
pub trait FilterValue {
    /// Classify this value.
    fn into_binding(self) -> Binding;
}

impl FilterValue for &str {
    fn into_binding(self) -> Binding {
        if self.is_empty() {
            Binding::Absent
        } else {
            Binding::One(Param::new(self.to_string()))
        }
    }
}

impl FilterValue for String {
    fn into_binding(self) -> Binding {
        if self.is_empty() {
            Binding::Absent
        } else {
            Binding::One(Param::new(self))
        }
    }
}

impl FilterValue for &String {
    fn into_binding(self) -> Binding {
        self.as_str().into_binding()
    }
}

impl<T: FilterValue> FilterValue for Option<T> {
    fn into_binding(self) -> Binding {
        match self {
            Some(v) => v.into_binding(),
            None => Binding::Absent,
        }
    }
}

/// One element of a multi-valued filter.
///
/// Borrowed strings are copied into owned parameters, so a collection built
/// from request data (`Vec<&str>`) can be bound directly.
pub trait IntoParam {
    /// Convert into a bound parameter.
    fn into_param(self) -> Param;
}

impl IntoParam for String {
    fn into_param(self) -> Param {
        Param::new(self)
    }
}

impl IntoParam for &str {
    fn into_param(self) -> Param {
        Param::new(self.to_string())
    }
}

impl IntoParam for &String {
    fn into_param(self) -> Param {
        Param::new(self.clone())
    }
}

impl<T: IntoParam> FilterValue for Vec<T> {
    fn into_binding(self) -> Binding {
        let mut params: Vec<Param> = self.into_iter().map(IntoParam::into_param).collect();
        match params.len() {
            0 => Binding::Absent,
            1 => Binding::One(params.remove(0)),
            _ => Binding::Many(params),
        }
    }
}

impl<T: IntoParam + Clone> FilterValue for &[T] {
    fn into_binding(self) -> Binding {
        self.to_vec().into_binding()
    }
}

macro_rules! impl_filter_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FilterValue for $ty {
                fn into_binding(self) -> Binding {
                    Binding::One(Param::new(self))
                }
            }

            impl IntoParam for $ty {
                fn into_param(self) -> Param {
                    Param::new(self)
                }
            }
        )*
    };
}

impl_filter_scalar!(
    i16,
    i32,
    i64,
    f32,
    f64,
    bool,
    uuid::Uuid,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
);

#[cfg(feature = "rust_decimal")]
impl_filter_scalar!(rust_decimal::Decimal);

/// Text that may be absent (`None` or empty).
///
/// Used for LIKE values and date-range endpoints.
pub trait OptionalText {
    /// The text, or `None` if absent or empty.
    fn into_text(self) -> Option<String>;
}

impl OptionalText for &str {
    fn into_text(self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }
}

impl OptionalText for String {
    fn into_text(self) -> Option<String> {
        (!self.is_empty()).then_some(self)
    }
}

impl OptionalText for &String {
    fn into_text(self) -> Option<String> {
        self.as_str().into_text()
    }
}

impl<T: OptionalText> OptionalText for Option<T> {
    fn into_text(self) -> Option<String> {
        self.and_then(OptionalText::into_text)
    }
}

/// Where LIKE wildcards are placed around a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikePattern {
    /// `%value`
    Start,
    /// `value%`
    End,
    /// `%value%`
    Both,
}

impl LikePattern {
    /// Wrap `value` with wildcards. The result is bound, never inlined.
    pub fn apply(self, value: &str) -> String {
        match self {
            LikePattern::Start => format!("%{value}"),
            LikePattern::End => format!("{value}%"),
            LikePattern::Both => format!("%{value}%"),
        }
    }
}
