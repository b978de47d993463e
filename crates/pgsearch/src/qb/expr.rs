//! Predicate nodes for the WHERE clause.
//!
//! Predicates reference parameters by [`Slot`] (name + position in the
//! builder's [`ParamMap`](crate::qb::ParamMap)) instead of carrying SQL text
//! with baked-in placeholders. The placeholder dialect is chosen only when
//! rendering, so the same predicates can be rendered as `$1` for Postgres or
//! `:key` for logs and named-parameter executors.

/// Placeholder dialect used when rendering SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholders {
    /// `$1, $2, ...` in parameter-map order (Postgres).
    #[default]
    Numbered,
    /// `:key`, using the parameter name.
    Named,
}

/// Reserved name of the LIMIT parameter in [`Placeholders::Named`] SQL.
pub const LIMIT_PARAM: &str = "_limit";
/// Reserved name of the OFFSET parameter in [`Placeholders::Named`] SQL.
pub const OFFSET_PARAM: &str = "_offset";

impl Placeholders {
    pub(crate) fn push_slot(self, out: &mut String, slot: &Slot) {
        match self {
            Placeholders::Numbered => {
                out.push('$');
                out.push_str(&slot.index.to_string());
            }
            Placeholders::Named => {
                out.push(':');
                out.push_str(&slot.key);
            }
        }
    }

    /// Append ` LIMIT .. OFFSET ..` where the LIMIT value takes slot `next_index`.
    pub(crate) fn push_limit_offset(self, out: &mut String, next_index: usize) {
        let limit = Slot::new(LIMIT_PARAM, next_index);
        let offset = Slot::new(OFFSET_PARAM, next_index + 1);
        out.push_str(" LIMIT ");
        self.push_slot(out, &limit);
        out.push_str(" OFFSET ");
        self.push_slot(out, &offset);
    }
}

/// A reference to a bound parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    key: String,
    index: usize,
}

impl Slot {
    pub(crate) fn new(key: impl Into<String>, index: usize) -> Self {
        Self {
            key: key.into(),
            index,
        }
    }

    /// Parameter name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 1-based position in the parameter map.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// One AND-joined WHERE fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column <op> $n`
    Compare {
        column: String,
        op: &'static str,
        slot: Slot,
    },
    /// `column IN ($n, $m, ...)`
    InList { column: String, slots: Vec<Slot> },
    /// `column BETWEEN $n AND $m`
    Between { column: String, from: Slot, to: Slot },
    /// Caller-supplied SQL, rendered verbatim.
    Raw(String),
}

impl Predicate {
    /// Render into `out`.
    pub fn render(&self, out: &mut String, style: Placeholders) {
        match self {
            Predicate::Compare { column, op, slot } => {
                out.push_str(column);
                out.push(' ');
                out.push_str(op);
                out.push(' ');
                style.push_slot(out, slot);
            }
            Predicate::InList { column, slots } => {
                out.push_str(column);
                out.push_str(" IN (");
                for (i, slot) in slots.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    style.push_slot(out, slot);
                }
                out.push(')');
            }
            Predicate::Between { column, from, to } => {
                out.push_str(column);
                out.push_str(" BETWEEN ");
                style.push_slot(out, from);
                out.push_str(" AND ");
                style.push_slot(out, to);
            }
            Predicate::Raw(sql) => out.push_str(sql),
        }
    }

    /// Render as a standalone string.
    pub fn to_sql(&self, style: Placeholders) -> String {
        let mut out = String::new();
        self.render(&mut out, style);
        out
    }

    /// Names of the parameters this predicate references.
    pub fn param_keys(&self) -> Vec<&str> {
        match self {
            Predicate::Compare { slot, .. } => vec![slot.key()],
            Predicate::InList { slots, .. } => slots.iter().map(Slot::key).collect(),
            Predicate::Between { from, to, .. } => vec![from.key(), to.key()],
            Predicate::Raw(_) => Vec::new(),
        }
    }
}

/// Append ` WHERE p1 AND p2 ...`; nothing if `predicates` is empty.
///
/// With more than one predicate, raw fragments are parenthesized so an `OR`
/// inside them stays within its own term.
pub(crate) fn push_where(out: &mut String, predicates: &[Predicate], style: Placeholders) {
    let grouped = predicates.len() > 1;
    for (i, predicate) in predicates.iter().enumerate() {
        out.push_str(if i == 0 { " WHERE " } else { " AND " });
        match predicate {
            Predicate::Raw(sql) if grouped => {
                out.push('(');
                out.push_str(sql);
                out.push(')');
            }
            _ => predicate.render(out, style),
        }
    }
}
