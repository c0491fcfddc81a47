mod compare;
mod ranges;

pub use compare::*;
pub use ranges::*;

use sparql_prefilter_model::Datatype;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// The comparison operators `<`, `<=`, `=`, `!=`, `>=` and `>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Lt,
    LtEq,
    Eq,
    NotEq,
    GtEq,
    Gt,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Lt,
        Comparison::LtEq,
        Comparison::Eq,
        Comparison::NotEq,
        Comparison::GtEq,
        Comparison::Gt,
    ];

    /// Returns true if two values that compare with `ordering` satisfy this comparison.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Lt => ordering.is_lt(),
            Comparison::LtEq => ordering.is_le(),
            Comparison::Eq => ordering.is_eq(),
            Comparison::NotEq => ordering.is_ne(),
            Comparison::GtEq => ordering.is_ge(),
            Comparison::Gt => ordering.is_gt(),
        }
    }

    /// Returns the comparison that holds exactly if this one does not. For example, `<` becomes
    /// `>=`.
    pub fn logical_complement(self) -> Self {
        match self {
            Comparison::Lt => Comparison::GtEq,
            Comparison::LtEq => Comparison::Gt,
            Comparison::Eq => Comparison::NotEq,
            Comparison::NotEq => Comparison::Eq,
            Comparison::GtEq => Comparison::Lt,
            Comparison::Gt => Comparison::LtEq,
        }
    }

    /// Flips the operator such that the operands can be swapped. For example, `5 < ?x` becomes
    /// `?x > 5`.
    pub fn flip(self) -> Self {
        match self {
            Comparison::Lt => Comparison::Gt,
            Comparison::LtEq => Comparison::GtEq,
            Comparison::GtEq => Comparison::LtEq,
            Comparison::Gt => Comparison::Lt,
            Comparison::Eq | Comparison::NotEq => self,
        }
    }

    fn includes_below(self) -> bool {
        matches!(self, Comparison::Lt | Comparison::LtEq | Comparison::NotEq)
    }

    fn includes_equal(self) -> bool {
        matches!(self, Comparison::LtEq | Comparison::Eq | Comparison::GtEq)
    }

    fn includes_above(self) -> bool {
        matches!(self, Comparison::GtEq | Comparison::Gt | Comparison::NotEq)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::LtEq => "<=",
            Comparison::Eq => "=",
            Comparison::NotEq => "!=",
            Comparison::GtEq => ">=",
            Comparison::Gt => ">",
        }
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The ternary outcome of comparing two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonResult {
    False,
    True,
    /// The values cannot be compared, for example, because their datatypes are incompatible.
    Undef,
}

impl From<bool> for ComparisonResult {
    fn from(value: bool) -> Self {
        if value {
            ComparisonResult::True
        } else {
            ComparisonResult::False
        }
    }
}

/// Decides what happens when two values with incompatible datatypes are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComparisonForIncompatibleTypes {
    /// The comparison is [ComparisonResult::Undef]. This is the semantics of SPARQL filters.
    #[default]
    AlwaysUndef,
    /// The values are ordered by their datatype. This yields a total order, as required for
    /// sorting.
    CompareByType,
}

/// Returns true if values of the two datatypes can be compared by value.
///
/// This is the case if neither is [Datatype::Undefined] and the datatypes are equal, both
/// numeric, or both backed by strings.
pub fn are_types_compatible(a: Datatype, b: Datatype) -> bool {
    if a == Datatype::Undefined || b == Datatype::Undefined {
        return false;
    }
    a == b || (a.is_numeric() && b.is_numeric()) || (a.is_string_like() && b.is_string_like())
}
