use crate::{are_types_compatible, Comparison, ComparisonForIncompatibleTypes, ComparisonResult};
use sparql_prefilter_model::{Datatype, IdValue, ValueId, ValueIdOrder};
use std::cmp::Ordering;

/// Evaluates `a comparison b`.
///
/// Values with incompatible datatypes are handled according to `mode`. Integers and doubles are
/// compared by their numeric value. If NaN is involved, [ComparisonForIncompatibleTypes::AlwaysUndef]
/// follows IEEE semantics (only `!=` holds), while [ComparisonForIncompatibleTypes::CompareByType]
/// treats NaN as equal to itself and larger than every other number.
pub fn compare_ids(
    a: ValueId,
    b: ValueId,
    comparison: Comparison,
    mode: ComparisonForIncompatibleTypes,
    order: &(impl ValueIdOrder + ?Sized),
) -> ComparisonResult {
    match ordering_of(a, b, mode, order) {
        Some(ordering) => comparison.holds(ordering).into(),
        None => incomparable_result(a, b, comparison, mode),
    }
}

/// Evaluates `a comparison x` where `x` stands for a run of equal values `[begin, end)`.
///
/// `a` is below the run if `a < begin`, inside the run if `begin <= a < end` and above
/// otherwise. An empty run (`begin == end`) describes a value that lies between the values of
/// the sequence, so `a` is never equal to it.
///
/// # Panics
///
/// Panics if `begin` is numeric.
pub fn compare_with_equal_ids(
    a: ValueId,
    begin: ValueId,
    end: ValueId,
    comparison: Comparison,
    mode: ComparisonForIncompatibleTypes,
    order: &(impl ValueIdOrder + ?Sized),
) -> ComparisonResult {
    assert!(
        !begin.datatype().is_numeric(),
        "A run of equal ids must not be numeric, got {begin}"
    );
    if !are_types_compatible(a.datatype(), begin.datatype()) {
        return match mode {
            ComparisonForIncompatibleTypes::AlwaysUndef => ComparisonResult::Undef,
            ComparisonForIncompatibleTypes::CompareByType => comparison
                .holds(a.datatype().cmp(&begin.datatype()))
                .into(),
        };
    }

    let ordering = if order.less(a, begin) {
        Ordering::Less
    } else if order.less(a, end) {
        Ordering::Equal
    } else {
        Ordering::Greater
    };
    comparison.holds(ordering).into()
}

/// Returns the ordering of two comparable values or [None] if the comparison is not decided by
/// the values alone.
fn ordering_of(
    a: ValueId,
    b: ValueId,
    mode: ComparisonForIncompatibleTypes,
    order: &(impl ValueIdOrder + ?Sized),
) -> Option<Ordering> {
    if !are_types_compatible(a.datatype(), b.datatype()) {
        return match mode {
            ComparisonForIncompatibleTypes::AlwaysUndef => None,
            ComparisonForIncompatibleTypes::CompareByType => Some(a.datatype().cmp(&b.datatype())),
        };
    }

    if let (IdValue::Int(a), IdValue::Int(b)) = (a.visit(), b.visit()) {
        return Some(a.cmp(&b));
    }
    if a.datatype().is_numeric() {
        let (a, b) = (as_f64(a), as_f64(b));
        return match (a.is_nan(), b.is_nan()) {
            (false, false) => Some(compare_numbers(a, b)),
            _ if mode == ComparisonForIncompatibleTypes::AlwaysUndef => None,
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Greater),
            (false, true) => Some(Ordering::Less),
        };
    }

    Some(order.compare(a, b))
}

fn incomparable_result(
    a: ValueId,
    b: ValueId,
    comparison: Comparison,
    mode: ComparisonForIncompatibleTypes,
) -> ComparisonResult {
    let is_numeric = a.datatype().is_numeric() && b.datatype().is_numeric();
    if is_numeric && mode == ComparisonForIncompatibleTypes::AlwaysUndef {
        // NaN is unequal to everything.
        return (comparison == Comparison::NotEq).into();
    }
    ComparisonResult::Undef
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(id: ValueId) -> f64 {
    match id.visit() {
        IdValue::Int(value) => value as f64,
        IdValue::Double(value) => value,
        _ => unreachable!("only called for {} and {}", Datatype::Int, Datatype::Double),
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
