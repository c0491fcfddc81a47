use crate::Comparison;
use itertools::Itertools;
use sparql_prefilter_model::{Datatype, ValueId, ValueIdOrder};
use std::cmp::Ordering;
use std::ops::Range;

/// Decides whether empty ranges are part of the result of a range search.
///
/// Empty ranges still carry information: their position is where the reference value would be
/// inserted into the sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmptyRanges {
    #[default]
    Remove,
    Keep,
}

/// Returns the range of `ids` that holds values of `datatype`.
///
/// `ids` must be sorted with an order that keeps datatypes contiguous. As
/// [Datatype::VocabIndex] and [Datatype::LocalVocabIndex] values may interleave, both datatypes
/// yield the combined range of both.
pub fn get_range_for_datatype(ids: &[ValueId], datatype: Datatype) -> Range<usize> {
    let key = datatype_key(datatype);
    let start = ids.partition_point(|id| datatype_key(id.datatype()) < key);
    let end = ids.partition_point(|id| datatype_key(id.datatype()) <= key);
    start..end
}

fn datatype_key(datatype: Datatype) -> Datatype {
    if datatype == Datatype::LocalVocabIndex {
        Datatype::VocabIndex
    } else {
        datatype
    }
}

/// Returns the ranges of `ids` whose values satisfy `id comparison reference`.
///
/// Only values that are compatible with `reference` are considered. Numeric values are compared
/// across [Datatype::Int] and [Datatype::Double]. NaN values satisfy `!=` but no other
/// comparison. An undefined `reference` yields no ranges.
///
/// The result is sorted, and adjacent or overlapping ranges are merged. `ids` must be sorted by
/// `order`.
pub fn get_ranges_for_id(
    ids: &[ValueId],
    reference: ValueId,
    comparison: Comparison,
    order: &(impl ValueIdOrder + ?Sized),
    empty_ranges: EmptyRanges,
) -> Vec<Range<usize>> {
    let mut collector = RangeCollector::new(comparison);
    match reference.datatype() {
        Datatype::Undefined => return Vec::new(),
        Datatype::Int => collect_numeric(ids, Number::Int(reference.get_int()), &mut collector),
        Datatype::Double => collect_numeric(
            ids,
            Number::Double(reference.get_double()),
            &mut collector,
        ),
        datatype => {
            let range = get_range_for_datatype(ids, datatype);
            let slice = &ids[range.clone()];
            let equal_start = range.start + slice.partition_point(|id| order.less(*id, reference));
            let equal_end = range.start + slice.partition_point(|id| !order.less(reference, *id));
            collector.classify(range.start, equal_start, equal_end, range.end);
        }
    }
    simplify_ranges(collector.ranges, empty_ranges)
}

/// Like [get_ranges_for_id], but compares against a run of equal values `[begin, end)`.
///
/// All values `v` with `begin <= v < end` are considered equal to the reference. If
/// `begin == end`, no value is equal, but `begin` still determines which values are below and
/// above. This is used for words that have several (or no) positions in a vocabulary.
///
/// # Panics
///
/// Panics if `begin` is numeric or if `begin` and `end` have incompatible datatypes.
pub fn get_ranges_for_equal_ids(
    ids: &[ValueId],
    begin: ValueId,
    end: ValueId,
    comparison: Comparison,
    order: &(impl ValueIdOrder + ?Sized),
    empty_ranges: EmptyRanges,
) -> Vec<Range<usize>> {
    let datatype = begin.datatype();
    assert!(
        !datatype.is_numeric(),
        "A run of equal ids must not be numeric, got {begin}"
    );
    assert_eq!(
        datatype_key(datatype),
        datatype_key(end.datatype()),
        "The bounds of a run of equal ids must have the same datatype"
    );
    if datatype == Datatype::Undefined {
        return Vec::new();
    }

    let mut collector = RangeCollector::new(comparison);
    let range = get_range_for_datatype(ids, datatype);
    let slice = &ids[range.clone()];
    let equal_start = range.start + slice.partition_point(|id| order.less(*id, begin));
    let equal_end = range.start + slice.partition_point(|id| order.less(*id, end));
    collector.classify(
        range.start,
        equal_start,
        equal_end.max(equal_start),
        range.end,
    );
    simplify_ranges(collector.ranges, empty_ranges)
}

/// Sorts `ranges` and merges all ranges that overlap or touch.
pub fn simplify_ranges(
    mut ranges: Vec<Range<usize>>,
    empty_ranges: EmptyRanges,
) -> Vec<Range<usize>> {
    if empty_ranges == EmptyRanges::Remove {
        ranges.retain(|range| !range.is_empty());
    }
    ranges.sort_by_key(|range| (range.start, range.end));
    ranges
        .into_iter()
        .coalesce(|previous, current| {
            if current.start <= previous.end {
                Ok(previous.start..previous.end.max(current.end))
            } else {
                Err((previous, current))
            }
        })
        .collect()
}

/// A numeric reference value.
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Double(f64),
}

impl Number {
    fn is_nan(self) -> bool {
        matches!(self, Number::Double(value) if value.is_nan())
    }

    /// Compares an integer element against the reference. The reference must not be NaN.
    #[allow(clippy::cast_precision_loss)]
    fn compare_int(self, element: i64) -> Ordering {
        match self {
            Number::Int(value) => element.cmp(&value),
            Number::Double(value) => compare_doubles(element as f64, value),
        }
    }

    /// Compares a double element against the reference. Neither may be NaN.
    #[allow(clippy::cast_precision_loss)]
    fn compare_double(self, element: f64) -> Ordering {
        match self {
            Number::Int(value) => compare_doubles(element, value as f64),
            Number::Double(value) => compare_doubles(element, value),
        }
    }
}

/// Compares two doubles that are not NaN. In contrast to [f64::total_cmp], `-0.0` and `0.0` are
/// equal.
fn compare_doubles(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn is_sign_negative(id: ValueId) -> bool {
    id.get_double().is_sign_negative()
}

fn collect_numeric(ids: &[ValueId], reference: Number, collector: &mut RangeCollector) {
    let ints = get_range_for_datatype(ids, Datatype::Int);
    let doubles = get_range_for_datatype(ids, Datatype::Double);

    if reference.is_nan() {
        // NaN is unequal to every number, including NaN.
        collector.add_nan(ints);
        collector.add_nan(doubles);
        return;
    }

    // Non-negative integers precede the negative ones. Both parts are ascending.
    let int_slice = &ids[ints.clone()];
    let first_negative = ints.start + int_slice.partition_point(|id| id.get_int() >= 0);
    for part in [ints.start..first_negative, first_negative..ints.end] {
        let slice = &ids[part.clone()];
        let equal_start =
            part.start + slice.partition_point(|id| reference.compare_int(id.get_int()).is_lt());
        let equal_end =
            part.start + slice.partition_point(|id| reference.compare_int(id.get_int()).is_le());
        collector.classify(part.start, equal_start, equal_end, part.end);
    }

    // Non-negative doubles (ascending) are followed by NaN and the negative doubles
    // (descending).
    let double_slice = &ids[doubles.clone()];
    let first_nan = doubles.start
        + double_slice.partition_point(|id| !is_sign_negative(*id) && !id.get_double().is_nan());
    let first_negative = doubles.start + double_slice.partition_point(|id| !is_sign_negative(*id));

    let positive = first_nan - doubles.start;
    let equal_start = doubles.start
        + double_slice[..positive]
            .partition_point(|id| reference.compare_double(id.get_double()).is_lt());
    let equal_end = doubles.start
        + double_slice[..positive]
            .partition_point(|id| reference.compare_double(id.get_double()).is_le());
    collector.classify(doubles.start, equal_start, equal_end, first_nan);

    collector.add_nan(first_nan..first_negative);

    let negative_slice = &ids[first_negative..doubles.end];
    let equal_start = first_negative
        + negative_slice.partition_point(|id| reference.compare_double(id.get_double()).is_gt());
    let equal_end = first_negative
        + negative_slice.partition_point(|id| reference.compare_double(id.get_double()).is_ge());
    collector.add_above(first_negative..equal_start);
    collector.add_equal(equal_start..equal_end);
    collector.add_below(equal_end..doubles.end);
}

/// Collects the ranges that are relevant for a comparison.
struct RangeCollector {
    comparison: Comparison,
    ranges: Vec<Range<usize>>,
}

impl RangeCollector {
    fn new(comparison: Comparison) -> Self {
        Self {
            comparison,
            ranges: Vec::new(),
        }
    }

    /// Classifies the ascending range `[start, end)` that is split into values below, equal to
    /// and above the reference.
    fn classify(&mut self, start: usize, equal_start: usize, equal_end: usize, end: usize) {
        self.add_below(start..equal_start);
        self.add_equal(equal_start..equal_end);
        self.add_above(equal_end..end);
    }

    fn add_below(&mut self, range: Range<usize>) {
        if self.comparison.includes_below() {
            self.ranges.push(range);
        }
    }

    fn add_equal(&mut self, range: Range<usize>) {
        if self.comparison.includes_equal() {
            self.ranges.push(range);
        }
    }

    fn add_above(&mut self, range: Range<usize>) {
        if self.comparison.includes_above() {
            self.ranges.push(range);
        }
    }

    /// Adds a range that is only relevant for `!=`, as its values cannot be ordered against the
    /// reference.
    fn add_nan(&mut self, range: Range<usize>) {
        if self.comparison == Comparison::NotEq {
            self.ranges.push(range);
        }
    }
}
