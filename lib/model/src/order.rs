use crate::ValueId;
use std::cmp::Ordering;

/// A total order on [ValueId]s.
///
/// Sorted sequences of [ValueId]s must be searched with the same order that was used for sorting
/// them.
pub trait ValueIdOrder {
    /// Compares `a` and `b`.
    fn compare(&self, a: ValueId, b: ValueId) -> Ordering;

    /// Returns true if `a` is ordered before `b`.
    fn less(&self, a: ValueId, b: ValueId) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Orders [ValueId]s by their raw bits.
///
/// This is only correct for sequences without [Datatype::LocalVocabIndex](crate::Datatype)
/// values. Use a [LocalVocab](crate::LocalVocab) otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitOrder;

impl ValueIdOrder for BitOrder {
    #[inline]
    fn compare(&self, a: ValueId, b: ValueId) -> Ordering {
        a.cmp(&b)
    }
}

impl<T: ValueIdOrder + ?Sized> ValueIdOrder for &T {
    fn compare(&self, a: ValueId, b: ValueId) -> Ordering {
        (**self).compare(a, b)
    }
}
