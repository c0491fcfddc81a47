#![allow(clippy::unreadable_literal)]

use crate::{Datatype, DateYearOrDuration, GeoPoint, IndexTooLargeError};
use std::fmt::{Debug, Display, Formatter};

/// A fixed-width encoding of a single RDF term.
///
/// The 4 most significant bits store the [Datatype] and the remaining 60 bits store the payload.
/// The layout is chosen such that comparing the raw bits yields a total order in which
///
/// - all values of a datatype are contiguous and ordered by their tag,
/// - indices are ordered ascending,
/// - non-negative integers come before negative integers (both ascending),
/// - non-negative doubles come first (ascending), then NaN, then negative doubles (descending).
///
/// Values of type [Datatype::LocalVocabIndex] are only ordered correctly if they are compared via
/// an ordering context (see [ValueIdOrder](crate::ValueIdOrder)).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(u64);

impl ValueId {
    pub const NUM_DATATYPE_BITS: u32 = 4;
    pub const NUM_DATA_BITS: u32 = 64 - Self::NUM_DATATYPE_BITS;

    /// The largest index that can be stored in a [ValueId].
    pub const MAX_INDEX: u64 = 1 << (Self::NUM_DATA_BITS - 1);
    /// The largest integer that can be represented without wrapping.
    pub const MAX_INT: i64 = (1 << (Self::NUM_DATA_BITS - 1)) - 1;
    /// The smallest integer that can be represented without wrapping.
    pub const MIN_INT: i64 = -(1 << (Self::NUM_DATA_BITS - 1));
    /// The smallest positive double that does not become zero when stored in a [ValueId].
    pub const MIN_POSITIVE_DOUBLE: f64 = f64::from_bits(1 << Self::NUM_DATATYPE_BITS);

    /// The single undefined value. It is also the smallest [ValueId].
    pub const UNDEFINED: ValueId = ValueId(0);
    /// The smallest [ValueId].
    pub const MIN: ValueId = Self::UNDEFINED;
    /// The largest valid [ValueId].
    pub const MAX: ValueId = ValueId((Datatype::MAX_VALUE.tag() << Self::NUM_DATA_BITS) | Self::PAYLOAD_MASK);

    const PAYLOAD_MASK: u64 = u64::MAX >> Self::NUM_DATATYPE_BITS;

    #[inline]
    const fn new(datatype: Datatype, payload: u64) -> Self {
        Self((datatype.tag() << Self::NUM_DATA_BITS) | (payload & Self::PAYLOAD_MASK))
    }

    /// Creates a [ValueId] from its serialized form.
    ///
    /// Returns [None] if the tag of `bits` does not belong to a [Datatype]. NaN doubles are
    /// canonicalized like in [Self::from_double].
    pub fn from_bits(bits: u64) -> Option<Self> {
        match Datatype::from_tag(bits >> Self::NUM_DATA_BITS)? {
            Datatype::Double => {
                let id = Self(bits);
                Some(if id.get_double().is_nan() {
                    Self::from_double(f64::NAN)
                } else {
                    id
                })
            }
            _ => Some(Self(bits)),
        }
    }

    /// Returns the serialized form of this [ValueId].
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    const fn payload(self) -> u64 {
        self.0 & Self::PAYLOAD_MASK
    }

    /// Returns the [Datatype] of this value.
    #[inline]
    pub fn datatype(self) -> Datatype {
        match Datatype::from_tag(self.0 >> Self::NUM_DATA_BITS) {
            Some(datatype) => datatype,
            None => unreachable!("ValueIds are only created with a valid tag"),
        }
    }

    /// Returns true if this is the undefined value.
    #[inline]
    pub const fn is_undefined(self) -> bool {
        self.0 == Self::UNDEFINED.0
    }

    pub const fn make_undefined() -> Self {
        Self::UNDEFINED
    }

    pub const fn from_bool(value: bool) -> Self {
        Self::new(Datatype::Bool, value as u64)
    }

    /// Creates an integer value. Values outside of [Self::MIN_INT] and [Self::MAX_INT] wrap
    /// around.
    #[allow(clippy::cast_sign_loss)]
    pub const fn from_int(value: i64) -> Self {
        Self::new(Datatype::Int, value as u64)
    }

    /// Creates a double value. The 4 least significant bits of the mantissa are dropped.
    ///
    /// All NaN values are mapped to the same canonical NaN such that NaN always sorts between
    /// the non-negative and the negative doubles.
    pub fn from_double(value: f64) -> Self {
        let value = if value.is_nan() { f64::NAN } else { value };
        Self::new(Datatype::Double, value.to_bits() >> Self::NUM_DATATYPE_BITS)
    }

    #[track_caller]
    pub fn from_vocab_index(index: u64) -> Result<Self, IndexTooLargeError> {
        Self::from_index(Datatype::VocabIndex, index)
    }

    /// Creates a reference to the entry at `slot` of a [LocalVocab](crate::LocalVocab).
    #[track_caller]
    pub fn from_local_vocab_index(slot: u64) -> Result<Self, IndexTooLargeError> {
        Self::from_index(Datatype::LocalVocabIndex, slot)
    }

    #[track_caller]
    pub fn from_text_record_index(index: u64) -> Result<Self, IndexTooLargeError> {
        Self::from_index(Datatype::TextRecordIndex, index)
    }

    #[track_caller]
    pub fn from_word_vocab_index(index: u64) -> Result<Self, IndexTooLargeError> {
        Self::from_index(Datatype::WordVocabIndex, index)
    }

    #[track_caller]
    pub fn from_blank_node_index(index: u64) -> Result<Self, IndexTooLargeError> {
        Self::from_index(Datatype::BlankNodeIndex, index)
    }

    #[track_caller]
    fn from_index(datatype: Datatype, index: u64) -> Result<Self, IndexTooLargeError> {
        if index > Self::MAX_INDEX {
            return Err(IndexTooLargeError::new(index));
        }
        Ok(Self::new(datatype, index))
    }

    pub fn from_date(date: DateYearOrDuration) -> Self {
        Self::new(Datatype::Date, date.to_bits())
    }

    pub fn from_geo_point(point: GeoPoint) -> Self {
        Self::new(Datatype::GeoPoint, point.to_bits())
    }

    #[inline]
    fn debug_assert_datatype(self, datatype: Datatype) {
        debug_assert_eq!(
            self.datatype(),
            datatype,
            "Accessed a {} value as {}",
            self.datatype(),
            datatype
        );
    }

    pub fn get_bool(self) -> bool {
        self.debug_assert_datatype(Datatype::Bool);
        self.payload() != 0
    }

    pub fn get_int(self) -> i64 {
        self.debug_assert_datatype(Datatype::Int);
        // Shifting left and arithmetically right again restores the sign.
        #[allow(clippy::cast_possible_wrap)]
        let shifted = (self.0 << Self::NUM_DATATYPE_BITS) as i64;
        shifted >> Self::NUM_DATATYPE_BITS
    }

    pub fn get_double(self) -> f64 {
        self.debug_assert_datatype(Datatype::Double);
        f64::from_bits(self.0 << Self::NUM_DATATYPE_BITS)
    }

    pub fn get_vocab_index(self) -> u64 {
        self.debug_assert_datatype(Datatype::VocabIndex);
        self.payload()
    }

    /// Returns the slot of the referenced [LocalVocab](crate::LocalVocab) entry.
    pub fn get_local_vocab_index(self) -> u64 {
        self.debug_assert_datatype(Datatype::LocalVocabIndex);
        self.payload()
    }

    pub fn get_text_record_index(self) -> u64 {
        self.debug_assert_datatype(Datatype::TextRecordIndex);
        self.payload()
    }

    pub fn get_word_vocab_index(self) -> u64 {
        self.debug_assert_datatype(Datatype::WordVocabIndex);
        self.payload()
    }

    pub fn get_blank_node_index(self) -> u64 {
        self.debug_assert_datatype(Datatype::BlankNodeIndex);
        self.payload()
    }

    pub fn get_date(self) -> DateYearOrDuration {
        self.debug_assert_datatype(Datatype::Date);
        DateYearOrDuration::from_bits(self.payload())
    }

    pub fn get_geo_point(self) -> GeoPoint {
        self.debug_assert_datatype(Datatype::GeoPoint);
        GeoPoint::from_bits(self.payload())
    }

    /// Decodes the value into an [IdValue] that can be matched exhaustively.
    pub fn visit(self) -> IdValue {
        match self.datatype() {
            Datatype::Undefined => IdValue::Undefined,
            Datatype::Bool => IdValue::Bool(self.get_bool()),
            Datatype::Int => IdValue::Int(self.get_int()),
            Datatype::Double => IdValue::Double(self.get_double()),
            Datatype::VocabIndex => IdValue::VocabIndex(self.get_vocab_index()),
            Datatype::LocalVocabIndex => IdValue::LocalVocabIndex(self.get_local_vocab_index()),
            Datatype::TextRecordIndex => IdValue::TextRecordIndex(self.get_text_record_index()),
            Datatype::Date => IdValue::Date(self.get_date()),
            Datatype::GeoPoint => IdValue::GeoPoint(self.get_geo_point()),
            Datatype::WordVocabIndex => IdValue::WordVocabIndex(self.get_word_vocab_index()),
            Datatype::BlankNodeIndex => IdValue::BlankNodeIndex(self.get_blank_node_index()),
        }
    }
}

/// The decoded value of a [ValueId].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdValue {
    Undefined,
    Bool(bool),
    Int(i64),
    Double(f64),
    VocabIndex(u64),
    LocalVocabIndex(u64),
    TextRecordIndex(u64),
    Date(DateYearOrDuration),
    GeoPoint(GeoPoint),
    WordVocabIndex(u64),
    BlankNodeIndex(u64),
}

impl Display for ValueId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.datatype().letter())?;
        match self.visit() {
            IdValue::Undefined => f.write_str("Undefined"),
            IdValue::Bool(value) => write!(f, "{value}"),
            IdValue::Int(value) => write!(f, "{value}"),
            IdValue::Double(value) => write!(f, "{value}"),
            IdValue::VocabIndex(index)
            | IdValue::TextRecordIndex(index)
            | IdValue::WordVocabIndex(index)
            | IdValue::BlankNodeIndex(index) => write!(f, "{index}"),
            IdValue::LocalVocabIndex(slot) => write!(f, "#{slot}"),
            IdValue::Date(date) => write!(f, "{date}"),
            IdValue::GeoPoint(point) => write!(f, "{point}"),
        }
    }
}

impl Debug for ValueId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
