use std::fmt::{Display, Formatter};

/// The different datatypes that a [ValueId](crate::ValueId) can encode.
///
/// The discriminant of each variant is the 4-bit tag stored in the most significant bits of a
/// [ValueId](crate::ValueId). As a consequence, the declaration order of the variants defines how
/// values of different datatypes are ordered relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Datatype {
    /// The single undefined value.
    Undefined = 0,
    /// A boolean.
    Bool = 1,
    /// A signed 60-bit integer.
    Int = 2,
    /// A double with reduced precision.
    Double = 3,
    /// An index into the persistent vocabulary.
    VocabIndex = 4,
    /// A reference to an entry of a query-local vocabulary.
    LocalVocabIndex = 5,
    /// An index of a text record.
    TextRecordIndex = 6,
    /// A date, date time or duration.
    Date = 7,
    /// A point given by latitude and longitude.
    GeoPoint = 8,
    /// An index into the vocabulary of the text index.
    WordVocabIndex = 9,
    /// A blank node.
    BlankNodeIndex = 10,
}

impl Datatype {
    /// The largest datatype tag.
    pub const MAX_VALUE: Datatype = Datatype::BlankNodeIndex;

    /// All datatypes in ascending tag order.
    pub const ALL: [Datatype; 11] = [
        Datatype::Undefined,
        Datatype::Bool,
        Datatype::Int,
        Datatype::Double,
        Datatype::VocabIndex,
        Datatype::LocalVocabIndex,
        Datatype::TextRecordIndex,
        Datatype::Date,
        Datatype::GeoPoint,
        Datatype::WordVocabIndex,
        Datatype::BlankNodeIndex,
    ];

    /// Returns the 4-bit tag of this datatype.
    #[inline]
    pub const fn tag(self) -> u64 {
        self as u64
    }

    /// Returns the datatype for the given tag or [None] if the tag is not assigned.
    #[inline]
    pub const fn from_tag(tag: u64) -> Option<Datatype> {
        Some(match tag {
            0 => Datatype::Undefined,
            1 => Datatype::Bool,
            2 => Datatype::Int,
            3 => Datatype::Double,
            4 => Datatype::VocabIndex,
            5 => Datatype::LocalVocabIndex,
            6 => Datatype::TextRecordIndex,
            7 => Datatype::Date,
            8 => Datatype::GeoPoint,
            9 => Datatype::WordVocabIndex,
            10 => Datatype::BlankNodeIndex,
            _ => return None,
        })
    }

    /// Returns true for `Int` and `Double`.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Datatype::Int | Datatype::Double)
    }

    /// Returns true for the two datatypes whose values are backed by strings (`VocabIndex` and
    /// `LocalVocabIndex`). Values of these datatypes are ordered as one domain.
    #[inline]
    pub const fn is_string_like(self) -> bool {
        matches!(self, Datatype::VocabIndex | Datatype::LocalVocabIndex)
    }

    /// Returns true if the payload of this datatype is an unsigned index.
    #[inline]
    pub const fn is_index(self) -> bool {
        matches!(
            self,
            Datatype::VocabIndex
                | Datatype::LocalVocabIndex
                | Datatype::TextRecordIndex
                | Datatype::WordVocabIndex
                | Datatype::BlankNodeIndex
        )
    }

    /// Returns the name of the datatype.
    pub const fn name(self) -> &'static str {
        match self {
            Datatype::Undefined => "Undefined",
            Datatype::Bool => "Bool",
            Datatype::Int => "Int",
            Datatype::Double => "Double",
            Datatype::VocabIndex => "VocabIndex",
            Datatype::LocalVocabIndex => "LocalVocabIndex",
            Datatype::TextRecordIndex => "TextRecordIndex",
            Datatype::Date => "Date",
            Datatype::GeoPoint => "GeoPoint",
            Datatype::WordVocabIndex => "WordVocabIndex",
            Datatype::BlankNodeIndex => "BlankNodeIndex",
        }
    }

    /// Returns the single letter that is used when rendering values of this datatype.
    pub const fn letter(self) -> char {
        match self {
            Datatype::Undefined => 'U',
            Datatype::Bool => 'B',
            Datatype::Int => 'I',
            Datatype::Double => 'D',
            Datatype::VocabIndex => 'V',
            Datatype::LocalVocabIndex => 'L',
            Datatype::TextRecordIndex => 'T',
            Datatype::Date => 'D',
            Datatype::GeoPoint => 'G',
            Datatype::WordVocabIndex => 'W',
            Datatype::BlankNodeIndex => 'B',
        }
    }
}

impl Display for Datatype {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
