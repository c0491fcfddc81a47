use crate::{DateYearOrDuration, GeoPoint, LocalVocabEntry, ValueId, Vocabulary};
use oxrdf::vocab::xsd;
use oxrdf::{LiteralRef, NamedNodeRef, TermRef};
use oxsdatatypes::{Boolean, Decimal, Double};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const WKT_LITERAL: &str = "http://www.opengis.net/ont/geosparql#wktLiteral";

/// A constant that a sequence of [ValueId]s can be compared against.
///
/// Constants that can be encoded directly are stored as a [ValueId]. All other IRIs and literals
/// are kept as a [LocalVocabEntry] that has to be added to a [LocalVocab](crate::LocalVocab)
/// before comparing.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceValue {
    Id(ValueId),
    LocalVocabEntry(LocalVocabEntry),
}

impl ReferenceValue {
    /// Converts an RDF term. Returns [None] for blank nodes, as they cannot be used as constants.
    pub fn from_term(term: TermRef<'_>, vocabulary: &(impl Vocabulary + ?Sized)) -> Option<Self> {
        match term {
            TermRef::NamedNode(node) => Some(Self::from_named_node(node, vocabulary)),
            TermRef::Literal(literal) => Some(Self::from_literal(literal, vocabulary)),
            TermRef::BlankNode(_) => None,
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    pub fn from_named_node(node: NamedNodeRef<'_>, vocabulary: &(impl Vocabulary + ?Sized)) -> Self {
        Self::from_word(node.to_string(), vocabulary)
    }

    /// Converts a literal. Numbers, booleans, dates and points are encoded directly. Literals
    /// with an invalid lexical form are treated like any other literal.
    pub fn from_literal(literal: LiteralRef<'_>, vocabulary: &(impl Vocabulary + ?Sized)) -> Self {
        match encode_literal(literal) {
            Some(id) => Self::Id(id),
            None => Self::from_word(literal.to_string(), vocabulary),
        }
    }

    fn from_word(word: String, vocabulary: &(impl Vocabulary + ?Sized)) -> Self {
        let entry = LocalVocabEntry::new(word, vocabulary);
        let (lower, upper) = entry.position_in_vocab();
        if lower < upper {
            if let Ok(id) = ValueId::from_vocab_index(lower) {
                return Self::Id(id);
            }
        }
        Self::LocalVocabEntry(entry)
    }
}

impl From<ValueId> for ReferenceValue {
    fn from(value: ValueId) -> Self {
        Self::Id(value)
    }
}

impl From<LocalVocabEntry> for ReferenceValue {
    fn from(value: LocalVocabEntry) -> Self {
        Self::LocalVocabEntry(value)
    }
}

impl Display for ReferenceValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceValue::Id(id) => write!(f, "{id}"),
            ReferenceValue::LocalVocabEntry(entry) => write!(f, "{entry}"),
        }
    }
}

fn encode_literal(literal: LiteralRef<'_>) -> Option<ValueId> {
    let value = literal.value();
    let datatype = literal.datatype();
    if is_integer_datatype(datatype) {
        return encode_integer(value);
    }
    if datatype == xsd::DOUBLE || datatype == xsd::FLOAT {
        let double = Double::from_str(value).ok()?;
        return Some(ValueId::from_double(f64::from(double)));
    }
    if datatype == xsd::DECIMAL {
        let decimal = Decimal::from_str(value).ok()?;
        return Some(ValueId::from_double(f64::from(Double::from(decimal))));
    }
    if datatype == xsd::BOOLEAN {
        let boolean = Boolean::from_str(value).ok()?;
        return Some(ValueId::from_bool(bool::from(boolean)));
    }

    let date = if datatype == xsd::DATE {
        DateYearOrDuration::parse_xsd_date(value)
    } else if datatype == xsd::DATE_TIME {
        DateYearOrDuration::parse_xsd_date_time(value)
    } else if datatype == xsd::G_YEAR {
        DateYearOrDuration::parse_xsd_g_year(value)
    } else if datatype == xsd::G_YEAR_MONTH {
        DateYearOrDuration::parse_xsd_g_year_month(value)
    } else if datatype == xsd::DAY_TIME_DURATION {
        DateYearOrDuration::parse_xsd_day_time_duration(value)
    } else if datatype.as_str() == WKT_LITERAL {
        return GeoPoint::parse_wkt(value).ok().map(ValueId::from_geo_point);
    } else {
        return None;
    };
    date.ok().map(ValueId::from_date)
}

fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    [
        xsd::INTEGER,
        xsd::INT,
        xsd::LONG,
        xsd::SHORT,
        xsd::BYTE,
        xsd::NON_NEGATIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::UNSIGNED_LONG,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_BYTE,
    ]
    .contains(&datatype)
}

/// Integers that do not fit into a [ValueId] are stored as doubles.
#[allow(clippy::cast_precision_loss)]
fn encode_integer(value: &str) -> Option<ValueId> {
    match value.trim_start_matches('+').parse::<i64>() {
        Ok(int) if (ValueId::MIN_INT..=ValueId::MAX_INT).contains(&int) => {
            Some(ValueId::from_int(int))
        }
        Ok(int) => Some(ValueId::from_double(int as f64)),
        Err(_) => {
            let double = value.parse::<f64>().ok()?;
            (double.is_finite() && !value.contains(['.', 'e', 'E']))
                .then(|| ValueId::from_double(double))
        }
    }
}
