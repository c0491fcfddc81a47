use crate::prefilter::MAX_DISPLAY_DEPTH;
use sparql_prefilter_functions::Comparison;
use sparql_prefilter_model::{LocalVocabEntry, ReferenceValue, Vocabulary};
use std::fmt::{Display, Formatter};

/// The binary connectives of prefilter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    /// Returns the dual connective, as used by De Morgan's laws.
    pub fn logical_complement(self) -> Self {
        match self {
            LogicalOperator::And => LogicalOperator::Or,
            LogicalOperator::Or => LogicalOperator::And,
        }
    }

    fn label(self) -> &'static str {
        match self {
            LogicalOperator::And => "AND(&&)",
            LogicalOperator::Or => "OR(||)",
        }
    }
}

/// The word that all IRIs compare greater than or equal to, and all literal words less than.
const IRI_BOUNDARY: &str = "<";

/// The datatype checks that can be evaluated on block summaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IsDatatypeKind {
    /// `isIri(?x)`. Holds the first possible IRI, positioned in the vocabulary.
    Iri(LocalVocabEntry),
    /// `isBlank(?x)`
    Blank,
    /// `isLiteral(?x)`. Holds the first possible IRI, positioned in the vocabulary.
    Literal(LocalVocabEntry),
    /// `isNumeric(?x)`
    Numeric,
}

impl IsDatatypeKind {
    pub fn iri(vocabulary: &(impl Vocabulary + ?Sized)) -> Self {
        Self::Iri(LocalVocabEntry::new(IRI_BOUNDARY, vocabulary))
    }

    pub fn literal(vocabulary: &(impl Vocabulary + ?Sized)) -> Self {
        Self::Literal(LocalVocabEntry::new(IRI_BOUNDARY, vocabulary))
    }
}

impl Display for IsDatatypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IsDatatypeKind::Iri(_) => f.write_str("Iri"),
            IsDatatypeKind::Blank => f.write_str("Blank"),
            IsDatatypeKind::Literal(_) => f.write_str("Literal"),
            IsDatatypeKind::Numeric => f.write_str("Numeric"),
        }
    }
}

/// A predicate on a single column that is evaluated on block summaries.
///
/// Prefilter expressions never remove a block that contains a matching row, but they may keep
/// blocks without any match. Negation is resolved when the expression is built: a [Self::Not]
/// node stores the logical complement of the negated expression. This makes the tree immutable
/// and cheap to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum PrefilterExpression {
    /// `?x comparison reference`
    Relational {
        comparison: Comparison,
        reference: ReferenceValue,
    },
    /// Combines two prefilters on the same column.
    Logical {
        operator: LogicalOperator,
        left: Box<PrefilterExpression>,
        right: Box<PrefilterExpression>,
    },
    /// A negated expression. The child is already complemented.
    Not(Box<PrefilterExpression>),
    /// `isIri(?x)`, `isBlank(?x)`, `isLiteral(?x)` or `isNumeric(?x)`, optionally negated.
    IsDatatype { kind: IsDatatypeKind, negated: bool },
}

impl PrefilterExpression {
    pub fn relational(comparison: Comparison, reference: impl Into<ReferenceValue>) -> Self {
        Self::Relational {
            comparison,
            reference: reference.into(),
        }
    }

    pub fn less_than(reference: impl Into<ReferenceValue>) -> Self {
        Self::relational(Comparison::Lt, reference)
    }

    pub fn less_equal(reference: impl Into<ReferenceValue>) -> Self {
        Self::relational(Comparison::LtEq, reference)
    }

    pub fn equal(reference: impl Into<ReferenceValue>) -> Self {
        Self::relational(Comparison::Eq, reference)
    }

    pub fn not_equal(reference: impl Into<ReferenceValue>) -> Self {
        Self::relational(Comparison::NotEq, reference)
    }

    pub fn greater_equal(reference: impl Into<ReferenceValue>) -> Self {
        Self::relational(Comparison::GtEq, reference)
    }

    pub fn greater_than(reference: impl Into<ReferenceValue>) -> Self {
        Self::relational(Comparison::Gt, reference)
    }

    pub fn logical(operator: LogicalOperator, left: Self, right: Self) -> Self {
        Self::Logical {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Self, right: Self) -> Self {
        Self::logical(LogicalOperator::And, left, right)
    }

    pub fn or(left: Self, right: Self) -> Self {
        Self::logical(LogicalOperator::Or, left, right)
    }

    /// Negates `child`. The complement is computed eagerly.
    pub fn not(child: &Self) -> Self {
        Self::Not(Box::new(child.logical_complement()))
    }

    pub fn is_datatype(kind: IsDatatypeKind) -> Self {
        Self::IsDatatype {
            kind,
            negated: false,
        }
    }

    /// Returns an expression that holds for a value iff this expression does not.
    ///
    /// Comparisons are inverted (`<` becomes `>=`), logical expressions follow De Morgan's laws
    /// and a [Self::Not] cancels out.
    #[must_use]
    pub fn logical_complement(&self) -> Self {
        match self {
            Self::Relational {
                comparison,
                reference,
            } => Self::relational(comparison.logical_complement(), reference.clone()),
            Self::Logical {
                operator,
                left,
                right,
            } => Self::logical(
                operator.logical_complement(),
                left.logical_complement(),
                right.logical_complement(),
            ),
            Self::Not(child) => child.logical_complement(),
            Self::IsDatatype { kind, negated } => Self::IsDatatype {
                kind: kind.clone(),
                negated: !negated,
            },
        }
    }

    fn fmt_with_depth(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
        match self {
            Self::Relational {
                comparison,
                reference,
            } => {
                writeln!(
                    f,
                    "Prefilter RelationalExpression<{}>\nreference value: {reference} .",
                    comparison_label(*comparison)
                )
            }
            Self::Logical {
                operator,
                left,
                right,
            } => {
                writeln!(f, "Prefilter LogicalExpression<{}>", operator.label())?;
                f.write_str("child1 {")?;
                left.fmt_child(f, depth)?;
                f.write_str("}child2 {")?;
                right.fmt_child(f, depth)?;
                writeln!(f, "}}")
            }
            Self::Not(child) => {
                f.write_str("Prefilter NotExpression:\nchild {")?;
                child.fmt_child(f, depth)?;
                writeln!(f, "}}")
            }
            Self::IsDatatype { kind, negated } => writeln!(
                f,
                "Prefilter IsDatatypeExpression:\nPrefilter for datatype: {kind}\nis negated: {negated}."
            ),
        }
    }

    fn fmt_child(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
        if depth < MAX_DISPLAY_DEPTH {
            self.fmt_with_depth(f, depth + 1)
        } else {
            f.write_str("MAX_DEPTH")
        }
    }
}

impl Display for PrefilterExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_with_depth(f, 0)
    }
}

fn comparison_label(comparison: Comparison) -> &'static str {
    match comparison {
        Comparison::Lt => "LT(<)",
        Comparison::LtEq => "LE(<=)",
        Comparison::Eq => "EQ(=)",
        Comparison::NotEq => "NE(!=)",
        Comparison::GtEq => "GE(>=)",
        Comparison::Gt => "GT(>)",
    }
}
