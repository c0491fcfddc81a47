use itertools::{EitherOrBoth, Itertools};
use spargebra::algebra::{Expression, Function};
use sparql_prefilter_functions::Comparison;
use sparql_prefilter_model::{LocalVocabEntry, ReferenceValue, Variable, Vocabulary};
use sparql_prefilter_storage::prefilter::{IsDatatypeKind, LogicalOperator, PrefilterExpression};
use std::fmt::{Display, Formatter};
use tracing::trace;

/// A prefilter that restricts the values of a single variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariablePrefilter {
    pub variable: Variable,
    pub expression: PrefilterExpression,
}

impl Display for VariablePrefilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.variable, self.expression)
    }
}

/// Builds [VariablePrefilter]s from SPARQL filter expressions.
///
/// Only the parts of an expression that can be evaluated on block summaries are considered:
/// comparisons between a variable and a constant, `isIri`, `isBlank`, `isLiteral` and
/// `isNumeric` on a variable, `STRSTARTS` of a variable with a constant prefix, and `&&`, `||`
/// and `!` over these. Everything else is ignored, which never removes a solution.
#[derive(Clone, Copy)]
pub struct PrefilterBuilder<'vocab> {
    /// Resolves IRIs and literals that are stored in the vocabulary.
    vocabulary: &'vocab dyn Vocabulary,
}

impl<'vocab> PrefilterBuilder<'vocab> {
    pub fn new(vocabulary: &'vocab dyn Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Returns the prefilters implied by `expression`, sorted by variable and with at most one
    /// prefilter per variable.
    ///
    /// Every solution that satisfies `expression` also satisfies each returned prefilter.
    pub fn build(&self, expression: &Expression) -> Vec<VariablePrefilter> {
        self.build_with_negation(expression, false)
    }

    /// `negated` is true if `expression` appears below an odd number of `!`. The result does not
    /// include these negations, they are applied by the caller.
    fn build_with_negation(&self, expression: &Expression, negated: bool) -> Vec<VariablePrefilter> {
        match expression {
            Expression::Equal(left, right) => self.relational(Comparison::Eq, left, right),
            Expression::Less(left, right) => self.relational(Comparison::Lt, left, right),
            Expression::LessOrEqual(left, right) => {
                self.relational(Comparison::LtEq, left, right)
            }
            Expression::Greater(left, right) => self.relational(Comparison::Gt, left, right),
            Expression::GreaterOrEqual(left, right) => {
                self.relational(Comparison::GtEq, left, right)
            }
            Expression::And(left, right) => {
                self.merge(LogicalOperator::And, left, right, negated)
            }
            Expression::Or(left, right) => self.merge(LogicalOperator::Or, left, right, negated),
            Expression::Not(inner) => self
                .build_with_negation(inner, !negated)
                .into_iter()
                .map(|prefilter| VariablePrefilter {
                    variable: prefilter.variable,
                    expression: PrefilterExpression::not(&prefilter.expression),
                })
                .collect(),
            Expression::FunctionCall(Function::IsIri, args) => {
                is_datatype(IsDatatypeKind::iri(self.vocabulary), args)
            }
            Expression::FunctionCall(Function::IsBlank, args) => {
                is_datatype(IsDatatypeKind::Blank, args)
            }
            Expression::FunctionCall(Function::IsLiteral, args) => {
                is_datatype(IsDatatypeKind::literal(self.vocabulary), args)
            }
            Expression::FunctionCall(Function::IsNumeric, args) => {
                is_datatype(IsDatatypeKind::Numeric, args)
            }
            Expression::FunctionCall(Function::StrStarts, args) if !negated => {
                self.str_starts(args)
            }
            _ => {
                trace!(%expression, "Expression does not support prefiltering");
                Vec::new()
            }
        }
    }

    /// Creates a prefilter for `left comparison right` if one side is a variable and the other
    /// one a constant. The comparison is mirrored if the constant is on the left.
    fn relational(
        &self,
        comparison: Comparison,
        left: &Expression,
        right: &Expression,
    ) -> Vec<VariablePrefilter> {
        let (variable, constant, comparison) = match (left, right) {
            (Expression::Variable(variable), constant) => (variable, constant, comparison),
            (constant, Expression::Variable(variable)) => (variable, constant, comparison.flip()),
            _ => {
                trace!(%left, %right, "Comparison without a variable");
                return Vec::new();
            }
        };
        let Some(reference) = self.reference_value(constant) else {
            trace!(%constant, "Comparison with an unsupported constant");
            return Vec::new();
        };
        vec![VariablePrefilter {
            variable: variable.clone(),
            expression: PrefilterExpression::relational(comparison, reference),
        }]
    }

    /// `STRSTARTS(?x, "prefix")` implies `?x >= "prefix`, the shortest word of a literal that
    /// starts with the prefix. The closing quote is left out, as characters like `!` sort before
    /// it. Strings that do not start with the prefix may lie above it as well, so the prefilter is
    /// not built below a negation.
    fn str_starts(&self, args: &[Expression]) -> Vec<VariablePrefilter> {
        let [Expression::Variable(variable), Expression::Literal(prefix)] = args else {
            trace!("STRSTARTS without a variable and a constant prefix");
            return Vec::new();
        };
        let entry = LocalVocabEntry::new(format!("\"{}", prefix.value()), self.vocabulary);
        vec![VariablePrefilter {
            variable: variable.clone(),
            expression: PrefilterExpression::greater_equal(entry),
        }]
    }

    fn reference_value(&self, constant: &Expression) -> Option<ReferenceValue> {
        match constant {
            Expression::Literal(literal) => Some(ReferenceValue::from_literal(
                literal.as_ref(),
                self.vocabulary,
            )),
            Expression::NamedNode(node) => Some(ReferenceValue::from_named_node(
                node.as_ref(),
                self.vocabulary,
            )),
            _ => None,
        }
    }

    /// Combines the prefilters of both operands of `operator`.
    ///
    /// Variables that are restricted by both operands are combined with `operator`. A variable
    /// that only one operand restricts keeps its prefilter if the operator effectively is an
    /// `&&`, and loses it for an effective `||`, as the other operand may hold for any value. Below
    /// a negation, `&&` effectively is an `||` and vice versa.
    fn merge(
        &self,
        operator: LogicalOperator,
        left: &Expression,
        right: &Expression,
        negated: bool,
    ) -> Vec<VariablePrefilter> {
        let effective_operator = if negated {
            operator.logical_complement()
        } else {
            operator
        };
        let left = self.build_with_negation(left, negated);
        let right = self.build_with_negation(right, negated);

        left.into_iter()
            .merge_join_by(right, |left, right| {
                left.variable.as_str().cmp(right.variable.as_str())
            })
            .filter_map(|pair| match pair {
                EitherOrBoth::Both(left, right) => Some(VariablePrefilter {
                    variable: left.variable,
                    expression: PrefilterExpression::logical(
                        operator,
                        left.expression,
                        right.expression,
                    ),
                }),
                EitherOrBoth::Left(prefilter) | EitherOrBoth::Right(prefilter) => {
                    (effective_operator == LogicalOperator::And).then_some(prefilter)
                }
            })
            .collect()
    }
}

fn is_datatype(kind: IsDatatypeKind, args: &[Expression]) -> Vec<VariablePrefilter> {
    match args {
        [Expression::Variable(variable)] => vec![VariablePrefilter {
            variable: variable.clone(),
            expression: PrefilterExpression::is_datatype(kind),
        }],
        _ => Vec::new(),
    }
}
