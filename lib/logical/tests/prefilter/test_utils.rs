use spargebra::algebra::{Expression, Function};
use sparql_prefilter_logical::{PrefilterBuilder, VariablePrefilter};
use sparql_prefilter_model::{Literal, NamedNode, SortedVocabulary, ValueId, Variable};
use sparql_prefilter_storage::prefilter::PrefilterExpression;

pub const EXAMPLE: &str = "http://example.com/";

/// A vocabulary that contains `ex:v10` and `ex:v20`.
pub fn vocabulary() -> SortedVocabulary {
    SortedVocabulary::new([format!("<{EXAMPLE}v10>"), format!("<{EXAMPLE}v20>")])
}

pub fn build(expression: &Expression) -> Vec<VariablePrefilter> {
    let vocabulary = vocabulary();
    PrefilterBuilder::new(&vocabulary).build(expression)
}

pub fn prefilter(variable: &str, expression: PrefilterExpression) -> VariablePrefilter {
    VariablePrefilter {
        variable: Variable::new_unchecked(variable),
        expression,
    }
}

pub fn vocab_id(index: u64) -> ValueId {
    ValueId::from_vocab_index(index).unwrap()
}

pub fn var(name: &str) -> Expression {
    Expression::Variable(Variable::new_unchecked(name))
}

pub fn int(value: i64) -> Expression {
    Expression::Literal(Literal::from(value))
}

pub fn double(value: f64) -> Expression {
    Expression::Literal(Literal::from(value))
}

pub fn boolean(value: bool) -> Expression {
    Expression::Literal(Literal::from(value))
}

pub fn iri(local_name: &str) -> Expression {
    Expression::NamedNode(NamedNode::new_unchecked(format!("{EXAMPLE}{local_name}")))
}

pub fn lt(left: Expression, right: Expression) -> Expression {
    Expression::Less(Box::new(left), Box::new(right))
}

pub fn le(left: Expression, right: Expression) -> Expression {
    Expression::LessOrEqual(Box::new(left), Box::new(right))
}

pub fn eq(left: Expression, right: Expression) -> Expression {
    Expression::Equal(Box::new(left), Box::new(right))
}

/// SPARQL parsers represent `a != b` as `!(a = b)`.
pub fn ne(left: Expression, right: Expression) -> Expression {
    not(eq(left, right))
}

pub fn ge(left: Expression, right: Expression) -> Expression {
    Expression::GreaterOrEqual(Box::new(left), Box::new(right))
}

pub fn gt(left: Expression, right: Expression) -> Expression {
    Expression::Greater(Box::new(left), Box::new(right))
}

pub fn and(left: Expression, right: Expression) -> Expression {
    Expression::And(Box::new(left), Box::new(right))
}

pub fn or(left: Expression, right: Expression) -> Expression {
    Expression::Or(Box::new(left), Box::new(right))
}

pub fn not(inner: Expression) -> Expression {
    Expression::Not(Box::new(inner))
}

pub fn is_blank(argument: Expression) -> Expression {
    Expression::FunctionCall(Function::IsBlank, vec![argument])
}

pub fn is_numeric(argument: Expression) -> Expression {
    Expression::FunctionCall(Function::IsNumeric, vec![argument])
}

pub fn is_iri(argument: Expression) -> Expression {
    Expression::FunctionCall(Function::IsIri, vec![argument])
}

pub fn is_literal(argument: Expression) -> Expression {
    Expression::FunctionCall(Function::IsLiteral, vec![argument])
}

pub fn str_starts(argument: Expression, prefix: &str) -> Expression {
    Expression::FunctionCall(
        Function::StrStarts,
        vec![argument, Expression::Literal(Literal::new_simple_literal(prefix))],
    )
}
