use crate::test_utils::{
    EXAMPLE, and, boolean, build, double, eq, ge, gt, int, iri, is_blank, is_iri, is_literal,
    is_numeric, le, lt, ne, not, or, prefilter, str_starts, var, vocab_id, vocabulary,
};
use sparql_prefilter_model::{LocalVocabEntry, ValueId};
use sparql_prefilter_storage::prefilter::{IsDatatypeKind, PrefilterExpression};
use sparql_prefilter_storage::{CompressedBlockMetadata, PermutedTriple};

fn int_id(value: i64) -> ValueId {
    ValueId::from_int(value)
}

#[test]
fn test_simple_comparisons() {
    assert_eq!(
        build(&ge(var("x"), int(10))),
        [prefilter("x", PrefilterExpression::greater_equal(int_id(10)))]
    );
    assert_eq!(
        build(&lt(var("x"), double(2.5))),
        [prefilter(
            "x",
            PrefilterExpression::less_than(ValueId::from_double(2.5))
        )]
    );
    assert_eq!(
        build(&eq(var("y"), boolean(false))),
        [prefilter(
            "y",
            PrefilterExpression::equal(ValueId::from_bool(false))
        )]
    );
}

#[test]
fn test_constant_on_the_left() {
    assert_eq!(
        build(&gt(int(10), var("x"))),
        [prefilter("x", PrefilterExpression::less_than(int_id(10)))]
    );
    assert_eq!(
        build(&le(int(10), var("x"))),
        [prefilter("x", PrefilterExpression::greater_equal(int_id(10)))]
    );
}

#[test]
fn test_iris_resolve_against_the_vocabulary() {
    assert_eq!(
        build(&eq(var("z"), iri("v20"))),
        [prefilter("z", PrefilterExpression::equal(vocab_id(1)))]
    );

    let unknown = LocalVocabEntry::new(format!("<{EXAMPLE}v15>"), &vocabulary());
    assert_eq!(unknown.position_in_vocab(), (1, 1));
    assert_eq!(
        build(&lt(var("z"), iri("v15"))),
        [prefilter("z", PrefilterExpression::less_than(unknown))]
    );
}

#[test]
fn test_not_equal() {
    assert_eq!(
        build(&ne(var("x"), int(10))),
        [prefilter(
            "x",
            PrefilterExpression::not(&PrefilterExpression::equal(int_id(10)))
        )]
    );
}

#[test]
fn test_and_keeps_variables_of_both_sides() {
    assert_eq!(
        build(&and(ge(var("x"), int(10)), ne(var("x"), int(20)))),
        [prefilter(
            "x",
            PrefilterExpression::and(
                PrefilterExpression::greater_equal(int_id(10)),
                PrefilterExpression::not(&PrefilterExpression::equal(int_id(20))),
            )
        )]
    );
    assert_eq!(
        build(&and(lt(var("z"), int(1)), ge(var("a"), int(2)))),
        [
            prefilter("a", PrefilterExpression::greater_equal(int_id(2))),
            prefilter("z", PrefilterExpression::less_than(int_id(1))),
        ]
    );
}

#[test]
fn test_or_drops_variables_of_one_side() {
    let expression = or(
        and(ge(var("z"), int(1000)), eq(var("x"), iri("v10"))),
        ge(var("z"), int(10000)),
    );
    assert_eq!(
        build(&expression),
        [prefilter(
            "z",
            PrefilterExpression::or(
                PrefilterExpression::greater_equal(int_id(1000)),
                PrefilterExpression::greater_equal(int_id(10000)),
            )
        )]
    );
    assert!(build(&or(lt(var("x"), int(1)), lt(var("y"), int(1)))).is_empty());
}

#[test]
fn test_comparison_of_two_variables_is_ignored() {
    assert_eq!(
        build(&and(ne(var("y"), var("x")), ge(var("x"), int(10)))),
        [prefilter("x", PrefilterExpression::greater_equal(int_id(10)))]
    );
}

#[test]
fn test_negated_or_keeps_variables_of_one_side() {
    let expression = not(or(ge(var("z"), int(10)), eq(var("y"), boolean(false))));
    assert_eq!(
        build(&expression),
        [
            prefilter(
                "y",
                PrefilterExpression::not(&PrefilterExpression::equal(ValueId::from_bool(false)))
            ),
            prefilter(
                "z",
                PrefilterExpression::not(&PrefilterExpression::greater_equal(int_id(10)))
            ),
        ]
    );
}

#[test]
fn test_negated_or_on_the_same_variable() {
    let expression = not(or(ge(var("x"), int(10)), le(var("x"), int(0))));
    assert_eq!(
        build(&expression),
        [prefilter(
            "x",
            PrefilterExpression::not(&PrefilterExpression::or(
                PrefilterExpression::greater_equal(int_id(10)),
                PrefilterExpression::less_equal(int_id(0)),
            ))
        )]
    );
}

#[test]
fn test_negated_and_drops_variables_of_one_side() {
    assert!(build(&not(and(lt(var("x"), int(5)), lt(var("y"), int(5))))).is_empty());

    let expression = not(and(
        ne(var("x"), int(10)),
        not(or(ge(var("y"), double(10.0)), le(var("z"), int(10)))),
    ));
    assert!(build(&expression).is_empty());

    let expression = not(and(eq(var("z"), iri("v10")), ge(var("z"), iri("v20"))));
    assert_eq!(
        build(&expression),
        [prefilter(
            "z",
            PrefilterExpression::not(&PrefilterExpression::and(
                PrefilterExpression::equal(vocab_id(0)),
                PrefilterExpression::greater_equal(vocab_id(1)),
            ))
        )]
    );
}

#[test]
fn test_is_datatype() {
    assert_eq!(
        build(&and(is_blank(var("x")), not(is_numeric(var("y"))))),
        [
            prefilter(
                "x",
                PrefilterExpression::is_datatype(IsDatatypeKind::Blank)
            ),
            prefilter(
                "y",
                PrefilterExpression::not(&PrefilterExpression::is_datatype(
                    IsDatatypeKind::Numeric
                ))
            ),
        ]
    );
}

#[test]
fn test_is_iri_and_is_literal() {
    let vocabulary = vocabulary();
    assert_eq!(
        build(&or(is_iri(var("x")), is_literal(var("x")))),
        [prefilter(
            "x",
            PrefilterExpression::or(
                PrefilterExpression::is_datatype(IsDatatypeKind::iri(&vocabulary)),
                PrefilterExpression::is_datatype(IsDatatypeKind::literal(&vocabulary)),
            )
        )]
    );
    assert_eq!(
        build(&not(is_literal(var("y")))),
        [prefilter(
            "y",
            PrefilterExpression::not(&PrefilterExpression::is_datatype(
                IsDatatypeKind::literal(&vocabulary)
            ))
        )]
    );
    assert!(build(&is_iri(iri("v10"))).is_empty());
}

#[test]
fn test_str_starts() {
    let prefix = LocalVocabEntry::new("\"ab", &vocabulary());
    assert_eq!(
        build(&and(str_starts(var("x"), "ab"), lt(var("y"), int(5)))),
        [
            prefilter("x", PrefilterExpression::greater_equal(prefix)),
            prefilter("y", PrefilterExpression::less_than(int_id(5))),
        ]
    );
    // Strings that do not start with the prefix may sort above it.
    assert_eq!(
        build(&and(not(str_starts(var("x"), "ab")), gt(var("x"), int(1)))),
        [prefilter("x", PrefilterExpression::greater_than(int_id(1)))]
    );
    assert!(build(&str_starts(int(1), "ab")).is_empty());
}

#[test]
fn test_display() {
    let prefilters = build(&ge(var("x"), int(10)));
    insta::assert_snapshot!(prefilters[0], @r"
    ?x: Prefilter RelationalExpression<GE(>=)>
    reference value: I:10 .
    ");
}

#[test]
fn test_built_prefilter_prunes_blocks() {
    let blocks = [(1, 1), (5, 9), (10, 20), (20, 20), (21, 30)]
        .into_iter()
        .enumerate()
        .map(|(block_index, (first, last))| {
            CompressedBlockMetadata::new(
                block_index,
                PermutedTriple::new(vocab_id(0), vocab_id(1), int_id(first)),
                PermutedTriple::new(vocab_id(0), vocab_id(1), int_id(last)),
            )
        })
        .collect::<Vec<_>>();

    let prefilters = build(&and(ge(var("x"), int(10)), ne(var("x"), int(20))));
    let kept = prefilters[0]
        .expression
        .evaluate(&blocks, 2)
        .iter()
        .map(|block| block.block_index)
        .collect::<Vec<_>>();
    assert_eq!(kept, [2, 4]);
}

#[test]
fn test_built_is_iri_prunes_blocks() {
    let bounds = [
        (int_id(1), int_id(5)),
        (vocab_id(0), vocab_id(0)),
        (vocab_id(1), vocab_id(1)),
    ];
    let blocks = bounds
        .into_iter()
        .enumerate()
        .map(|(block_index, (first, last))| {
            CompressedBlockMetadata::new(
                block_index,
                PermutedTriple::new(vocab_id(0), vocab_id(1), first),
                PermutedTriple::new(vocab_id(0), vocab_id(1), last),
            )
        })
        .collect::<Vec<_>>();
    let kept = |expression: &PrefilterExpression| {
        expression
            .evaluate(&blocks, 2)
            .iter()
            .map(|block| block.block_index)
            .collect::<Vec<_>>()
    };

    assert_eq!(kept(&build(&is_iri(var("x")))[0].expression), [1, 2]);
    assert_eq!(kept(&build(&not(is_iri(var("x"))))[0].expression), [0]);
    assert_eq!(kept(&build(&is_literal(var("x")))[0].expression), [0]);
}
