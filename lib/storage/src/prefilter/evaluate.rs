use crate::prefilter::{
    validate_blocks, IsDatatypeKind, LogicalOperator, PrefilterConfig, PrefilterExpression,
};
use crate::CompressedBlockMetadata;
use itertools::Itertools;
use sparql_prefilter_functions::{
    get_range_for_datatype, get_ranges_for_id, simplify_ranges, Comparison, EmptyRanges,
};
use sparql_prefilter_model::{Datatype, LocalVocab, LocalVocabEntry, ReferenceValue, ValueId};
use std::ops::Range;
use tracing::{debug, trace};

/// The state that is shared by all nodes of an evaluated expression.
struct EvaluationContext<'a> {
    column: usize,
    local_vocab: &'a LocalVocab,
}

impl PrefilterExpression {
    /// Returns the blocks that may contain a value in `evaluation_column` satisfying this
    /// expression.
    ///
    /// This is a shorthand for [Self::evaluate_with_config] with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the blocks are invalid, see [validate_blocks].
    pub fn evaluate(
        &self,
        blocks: &[CompressedBlockMetadata],
        evaluation_column: usize,
    ) -> Vec<CompressedBlockMetadata> {
        self.evaluate_with_config(blocks, &PrefilterConfig::new(evaluation_column))
    }

    /// Returns the blocks that may contain a value satisfying this expression.
    ///
    /// The result preserves the order of `blocks`. Blocks whose first and last value in the
    /// evaluation column have different datatypes are always kept.
    ///
    /// # Panics
    ///
    /// Panics if the blocks (without incomplete boundary blocks, if these are allowed by
    /// `config`) are invalid, see [validate_blocks].
    pub fn evaluate_with_config(
        &self,
        blocks: &[CompressedBlockMetadata],
        config: &PrefilterConfig,
    ) -> Vec<CompressedBlockMetadata> {
        self.evaluate_with_local_vocab(blocks, config, &LocalVocab::new())
    }

    /// Like [Self::evaluate_with_config], but [Datatype::LocalVocabIndex] values in the blocks
    /// refer to entries of `local_vocab`.
    ///
    /// # Panics
    ///
    /// Panics if the blocks are invalid, see [validate_blocks].
    pub fn evaluate_with_local_vocab(
        &self,
        blocks: &[CompressedBlockMetadata],
        config: &PrefilterConfig,
        local_vocab: &LocalVocab,
    ) -> Vec<CompressedBlockMetadata> {
        let column = config.evaluation_column;
        let (first, inner, last) = split_incomplete_boundary_blocks(blocks, config);

        let mut result = Vec::with_capacity(blocks.len());
        result.extend(first.cloned());
        if !inner.is_empty() {
            if let Err(error) = validate_blocks(inner, column, local_vocab) {
                panic!("Invalid input for prefilter: {error}");
            }
            let context = EvaluationContext {
                column,
                local_vocab,
            };
            let input = inner.iter().collect::<Vec<_>>();
            let kept = self.evaluate_blocks(&input, &context);
            if let Err(error) = validate_blocks(&kept, column, local_vocab) {
                panic!("Invalid result of prefilter: {error}");
            }
            result.extend(kept.into_iter().cloned());
        }
        result.extend(last.cloned());

        debug!(
            column,
            input = blocks.len(),
            kept = result.len(),
            "Evaluated prefilter"
        );
        result
    }

    fn evaluate_blocks<'b>(
        &self,
        blocks: &[&'b CompressedBlockMetadata],
        context: &EvaluationContext<'_>,
    ) -> Vec<&'b CompressedBlockMetadata> {
        let result = match self {
            PrefilterExpression::Relational {
                comparison,
                reference,
            } => evaluate_relational(blocks, *comparison, reference, context),
            PrefilterExpression::Logical {
                operator: LogicalOperator::And,
                left,
                right,
            } => {
                let left = left.evaluate_blocks(blocks, context);
                right.evaluate_blocks(&left, context)
            }
            PrefilterExpression::Logical {
                operator: LogicalOperator::Or,
                left,
                right,
            } => union_blocks(
                left.evaluate_blocks(blocks, context),
                right.evaluate_blocks(blocks, context),
            ),
            PrefilterExpression::Not(child) => child.evaluate_blocks(blocks, context),
            PrefilterExpression::IsDatatype { kind, negated } => {
                evaluate_is_datatype(blocks, kind, *negated, context)
            }
        };
        trace!(input = blocks.len(), kept = result.len(), "Evaluated prefilter node");
        result
    }
}

/// Separates the first and the last block if they are inconsistent in the columns before the
/// evaluation column.
fn split_incomplete_boundary_blocks<'b>(
    mut blocks: &'b [CompressedBlockMetadata],
    config: &PrefilterConfig,
) -> (
    Option<&'b CompressedBlockMetadata>,
    &'b [CompressedBlockMetadata],
    Option<&'b CompressedBlockMetadata>,
) {
    if !config.pass_incomplete_boundary_blocks {
        return (None, blocks, None);
    }

    let column = config.evaluation_column;
    let mut first = None;
    if let Some((block, rest)) = blocks.split_first() {
        if !block.is_consistent_before(column) {
            trace!(block_index = block.block_index, "Passing incomplete first block");
            first = Some(block);
            blocks = rest;
        }
    }
    let mut last = None;
    if let Some((block, rest)) = blocks.split_last() {
        if !block.is_consistent_before(column) {
            trace!(block_index = block.block_index, "Passing incomplete last block");
            last = Some(block);
            blocks = rest;
        }
    }
    (first, blocks, last)
}

fn evaluate_relational<'b>(
    blocks: &[&'b CompressedBlockMetadata],
    comparison: Comparison,
    reference: &ReferenceValue,
    context: &EvaluationContext<'_>,
) -> Vec<&'b CompressedBlockMetadata> {
    let ids = block_bounds(blocks, context.column);
    // The reference may lie between the first and the last value of a block, which only shows as
    // an empty range.
    let empty_ranges = if comparison == Comparison::Eq {
        EmptyRanges::Keep
    } else {
        EmptyRanges::Remove
    };

    let ranges = match reference {
        ReferenceValue::Id(id) => {
            get_ranges_for_id(&ids, *id, comparison, context.local_vocab, empty_ranges)
        }
        ReferenceValue::LocalVocabEntry(entry) => match context.local_vocab.with_entry(entry) {
            Ok((id, order)) => get_ranges_for_id(&ids, id, comparison, &order, empty_ranges),
            Err(error) => {
                debug!(%error, "Cannot prefilter with local vocab entry, keeping all blocks");
                return blocks.to_vec();
            }
        },
    };

    let matching = map_to_block_ranges(&simplify_ranges(ranges, empty_ranges), blocks.len());
    select_blocks(blocks, &with_mixed_datatype_blocks(matching, &ids))
}

/// The datatypes of literals that are stored directly in a [ValueId].
const INLINED_LITERAL_DATATYPES: [Datatype; 5] = [
    Datatype::Bool,
    Datatype::Int,
    Datatype::Double,
    Datatype::Date,
    Datatype::GeoPoint,
];

fn evaluate_is_datatype<'b>(
    blocks: &[&'b CompressedBlockMetadata],
    kind: &IsDatatypeKind,
    negated: bool,
    context: &EvaluationContext<'_>,
) -> Vec<&'b CompressedBlockMetadata> {
    let ids = block_bounds(blocks, context.column);
    let ranges = match kind {
        IsDatatypeKind::Blank => vec![get_range_for_datatype(&ids, Datatype::BlankNodeIndex)],
        IsDatatypeKind::Numeric => vec![
            get_range_for_datatype(&ids, Datatype::Int),
            get_range_for_datatype(&ids, Datatype::Double),
        ],
        // IRIs are the words from the boundary on.
        IsDatatypeKind::Iri(boundary) => {
            match word_ranges(&ids, boundary, Comparison::GtEq, context) {
                Some(ranges) => ranges,
                None => return blocks.to_vec(),
            }
        }
        // Literal words sort before the boundary.
        IsDatatypeKind::Literal(boundary) => {
            let Some(mut ranges) = word_ranges(&ids, boundary, Comparison::Lt, context) else {
                return blocks.to_vec();
            };
            ranges.extend(
                INLINED_LITERAL_DATATYPES
                    .iter()
                    .map(|datatype| get_range_for_datatype(&ids, *datatype)),
            );
            ranges
        }
    };
    let ranges = simplify_ranges(ranges, EmptyRanges::Remove);

    let matching = if negated {
        map_to_complemented_block_ranges(&ranges, blocks.len())
    } else {
        map_to_block_ranges(&ranges, blocks.len())
    };
    select_blocks(blocks, &with_mixed_datatype_blocks(matching, &ids))
}

/// Returns the slot ranges of the words that satisfy `word comparison boundary`, or [None] if
/// the boundary cannot be placed among the local vocab entries.
fn word_ranges(
    ids: &[ValueId],
    boundary: &LocalVocabEntry,
    comparison: Comparison,
    context: &EvaluationContext<'_>,
) -> Option<Vec<Range<usize>>> {
    match context.local_vocab.with_entry(boundary) {
        Ok((id, order)) => Some(get_ranges_for_id(
            ids,
            id,
            comparison,
            &order,
            EmptyRanges::Remove,
        )),
        Err(error) => {
            debug!(%error, "Cannot place IRI boundary in local vocab, keeping all blocks");
            None
        }
    }
}

/// Flattens the values of `column` such that block `k` owns the slots `2k` (first triple) and
/// `2k + 1` (last triple).
fn block_bounds(blocks: &[&CompressedBlockMetadata], column: usize) -> Vec<ValueId> {
    blocks
        .iter()
        .flat_map(|block| {
            let (first, last) = block.bounds(column);
            [first, last]
        })
        .collect()
}

/// Maps ranges of slots to the ranges of blocks that own at least one of the slots.
///
/// An empty slot range between the two slots of a block maps to that block, as the values that
/// the range stands for may occur inside the block.
fn map_to_block_ranges(slot_ranges: &[Range<usize>], num_blocks: usize) -> Vec<Range<usize>> {
    let mut result = Vec::with_capacity(slot_ranges.len());
    for range in slot_ranges {
        push_and_merge(
            &mut result,
            range.start / 2..((range.end + 1) / 2).min(num_blocks),
        );
    }
    result
}

/// Maps the gaps between `slot_ranges` (which must be sorted) to ranges of blocks.
fn map_to_complemented_block_ranges(
    slot_ranges: &[Range<usize>],
    num_blocks: usize,
) -> Vec<Range<usize>> {
    if slot_ranges.is_empty() {
        return vec![0..num_blocks];
    }

    let mut result = Vec::with_capacity(slot_ranges.len() + 1);
    let mut gap_start = 0;
    for range in slot_ranges {
        push_and_merge(
            &mut result,
            gap_start / 2..((range.start + 1) / 2).min(num_blocks),
        );
        gap_start = range.end;
    }
    if gap_start / 2 < num_blocks {
        push_and_merge(&mut result, gap_start / 2..num_blocks);
    }
    result
}

/// Adds the blocks whose first and last value have different datatypes to `ranges`.
///
/// The values in such a block are not covered by a contiguous range of slots, so they can never
/// be pruned.
fn with_mixed_datatype_blocks(ranges: Vec<Range<usize>>, ids: &[ValueId]) -> Vec<Range<usize>> {
    let mixed = ids
        .chunks_exact(2)
        .enumerate()
        .filter(|(_, bounds)| bounds[0].datatype() != bounds[1].datatype())
        .map(|(block, _)| block..block + 1);
    let mut result = Vec::with_capacity(ranges.len());
    for range in ranges.into_iter().merge_by(mixed, |a, b| a.start <= b.start) {
        push_and_merge(&mut result, range);
    }
    result
}

/// Appends `range` to `ranges`, merging it with the last range if they touch. Empty ranges are
/// skipped.
fn push_and_merge(ranges: &mut Vec<Range<usize>>, range: Range<usize>) {
    if range.is_empty() {
        return;
    }
    match ranges.last_mut() {
        Some(last) if last.end >= range.start => last.end = last.end.max(range.end),
        _ => ranges.push(range),
    }
}

fn select_blocks<'b>(
    blocks: &[&'b CompressedBlockMetadata],
    ranges: &[Range<usize>],
) -> Vec<&'b CompressedBlockMetadata> {
    ranges
        .iter()
        .flat_map(|range| blocks[range.clone()].iter().copied())
        .collect()
}

/// Merges two lists of blocks that are sorted by their block index.
fn union_blocks<'b>(
    left: Vec<&'b CompressedBlockMetadata>,
    right: Vec<&'b CompressedBlockMetadata>,
) -> Vec<&'b CompressedBlockMetadata> {
    left.into_iter()
        .merge_by(right, |a, b| a.block_index <= b.block_index)
        .dedup_by(|a, b| a.block_index == b.block_index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_ranges_round_outward() {
        // Slots 0..5 end in the first triple of block 2.
        assert_eq!(map_to_block_ranges(&[0..5], 5), vec![0..3]);
        // Slots 0..4 end with the last triple of block 1.
        assert_eq!(map_to_block_ranges(&[0..4], 5), vec![0..2]);
        // Slot 3 is the last triple of block 1.
        assert_eq!(map_to_block_ranges(&[3..6], 5), vec![1..3]);
        assert_eq!(map_to_block_ranges(&[8..10], 5), vec![4..5]);
    }

    #[test]
    fn empty_slot_ranges_inside_a_block_select_the_block() {
        assert_eq!(map_to_block_ranges(&[3..3], 5), vec![1..2]);
        assert_eq!(map_to_block_ranges(&[4..4], 5), Vec::<Range<usize>>::new());
        assert_eq!(map_to_block_ranges(&[10..10], 5), Vec::<Range<usize>>::new());
    }

    #[test]
    fn adjacent_block_ranges_are_merged() {
        assert_eq!(map_to_block_ranges(&[0..2, 3..4, 7..8], 5), vec![0..2, 3..4]);
    }

    #[test]
    fn complemented_mapping() {
        assert_eq!(map_to_complemented_block_ranges(&[], 4), vec![0..4]);
        // Blocks 1 and 2 are fully covered by slots 2..6.
        assert_eq!(map_to_complemented_block_ranges(&[2..6], 4), vec![0..1, 3..4]);
        // The gaps overlap blocks 1 and 2 partially.
        assert_eq!(map_to_complemented_block_ranges(&[3..5], 4), vec![0..4]);
        assert_eq!(
            map_to_complemented_block_ranges(&[0..8], 4),
            Vec::<Range<usize>>::new()
        );
    }

    #[test]
    fn mixed_datatype_blocks_are_added() {
        let ids = [
            ValueId::from_int(1),
            ValueId::from_int(2),
            ValueId::from_int(3),
            ValueId::from_double(1.5),
            ValueId::from_double(2.0),
            ValueId::from_double(3.0),
        ];
        assert_eq!(with_mixed_datatype_blocks(vec![], &ids), vec![1..2]);
        assert_eq!(with_mixed_datatype_blocks(vec![2..3], &ids), vec![1..3]);
        assert_eq!(with_mixed_datatype_blocks(vec![0..1], &ids), vec![0..2]);
    }
}
