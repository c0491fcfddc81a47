use crate::CompressedBlockMetadata;
use sparql_prefilter_model::ValueIdOrder;
use std::borrow::Borrow;
use thiserror::Error;

/// A violation of the requirements on the blocks that a prefilter is evaluated on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBlocksError {
    #[error("The provided data blocks must be unique, block {block_index} occurs twice.")]
    DuplicateBlock { block_index: usize },
    #[error(
        "The blocks must be provided in sorted order, block {next} follows block {previous}."
    )]
    UnsortedBlocks { previous: usize, next: usize },
    #[error("The triples of block {previous} do not precede the triples of block {next}.")]
    UnsortedTriples { previous: usize, next: usize },
    #[error(
        "The values in the columns up to the evaluation column {column} must be consistent, \
         violated at block {block_index}."
    )]
    InconsistentColumns { column: usize, block_index: usize },
}

/// Checks that `blocks` can be evaluated on `evaluation_column`.
///
/// The following rules are checked:
/// - No block occurs twice in a row.
/// - The blocks are sorted by their block index, and by their triples according to `order`.
/// - All blocks agree on the columns before the evaluation column.
pub fn validate_blocks<B: Borrow<CompressedBlockMetadata>>(
    blocks: &[B],
    evaluation_column: usize,
    order: &(impl ValueIdOrder + ?Sized),
) -> Result<(), InvalidBlocksError> {
    for pair in blocks.windows(2) {
        let (previous, next) = (pair[0].borrow(), pair[1].borrow());
        if previous == next {
            return Err(InvalidBlocksError::DuplicateBlock {
                block_index: next.block_index,
            });
        }
        if previous.block_index >= next.block_index {
            return Err(InvalidBlocksError::UnsortedBlocks {
                previous: previous.block_index,
                next: next.block_index,
            });
        }
        if previous
            .last_triple
            .compare_keys(&next.first_triple, order)
            .is_gt()
        {
            return Err(InvalidBlocksError::UnsortedTriples {
                previous: previous.block_index,
                next: next.block_index,
            });
        }
        if previous.last_triple.masked(evaluation_column)
            != next.first_triple.masked(evaluation_column)
        {
            return Err(InvalidBlocksError::InconsistentColumns {
                column: evaluation_column,
                block_index: next.block_index,
            });
        }
    }

    match blocks
        .iter()
        .map(Borrow::borrow)
        .find(|block| !block.is_consistent_before(evaluation_column))
    {
        Some(block) => Err(InvalidBlocksError::InconsistentColumns {
            column: evaluation_column,
            block_index: block.block_index,
        }),
        None => Ok(()),
    }
}
