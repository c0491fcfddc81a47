#![doc(test(attr(deny(warnings))))]

//! Block metadata of sorted triple indexes and prefilter expressions that prune blocks which
//! cannot contain a match for a filter.
//!
//! An index permutation is stored as a sequence of compressed blocks. Each block is summarized by
//! its [CompressedBlockMetadata], most importantly the first and the last triple of the block.
//! A [PrefilterExpression] uses these summaries to discard blocks before they are decompressed.

mod block;
pub mod prefilter;

pub use block::*;
pub use prefilter::{PrefilterConfig, PrefilterExpression};
