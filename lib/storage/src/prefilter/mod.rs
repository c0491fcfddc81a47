//! Prefilter expressions that decide, from the first and the last triple of each block alone,
//! which blocks of an index permutation may contain rows that satisfy a filter.
//!
//! A prefilter is evaluated on a single key column of the permutation. All columns before the
//! evaluation column must be constant over the evaluated blocks (for example, the predicate in a
//! POS scan with a fixed predicate), such that the values of the evaluation column are sorted
//! across the blocks.

mod config;
mod evaluate;
mod expression;
mod validation;

pub use config::*;
pub use expression::*;
pub use validation::*;
