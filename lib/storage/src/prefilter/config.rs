/// The depth after which the children of logical expressions are no longer rendered by
/// [Display](std::fmt::Display).
pub const MAX_DISPLAY_DEPTH: usize = 3;

/// Controls the evaluation of a [PrefilterExpression](super::PrefilterExpression).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrefilterConfig {
    /// The key column (`0..=2`) of the permutation whose values are compared.
    pub evaluation_column: usize,
    /// Whether the first and the last block may be incomplete.
    ///
    /// A scan usually starts and ends in the middle of a block. These boundary blocks can contain
    /// rows that differ in the columns before the evaluation column. If this flag is set, such
    /// blocks are passed through without being evaluated. Otherwise, they are rejected like any
    /// other inconsistent block.
    pub pass_incomplete_boundary_blocks: bool,
}

impl PrefilterConfig {
    pub fn new(evaluation_column: usize) -> Self {
        Self {
            evaluation_column,
            ..Self::default()
        }
    }
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self {
            evaluation_column: 0,
            pass_incomplete_boundary_blocks: true,
        }
    }
}
