use sparql_prefilter_model::{ValueId, ValueIdOrder};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// The number of key columns of a permuted triple.
pub const NUM_KEY_COLUMNS: usize = 3;

/// A triple whose components are ordered according to the permutation of an index.
///
/// For example, in the POS permutation `col0` holds the predicate, `col1` the object and `col2`
/// the subject. The graph is not part of the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermutedTriple {
    pub col0: ValueId,
    pub col1: ValueId,
    pub col2: ValueId,
    pub graph: ValueId,
}

impl PermutedTriple {
    /// Creates a new [PermutedTriple] in the default graph.
    pub fn new(col0: ValueId, col1: ValueId, col2: ValueId) -> Self {
        Self {
            col0,
            col1,
            col2,
            graph: ValueId::UNDEFINED,
        }
    }

    #[must_use]
    pub fn with_graph(self, graph: ValueId) -> Self {
        Self { graph, ..self }
    }

    /// Returns the id of the given key column.
    ///
    /// # Panics
    ///
    /// Panics if `column` is not one of `0`, `1` or `2`.
    pub fn id_for_column(&self, column: usize) -> ValueId {
        match column {
            0 => self.col0,
            1 => self.col1,
            2 => self.col2,
            _ => panic!(
                "Column index {column} is out of bounds, a triple has {NUM_KEY_COLUMNS} key columns."
            ),
        }
    }

    /// Compares the key columns of both triples lexicographically with `order`. The graph is
    /// ignored.
    pub fn compare_keys(&self, other: &Self, order: &(impl ValueIdOrder + ?Sized)) -> Ordering {
        (0..NUM_KEY_COLUMNS)
            .map(|column| order.compare(self.id_for_column(column), other.id_for_column(column)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Returns the key columns. Columns at or after `column` are replaced with the smallest id,
    /// such that two masked triples are equal iff they agree on the columns before `column`.
    pub(crate) fn masked(&self, column: usize) -> [ValueId; NUM_KEY_COLUMNS] {
        let mut result = [self.col0, self.col1, self.col2];
        for id in result.iter_mut().skip(column) {
            *id = ValueId::MIN;
        }
        result
    }
}

impl Display for PermutedTriple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {}", self.col0, self.col1, self.col2)?;
        if !self.graph.is_undefined() {
            write!(f, " {}", self.graph)?;
        }
        f.write_str(")")
    }
}

/// The summary of a single compressed block of an index permutation.
///
/// The blocks of a permutation are sorted by their triples, and [Self::block_index] is the
/// position of the block within the permutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompressedBlockMetadata {
    /// The first triple of the block.
    pub first_triple: PermutedTriple,
    /// The last triple of the block.
    pub last_triple: PermutedTriple,
    /// The number of rows stored in the block.
    pub num_rows: usize,
    /// The graphs that occur in the block. [None] if the block contains too many graphs to list
    /// them.
    pub graph_info: Option<Vec<ValueId>>,
    /// The position of the block in the permutation.
    pub block_index: usize,
}

impl CompressedBlockMetadata {
    pub fn new(
        block_index: usize,
        first_triple: PermutedTriple,
        last_triple: PermutedTriple,
    ) -> Self {
        Self {
            first_triple,
            last_triple,
            num_rows: 0,
            graph_info: None,
            block_index,
        }
    }

    #[must_use]
    pub fn with_num_rows(self, num_rows: usize) -> Self {
        Self { num_rows, ..self }
    }

    #[must_use]
    pub fn with_graph_info(self, graph_info: Vec<ValueId>) -> Self {
        Self {
            graph_info: Some(graph_info),
            ..self
        }
    }

    /// Returns the ids of the first and the last triple in `column`.
    ///
    /// # Panics
    ///
    /// Panics if `column` is not a key column.
    pub fn bounds(&self, column: usize) -> (ValueId, ValueId) {
        (
            self.first_triple.id_for_column(column),
            self.last_triple.id_for_column(column),
        )
    }

    /// Returns true if all rows of the block agree on the columns before `column`.
    ///
    /// As the rows are sorted, comparing the first and the last triple is sufficient.
    pub fn is_consistent_before(&self, column: usize) -> bool {
        self.first_triple.masked(column) == self.last_triple.masked(column)
    }
}

impl Display for CompressedBlockMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} .. {} [{} rows]",
            self.block_index, self.first_triple, self.last_triple, self.num_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> ValueId {
        ValueId::from_int(value)
    }

    #[test]
    fn column_access() {
        let triple = PermutedTriple::new(int(1), int(2), int(3));
        assert_eq!(triple.id_for_column(0), int(1));
        assert_eq!(triple.id_for_column(1), int(2));
        assert_eq!(triple.id_for_column(2), int(3));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn column_access_out_of_bounds() {
        PermutedTriple::new(int(1), int(2), int(3)).id_for_column(3);
    }

    #[test]
    fn compare_keys_ignores_graph() {
        let triple = PermutedTriple::new(int(1), int(2), int(3));
        let order = sparql_prefilter_model::BitOrder;
        assert_eq!(
            triple.compare_keys(&triple.with_graph(int(9)), &order),
            Ordering::Equal
        );
        assert_eq!(
            triple.compare_keys(&PermutedTriple::new(int(1), int(3), int(0)), &order),
            Ordering::Less
        );
    }

    #[test]
    fn consistency_ignores_evaluation_column_and_after() {
        let block = CompressedBlockMetadata::new(
            0,
            PermutedTriple::new(int(1), int(2), int(3)),
            PermutedTriple::new(int(1), int(5), int(0)),
        );
        assert!(block.is_consistent_before(0));
        assert!(block.is_consistent_before(1));
        assert!(!block.is_consistent_before(2));
        assert_eq!(block.bounds(1), (int(2), int(5)));
    }

    #[test]
    fn display_block() {
        let graph = ValueId::from_vocab_index(7).unwrap();
        let block = CompressedBlockMetadata::new(
            3,
            PermutedTriple::new(int(1), int(2), int(3)),
            PermutedTriple::new(int(1), int(5), int(0)).with_graph(graph),
        )
        .with_num_rows(10);
        insta::assert_snapshot!(block, @"#3 (I:1 I:2 I:3) .. (I:1 I:5 I:0 V:7) [10 rows]");
    }
}
