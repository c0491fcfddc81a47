//! Derives [PrefilterExpression](sparql_prefilter_storage::PrefilterExpression)s from the
//! expressions of SPARQL `FILTER`s, such that index scans can skip blocks that cannot contain a
//! solution.

mod prefilter_builder;

pub use prefilter_builder::*;
