mod datatype;
mod date;
mod error;
mod geo_point;
mod local_vocab;
mod order;
mod reference_value;
mod value_id;
mod vocabulary;

pub use datatype::*;
pub use date::*;
pub use error::*;
pub use geo_point::*;
pub use local_vocab::*;
pub use order::*;
pub use reference_value::*;
pub use value_id::*;
pub use vocabulary::*;

// Re-export some oxrdf types.
pub use oxrdf::{Literal, LiteralRef, NamedNode, NamedNodeRef, Term, TermRef, Variable};
