//! A generator for compiler syntax-tree node declarations.
//!
//! Given an ordered, hand-curated [schema](schema::Schema) of node
//! families, variants and fields, the generator lowers it into a complete
//! set of declarations (forward declarations, ownership aliases, a
//! variant-tag enumeration, a dispatch interface, abstract family bases,
//! concrete per-variant definitions and helper prototypes) and renders
//! them as a single guarded header. Output is a pure function of the
//! schema: identical schemas produce byte-identical headers.

pub mod compile;
pub mod decl;
pub mod driver;
pub mod nodes;
pub mod schema;

pub use driver::{Driver, Status};
