//! Graph builders for models and tables.
//!
//! Both graphers resolve their style once at construction and are reusable:
//! graphing the same input twice yields equal graphs.

mod model;
mod table;

pub use model::ModelGrapher;
pub use table::TableGrapher;

use ahash::AHashSet;

/// Lowercased names to leave out of a graph
pub(crate) fn skip_set<S: AsRef<str>>(skip: &[S]) -> AHashSet<String> {
    skip.iter().map(|s| s.as_ref().to_lowercase()).collect()
}
