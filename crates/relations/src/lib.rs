#![forbid(unsafe_code)]

pub mod classify;
pub mod relation;

pub use classify::{RelationClassifier, RelationMatrix};
pub use relation::Relation;
