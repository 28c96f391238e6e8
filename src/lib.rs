#![forbid(unsafe_code)]

//! Umbrella crate re-exporting the workspace libraries under one name.

pub use spatialrel_core as model;
pub use spatialrel_io as io;
pub use spatialrel_query as query;
pub use spatialrel_relations as relations;
pub use spatialrel_scene as scene;
pub use spatialrel_stats as stats;
