#![forbid(unsafe_code)]

pub mod config;
pub mod map;
pub mod normal;

pub use config::QueryConfig;
pub use map::{value_map, BestCell, ValueMap};
pub use normal::TruncatedNormal;
