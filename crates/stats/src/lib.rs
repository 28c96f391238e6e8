#![forbid(unsafe_code)]

pub mod aggregate;
pub mod pair;

pub use aggregate::DistanceAggregator;
pub use pair::{PairStat, PairStatistics, UNOBSERVED_MEAN};
