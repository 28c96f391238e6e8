#![forbid(unsafe_code)]

pub mod builder;
pub mod cancel;
pub mod dataset;

pub use builder::SceneBuilder;
pub use cancel::CancelFlag;
pub use dataset::{Dataset, ReferencePoint};
