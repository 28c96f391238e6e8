#![forbid(unsafe_code)]

pub mod cloud;
pub mod config;
pub mod error;
pub mod matrix;
pub mod object;
pub mod point;
pub mod scene;
pub mod traits;

pub use cloud::LabelledCloud;
pub use config::AnalysisConfig;
pub use error::{Result, SpatialRelError};
pub use matrix::LabelMatrix;
pub use object::ObjectSummary;
pub use point::LabelledPoint;
pub use scene::{Presence, Scene};
pub use traits::{HasLabel, HasPosition};
