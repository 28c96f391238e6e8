/// Errors raised while building scenes or configuring an analysis run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpatialRelError {
    /// An input element carried a label outside `0..max_labels`.
    ///
    /// `point_index` is the element's position in its own input: a point in a
    /// cloud, an object passed to `Scene::from_objects`, or an anchor in a
    /// value-map query (the target itself reports 0).
    #[error("label {label} at input index {point_index} is outside the configured range 0..{max_labels}")]
    LabelOutOfRange {
        label: u32,
        max_labels: usize,
        point_index: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{scenes} scenes were supplied with {references} reference points")]
    ReferenceCountMismatch { scenes: usize, references: usize },

    /// A scene or matrix sized for a different label space was combined with this one.
    #[error("label space mismatch: expected {expected} labels, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("run cancelled after {completed} scenes")]
    Cancelled { completed: usize },
}

pub type Result<T> = std::result::Result<T, SpatialRelError>;
