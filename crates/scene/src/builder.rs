use hashbrown::HashMap;
use spatialrel_core::{
    AnalysisConfig, HasLabel, HasPosition, LabelledCloud, ObjectSummary, Result, Scene,
    SpatialRelError,
};
use tracing::debug;

/// Turns one scene's labelled point stream into a [`Scene`] in a single pass.
///
/// Memory is proportional to the number of distinct labels, not the number
/// of points: each label keeps only a point count and a running centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneBuilder {
    max_labels: usize,
}

impl SceneBuilder {
    pub fn new(max_labels: usize) -> Self {
        Self { max_labels }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.max_labels)
    }

    pub fn max_labels(&self) -> usize {
        self.max_labels
    }

    /// Builds a scene from any stream of labelled points.
    ///
    /// Points with a non-finite coordinate are dropped. A label outside
    /// `0..max_labels` rejects the whole scene.
    pub fn build<I, P>(&self, points: I) -> Result<Scene>
    where
        I: IntoIterator<Item = P>,
        P: HasPosition + HasLabel,
    {
        let mut objects: HashMap<u32, ObjectSummary> = HashMap::new();
        let mut total = 0usize;
        let mut dropped = 0usize;

        for (index, point) in points.into_iter().enumerate() {
            total += 1;
            let label = point.label();
            if label as usize >= self.max_labels {
                return Err(SpatialRelError::LabelOutOfRange {
                    label,
                    max_labels: self.max_labels,
                    point_index: index,
                });
            }

            let position = point.position();
            if !position.iter().all(|v| v.is_finite()) {
                dropped += 1;
                continue;
            }

            objects
                .entry(label)
                .and_modify(|obj| obj.observe(position))
                .or_insert_with(|| ObjectSummary::new(label, position));
        }

        if dropped > 0 {
            debug!(dropped, total, "dropped non-finite points");
        }
        debug!(points = total, objects = objects.len(), "scene built");

        Scene::from_objects(self.max_labels, objects.into_values())
    }

    pub fn build_cloud(&self, cloud: &LabelledCloud) -> Result<Scene> {
        self.build(cloud.iter_points())
    }
}
