use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use spatialrel_core::{LabelledCloud, Result, Scene, SpatialRelError};
use tracing::{debug, info};

use crate::builder::SceneBuilder;
use crate::cancel::CancelFlag;

/// Planar observer position recorded for a scene.
pub type ReferencePoint = [f64; 2];

/// Ordered collection of scenes, each with an optional observer position.
///
/// Insertion order follows input order. Neither relation model depends on it,
/// but keeping it makes per-scene outputs reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    max_labels: usize,
    scenes: Vec<Scene>,
    references: Vec<Option<ReferencePoint>>,
}

impl Dataset {
    pub fn new(max_labels: usize) -> Self {
        Self {
            max_labels,
            scenes: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Appends a scene. The scene must share this dataset's label space.
    pub fn push(&mut self, scene: Scene, reference: Option<ReferencePoint>) -> Result<()> {
        if scene.max_labels() != self.max_labels {
            return Err(SpatialRelError::DimensionMismatch {
                expected: self.max_labels,
                got: scene.max_labels(),
            });
        }
        self.scenes.push(scene);
        self.references.push(reference);
        Ok(())
    }

    /// Builds one scene per cloud in parallel and collects them in input order.
    ///
    /// `references`, when given, must hold one entry per cloud. The cancel flag
    /// is checked before each scene starts; a raised flag aborts the build with
    /// [`SpatialRelError::Cancelled`].
    pub fn build_par(
        builder: &SceneBuilder,
        clouds: &[LabelledCloud],
        references: Option<&[Option<ReferencePoint>]>,
        cancel: &CancelFlag,
    ) -> Result<Self> {
        if let Some(refs) = references {
            if refs.len() != clouds.len() {
                return Err(SpatialRelError::ReferenceCountMismatch {
                    scenes: clouds.len(),
                    references: refs.len(),
                });
            }
        }

        let completed = AtomicUsize::new(0);
        let scenes = clouds
            .par_iter()
            .map(|cloud| {
                if cancel.is_cancelled() {
                    return Err(SpatialRelError::Cancelled {
                        completed: completed.load(Ordering::SeqCst),
                    });
                }
                let scene = builder.build_cloud(cloud)?;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(scene)
            })
            .collect::<Result<Vec<Scene>>>()?;

        let references = match references {
            Some(refs) => refs.to_vec(),
            None => vec![None; scenes.len()],
        };

        info!(scenes = scenes.len(), "dataset built");
        Ok(Self {
            max_labels: builder.max_labels(),
            scenes,
            references,
        })
    }

    /// Sequential counterpart of [`Dataset::build_par`], without cancellation.
    pub fn build(
        builder: &SceneBuilder,
        clouds: &[LabelledCloud],
        references: Option<&[Option<ReferencePoint>]>,
    ) -> Result<Self> {
        if let Some(refs) = references {
            if refs.len() != clouds.len() {
                return Err(SpatialRelError::ReferenceCountMismatch {
                    scenes: clouds.len(),
                    references: refs.len(),
                });
            }
        }

        let mut dataset = Self::new(builder.max_labels());
        for (k, cloud) in clouds.iter().enumerate() {
            let reference = references.and_then(|refs| refs[k]);
            dataset.push(builder.build_cloud(cloud)?, reference)?;
            debug!(scene = k, "scene appended");
        }
        Ok(dataset)
    }

    pub fn max_labels(&self) -> usize {
        self.max_labels
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene(&self, k: usize) -> &Scene {
        &self.scenes[k]
    }

    pub fn reference(&self, k: usize) -> Option<ReferencePoint> {
        self.references[k]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Scene, Option<ReferencePoint>)> + '_ {
        self.scenes.iter().zip(self.references.iter().copied())
    }

    /// Number of scenes each label appears in, indexed by label.
    pub fn presence_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.max_labels];
        for scene in &self.scenes {
            for label in scene.presence().iter_present() {
                counts[label as usize] += 1;
            }
        }
        counts
    }

    /// Labels present in at least one scene, ascending.
    pub fn observed_labels(&self) -> Vec<u32> {
        self.presence_counts()
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(l, _)| l as u32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatialrel_core::LabelledCloud;

    fn cloud(points: &[(f32, f32, u32)]) -> LabelledCloud {
        let mut c = LabelledCloud::new();
        for &(x, y, l) in points {
            c.push(x, y, 0.0, l);
        }
        c
    }

    #[test]
    fn push_rejects_foreign_label_space() {
        let mut ds = Dataset::new(4);
        let err = ds.push(Scene::empty(5), None).unwrap_err();
        assert_eq!(
            err,
            SpatialRelError::DimensionMismatch {
                expected: 4,
                got: 5
            }
        );
        assert!(ds.is_empty());
    }

    #[test]
    fn presence_counts_per_label() {
        let builder = SceneBuilder::new(4);
        let clouds = vec![
            cloud(&[(0.0, 0.0, 1), (1.0, 0.0, 2)]),
            cloud(&[(0.0, 0.0, 1)]),
            cloud(&[]),
        ];
        let ds = Dataset::build(&builder, &clouds, None).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.presence_counts(), vec![0, 2, 1, 0]);
        assert_eq!(ds.observed_labels(), vec![1, 2]);
        assert!(ds.iter().all(|(_, r)| r.is_none()));
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let builder = SceneBuilder::new(6);
        let clouds: Vec<LabelledCloud> = (0..32)
            .map(|k| {
                let f = k as f32;
                cloud(&[(f, 0.0, 0), (f + 1.0, 2.0, (k % 5) as u32 + 1), (f, 1.0, 0)])
            })
            .collect();
        let refs: Vec<Option<ReferencePoint>> = (0..32)
            .map(|k| if k % 3 == 0 { None } else { Some([k as f64, -1.0]) })
            .collect();

        let seq = Dataset::build(&builder, &clouds, Some(&refs[..])).unwrap();
        let par = Dataset::build_par(&builder, &clouds, Some(&refs[..]), &CancelFlag::new()).unwrap();
        assert_eq!(seq, par);
        assert_eq!(par.reference(1), Some([1.0, -1.0]));
        assert_eq!(par.reference(3), None);
    }

    #[test]
    fn reference_count_must_match() {
        let builder = SceneBuilder::new(2);
        let clouds = vec![cloud(&[(0.0, 0.0, 0)])];
        let err = Dataset::build_par(&builder, &clouds, Some(&[][..]), &CancelFlag::new()).unwrap_err();
        assert_eq!(
            err,
            SpatialRelError::ReferenceCountMismatch {
                scenes: 1,
                references: 0
            }
        );
    }

    #[test]
    fn raised_flag_cancels_build() {
        let builder = SceneBuilder::new(2);
        let clouds = vec![cloud(&[(0.0, 0.0, 0)]); 4];
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = Dataset::build_par(&builder, &clouds, None, &cancel).unwrap_err();
        assert!(matches!(err, SpatialRelError::Cancelled { .. }));
    }

    #[test]
    fn bad_label_in_any_cloud_fails_build() {
        let builder = SceneBuilder::new(2);
        let clouds = vec![cloud(&[(0.0, 0.0, 0)]), cloud(&[(0.0, 0.0, 9)])];
        let err = Dataset::build_par(&builder, &clouds, None, &CancelFlag::new()).unwrap_err();
        assert!(matches!(err, SpatialRelError::LabelOutOfRange { label: 9, .. }));
    }
}
