use rayon::prelude::*;
use spatialrel_core::{AnalysisConfig, LabelMatrix, ObjectSummary, Scene};
use spatialrel_scene::{Dataset, ReferencePoint};
use tracing::{info, warn};

use crate::relation::Relation;

/// Per ordered pair relation plus the number of scenes that voted for it.
///
/// Not symmetric: `get(i, j)` describes where `j` lies as seen from `i`.
/// Diagonal cells are [`Relation::Same`] with zero votes.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationMatrix {
    relations: LabelMatrix<Relation>,
    observations: LabelMatrix<usize>,
}

impl RelationMatrix {
    pub fn unrelated(max_labels: usize) -> Self {
        let mut relations = LabelMatrix::filled(max_labels, Relation::Unrelated);
        for i in 0..max_labels {
            relations.set(i, i, Relation::Same);
        }
        Self {
            relations,
            observations: LabelMatrix::filled(max_labels, 0),
        }
    }

    pub fn max_labels(&self) -> usize {
        self.relations.dim()
    }

    pub fn get(&self, i: u32, j: u32) -> Relation {
        *self.relations.get(i as usize, j as usize)
    }

    /// Scenes that contributed a vote for the ordered pair `(i, j)`.
    pub fn observations(&self, i: u32, j: u32) -> usize {
        *self.observations.get(i as usize, j as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Relation]> + '_ {
        self.relations.rows()
    }

    fn record(&mut self, i: u32, j: u32, relation: Relation, votes: usize) {
        self.relations.set(i as usize, j as usize, relation);
        self.observations.set(i as usize, j as usize, votes);
    }
}

/// Buckets each scene's object pairs by direction and votes across scenes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationClassifier {
    same_threshold: f64,
    no_relation_threshold: f64,
    front_sector: (f64, f64),
}

impl RelationClassifier {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            same_threshold: config.same_threshold,
            no_relation_threshold: config.no_relation_threshold,
            front_sector: config.front_sector,
        }
    }

    /// Relation of `j` as seen from `i`, for an observer at `reference`.
    ///
    /// The separation decides SAME (at or below `same_threshold`) and
    /// UNRELATED (strictly above `no_relation_threshold`). Between the two,
    /// the bearing from `i` to `j` is measured against the bearing from the
    /// observer to `i`, normalized into (-180, 180] degrees, and bucketed by
    /// the front sector.
    pub fn bucket(
        &self,
        i: &ObjectSummary,
        j: &ObjectSummary,
        reference: ReferencePoint,
    ) -> Relation {
        let delta = i.planar_offset_to(j);
        let separation = delta.x.hypot(delta.y);

        if separation <= self.same_threshold {
            return Relation::Same;
        }
        if separation > self.no_relation_threshold {
            return Relation::Unrelated;
        }

        let [ix, iy] = i.planar_centroid();
        let yaw_ref = (iy - reference[1]).atan2(ix - reference[0]);
        let yaw_ij = delta.y.atan2(delta.x);
        let yaw = normalize_degrees((yaw_ij - yaw_ref).to_degrees());

        let (lo, hi) = self.front_sector;
        let magnitude = yaw.abs();
        if magnitude < lo {
            Relation::Left
        } else if magnitude > hi {
            Relation::Right
        } else if yaw > 0.0 {
            Relation::Front
        } else {
            Relation::Behind
        }
    }

    /// Per-scene relation for every ordered pair of co-occurring labels.
    /// Empty when the reference point is not finite.
    pub fn scene_relations(
        &self,
        scene: &Scene,
        reference: ReferencePoint,
    ) -> Vec<(u32, u32, Relation)> {
        if !is_usable(reference) {
            return Vec::new();
        }
        let objects: Vec<&ObjectSummary> = scene.objects().collect();
        let mut out = Vec::with_capacity(objects.len() * objects.len().saturating_sub(1));
        for a in &objects {
            for b in &objects {
                if a.label() != b.label() {
                    out.push((a.label(), b.label(), self.bucket(a, b, reference)));
                }
            }
        }
        out
    }

    /// Vote tally for the ordered pair `(i, j)`, indexed by relation code.
    ///
    /// Only scenes that contain both labels and carry a finite reference
    /// point vote.
    pub fn tally(&self, dataset: &Dataset, i: u32, j: u32) -> [usize; 6] {
        let mut votes = [0usize; 6];
        for (scene, reference) in dataset.iter() {
            let Some(reference) = reference.filter(|r| is_usable(*r)) else {
                continue;
            };
            if let Some((a, b)) = scene.pair(i, j) {
                votes[self.bucket(a, b, reference).code() as usize] += 1;
            }
        }
        votes
    }

    /// Classifies every ordered label pair of the dataset.
    ///
    /// Scenes without a reference point, or with a non-finite one, are
    /// skipped with a warning. Pairs no usable scene observed stay
    /// [`Relation::Unrelated`].
    pub fn classify(&self, dataset: &Dataset) -> RelationMatrix {
        let mut skipped = 0usize;
        for (k, (_, reference)) in dataset.iter().enumerate() {
            match reference {
                None => {
                    warn!(scene = k, "no reference point, scene skipped by relation classifier");
                    skipped += 1;
                }
                Some(r) if !is_usable(r) => {
                    warn!(
                        scene = k,
                        x = r[0],
                        y = r[1],
                        "non-finite reference point, scene skipped by relation classifier"
                    );
                    skipped += 1;
                }
                Some(_) => {}
            }
        }

        let labels = dataset.observed_labels();
        let pairs: Vec<(u32, u32)> = labels
            .iter()
            .flat_map(|&i| labels.iter().filter(move |&&j| j != i).map(move |&j| (i, j)))
            .collect();

        let results: Vec<(u32, u32, [usize; 6])> = pairs
            .par_iter()
            .map(|&(i, j)| (i, j, self.tally(dataset, i, j)))
            .filter(|(_, _, votes)| votes.iter().any(|v| *v > 0))
            .collect();

        let mut matrix = RelationMatrix::unrelated(dataset.max_labels());
        for (i, j, votes) in &results {
            matrix.record(*i, *j, Relation::vote(votes), votes.iter().sum());
        }

        info!(
            scenes = dataset.len(),
            skipped_scenes = skipped,
            classified_pairs = results.len(),
            "relation matrix classified"
        );
        matrix
    }
}

fn is_usable(reference: ReferencePoint) -> bool {
    reference.iter().all(|c| c.is_finite())
}

fn normalize_degrees(mut deg: f64) -> f64 {
    while deg > 180.0 {
        deg -= 360.0;
    }
    while deg <= -180.0 {
        deg += 360.0;
    }
    deg
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use spatialrel_core::LabelledPoint;
    use spatialrel_scene::SceneBuilder;

    fn obj(label: u32, x: f64, y: f64) -> ObjectSummary {
        ObjectSummary::new(label, [x, y, 0.0])
    }

    fn classifier() -> RelationClassifier {
        RelationClassifier::new(&AnalysisConfig::default())
    }

    fn scene(objects: &[(u32, f64, f64)]) -> Scene {
        let points: Vec<LabelledPoint> = objects
            .iter()
            .map(|&(l, x, y)| LabelledPoint::new(x, y, 0.0, l))
            .collect();
        SceneBuilder::new(8).build(points).unwrap()
    }

    #[test]
    fn normalize_into_half_open_range() {
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(270.0), -90.0);
        assert_eq!(normalize_degrees(-270.0), 90.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn four_sectors_around_observer_ray() {
        // Observer at the origin looks along +x at object i.
        let c = classifier();
        let reference = [0.0, 0.0];
        let i = obj(0, 1.0, 0.0);
        assert_eq!(c.bucket(&i, &obj(1, 2.0, 0.0), reference), Relation::Left);
        assert_eq!(c.bucket(&i, &obj(1, 1.0, 1.0), reference), Relation::Front);
        assert_eq!(c.bucket(&i, &obj(1, 0.0, 0.0), reference), Relation::Right);
        assert_eq!(c.bucket(&i, &obj(1, 1.0, -1.0), reference), Relation::Behind);
    }

    #[test]
    fn sector_follows_observer_bearing() {
        // Observer below i: the ray points along +y, so +x-offset is now 90 deg clockwise.
        let c = classifier();
        let i = obj(0, 0.0, 0.0);
        let reference = [0.0, -3.0];
        assert_eq!(c.bucket(&i, &obj(1, 0.0, 1.0), reference), Relation::Left);
        assert_eq!(c.bucket(&i, &obj(1, -1.0, 0.0), reference), Relation::Front);
        assert_eq!(c.bucket(&i, &obj(1, 1.0, 0.0), reference), Relation::Behind);
    }

    #[test]
    fn separation_thresholds() {
        let c = classifier();
        let i = obj(0, 0.0, 0.0);
        let reference = [-1.0, 0.0];
        assert_eq!(c.bucket(&i, &obj(1, 0.05, 0.0), reference), Relation::Same);
        assert_eq!(c.bucket(&i, &obj(1, 0.1, 0.0), reference), Relation::Same);
        assert_eq!(c.bucket(&i, &obj(1, 2.0, 0.0), reference), Relation::Left);
        assert_eq!(c.bucket(&i, &obj(1, 2.5, 0.0), reference), Relation::Unrelated);
    }

    #[test]
    fn sector_boundaries_belong_to_front_and_behind() {
        let c = classifier();
        let reference = [-1.0, 0.0];
        let i = obj(0, 0.0, 0.0);
        let at = |deg: f64| {
            let r = deg.to_radians();
            obj(1, r.cos(), r.sin())
        };
        assert_eq!(c.bucket(&i, &at(44.0), reference), Relation::Left);
        assert_eq!(c.bucket(&i, &at(46.0), reference), Relation::Front);
        assert_eq!(c.bucket(&i, &at(134.0), reference), Relation::Front);
        assert_eq!(c.bucket(&i, &at(136.0), reference), Relation::Right);
        assert_eq!(c.bucket(&i, &at(-46.0), reference), Relation::Behind);
        assert_eq!(c.bucket(&i, &at(-136.0), reference), Relation::Right);
    }

    #[test]
    fn scene_relations_cover_ordered_pairs() {
        let s = scene(&[(0, 0.0, 0.0), (1, 1.0, 0.0), (2, 5.0, 0.0)]);
        let rels = classifier().scene_relations(&s, [-1.0, 0.0]);
        assert_eq!(rels.len(), 6);
        assert!(rels.contains(&(0, 1, Relation::Left)));
        assert!(rels.contains(&(1, 0, Relation::Right)));
        assert!(rels.contains(&(0, 2, Relation::Unrelated)));
    }

    #[test]
    fn classify_votes_across_scenes() {
        let mut ds = Dataset::new(8);
        for k in 0..3 {
            let shift = k as f64;
            ds.push(
                scene(&[(1, shift, 0.0), (2, shift, 1.0)]),
                Some([shift - 2.0, 0.0]),
            )
            .unwrap();
        }
        let m = classifier().classify(&ds);
        assert_eq!(m.get(1, 2), Relation::Front);
        assert_eq!(m.observations(1, 2), 3);
        assert_eq!(m.get(2, 1), Relation::Behind);
        assert_eq!(m.get(1, 3), Relation::Unrelated);
        assert_eq!(m.observations(1, 3), 0);
    }

    #[test]
    fn scenes_without_reference_do_not_vote() {
        let mut ds = Dataset::new(8);
        ds.push(scene(&[(1, 0.0, 0.0), (2, 0.0, 1.0)]), None).unwrap();
        let m = classifier().classify(&ds);
        assert_eq!(m.get(1, 2), Relation::Unrelated);
        assert_eq!(m.observations(1, 2), 0);
    }

    #[test]
    fn non_finite_reference_does_not_vote() {
        let mut ds = Dataset::new(8);
        ds.push(scene(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]), Some([f64::NAN, 0.0]))
            .unwrap();
        ds.push(scene(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]), Some([0.0, f64::INFINITY]))
            .unwrap();
        let c = classifier();
        assert_eq!(c.tally(&ds, 1, 2), [0; 6]);
        let m = c.classify(&ds);
        assert_eq!(m.get(1, 2), Relation::Unrelated);
        assert_eq!(m.observations(1, 2), 0);
        let s = scene(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        assert!(c.scene_relations(&s, [f64::NAN, 0.0]).is_empty());
    }

    #[test]
    fn empty_dataset_is_all_unrelated() {
        let m = classifier().classify(&Dataset::new(4));
        for i in 0..4u32 {
            for j in 0..4u32 {
                if i != j {
                    assert_eq!(m.get(i, j), Relation::Unrelated);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn bucket_is_total(
            ix in -5.0f64..5.0, iy in -5.0f64..5.0,
            jx in -5.0f64..5.0, jy in -5.0f64..5.0,
            rx in -5.0f64..5.0, ry in -5.0f64..5.0,
        ) {
            let r = classifier().bucket(&obj(0, ix, iy), &obj(1, jx, jy), [rx, ry]);
            prop_assert!(Relation::ALL.contains(&r));
        }
    }
}
