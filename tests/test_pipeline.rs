use approx::{assert_relative_eq, relative_eq};
use proptest::prelude::*;
use spatialrel_core::{AnalysisConfig, Scene};
use spatialrel_relations::{Relation, RelationClassifier};
use spatialrel_scene::{CancelFlag, Dataset, SceneBuilder};
use spatialrel_stats::{DistanceAggregator, UNOBSERVED_MEAN};

fn config(max_labels: usize) -> AnalysisConfig {
    AnalysisConfig {
        max_labels,
        ..AnalysisConfig::default()
    }
}

fn scene(builder: &SceneBuilder, points: &[([f64; 3], u32)]) -> Scene {
    builder.build(points.iter().copied()).unwrap()
}

/// Two scenes with labels 1 and 2 at distances 1 and 3.
#[test]
fn distance_statistics_over_two_scenes() {
    let cfg = config(4);
    let builder = SceneBuilder::from_config(&cfg);
    let mut dataset = Dataset::new(cfg.max_labels);
    dataset
        .push(scene(&builder, &[([0.0, 0.0, 0.0], 1), ([1.0, 0.0, 0.0], 2)]), None)
        .unwrap();
    dataset
        .push(scene(&builder, &[([0.0, 0.0, 0.0], 1), ([3.0, 0.0, 0.0], 2)]), None)
        .unwrap();

    let stats = DistanceAggregator::new(&cfg).aggregate(&dataset);
    let cell = stats.get(1, 2);
    assert_relative_eq!(cell.mean, 2.0);
    assert_relative_eq!(cell.std_dev, 1.0);
    assert_eq!(cell.count, 2);
    assert_eq!(stats.get(2, 1), cell);
}

/// A lone label leaves every pair at its sentinel.
#[test]
fn single_label_scene_keeps_sentinels() {
    let cfg = config(5);
    let builder = SceneBuilder::from_config(&cfg);
    let s = scene(&builder, &[([1.0, 2.0, 0.0], 1), ([1.5, 2.5, 0.0], 1)]);
    assert_eq!(s.presence().to_flags(), vec![0, 1, 0, 0, 0]);

    let mut dataset = Dataset::new(cfg.max_labels);
    dataset.push(s, Some([0.0, 0.0])).unwrap();

    let stats = DistanceAggregator::new(&cfg).aggregate(&dataset);
    for other in [0, 2, 3, 4] {
        let cell = stats.get(1, other);
        assert_eq!(cell.mean, UNOBSERVED_MEAN);
        assert_eq!(cell.std_dev, cfg.deviation_sentinel);
        assert_eq!(cell.count, 0);
    }

    let relations = RelationClassifier::new(&cfg).classify(&dataset);
    assert_eq!(relations.get(1, 2), Relation::Unrelated);
    assert_eq!(relations.get(1, 1), Relation::Same);
}

/// With the observer behind `i`, an object beside `i` at separation 1.0 on
/// the counter-clockwise side reads FRONT in every scene.
#[test]
fn consistent_scenes_vote_front() {
    let cfg = config(3);
    let builder = SceneBuilder::from_config(&cfg);
    let mut dataset = Dataset::new(cfg.max_labels);
    for k in 0..5 {
        let x = k as f64 * 4.0;
        let s = scene(&builder, &[([x, 0.0, 0.0], 0), ([x, 1.0, 0.0], 1)]);
        dataset.push(s, Some([x - 2.0, 0.0])).unwrap();
    }

    let relations = RelationClassifier::new(&cfg).classify(&dataset);
    assert_eq!(relations.get(0, 1), Relation::Front);
    assert_eq!(relations.get(1, 0), Relation::Behind);
    assert_eq!(relations.observations(0, 1), 5);
    assert_eq!(relations.get(0, 2), Relation::Unrelated);
}

/// A minority of disagreeing scenes does not flip the vote.
#[test]
fn majority_direction_wins() {
    let cfg = config(2);
    let builder = SceneBuilder::from_config(&cfg);
    let mut dataset = Dataset::new(cfg.max_labels);
    for _ in 0..4 {
        let s = scene(&builder, &[([0.0, 0.0, 0.0], 0), ([0.0, 1.0, 0.0], 1)]);
        dataset.push(s, Some([-2.0, 0.0])).unwrap();
    }
    // j further along the observer ray reads LEFT.
    let s = scene(&builder, &[([0.0, 0.0, 0.0], 0), ([1.0, 0.0, 0.0], 1)]);
    dataset.push(s, Some([-2.0, 0.0])).unwrap();

    let classifier = RelationClassifier::new(&cfg);
    let tally = classifier.tally(&dataset, 0, 1);
    assert_eq!(tally[Relation::Front.code() as usize], 4);
    assert_eq!(tally[Relation::Left.code() as usize], 1);
    assert_eq!(classifier.classify(&dataset).get(0, 1), Relation::Front);
}

#[test]
fn parallel_build_matches_sequential() {
    use spatialrel_core::LabelledCloud;

    let cfg = config(6);
    let builder = SceneBuilder::from_config(&cfg);
    let clouds: Vec<LabelledCloud> = (0..12)
        .map(|k| {
            let mut c = LabelledCloud::new();
            for p in 0..30u32 {
                let label = (p + k) % 6;
                c.push(p as f32 * 0.25, (k as f32).sin(), 0.1 * label as f32, label);
            }
            c
        })
        .collect();
    let refs: Vec<Option<[f64; 2]>> = (0..12)
        .map(|k| if k % 3 == 0 { None } else { Some([-1.0, k as f64]) })
        .collect();

    let par = Dataset::build_par(&builder, &clouds, Some(&refs[..]), &CancelFlag::new()).unwrap();
    let seq = Dataset::build(&builder, &clouds, Some(&refs[..])).unwrap();
    assert_eq!(par.scenes(), seq.scenes());

    let aggregator = DistanceAggregator::new(&cfg);
    let classifier = RelationClassifier::new(&cfg);
    assert_eq!(aggregator.aggregate(&par), aggregator.aggregate(&seq));
    assert_eq!(classifier.classify(&par), classifier.classify(&seq));
}

#[test]
fn repeated_runs_are_identical() {
    let cfg = config(4);
    let builder = SceneBuilder::from_config(&cfg);
    let mut dataset = Dataset::new(cfg.max_labels);
    for k in 0..6 {
        let offset = k as f64 * 0.3;
        let s = scene(
            &builder,
            &[
                ([0.0, 0.0, 0.0], 0),
                ([1.0 + offset, 0.2, 0.0], 1),
                ([0.5, 1.0 - offset, 0.4], 2),
                ([-0.7, 0.3, 1.0], 3),
            ],
        );
        dataset.push(s, Some([-3.0, -1.0])).unwrap();
    }

    let aggregator = DistanceAggregator::new(&cfg);
    let classifier = RelationClassifier::new(&cfg);
    assert_eq!(aggregator.aggregate(&dataset), aggregator.aggregate(&dataset));
    assert_eq!(classifier.classify(&dataset), classifier.classify(&dataset));
}

type RawScene = (Vec<(u32, f64, f64)>, Option<[f64; 2]>);

fn raw_scene() -> impl Strategy<Value = RawScene> {
    (
        prop::collection::vec((0u32..4, -5.0f64..5.0, -5.0f64..5.0), 1..6),
        prop::option::of((-8.0f64..8.0, -8.0f64..8.0).prop_map(|(x, y)| [x, y])),
    )
}

fn dataset_of(builder: &SceneBuilder, raw: &[RawScene]) -> Dataset {
    let mut dataset = Dataset::new(4);
    for (points, reference) in raw {
        let points: Vec<([f64; 3], u32)> =
            points.iter().map(|&(l, x, y)| ([x, y, 0.0], l)).collect();
        dataset.push(scene(builder, &points), *reference).unwrap();
    }
    dataset
}

proptest! {
    /// Statistics are symmetric and neither output depends on scene order.
    #[test]
    fn outputs_are_symmetric_and_order_independent(
        raw in prop::collection::vec(raw_scene(), 0..10),
        rotate in 0usize..10,
    ) {
        let cfg = config(4);
        let builder = SceneBuilder::from_config(&cfg);
        let mut shuffled = raw.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let k = rotate % shuffled.len();
            shuffled.rotate_left(k);
        }

        let aggregator = DistanceAggregator::new(&cfg);
        let classifier = RelationClassifier::new(&cfg);
        let a = dataset_of(&builder, &raw);
        let b = dataset_of(&builder, &shuffled);
        let stats_a = aggregator.aggregate(&a);
        let stats_b = aggregator.aggregate(&b);

        for i in 0..4u32 {
            for j in 0..4u32 {
                prop_assert_eq!(stats_a.get(i, j), stats_a.get(j, i));
                let (x, y) = (stats_a.get(i, j), stats_b.get(i, j));
                prop_assert_eq!(x.count, y.count);
                prop_assert!(relative_eq!(x.mean, y.mean, epsilon = 1e-9, max_relative = 1e-9));
                prop_assert!(relative_eq!(x.std_dev, y.std_dev, epsilon = 1e-9, max_relative = 1e-9));
            }
        }
        prop_assert_eq!(classifier.classify(&a), classifier.classify(&b));
    }
}
