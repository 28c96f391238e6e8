use spatialrel_core::{AnalysisConfig, LabelledCloud};
use spatialrel_relations::RelationClassifier;
use spatialrel_scene::{CancelFlag, Dataset, SceneBuilder};
use spatialrel_stats::DistanceAggregator;

const TABLE: u32 = 1;
const CHAIR: u32 = 2;
const LAMP: u32 = 3;

fn blob(cloud: &mut LabelledCloud, center: [f32; 3], label: u32) {
    for i in 0..20 {
        let t = i as f32 * 0.3;
        cloud.push(
            center[0] + 0.05 * t.cos(),
            center[1] + 0.05 * t.sin(),
            center[2],
            label,
        );
    }
}

fn main() {
    // Ten rooms: a chair beside the table, a lamp further off.
    let mut clouds = Vec::new();
    let mut references = Vec::new();
    for k in 0..10 {
        let jitter = (k as f32 * 0.37).sin() * 0.2;
        let mut cloud = LabelledCloud::new();
        blob(&mut cloud, [0.0, 0.0, 0.7], TABLE);
        blob(&mut cloud, [0.0, 0.9 + jitter, 0.4], CHAIR);
        blob(&mut cloud, [3.0 + jitter, -1.0, 1.5], LAMP);
        clouds.push(cloud);
        references.push(Some([-2.5, 0.0]));
    }

    let config = AnalysisConfig {
        max_labels: 4,
        ..AnalysisConfig::default()
    };
    let builder = SceneBuilder::from_config(&config);
    let dataset = match Dataset::build_par(&builder, &clouds, Some(&references[..]), &CancelFlag::new())
    {
        Ok(ds) => ds,
        Err(e) => {
            eprintln!("failed to build dataset: {e}");
            return;
        }
    };
    println!("Scenes: {}", dataset.len());
    println!("Label occurrences: {:?}", dataset.presence_counts());

    let stats = DistanceAggregator::new(&config).aggregate(&dataset);
    for (i, j, s) in stats.observed_pairs() {
        println!(
            "pair ({i}, {j}): mean {:.3}, std {:.3} over {} scenes",
            s.mean, s.std_dev, s.count
        );
    }

    let relations = RelationClassifier::new(&config).classify(&dataset);
    println!("chair relative to table: {}", relations.get(TABLE, CHAIR));
    println!("lamp relative to table: {}", relations.get(TABLE, LAMP));
}
