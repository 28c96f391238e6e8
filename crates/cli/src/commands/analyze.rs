use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use spatialrel_core::{AnalysisConfig, LabelledCloud};
use spatialrel_io::reference::check_reference_count;
use spatialrel_relations::{Relation, RelationClassifier};
use spatialrel_scene::{CancelFlag, Dataset, SceneBuilder};
use spatialrel_stats::DistanceAggregator;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Labelled point clouds (`.pcd` or `.las`), one per scene.
    #[arg(required = true)]
    pub clouds: Vec<PathBuf>,

    /// Observer positions, one `x y` line (or `-`) per scene.
    #[arg(long)]
    pub references: Option<PathBuf>,

    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    #[arg(long)]
    pub max_labels: Option<usize>,

    /// Measure distances in 3-D instead of on the ground plane.
    #[arg(long)]
    pub use_3d: bool,

    #[arg(long)]
    pub same_threshold: Option<f64>,

    #[arg(long)]
    pub no_relation_threshold: Option<f64>,
}

/// Run report written to `summary.json` and printed on stdout.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub config: AnalysisConfig,
    pub scenes: usize,
    pub scenes_with_reference: usize,
    pub observed_labels: usize,
    pub observed_pairs: usize,
    /// Off-diagonal relation matrix entries per relation name.
    pub relation_counts: BTreeMap<&'static str, usize>,
    pub out_dir: PathBuf,
}

impl AnalyzeArgs {
    fn apply(&self, config: &mut CliConfig) {
        let analysis = &mut config.analysis;
        if let Some(n) = self.max_labels {
            analysis.max_labels = n;
        }
        if self.use_3d {
            analysis.use_3d = true;
        }
        if let Some(t) = self.same_threshold {
            analysis.same_threshold = t;
        }
        if let Some(t) = self.no_relation_threshold {
            analysis.no_relation_threshold = t;
        }
        if let Some(dir) = &self.out_dir {
            config.output.out_dir = dir.clone();
        }
    }
}

pub fn run(args: &AnalyzeArgs, mut config: CliConfig) -> Result<RunSummary> {
    args.apply(&mut config);
    let analysis = &config.analysis;
    analysis.validate()?;

    let references = match &args.references {
        Some(path) => {
            let refs = spatialrel_io::read_reference_points(path)
                .with_context(|| format!("failed to read references {}", path.display()))?;
            check_reference_count(args.clouds.len(), refs.len())?;
            Some(refs)
        }
        None => None,
    };

    let clouds = args
        .clouds
        .iter()
        .map(|path| {
            spatialrel_io::read_labelled_cloud(path)
                .with_context(|| format!("failed to read cloud {}", path.display()))
        })
        .collect::<Result<Vec<LabelledCloud>>>()?;
    info!(clouds = clouds.len(), "clouds loaded");

    let builder = SceneBuilder::from_config(analysis);
    let dataset = Dataset::build_par(&builder, &clouds, references.as_deref(), &CancelFlag::new())?;

    let stats = DistanceAggregator::new(analysis).aggregate(&dataset);
    let relations = RelationClassifier::new(analysis).classify(&dataset);

    let out_dir = &config.output.out_dir;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    if config.output.presence {
        let dir = out_dir.join("presence");
        fs::create_dir_all(&dir)?;
        for (k, scene) in dataset.scenes().iter().enumerate() {
            spatialrel_io::write_presence(dir.join(format!("scene_{k}.txt")), scene.presence())?;
        }
    }
    if config.output.objects {
        let dir = out_dir.join("objects");
        fs::create_dir_all(&dir)?;
        for (k, scene) in dataset.scenes().iter().enumerate() {
            spatialrel_io::write_object_summaries(dir.join(format!("scene_{k}.txt")), scene)?;
        }
    }
    spatialrel_io::write_pair_statistics(out_dir.join("pair_statistics.txt"), &stats)?;
    spatialrel_io::write_relations(out_dir.join("relations.txt"), &relations)?;

    let mut relation_counts: BTreeMap<&'static str, usize> =
        Relation::ALL.iter().map(|r| (r.name(), 0)).collect();
    for (i, row) in relations.rows().enumerate() {
        for (j, relation) in row.iter().enumerate() {
            if i != j {
                *relation_counts.entry(relation.name()).or_default() += 1;
            }
        }
    }

    let summary = RunSummary {
        config: analysis.clone(),
        scenes: dataset.len(),
        scenes_with_reference: dataset.iter().filter(|(_, r)| r.is_some()).count(),
        observed_labels: dataset.observed_labels().len(),
        observed_pairs: stats.observed_pairs().count(),
        relation_counts,
        out_dir: out_dir.clone(),
    };
    fs::write(
        out_dir.join("summary.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;
    info!(
        scenes = summary.scenes,
        observed_pairs = summary.observed_pairs,
        out_dir = %out_dir.display(),
        "analysis written"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatialrel_io::{write_labelled_pcd, write_reference_points};
    use tempfile::TempDir;

    fn cloud(points: &[([f32; 3], u32)]) -> LabelledCloud {
        let mut c = LabelledCloud::new();
        for ([x, y, z], label) in points {
            c.push(*x, *y, *z, *label);
        }
        c
    }

    fn args(dir: &TempDir, clouds: Vec<PathBuf>, references: Option<PathBuf>) -> AnalyzeArgs {
        AnalyzeArgs {
            clouds,
            references,
            out_dir: Some(dir.path().join("out")),
            max_labels: Some(4),
            use_3d: false,
            same_threshold: None,
            no_relation_threshold: None,
        }
    }

    #[test]
    fn writes_every_artifact() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.pcd");
        let b = dir.path().join("b.pcd");
        write_labelled_pcd(&a, &cloud(&[([0.0, 0.0, 0.0], 0), ([1.0, 0.0, 0.0], 1)])).unwrap();
        write_labelled_pcd(&b, &cloud(&[([0.0, 0.0, 0.0], 0), ([3.0, 0.0, 0.0], 1)])).unwrap();
        let refs = dir.path().join("refs.txt");
        write_reference_points(&refs, &[Some([-2.0, 0.0]), None]).unwrap();

        let summary = run(&args(&dir, vec![a, b], Some(refs)), CliConfig::default()).unwrap();
        assert_eq!(summary.scenes, 2);
        assert_eq!(summary.scenes_with_reference, 1);
        assert_eq!(summary.observed_labels, 2);
        assert_eq!(summary.observed_pairs, 1);
        assert_eq!(summary.config.max_labels, 4);
        assert_eq!(summary.relation_counts.values().sum::<usize>(), 12);

        let out = dir.path().join("out");
        for file in [
            "presence/scene_0.txt",
            "presence/scene_1.txt",
            "objects/scene_0.txt",
            "objects/scene_1.txt",
            "pair_statistics.txt",
            "relations.txt",
            "summary.json",
        ] {
            assert!(out.join(file).exists(), "missing {file}");
        }

        let stats = spatialrel_io::read_pair_statistics(out.join("pair_statistics.txt")).unwrap();
        assert_eq!(stats.get(0, 1).mean, 2.0);
        assert_eq!(stats.get(0, 1).count, 2);
    }

    #[test]
    fn reference_count_mismatch_fails_early() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.pcd");
        write_labelled_pcd(&a, &cloud(&[([0.0, 0.0, 0.0], 0)])).unwrap();
        let refs = dir.path().join("refs.txt");
        write_reference_points(&refs, &[None, None]).unwrap();

        let err = run(&args(&dir, vec![a], Some(refs)), CliConfig::default()).unwrap_err();
        assert!(format!("{err}").contains("1 scenes were supplied with 2 reference points"));
    }

    #[test]
    fn out_of_range_label_is_rejected() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.pcd");
        write_labelled_pcd(&a, &cloud(&[([0.0, 0.0, 0.0], 7)])).unwrap();
        assert!(run(&args(&dir, vec![a], None), CliConfig::default()).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let mut config = CliConfig::default();
        config.analysis.same_threshold = 0.5;
        let mut a = args(&dir, vec![], None);
        a.same_threshold = Some(0.2);
        a.use_3d = true;
        a.apply(&mut config);
        assert_eq!(config.analysis.same_threshold, 0.2);
        assert_eq!(config.analysis.max_labels, 4);
        assert!(config.analysis.use_3d);
        assert_eq!(config.output.out_dir, dir.path().join("out"));
    }
}
