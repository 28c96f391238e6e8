use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spatialrel_core::AnalysisConfig;
use spatialrel_query::QueryConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of the optional `--config` TOML file. Every section may be
/// omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub analysis: AnalysisConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub out_dir: PathBuf,
    /// Write `presence/scene_<k>.txt` for every scene.
    pub presence: bool,
    /// Write `objects/scene_<k>.txt` for every scene.
    pub objects: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("spatialrel-out"),
            presence: true,
            objects: true,
        }
    }
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }
}
