use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use spatialrel_query::{value_map, BestCell, ValueMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Pair statistics written by `spatialrel analyze`.
    #[arg(long)]
    pub statistics: PathBuf,

    /// Label of the object to place.
    #[arg(long)]
    pub target: u32,

    /// Observed object as `LABEL:X:Y`; repeat for several anchors.
    #[arg(long = "anchor", value_parser = parse_anchor)]
    pub anchors: Vec<(u32, [f64; 2])>,

    /// Grid samples per axis.
    #[arg(long)]
    pub cells: Option<usize>,

    #[arg(long)]
    pub half_extent: Option<f64>,

    /// Write the full value map, one grid row per line.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    pub target: u32,
    pub anchors: usize,
    pub contributing_anchors: usize,
    pub best: Option<BestPlacement>,
}

#[derive(Debug, Serialize)]
pub struct BestPlacement {
    pub row: usize,
    pub col: usize,
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl From<BestCell> for BestPlacement {
    fn from(cell: BestCell) -> Self {
        Self {
            row: cell.row,
            col: cell.col,
            x: cell.position[0],
            y: cell.position[1],
            value: cell.value,
        }
    }
}

pub fn run(args: &QueryArgs, mut config: CliConfig) -> Result<QueryOutcome> {
    if let Some(cells) = args.cells {
        config.query.cells = cells;
    }
    if let Some(h) = args.half_extent {
        config.query.half_extent = h;
    }

    let stats = spatialrel_io::read_pair_statistics(&args.statistics)
        .with_context(|| format!("failed to read statistics {}", args.statistics.display()))?;
    let map = value_map(&stats, args.target, &args.anchors, &config.query)?;

    if let Some(path) = &args.output {
        write_value_map(path, &map)
            .with_context(|| format!("failed to write value map {}", path.display()))?;
    }

    let best = map.best_cell().map(BestPlacement::from);
    if let Some(b) = &best {
        info!(target_label = args.target, x = b.x, y = b.y, value = b.value, "best placement");
    } else {
        info!(target_label = args.target, "no anchor carries statistics for this target");
    }

    Ok(QueryOutcome {
        target: args.target,
        anchors: args.anchors.len(),
        contributing_anchors: map.contributing_anchors(),
        best,
    })
}

fn parse_anchor(s: &str) -> Result<(u32, [f64; 2])> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        bail!("expected LABEL:X:Y, got {s}");
    }
    let label = parts[0]
        .parse::<u32>()
        .with_context(|| format!("invalid anchor label {}", parts[0]))?;
    let x = parts[1]
        .parse::<f64>()
        .with_context(|| format!("invalid anchor x {}", parts[1]))?;
    let y = parts[2]
        .parse::<f64>()
        .with_context(|| format!("invalid anchor y {}", parts[2]))?;
    if !(x.is_finite() && y.is_finite()) {
        bail!("anchor position must be finite, got {s}");
    }
    Ok((label, [x, y]))
}

fn write_value_map(path: &Path, map: &ValueMap) -> std::io::Result<()> {
    let values = map.values();
    let mut out = format!(
        "# value_map rows={} cols={} x0={} y0={}\n",
        values.nrows(),
        values.ncols(),
        map.xs().first().copied().unwrap_or_default(),
        map.ys().first().copied().unwrap_or_default()
    );
    for row in values.row_iter() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    fs::write(path, out)
}
