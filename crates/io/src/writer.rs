use spatialrel_core::{Presence, Scene};
use spatialrel_relations::{Relation, RelationMatrix};
use spatialrel_stats::{PairStat, PairStatistics};
use std::fs;
use std::io;
use std::path::Path;

/// Writes a scene's presence vector: `max_labels` lines of `0` or `1`.
pub fn write_presence(path: impl AsRef<Path>, presence: &Presence) -> io::Result<()> {
    let mut out = String::with_capacity(presence.len() * 2);
    for flag in presence.to_flags() {
        out.push_str(&format!("{}\n", flag));
    }
    fs::write(path, out)
}

/// Writes one `label point_count x y z` line per object in the scene.
pub fn write_object_summaries(path: impl AsRef<Path>, scene: &Scene) -> io::Result<()> {
    let mut out = String::from("# label point_count centroid_x centroid_y centroid_z\n");
    for obj in scene.objects() {
        let [x, y, z] = obj.centroid();
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            obj.label(),
            obj.point_count(),
            x,
            y,
            z
        ));
    }
    fs::write(path, out)
}

/// Writes every unordered pair as `i j mean std_dev count`, sentinel rows
/// included, after a header naming the label count and deviation sentinel.
pub fn write_pair_statistics(path: impl AsRef<Path>, stats: &PairStatistics) -> io::Result<()> {
    let mut out = format!(
        "# pair_statistics labels={} sentinel={}\n",
        stats.max_labels(),
        stats.deviation_sentinel()
    );
    for (i, j, s) in stats.upper_pairs() {
        out.push_str(&format!("{} {} {} {} {}\n", i, j, s.mean, s.std_dev, s.count));
    }
    fs::write(path, out)
}

/// Reads a file produced by [`write_pair_statistics`].
pub fn read_pair_statistics(path: impl AsRef<Path>) -> io::Result<PairStatistics> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();

    let header = lines
        .next()
        .ok_or_else(|| invalid("pair statistics file is empty"))?;
    let labels: usize = header_value(header, "labels")?;
    let sentinel: f64 = header_value(header, "sentinel")?;
    let mut stats = PairStatistics::unobserved(labels, sentinel);

    for (line_no, line) in lines.enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(invalid(format!(
                "line {}: expected `i j mean std_dev count`",
                line_no + 2
            )));
        }
        let i: u32 = parse(parts[0], line_no)?;
        let j: u32 = parse(parts[1], line_no)?;
        let stat = PairStat {
            mean: parse(parts[2], line_no)?,
            std_dev: parse(parts[3], line_no)?,
            count: parse(parts[4], line_no)?,
        };
        if i == j || i as usize >= labels || j as usize >= labels {
            return Err(invalid(format!(
                "line {}: pair ({}, {}) is not a valid pair of {} labels",
                line_no + 2,
                i,
                j,
                labels
            )));
        }
        if stat.is_observed() {
            stats.set_pair(i, j, stat);
        }
    }

    Ok(stats)
}

/// Writes the relation matrix as `max_labels` rows of integer codes.
pub fn write_relations(path: impl AsRef<Path>, relations: &RelationMatrix) -> io::Result<()> {
    let legend: Vec<String> = Relation::ALL
        .iter()
        .map(|r| format!("{}={}", r.code(), r.name()))
        .collect();
    let mut out = format!(
        "# relations labels={} codes {}\n",
        relations.max_labels(),
        legend.join(",")
    );
    for row in relations.rows() {
        let codes: Vec<String> = row.iter().map(|r| r.code().to_string()).collect();
        out.push_str(&codes.join(" "));
        out.push('\n');
    }
    fs::write(path, out)
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

fn header_value<T: std::str::FromStr>(header: &str, key: &str) -> io::Result<T> {
    let prefix = format!("{}=", key);
    header
        .split_whitespace()
        .find_map(|token| token.strip_prefix(prefix.as_str()))
        .and_then(|v| v.parse::<T>().ok())
        .ok_or_else(|| invalid(format!("pair statistics header missing {}", key)))
}

fn parse<T: std::str::FromStr>(token: &str, line_no: usize) -> io::Result<T> {
    token
        .parse::<T>()
        .map_err(|_| invalid(format!("line {}: invalid value {}", line_no + 2, token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatialrel_core::ObjectSummary;
    use tempfile::NamedTempFile;

    #[test]
    fn presence_one_flag_per_line() {
        let scene = Scene::from_objects(4, [ObjectSummary::new(1, [0.0; 3])]).unwrap();
        let tmp = NamedTempFile::new().unwrap();
        write_presence(tmp.path(), scene.presence()).unwrap();
        assert_eq!(fs::read_to_string(tmp.path()).unwrap(), "0\n1\n0\n0\n");
    }

    #[test]
    fn object_summaries_listed_by_label() {
        let mut obj = ObjectSummary::new(3, [1.0, 2.0, 3.0]);
        obj.observe([3.0, 2.0, 1.0]);
        let scene = Scene::from_objects(5, [obj, ObjectSummary::new(0, [0.5, 0.0, 0.0])]).unwrap();
        let tmp = NamedTempFile::new().unwrap();
        write_object_summaries(tmp.path(), &scene).unwrap();
        let text = fs::read_to_string(tmp.path()).unwrap();
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows, vec!["0 1 0.5 0 0", "3 2 2 2 2"]);
    }

    #[test]
    fn pair_statistics_roundtrip() {
        let mut stats = PairStatistics::unobserved(4, 1e6);
        stats.set_pair(0, 3, PairStat::from_samples(&[1.0, 3.0]).unwrap());
        stats.set_pair(1, 2, PairStat::from_samples(&[0.1, 0.2, 0.7]).unwrap());

        let tmp = NamedTempFile::new().unwrap();
        write_pair_statistics(tmp.path(), &stats).unwrap();
        let text = fs::read_to_string(tmp.path()).unwrap();
        assert_eq!(text.lines().count(), 1 + 6);
        assert!(text.contains("\n0 1 -1 1000000 0\n"));

        let back = read_pair_statistics(tmp.path()).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn pair_statistics_rejects_diagonal_rows() {
        let tmp = NamedTempFile::new().unwrap();
        fs::write(
            tmp.path(),
            "# pair_statistics labels=3 sentinel=1000000\n1 1 2 0 1\n",
        )
        .unwrap();
        let err = read_pair_statistics(tmp.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn pair_statistics_requires_header() {
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "0 1 2 0 1\n").unwrap();
        assert!(read_pair_statistics(tmp.path()).is_err());
    }

    #[test]
    fn relations_written_as_code_rows() {
        let relations = RelationMatrix::unrelated(3);
        let tmp = NamedTempFile::new().unwrap();
        write_relations(tmp.path(), &relations).unwrap();
        let text = fs::read_to_string(tmp.path()).unwrap();
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows, vec!["0 5 5", "5 0 5", "5 5 0"]);
        assert!(text.starts_with("# relations labels=3 codes 0=same,1=left"));
    }
}
