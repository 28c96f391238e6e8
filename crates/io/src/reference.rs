use spatialrel_core::SpatialRelError;
use std::fs;
use std::io;
use std::path::Path;

/// Reads one observer position per scene.
///
/// Each non-blank, non-`#` line holds `x y` (comma or whitespace separated)
/// or a lone `-` for a scene without a reference point.
pub fn read_reference_points(path: impl AsRef<Path>) -> io::Result<Vec<Option<[f64; 2]>>> {
    let content = fs::read_to_string(path)?;
    let mut out = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed == "-" {
            out.push(None);
            continue;
        }

        let parts: Vec<&str> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() != 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "line {}: expected `x y` or `-`, got {:?}",
                    line_no + 1,
                    trimmed
                ),
            ));
        }

        let parse = |s: &str| -> io::Result<f64> {
            let value = s.parse::<f64>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: invalid coordinate {}: {}", line_no + 1, s, e),
                )
            })?;
            if !value.is_finite() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: coordinate {} is not finite", line_no + 1, s),
                ));
            }
            Ok(value)
        };
        out.push(Some([parse(parts[0])?, parse(parts[1])?]));
    }

    Ok(out)
}

pub fn write_reference_points(
    path: impl AsRef<Path>,
    references: &[Option<[f64; 2]>],
) -> io::Result<()> {
    let mut out = String::from("# observer position per scene, `-` when missing\n");
    for reference in references {
        match reference {
            Some([x, y]) => out.push_str(&format!("{} {}\n", x, y)),
            None => out.push_str("-\n"),
        }
    }
    fs::write(path, out)
}

/// Checks that a reference file lines up with the scene list.
pub fn check_reference_count(scenes: usize, references: usize) -> Result<(), SpatialRelError> {
    if scenes == references {
        Ok(())
    } else {
        Err(SpatialRelError::ReferenceCountMismatch { scenes, references })
    }
}
