use spatialrel_core::LabelledCloud;
use std::fs;
use std::io;
use std::path::Path;

/// Reads a labelled PCD file (ASCII or binary format).
///
/// The file must declare `x`, `y`, `z` and `label` fields; any other fields
/// (`rgb`, `camera_index`, `segment`, ...) are skipped. Field sizes and types
/// are taken from the `SIZE`/`TYPE` header lines, so integer or float labels of
/// any width decode correctly.
pub fn read_labelled_pcd(path: impl AsRef<Path>) -> io::Result<LabelledCloud> {
    let raw = fs::read(path)?;
    let (header_text, data_offset) = split_header(&raw)?;
    let header = Header::parse(header_text)?;

    match header.format {
        DataFormat::Ascii => read_ascii(&raw[data_offset..], &header),
        DataFormat::Binary => read_binary(&raw[data_offset..], &header),
    }
}

/// Writes a labelled PCD file in ASCII format.
pub fn write_labelled_pcd(path: impl AsRef<Path>, cloud: &LabelledCloud) -> io::Result<()> {
    let mut out = header_text(cloud.len(), "ascii");
    for i in 0..cloud.len() {
        out.push_str(&format!(
            "{} {} {} {}\n",
            cloud.x[i], cloud.y[i], cloud.z[i], cloud.labels[i]
        ));
    }
    fs::write(path, out)
}

/// Writes a labelled PCD file in binary format.
pub fn write_labelled_pcd_binary(path: impl AsRef<Path>, cloud: &LabelledCloud) -> io::Result<()> {
    let header = header_text(cloud.len(), "binary");
    let header_bytes = header.as_bytes();
    let point_size = 4 * 4;
    let mut buf = Vec::with_capacity(header_bytes.len() + cloud.len() * point_size);
    buf.extend_from_slice(header_bytes);

    for i in 0..cloud.len() {
        buf.extend_from_slice(&cloud.x[i].to_le_bytes());
        buf.extend_from_slice(&cloud.y[i].to_le_bytes());
        buf.extend_from_slice(&cloud.z[i].to_le_bytes());
        buf.extend_from_slice(&cloud.labels[i].to_le_bytes());
    }

    fs::write(path, buf)
}

fn header_text(points: usize, data: &str) -> String {
    let mut out = String::new();
    out.push_str("# .PCD v0.7 - Point Cloud Data file format\n");
    out.push_str("VERSION 0.7\n");
    out.push_str("FIELDS x y z label\n");
    out.push_str("SIZE 4 4 4 4\n");
    out.push_str("TYPE F F F U\n");
    out.push_str("COUNT 1 1 1 1\n");
    out.push_str(&format!("WIDTH {}\n", points));
    out.push_str("HEIGHT 1\n");
    out.push_str("VIEWPOINT 0 0 0 1 0 0 0\n");
    out.push_str(&format!("POINTS {}\n", points));
    out.push_str(&format!("DATA {}\n", data));
    out
}

// --- Internal helpers ---

#[derive(Debug, PartialEq)]
enum DataFormat {
    Ascii,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scalar {
    F32,
    F64,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

impl Scalar {
    fn from_type_and_size(kind: &str, size: usize) -> io::Result<Self> {
        Ok(match (kind, size) {
            ("F", 4) => Scalar::F32,
            ("F", 8) => Scalar::F64,
            ("U", 1) => Scalar::U8,
            ("U", 2) => Scalar::U16,
            ("U", 4) => Scalar::U32,
            ("U", 8) => Scalar::U64,
            ("I", 1) => Scalar::I8,
            ("I", 2) => Scalar::I16,
            ("I", 4) => Scalar::I32,
            ("I", 8) => Scalar::I64,
            _ => {
                return Err(invalid(format!(
                    "unsupported PCD field type {} with size {}",
                    kind, size
                )))
            }
        })
    }

    fn size(self) -> usize {
        match self {
            Scalar::U8 | Scalar::I8 => 1,
            Scalar::U16 | Scalar::I16 => 2,
            Scalar::F32 | Scalar::U32 | Scalar::I32 => 4,
            Scalar::F64 | Scalar::U64 | Scalar::I64 => 8,
        }
    }

    fn decode(self, b: &[u8]) -> f64 {
        match self {
            Scalar::F32 => f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
            Scalar::F64 => f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
            Scalar::U8 => b[0] as f64,
            Scalar::U16 => u16::from_le_bytes([b[0], b[1]]) as f64,
            Scalar::U32 => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
            Scalar::U64 => {
                u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f64
            }
            Scalar::I8 => b[0] as i8 as f64,
            Scalar::I16 => i16::from_le_bytes([b[0], b[1]]) as f64,
            Scalar::I32 => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
            Scalar::I64 => {
                i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f64
            }
        }
    }
}

/// Where one field lives inside a point record.
#[derive(Debug, Clone, Copy)]
struct FieldSlot {
    scalar: Scalar,
    byte_offset: usize,
    token_offset: usize,
}

#[derive(Debug)]
struct Header {
    format: DataFormat,
    num_points: usize,
    point_bytes: usize,
    point_tokens: usize,
    x: FieldSlot,
    y: FieldSlot,
    z: FieldSlot,
    label: FieldSlot,
}

impl Header {
    fn parse(text: &str) -> io::Result<Self> {
        let mut names: Vec<String> = Vec::new();
        let mut sizes: Option<Vec<usize>> = None;
        let mut types: Option<Vec<String>> = None;
        let mut counts: Option<Vec<usize>> = None;
        let mut points: Option<usize> = None;
        let mut width: Option<usize> = None;
        let mut format: Option<DataFormat> = None;

        for line in text.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some((&key, values)) = parts.split_first() else {
                continue;
            };
            match key {
                "FIELDS" => names = values.iter().map(|s| s.to_string()).collect(),
                "SIZE" => sizes = Some(parse_list(values, "SIZE")?),
                "TYPE" => types = Some(values.iter().map(|s| s.to_string()).collect()),
                "COUNT" => counts = Some(parse_list(values, "COUNT")?),
                "POINTS" => points = Some(parse_one(values, "POINTS")?),
                "WIDTH" => width = Some(parse_one(values, "WIDTH")?),
                "DATA" => {
                    format = Some(match values.first().copied() {
                        Some("ascii") => DataFormat::Ascii,
                        Some("binary") => DataFormat::Binary,
                        Some(other) => {
                            return Err(io::Error::new(
                                io::ErrorKind::Unsupported,
                                format!("unsupported PCD DATA format: {}", other),
                            ))
                        }
                        None => return Err(invalid("PCD DATA line has no format")),
                    })
                }
                _ => {}
            }
        }

        let format = format.ok_or_else(|| invalid("PCD file missing DATA line"))?;
        let num_points = points
            .or(width)
            .ok_or_else(|| invalid("PCD file missing POINTS/WIDTH header"))?;
        if names.is_empty() {
            return Err(invalid("PCD file missing FIELDS header"));
        }

        let n = names.len();
        let sizes = sizes.unwrap_or_else(|| vec![4; n]);
        let types = types.unwrap_or_else(|| vec!["F".to_string(); n]);
        let counts = counts.unwrap_or_else(|| vec![1; n]);
        if sizes.len() != n || types.len() != n || counts.len() != n {
            return Err(invalid(format!(
                "PCD header declares {} fields but {} sizes, {} types, {} counts",
                n,
                sizes.len(),
                types.len(),
                counts.len()
            )));
        }

        let mut slots = Vec::with_capacity(n);
        let mut byte_offset = 0;
        let mut token_offset = 0;
        for k in 0..n {
            if counts[k] == 0 {
                return Err(invalid(format!(
                    "PCD field {} declares COUNT 0",
                    names[k]
                )));
            }
            let scalar = Scalar::from_type_and_size(&types[k], sizes[k])?;
            slots.push(FieldSlot {
                scalar,
                byte_offset,
                token_offset,
            });
            byte_offset += scalar.size() * counts[k];
            token_offset += counts[k];
        }

        let slot = |name: &str| -> io::Result<FieldSlot> {
            names
                .iter()
                .position(|n| n == name)
                .map(|k| slots[k])
                .ok_or_else(|| invalid(format!("PCD file missing {} field", name)))
        };

        Ok(Self {
            format,
            num_points,
            point_bytes: byte_offset,
            point_tokens: token_offset,
            x: slot("x")?,
            y: slot("y")?,
            z: slot("z")?,
            label: slot("label")?,
        })
    }
}

fn parse_list(values: &[&str], key: &str) -> io::Result<Vec<usize>> {
    values
        .iter()
        .map(|v| {
            v.parse::<usize>()
                .map_err(|e| invalid(format!("invalid {} value {}: {}", key, v, e)))
        })
        .collect()
}

fn parse_one(values: &[&str], key: &str) -> io::Result<usize> {
    let v = values
        .first()
        .ok_or_else(|| invalid(format!("{} header has no value", key)))?;
    v.parse::<usize>()
        .map_err(|e| invalid(format!("invalid {} value: {}", key, e)))
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// Splits the raw file into the header text (through the DATA line) and the
/// byte offset where point data starts.
fn split_header(raw: &[u8]) -> io::Result<(&str, usize)> {
    let end = find_data_line_end(raw).ok_or_else(|| invalid("PCD file missing DATA line"))?;
    let text = std::str::from_utf8(&raw[..end])
        .map_err(|_| invalid("PCD header is not valid UTF-8"))?;
    Ok((text, end))
}

/// Finds the byte offset just past the newline ending the DATA line.
fn find_data_line_end(raw: &[u8]) -> Option<usize> {
    let data_marker = b"DATA";
    for i in 0..raw.len().saturating_sub(data_marker.len() - 1) {
        if (i == 0 || raw[i - 1] == b'\n') && raw[i..].starts_with(data_marker) {
            if let Some(offset) = raw[i..].iter().position(|&b| b == b'\n') {
                return Some(i + offset + 1);
            }
            return Some(raw.len());
        }
    }
    None
}

fn to_label(value: f64, point: usize) -> io::Result<u32> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(invalid(format!(
            "point {} has invalid label value {}",
            point, value
        )));
    }
    Ok(value as u32)
}

fn read_ascii(body: &[u8], header: &Header) -> io::Result<LabelledCloud> {
    let content = std::str::from_utf8(body)
        .map_err(|e| invalid(format!("invalid UTF-8: {}", e)))?;

    let mut cloud = LabelledCloud::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let index = cloud.len();
        if parts.len() < header.point_tokens {
            return Err(invalid(format!(
                "point {} has {} values, expected {}",
                index,
                parts.len(),
                header.point_tokens
            )));
        }

        let coord = |slot: FieldSlot| -> io::Result<f32> {
            let token = parts[slot.token_offset];
            token
                .parse::<f32>()
                .map_err(|e| invalid(format!("point {}: bad value {}: {}", index, token, e)))
        };
        let label_token = parts[header.label.token_offset];
        let label_value = label_token.parse::<f64>().map_err(|e| {
            invalid(format!("point {}: bad label {}: {}", index, label_token, e))
        })?;

        let x = coord(header.x)?;
        let y = coord(header.y)?;
        let z = coord(header.z)?;
        let label = to_label(label_value, index)?;
        cloud.push(x, y, z, label);
    }

    Ok(cloud)
}

fn read_binary(body: &[u8], header: &Header) -> io::Result<LabelledCloud> {
    let expected_size = header
        .num_points
        .checked_mul(header.point_bytes)
        .ok_or_else(|| invalid(format!("PCD POINTS {} is too large", header.num_points)))?;
    if body.len() < expected_size {
        return Err(invalid(format!(
            "binary PCD data too short: have {} bytes, expected {} ({} points x {} bytes)",
            body.len(),
            expected_size,
            header.num_points,
            header.point_bytes
        )));
    }

    let mut cloud = LabelledCloud::new();
    for (index, record) in body
        .chunks_exact(header.point_bytes.max(1))
        .take(header.num_points)
        .enumerate()
    {
        let read = |slot: FieldSlot| slot.scalar.decode(&record[slot.byte_offset..]);
        cloud.push(
            read(header.x) as f32,
            read(header.y) as f32,
            read(header.z) as f32,
            to_label(read(header.label), index)?,
        );
    }

    Ok(cloud)
}
