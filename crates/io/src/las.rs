use las::Read;
use spatialrel_core::LabelledCloud;
use std::io;
use std::path::Path;

/// Reads a LAS file, using each point's classification code as its label.
pub fn read_labelled_las(path: impl AsRef<Path>) -> io::Result<LabelledCloud> {
    let mut reader = las::Reader::from_path(path.as_ref())
        .map_err(|e| io::Error::other(format!("failed to open LAS file: {}", e)))?;

    let mut cloud = LabelledCloud::new();
    for point_result in reader.points() {
        let point = point_result.map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to read LAS point: {}", e),
            )
        })?;
        let label = u8::from(point.classification) as u32;
        cloud.push(point.x as f32, point.y as f32, point.z as f32, label);
    }

    Ok(cloud)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn las_read_nonexistent() {
        let result = read_labelled_las("/tmp/nonexistent_file_that_does_not_exist_12345.las");
        assert!(result.is_err());
    }

    #[test]
    fn las_classification_becomes_label() {
        use las::point::Classification;
        use las::{Write, Writer};
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let path = tmp.path();

        let mut builder = las::Builder::from((1, 2));
        builder.point_format = las::point::Format::new(0).unwrap();
        let header = builder.into_header().unwrap();
        let mut writer = Writer::from_path(path, header).unwrap();

        let mut p1 = las::point::Point::default();
        p1.x = 1.0;
        p1.y = 2.0;
        p1.z = 3.0;
        p1.classification = Classification::Ground;
        writer.write(p1).unwrap();

        let mut p2 = las::point::Point::default();
        p2.x = 4.0;
        p2.y = 5.0;
        p2.z = 6.0;
        p2.classification = Classification::Building;
        writer.write(p2).unwrap();

        drop(writer);

        let cloud = read_labelled_las(path).unwrap();
        assert_eq!(cloud.len(), 2);
        assert!((cloud.x[0] - 1.0).abs() < 0.01);
        assert!((cloud.y[1] - 5.0).abs() < 0.01);
        assert_eq!(cloud.labels, vec![2, 6]);
    }
}
