use crate::point::LabelledPoint;

/// A labelled point cloud stored as structure-of-arrays.
///
/// Coordinates are kept in `f32`, matching what sensors and file formats
/// deliver; consumers widen to `f64` through [`LabelledCloud::iter_points`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelledCloud {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub labels: Vec<u32>,
}

impl LabelledCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>, labels: Vec<u32>) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have same length");
        assert_eq!(x.len(), z.len(), "x and z must have same length");
        assert_eq!(x.len(), labels.len(), "x and labels must have same length");

        Self { x, y, z, labels }
    }

    /// Builds a cloud from interleaved `xyz` coordinates and a parallel label slice.
    pub fn from_array(data: &[f32], labels: &[u32]) -> Self {
        assert_eq!(
            data.len(),
            labels.len() * 3,
            "interleaved xyz input must have labels.len() * 3 floats"
        );

        let n = labels.len();
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        let mut z = Vec::with_capacity(n);
        for chunk in data.chunks_exact(3) {
            x.push(chunk[0]);
            y.push(chunk[1]);
            z.push(chunk[2]);
        }

        Self::from_parts(x, y, z, labels.to_vec())
    }

    pub fn push(&mut self, x: f32, y: f32, z: f32, label: u32) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.x.len(), self.y.len());
        debug_assert_eq!(self.x.len(), self.z.len());
        debug_assert_eq!(self.x.len(), self.labels.len());
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn point(&self, i: usize) -> LabelledPoint {
        LabelledPoint::new(
            self.x[i] as f64,
            self.y[i] as f64,
            self.z[i] as f64,
            self.labels[i],
        )
    }

    pub fn iter_points(&self) -> impl Iterator<Item = LabelledPoint> + '_ {
        (0..self.len()).map(move |i| self.point(i))
    }

    /// Largest label present in the cloud, if any.
    pub fn max_label(&self) -> Option<u32> {
        self.labels.iter().copied().max()
    }
}
