use nalgebra::{Vector2, Vector3};

/// Running summary of every point sharing one label within a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSummary {
    label: u32,
    point_count: usize,
    centroid: [f64; 3],
}

impl ObjectSummary {
    /// Starts a summary from the first point seen with `label`.
    pub fn new(label: u32, position: [f64; 3]) -> Self {
        Self {
            label,
            point_count: 1,
            centroid: position,
        }
    }

    /// Folds one more point into the centroid with the online mean update
    /// `c' = c + (p - c) / (n + 1)`.
    pub fn observe(&mut self, position: [f64; 3]) {
        let next = (self.point_count + 1) as f64;
        for (c, p) in self.centroid.iter_mut().zip(position) {
            *c += (p - *c) / next;
        }
        self.point_count += 1;
    }

    pub fn label(&self) -> u32 {
        self.label
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn centroid(&self) -> [f64; 3] {
        self.centroid
    }

    pub fn planar_centroid(&self) -> [f64; 2] {
        [self.centroid[0], self.centroid[1]]
    }

    /// Centroid separation `other - self`, projected onto the xy plane.
    pub fn planar_offset_to(&self, other: &ObjectSummary) -> Vector2<f64> {
        Vector2::new(
            other.centroid[0] - self.centroid[0],
            other.centroid[1] - self.centroid[1],
        )
    }

    /// Euclidean centroid distance; z participates only when `use_3d` is set.
    pub fn distance_to(&self, other: &ObjectSummary, use_3d: bool) -> f64 {
        if use_3d {
            (Vector3::from(other.centroid) - Vector3::from(self.centroid)).norm()
        } else {
            self.planar_offset_to(other).norm()
        }
    }
}
