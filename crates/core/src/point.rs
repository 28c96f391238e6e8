use crate::traits::{HasLabel, HasPosition};

/// A single point carrying an object-category label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelledPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub label: u32,
}

impl LabelledPoint {
    pub fn new(x: f64, y: f64, z: f64, label: u32) -> Self {
        Self { x, y, z, label }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl HasPosition for LabelledPoint {
    fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl HasLabel for LabelledPoint {
    fn label(&self) -> u32 {
        self.label
    }
}

impl HasPosition for ([f64; 3], u32) {
    fn position(&self) -> [f64; 3] {
        self.0
    }
}

impl HasLabel for ([f64; 3], u32) {
    fn label(&self) -> u32 {
        self.1
    }
}
