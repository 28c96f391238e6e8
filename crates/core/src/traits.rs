pub trait HasPosition {
    fn position(&self) -> [f64; 3];
}

pub trait HasLabel {
    fn label(&self) -> u32;
}
