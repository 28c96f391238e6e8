/// Dense `n x n` matrix indexed by label pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMatrix<T> {
    dim: usize,
    cells: Vec<T>,
}

impl<T: Clone> LabelMatrix<T> {
    pub fn filled(dim: usize, value: T) -> Self {
        Self {
            dim,
            cells: vec![value; dim * dim],
        }
    }

    /// Writes `value` to both `(i, j)` and `(j, i)`.
    pub fn set_symmetric(&mut self, i: usize, j: usize, value: T) {
        self.set(j, i, value.clone());
        self.set(i, j, value);
    }
}

impl<T> LabelMatrix<T> {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, i: usize, j: usize) -> &T {
        assert!(i < self.dim && j < self.dim, "label pair out of bounds");
        &self.cells[i * self.dim + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        assert!(i < self.dim && j < self.dim, "label pair out of bounds");
        self.cells[i * self.dim + j] = value;
    }

    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.dim, "row out of bounds");
        &self.cells[i * self.dim..(i + 1) * self.dim]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.dim.max(1)).take(self.dim)
    }

    /// Unordered pairs `(i, j)` with `i < j`, row-major.
    pub fn upper_pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        let dim = self.dim;
        (0..dim).flat_map(move |i| (i + 1..dim).map(move |j| (i, j)))
    }
}
