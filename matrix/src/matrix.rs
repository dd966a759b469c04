use rand::Rng;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Dense row-major matrix of `f64`.
#[derive(Clone, Debug)]
pub struct Matrix {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) data: Vec<f64>,
}

impl Matrix {
    #[must_use]
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "Data length must match rows * cols"
        );
        Self { rows, cols, data }
    }

    #[inline(always)]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline(always)]
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; cols * rows],
        }
    }

    /// Matrix of independent uniform draws from the closed range `[low, high]`.
    ///
    /// `low` must not exceed `high`.
    #[must_use]
    pub fn uniform<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        low: f64,
        high: f64,
        rng: &mut R,
    ) -> Self {
        let mut matrix = Self::zeros(rows, cols);
        matrix.randomize(low, high, rng);
        matrix
    }

    /// Overwrites every element with a uniform draw from `[low, high]`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, low: f64, high: f64, rng: &mut R) {
        for value in &mut self.data {
            *value = rng.random_range(low..=high);
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Borrows row `row` as a slice of length `cols`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Weighted sum into every column: `out[c] = Σ_r inputs[r] * self[(r, c)]`.
    ///
    /// This is the pre-activation of a layer whose incoming weights are stored
    /// one row per source unit.
    #[must_use]
    pub fn weighted_sums(&self, inputs: &[f64]) -> Vec<f64> {
        assert_eq!(
            inputs.len(),
            self.rows,
            "Input length must match matrix rows"
        );

        let mut sums = vec![0.0; self.cols];
        for (&input, row) in inputs.iter().zip(self.iter_rows()) {
            for (sum, &weight) in sums.iter_mut().zip(row) {
                *sum += input * weight;
            }
        }
        sums
    }

    /// Dot product of row `row` with `values`.
    #[must_use]
    pub fn row_dot(&self, row: usize, values: &[f64]) -> f64 {
        self.row(row)
            .iter()
            .zip(values)
            .map(|(&weight, &value)| weight * value)
            .sum()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::zeros(0, 0)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline(always)]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        debug_assert!(col < self.cols, "Column index out of bounds");
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline(always)]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        debug_assert!(col < self.cols, "Column index out of bounds");
        &mut self.data[row * self.cols + col]
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for value in row {
                write!(f, "{:10.4}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zeros() {
        let m = Matrix::zeros(3, 2);
        assert_eq!(m.shape(), (3, 2));
        assert!(m.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    #[should_panic(expected = "Data length must match rows * cols")]
    fn test_new_rejects_wrong_length() {
        let _ = Matrix::new(2, 2, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let m = Matrix::uniform(10, 10, -0.5, 0.5, &mut rng);

        assert_eq!(m.shape(), (10, 10));
        assert!(m.data().iter().all(|&x| (-0.5..=0.5).contains(&x)));
        // not all draws can collapse onto one value
        assert!(m.data().iter().any(|&x| x != m.data()[0]));
    }

    #[test]
    fn test_uniform_is_reproducible_with_seed() {
        let a = Matrix::uniform(3, 4, -1.0, 1.0, &mut StdRng::seed_from_u64(7));
        let b = Matrix::uniform(3, 4, -1.0, 1.0, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_uniform_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let m = Matrix::uniform(2, 2, 0.25, 0.25, &mut rng);
        assert_eq!(m.data(), &[0.25; 4]);
    }

    #[test]
    fn test_fill() {
        let mut m = matrix![
            1.0, 2.0;
            3.0, 4.0
        ];
        m.fill(0.0);
        assert_eq!(m, Matrix::zeros(2, 2));
    }

    #[test]
    fn test_index() {
        let mut m = matrix![
            1.0, 2.0, 3.0;
            4.0, 5.0, 6.0
        ];
        assert_eq!(m[(1, 2)], 6.0);

        m[(0, 1)] += 0.5;
        assert_eq!(m.row(0), &[1.0, 2.5, 3.0]);
    }

    #[test]
    fn test_weighted_sums() {
        // 3 source units feeding 2 destination units
        let m = matrix![
            1.0, 2.0;
            3.0, 4.0;
            5.0, 6.0
        ];

        let sums = m.weighted_sums(&[1.0, 0.5, -1.0]);

        assert_eq!(sums, vec![1.0 + 1.5 - 5.0, 2.0 + 2.0 - 6.0]);
    }

    #[test]
    #[should_panic(expected = "Input length must match matrix rows")]
    fn test_weighted_sums_wrong_length() {
        let m = Matrix::zeros(3, 2);
        let _ = m.weighted_sums(&[1.0, 2.0]);
    }

    #[test]
    fn test_row_dot() {
        let m = matrix![
            1.0, 2.0;
            3.0, 4.0
        ];
        assert_eq!(m.row_dot(1, &[0.5, 0.25]), 2.5);
    }

    #[test]
    fn test_iter_rows() {
        let m = matrix![
            1.0, 2.0;
            3.0, 4.0;
            5.0, 6.0
        ];
        let rows: Vec<&[f64]> = m.iter_rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0][..], &[3.0, 4.0][..], &[5.0, 6.0][..]]);
    }

    #[test]
    fn test_display() {
        let m = matrix![
            1.0, -0.5;
            0.25, 2.0
        ];
        let text = m.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "    1.0000   -0.5000");
    }
}
