//! Owned 2D grid in row-major layout.
//!
//! [`Grid`] is the storage behind every 2D quantity in pixtools: integer
//! channels (`Grid<u8>`), normalized float channels (`Grid<f32>`), working
//! planes and proportion maps (`Grid<f64>`), and convolution kernels.
//!
//! # Memory Layout
//!
//! ```text
//! data: [ (0,0) (1,0) ... (w-1,0) ]  <- row 0
//!       [ (0,1) (1,1) ... (w-1,1) ]  <- row 1
//!       ...
//! ```
//!
//! Coordinates are `(x, y)`: `x` is the column, `y` is the row.

use crate::{Error, Result};

/// Owned `width x height` grid of values, stored row by row.
///
/// Dimensions are fixed at construction; only contents mutate.
///
/// # Example
///
/// ```rust
/// use pixtools_core::Grid;
///
/// let mut g = Grid::new(3, 2, 0u8);
/// g.set(2, 1, 9);
/// assert_eq!(g.get(2, 1), 9);
/// assert_eq!(g.row(1), &[0, 0, 9]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Builds a grid from a slice of equally long rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the rows are ragged.
    ///
    /// ```rust
    /// use pixtools_core::Grid;
    ///
    /// let g = Grid::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    /// assert_eq!(g.dimensions(), (3, 2));
    /// assert_eq!(g.get(0, 1), 4);
    /// assert!(Grid::from_rows(&[vec![1, 2], vec![3]]).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::invalid_dimensions(
                    width,
                    height,
                    format!("row {} has {} elements", y, row.len()),
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { width, height, data })
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    /// Wraps a row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self { width, height, data })
    }

    /// Returns the number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the grid has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Returns a reference to the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    #[inline]
    pub fn get_ref(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    /// Overwrites the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    /// Returns row `y` as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Returns row `y` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Returns the backing buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the backing buffer mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the grid and returns its buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterates over the cells in row-major order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterates mutably over the cells in row-major order.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Applies `f` to every cell, producing a grid of the same size.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Checks that `other` has exactly this grid's dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    #[inline]
    pub fn ensure_same_size<U>(&self, other: &Grid<U>) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }
        Ok(())
    }
}

impl<T: Copy> Grid<T> {
    /// Returns the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.index(x, y)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_access() {
        let mut g = Grid::new(4, 3, 1.5f64);
        assert_eq!(g.dimensions(), (4, 3));
        assert_eq!(g.len(), 12);
        g.set(3, 2, -2.0);
        assert_eq!(g.get(3, 2), -2.0);
        assert_eq!(g.get(0, 0), 1.5);
        assert_eq!(g.row(2)[3], -2.0);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Grid::from_vec(2, 2, vec![0u8; 4]).is_ok());
        let err = Grid::from_vec(2, 2, vec![0u8; 5]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_from_rows_row_major() {
        let g = Grid::from_rows(&[[1, 2], [3, 4], [5, 6]]).unwrap();
        assert_eq!(g.dimensions(), (2, 3));
        assert_eq!(g.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(g.get(1, 2), 6);
    }

    #[test]
    fn test_from_rows_empty() {
        let rows: [Vec<f64>; 0] = [];
        let g = Grid::from_rows(&rows).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.dimensions(), (0, 0));
    }

    #[test]
    fn test_map_and_size_check() {
        let g = Grid::from_rows(&[[0u8, 255], [51, 102]]).unwrap();
        let f = g.map(|&v| v as f64 / 255.0);
        assert_eq!(f.get(1, 0), 1.0);
        assert!(g.ensure_same_size(&f).is_ok());

        let other = Grid::new(3, 2, 0.0f64);
        assert!(matches!(
            g.ensure_same_size(&other),
            Err(Error::DimensionMismatch { expected_width: 2, width: 3, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "outside 2x3 grid")]
    fn test_get_past_row_end_panics() {
        let g = Grid::new(2, 3, 0u8);
        // (2, 0) would alias (0, 1) in the buffer
        g.get(2, 0);
    }
}
