//! # Grid
//!
//! The atomic paintable surface: a square, row-major array of [`Cell`]s.
//!
//! Cells live behind an `Arc`, so cloning a grid (for a history snapshot, say) is a pointer copy.
//! The first mutation of a shared grid copies the buffer, so no clone ever observes another's
//! edits.

use std::sync::Arc;

use crate::{color::Cell, error::EditError};

/// The grid sizes offered to the user.
#[derive(
    strum::AsRefStr,
    strum::EnumIter,
    strum::Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Copy,
    Clone,
    Hash,
    Debug,
)]
pub enum GridSize {
    #[strum(serialize = "8x8")]
    Tiny,
    #[strum(serialize = "16x16")]
    Small,
    #[strum(serialize = "32x32")]
    Medium,
    #[strum(serialize = "64x64")]
    Large,
}
impl GridSize {
    #[must_use]
    pub const fn cells(self) -> usize {
        match self {
            Self::Tiny => 8,
            Self::Small => 16,
            Self::Medium => 32,
            Self::Large => 64,
        }
    }
}
impl Default for GridSize {
    fn default() -> Self {
        Self::Small
    }
}
impl From<GridSize> for usize {
    fn from(value: GridSize) -> Self {
        value.cells()
    }
}
impl TryFrom<usize> for GridSize {
    type Error = EditError;
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        <Self as strum::IntoEnumIterator>::iter()
            .find(|size| size.cells() == value)
            .ok_or_else(|| {
                EditError::InvalidArgument(format!(
                    "grid size must be one of 8, 16, 32, 64, got {value}"
                ))
            })
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    size: usize,
    // Row-major, always exactly size * size long.
    cells: Arc<Vec<Cell>>,
}
impl Grid {
    /// Create an all-empty grid. Any non-zero size is accepted.
    pub fn new(size: usize) -> Result<Self, EditError> {
        if size == 0 {
            return Err(EditError::InvalidArgument(
                "grid size must be at least 1".to_owned(),
            ));
        }
        let area = size.checked_mul(size).ok_or_else(|| {
            EditError::InvalidArgument(format!("grid size {size} overflows"))
        })?;
        Ok(Self {
            size,
            cells: Arc::new(vec![None; area]),
        })
    }
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
    #[must_use]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }
    fn index(&self, x: usize, y: usize) -> Result<usize, EditError> {
        if self.contains(x, y) {
            Ok(y * self.size + x)
        } else {
            Err(EditError::OutOfBounds {
                x,
                y,
                size: self.size,
            })
        }
    }
    pub fn get(&self, x: usize, y: usize) -> Result<Cell, EditError> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx])
    }
    /// Write a single cell. Returns whether the cell's value changed.
    ///
    /// Writing the value a cell already holds does not unshare the buffer.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> Result<bool, EditError> {
        let idx = self.index(x, y)?;
        if self.cells[idx] == cell {
            return Ok(false);
        }
        Arc::make_mut(&mut self.cells)[idx] = cell;
        Ok(true)
    }
    /// Overwrite every cell.
    pub fn fill_all(&mut self, cell: Cell) {
        Arc::make_mut(&mut self.cells).fill(cell);
    }
    /// Copy into a grid of `new_size`, anchored at the top-left.
    ///
    /// Cells outside the overlap are dropped when shrinking, and empty when growing.
    pub fn resized(&self, new_size: usize) -> Result<Self, EditError> {
        if new_size == self.size {
            return Ok(self.clone());
        }
        let mut out = Self::new(new_size)?;
        let overlap = self.size.min(new_size);
        let dst = Arc::make_mut(&mut out.cells);
        for (y, row) in self.rows().take(overlap).enumerate() {
            let start = y * new_size;
            dst[start..start + overlap].copy_from_slice(&row[..overlap]);
        }
        Ok(out)
    }
    /// Iterate rows, top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.size)
    }
    /// Iterate every cell with its `(x, y)` coordinate, row-major.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| ((idx % size, idx / size), *cell))
    }
    /// True if no cell holds a color.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
    /// Whether two grids share the same backing buffer.
    #[must_use]
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }
}

#[cfg(test)]
mod test {
    use super::{Grid, GridSize};
    use crate::{color::Color, error::EditError};

    #[test]
    fn new_is_empty() {
        let grid = Grid::new(8).unwrap();
        assert_eq!(grid.size(), 8);
        assert!(grid.is_empty());
        assert_eq!(grid.rows().len(), 8);
        assert!(grid.rows().all(|row| row.len() == 8));
    }
    #[test]
    fn zero_size_rejected() {
        assert!(matches!(Grid::new(0), Err(EditError::InvalidArgument(_))));
    }
    #[test]
    fn bounds() {
        let mut grid = Grid::new(4).unwrap();
        assert_eq!(
            grid.get(4, 0),
            Err(EditError::OutOfBounds { x: 4, y: 0, size: 4 })
        );
        assert!(grid.set(0, 4, Some(Color::RED)).is_err());
        assert!(grid.is_empty());
    }
    #[test]
    fn set_touches_one_cell() {
        let mut grid = Grid::new(4).unwrap();
        assert_eq!(grid.set(2, 1, Some(Color::RED)), Ok(true));
        assert_eq!(grid.set(2, 1, Some(Color::RED)), Ok(false));
        for ((x, y), cell) in grid.cells() {
            if (x, y) == (2, 1) {
                assert_eq!(cell, Some(Color::RED));
            } else {
                assert_eq!(cell, None);
            }
        }
    }
    #[test]
    fn clones_are_independent() {
        let mut grid = Grid::new(4).unwrap();
        let snapshot = grid.clone();
        assert!(grid.shares_storage(&snapshot));
        grid.set(0, 0, Some(Color::BLUE)).unwrap();
        assert!(!grid.shares_storage(&snapshot));
        assert_eq!(snapshot.get(0, 0), Ok(None));
        assert_eq!(grid.get(0, 0), Ok(Some(Color::BLUE)));
    }
    #[test]
    fn grow_preserves_everything() {
        let mut grid = Grid::new(4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                grid.set(x, y, Some(Color::rgb(x as u8, y as u8, 0))).unwrap();
            }
        }
        let bigger = grid.resized(8).unwrap();
        assert_eq!(bigger.size(), 8);
        for ((x, y), cell) in bigger.cells() {
            if x < 4 && y < 4 {
                assert_eq!(cell, Some(Color::rgb(x as u8, y as u8, 0)));
            } else {
                assert_eq!(cell, None);
            }
        }
    }
    #[test]
    fn shrink_keeps_overlap_only() {
        let mut grid = Grid::new(8).unwrap();
        grid.fill_all(Some(Color::GREEN));
        let smaller = grid.resized(3).unwrap();
        assert_eq!(smaller.size(), 3);
        assert!(smaller.cells().all(|(_, cell)| cell == Some(Color::GREEN)));
        // Growing back does not resurrect anything.
        let regrown = smaller.resized(8).unwrap();
        assert_eq!(regrown.get(5, 5), Ok(None));
        assert_eq!(regrown.get(2, 2), Ok(Some(Color::GREEN)));
    }
    #[test]
    fn grid_size_options() {
        let all: Vec<usize> = <GridSize as strum::IntoEnumIterator>::iter()
            .map(usize::from)
            .collect();
        assert_eq!(all, [8, 16, 32, 64]);
        assert_eq!(GridSize::try_from(32), Ok(GridSize::Medium));
        assert!(GridSize::try_from(12).is_err());
        assert_eq!(GridSize::Large.as_ref(), "64x64");
    }
}
