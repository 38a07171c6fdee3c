use serde::{Deserialize, Serialize};

use crate::{
    cell::Cell,
    error::KernelError,
    world::{CollisionData, CollisionSource},
};

/// Flat row-major grid of map-cell collision data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CollisionData>,
}

impl CollisionGrid {
    /// Grid of `rows x cols` empty cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CollisionData::None; rows * cols],
        }
    }

    /// Grid built from equally long rows.
    pub fn from_rows(rows: &[&[CollisionData]]) -> Result<Self, KernelError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(KernelError::LayoutDimensions {
                    expected: cols,
                    actual: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    /// Grid decoded from level-format bytes, row-major. Unknown bytes are an error.
    pub fn from_bytes(rows: usize, cols: usize, bytes: &[u8]) -> Result<Self, KernelError> {
        Self::check_len(rows, cols, bytes)?;
        let cells = bytes
            .iter()
            .map(|&b| CollisionData::try_from(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows, cols, cells })
    }

    /// Like [`CollisionGrid::from_bytes`] but unknown bytes become empty cells.
    pub fn from_bytes_lossy(rows: usize, cols: usize, bytes: &[u8]) -> Result<Self, KernelError> {
        Self::check_len(rows, cols, bytes)?;
        let cells = bytes.iter().map(|&b| CollisionData::from_byte_lossy(b)).collect();
        Ok(Self { rows, cols, cells })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|d| d.as_byte()).collect()
    }

    fn check_len(rows: usize, cols: usize, bytes: &[u8]) -> Result<(), KernelError> {
        if bytes.len() != rows * cols {
            return Err(KernelError::LayoutDimensions {
                expected: rows * cols,
                actual: bytes.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, cell: Cell) -> Option<usize> {
        cell.index_in(self.rows, self.cols)
            .map(|(row, col)| row * self.cols + col)
    }

    pub fn get(&self, cell: Cell) -> Option<CollisionData> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Sets one cell. Returns `false` when the cell is outside the grid.
    pub fn set(&mut self, cell: Cell, data: CollisionData) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.cells[i] = data;
                true
            }
            None => false,
        }
    }

    /// Fills `rows x cols` cells starting at `top_left`, skipping cells outside the grid.
    pub fn fill_rect(&mut self, top_left: Cell, rows: usize, cols: usize, data: CollisionData) {
        for dr in 0..rows as i32 {
            for dc in 0..cols as i32 {
                self.set(Cell::new(top_left.row + dr, top_left.col + dc), data);
            }
        }
    }

    /// Fills a whole row.
    pub fn fill_row(&mut self, row: i32, data: CollisionData) {
        self.fill_rect(Cell::new(row, 0), 1, self.cols, data);
    }
}

impl CollisionSource for CollisionGrid {
    fn map_row_count(&self) -> usize {
        self.rows
    }

    fn map_col_count(&self) -> usize {
        self.cols
    }

    fn collision_data_at(&self, cell: Cell) -> CollisionData {
        self.get(cell).unwrap_or_default()
    }
}
