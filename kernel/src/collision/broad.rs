use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{error::KernelError, fixed::Fixed, geometry::AxisBox};

/// Uniform grid over a fixed area for entity-vs-entity candidate queries.
///
/// Notes:
/// - Each id is stored in every cell its box overlaps with positive area. Boxes reaching
///   outside `bounds` are kept in the border cells they overlap, and nowhere else.
/// - The partition remembers which cells every id was put in, so `remove` and `update`
///   never depend on the caller passing the old box back.
/// - Query results are deduplicated and listed in the order their cells are scanned
///   (column by column, top to bottom within a column).
#[derive(Clone, Debug)]
pub struct Partition<Id> {
    bounds: AxisBox,
    rows: usize,
    cols: usize,
    cell_width: Fixed,
    cell_height: Fixed,
    /// Indexed `col * rows + row`.
    cells: Vec<Vec<Id>>,
    members: FxHashMap<Id, Member>,
}

#[derive(Clone, Debug)]
struct Member {
    bx: AxisBox,
    cells: Vec<usize>,
}

impl<Id: Copy + Eq + Hash> Partition<Id> {
    /// Splits `bounds` into `rows x cols` equal cells.
    ///
    /// Fails when the grid is empty or a cell's area would round to zero.
    pub fn new(bounds: AxisBox, rows: usize, cols: usize) -> Result<Self, KernelError> {
        let invalid = KernelError::InvalidPartition {
            rows,
            cols,
            width: bounds.width().to_int(),
            height: bounds.height().to_int(),
        };
        if rows == 0 || cols == 0 || bounds.area().is_zero() {
            return Err(invalid);
        }
        let (Ok(row_count), Ok(col_count)) = (i32::try_from(rows), i32::try_from(cols)) else {
            return Err(invalid);
        };

        let cell_width = bounds.width() / col_count;
        let cell_height = bounds.height() / row_count;
        // Cell lookups divide by the cell size and overlap tests need a positive area.
        if (cell_width * cell_height).is_zero() {
            return Err(invalid);
        }

        Ok(Self {
            bounds,
            rows,
            cols,
            cell_width,
            cell_height,
            cells: vec![Vec::new(); rows * cols],
            members: FxHashMap::default(),
        })
    }

    #[inline]
    pub fn bounds(&self) -> AxisBox {
        self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.members.contains_key(&id)
    }

    /// Box `id` was last stored with.
    pub fn box_of(&self, id: Id) -> Option<AxisBox> {
        self.members.get(&id).map(|m| m.bx)
    }

    /// Adds `id`, or moves it if it is already present.
    pub fn insert(&mut self, id: Id, bx: AxisBox) {
        self.detach(id);

        let mut cells = Vec::new();
        self.for_each_cell(&bx, |index| cells.push(index));
        for &index in &cells {
            self.cells[index].push(id);
        }
        self.members.insert(id, Member { bx, cells });
    }

    /// Moves `id` to `bx`. Unknown ids are inserted.
    pub fn update(&mut self, id: Id, bx: AxisBox) {
        match self.members.get(&id) {
            Some(member) if member.bx == bx => {}
            Some(_) => self.insert(id, bx),
            None => {
                log::debug!("partition: update of unknown id, inserting it");
                self.insert(id, bx);
            }
        }
    }

    /// Removes `id` from every cell it occupies. Returns whether it was present.
    pub fn remove(&mut self, id: Id) -> bool {
        let removed = self.detach(id);
        if !removed {
            log::debug!("partition: remove of unknown id");
        }
        removed
    }

    fn detach(&mut self, id: Id) -> bool {
        let Some(member) = self.members.remove(&id) else {
            return false;
        };
        for index in member.cells {
            self.cells[index].retain(|&other| other != id);
        }
        true
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(Vec::clear);
        self.members.clear();
    }

    /// Ids whose stored box overlaps `bx` with positive area.
    ///
    /// - `exclude`: a single id to leave out, usually the querying entity.
    /// - `extra_exclude`: further ids to leave out.
    pub fn query(&self, bx: &AxisBox, exclude: Option<Id>, extra_exclude: &[Id]) -> Vec<Id> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();

        self.for_each_cell(bx, |index| {
            for &id in &self.cells[index] {
                if exclude == Some(id) || extra_exclude.contains(&id) || !seen.insert(id) {
                    continue;
                }
                let overlaps = self
                    .members
                    .get(&id)
                    .is_some_and(|m| !m.bx.intersection(bx).area().is_zero());
                if overlaps {
                    result.push(id);
                }
            }
        });

        result
    }

    fn cell_box(&self, row: usize, col: usize) -> AxisBox {
        AxisBox::from_ltwh(
            self.bounds.left() + self.cell_width * col as i32,
            self.bounds.top() + self.cell_height * row as i32,
            self.cell_width,
            self.cell_height,
        )
    }

    /// Calls `f` with the index of every cell overlapping `bx` with positive area.
    fn for_each_cell(&self, bx: &AxisBox, mut f: impl FnMut(usize)) {
        let clamp = |value: i32, len: usize| value.clamp(0, len as i32 - 1) as usize;
        let col_of = |x: Fixed| ((x - self.bounds.left()) / self.cell_width).to_int();
        let row_of = |y: Fixed| ((y - self.bounds.top()) / self.cell_height).to_int();

        let start_col = clamp(col_of(bx.left()), self.cols);
        let end_col = clamp(col_of(bx.right()), self.cols);
        let start_row = clamp(row_of(bx.top()), self.rows);
        let end_row = clamp(row_of(bx.bottom()), self.rows);

        for col in start_col..=end_col {
            for row in start_row..=end_row {
                if !self.cell_box(row, col).intersection(bx).area().is_zero() {
                    f(col * self.rows + row);
                }
            }
        }
    }
}
