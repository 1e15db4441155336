//! Uniform block grid for broad-phase bucketing
//!
//! Blocks are coarser than tiles. A body is listed in every block one of its
//! four corners falls in, so it touches at most four blocks. Membership is by
//! id only; the index never owns bodies.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use crate::consts::MAX_BLOCKS_PER_AXIS;
use crate::grid_index;

/// Block grid coordinate (column, row); may lie outside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub col: i32,
    pub row: i32,
}

impl CellCoord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Blocks needed along one axis to cover `extent`, plus one padding block.
/// `None` when the count is not finite or exceeds `MAX_BLOCKS_PER_AXIS`.
pub fn blocks_to_cover(extent: f32, block_size: f32) -> Option<usize> {
    let span = (extent / block_size).ceil();
    (span.is_finite() && span >= 0.0 && span < MAX_BLOCKS_PER_AXIS as f32)
        .then(|| span as usize + 1)
}

/// Grid of membership sets
#[derive(Debug, Clone)]
pub struct BlockIndex {
    columns: usize,
    rows: usize,
    block_size: f32,
    cells: Vec<Vec<EntityId>>,
}

impl BlockIndex {
    /// # Panics
    /// If `block_size` is not positive.
    pub fn new(columns: usize, rows: usize, block_size: f32) -> Self {
        assert!(block_size > 0.0, "block size must be positive");
        Self {
            columns,
            rows,
            block_size,
            cells: vec![Vec::new(); columns * rows],
        }
    }

    /// Size the grid to cover a screen, plus one padding block per axis.
    ///
    /// # Panics
    /// If either axis needs more than `MAX_BLOCKS_PER_AXIS` blocks.
    /// `PhysicsConfig::validate` rejects such screens.
    pub fn for_screen(width: f32, height: f32, block_size: f32) -> Self {
        let span = |extent: f32| {
            blocks_to_cover(extent, block_size).unwrap_or_else(|| {
                panic!("screen extent {extent} needs too many {block_size}px blocks")
            })
        };
        let columns = span(width);
        let rows = span(height);
        log::info!(
            "Block index {}x{} ({}px blocks) for {}x{} screen",
            columns,
            rows,
            block_size,
            width,
            height
        );
        Self::new(columns, rows, block_size)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn slot(&self, cell: CellCoord) -> Option<usize> {
        let in_range = cell.col >= 0
            && cell.row >= 0
            && (cell.col as usize) < self.columns
            && (cell.row as usize) < self.rows;
        in_range.then(|| cell.row as usize * self.columns + cell.col as usize)
    }

    /// Block of each corner (TL, TR, BL, BR); duplicates are kept.
    pub fn cells_for(&self, entity: &Entity) -> [CellCoord; 4] {
        entity.corners().map(|corner| {
            CellCoord::new(
                grid_index(corner.x, self.block_size),
                grid_index(corner.y, self.block_size),
            )
        })
    }

    /// Add the body to each of its corner blocks it isn't already in.
    ///
    /// Blocks outside the grid are skipped but still returned, so a later
    /// `unregister` sees the same list.
    pub fn register(&mut self, entity: &Entity) -> [CellCoord; 4] {
        let cells = self.cells_for(entity);
        for cell in cells {
            match self.slot(cell) {
                Some(slot) => {
                    let members = &mut self.cells[slot];
                    if !members.contains(&entity.id) {
                        members.push(entity.id);
                    }
                }
                None => log::trace!("{:?} corner block {:?} is off-grid", entity.id, cell),
            }
        }
        cells
    }

    /// Remove the body from each listed block, ignoring blocks it isn't in.
    pub fn unregister(&mut self, id: EntityId, cells: &[CellCoord]) {
        for &cell in cells {
            self.remove_if_present(id, cell);
        }
    }

    /// Best-effort removal; returns whether anything was removed.
    pub fn remove_if_present(&mut self, id: EntityId, cell: CellCoord) -> bool {
        let Some(slot) = self.slot(cell) else {
            return false;
        };
        let members = &mut self.cells[slot];
        match members.iter().position(|m| *m == id) {
            Some(i) => {
                members.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Move the body's membership to where it is now. Call once per tick
    /// after its position is final.
    pub fn refresh(&mut self, entity: &mut Entity) {
        self.unregister(entity.id, &entity.cells);
        let cells = self.register(entity);
        entity.cells.clear();
        entity.cells.extend_from_slice(&cells);
    }

    /// Members of a block (empty when off-grid)
    pub fn entities_in(&self, cell: CellCoord) -> &[EntityId] {
        self.slot(cell)
            .map(|slot| self.cells[slot].as_slice())
            .unwrap_or(&[])
    }

    pub fn occupancy(&self, cell: CellCoord) -> usize {
        self.entities_in(cell).len()
    }

    /// Other bodies sharing at least one block with `entity`, ascending by id
    pub fn neighbors(&self, entity: &Entity) -> Vec<EntityId> {
        let mut found: Vec<EntityId> = entity
            .cells
            .iter()
            .flat_map(|&cell| self.entities_in(cell).iter().copied())
            .filter(|id| *id != entity.id)
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Total memberships across all blocks
    pub fn membership_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}
