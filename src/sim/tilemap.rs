//! Static collision grid
//!
//! Rows of tile ids addressed in world coordinates. Id 0 is empty, anything
//! else is solid. Built once at level load and only read afterwards.

use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;
use crate::error::LevelError;
use crate::grid_index;

/// Tile identifier (0 = empty)
pub type TileId = u8;

/// The empty tile
pub const EMPTY: TileId = 0;

/// Rectangular tile grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTileMap", into = "RawTileMap")]
pub struct TileMap {
    rows: Vec<Vec<TileId>>,
    tile_size: f32,
}

#[derive(Serialize, Deserialize)]
struct RawTileMap {
    rows: Vec<Vec<TileId>>,
    #[serde(default = "default_tile_size")]
    tile_size: f32,
}

fn default_tile_size() -> f32 {
    TILE_SIZE
}

impl TryFrom<RawTileMap> for TileMap {
    type Error = LevelError;

    fn try_from(raw: RawTileMap) -> Result<Self, Self::Error> {
        TileMap::new(raw.rows, raw.tile_size)
    }
}

impl From<TileMap> for RawTileMap {
    fn from(map: TileMap) -> Self {
        Self {
            rows: map.rows,
            tile_size: map.tile_size,
        }
    }
}

impl TileMap {
    /// Build a map from rows, rejecting empty or ragged grids.
    ///
    /// # Panics
    /// If `tile_size` is not positive.
    pub fn new(rows: Vec<Vec<TileId>>, tile_size: f32) -> Result<Self, LevelError> {
        assert!(tile_size > 0.0, "tile size must be positive");
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        if expected == 0 {
            return Err(LevelError::Empty);
        }
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != expected)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(LevelError::Ragged {
                row,
                expected,
                found,
            });
        }
        Ok(Self { rows, tile_size })
    }

    /// Parse a text level: `.` or space is empty, `#` is tile 1, a digit is
    /// that tile id. Blank lines are skipped.
    pub fn from_ascii(text: &str, tile_size: f32) -> Result<Self, LevelError> {
        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .chars()
                .enumerate()
                .map(|(column, ch)| match ch {
                    '.' | ' ' => Ok(EMPTY),
                    '#' => Ok(1),
                    d if d.is_ascii_digit() => Ok(d as TileId - b'0'),
                    ch => Err(LevelError::InvalidTile {
                        line: line_no + 1,
                        column: column + 1,
                        ch,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        let map = Self::new(rows, tile_size)?;
        log::info!(
            "Parsed level: {}x{} tiles ({}x{} px)",
            map.width(),
            map.height(),
            map.pixel_width(),
            map.pixel_height()
        );
        Ok(map)
    }

    /// Built-in 10x7 test level: a floor, a two-tile ledge on the left and
    /// one floating tile.
    pub fn demo() -> Self {
        let mut rows = vec![vec![EMPTY; 10]; 7];
        rows[6].iter_mut().for_each(|t| *t = 1);
        rows[5][0] = 1;
        rows[5][1] = 1;
        rows[3][5] = 1;
        Self {
            rows,
            tile_size: TILE_SIZE,
        }
    }

    /// Tile under a world coordinate, or `EMPTY` outside the grid.
    pub fn tile_at(&self, x: f32, y: f32) -> TileId {
        let col = grid_index(x, self.tile_size);
        let row = grid_index(y, self.tile_size);
        self.tile(col, row)
    }

    /// Tile at grid indices, or `EMPTY` outside the grid.
    pub fn tile(&self, col: i32, row: i32) -> TileId {
        if col < 0 || row < 0 {
            return EMPTY;
        }
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(EMPTY)
    }

    #[inline]
    pub fn is_solid(&self, x: f32, y: f32) -> bool {
        self.tile_at(x, y) != EMPTY
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn pixel_width(&self) -> f32 {
        self.width() as f32 * self.tile_size
    }

    pub fn pixel_height(&self) -> f32 {
        self.height() as f32 * self.tile_size
    }
}
