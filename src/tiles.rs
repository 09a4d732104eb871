use std::fmt;

use glam::Vec2;

use crate::api::TileSource;
use crate::error::GridError;
use crate::types::*;

/// Immutable collision grid for one room, row-major, square cells.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: f32,
    cells: Vec<TileCode>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile_size: f32, cells: Vec<TileCode>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimensions { width, height });
        }
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch { expected, found: cells.len() });
        }
        Ok(Self { width, height, tile_size, cells })
    }

    /// One character per cell (`'0'` air, `'1'` solid, `'2'` one-way, anything
    /// else passed through as `TileCode::Other`). Whitespace is ignored so maps
    /// can be written one row per line.
    pub fn from_codes(width: u32, height: u32, tile_size: f32, codes: &str) -> Result<Self, GridError> {
        let cells = codes
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(TileCode::from_char)
            .collect();
        Self::new(width, height, tile_size, cells)
    }

    /// Merges a solid layer and a one-way layer (Tiled-style tile ids, `0` for
    /// no tile) into one collision grid. Solid wins where both are set.
    pub fn from_layers(
        width: u32,
        height: u32,
        tile_size: f32,
        solid: &[u32],
        one_way: &[u32],
    ) -> Result<Self, GridError> {
        let expected = width as usize * height as usize;
        for layer in [solid, one_way] {
            if layer.len() != expected {
                return Err(GridError::CellCountMismatch { expected, found: layer.len() });
            }
        }
        let cells = solid
            .iter()
            .zip(one_way)
            .map(|(&s, &o)| match (s, o) {
                (0, 0) => TileCode::Empty,
                (0, _) => TileCode::OneWay,
                _ => TileCode::Solid,
            })
            .collect();
        Self::new(width, height, tile_size, cells)
    }

    /// Cell containing `p` (floor division, may lie outside the grid).
    pub fn cell_of(&self, p: Vec2) -> (i32, i32) {
        (
            (p.x / self.tile_size).floor() as i32,
            (p.y / self.tile_size).floor() as i32,
        )
    }

    /// World rectangle covered by the grid.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    pub fn cells(&self) -> &[TileCode] {
        &self.cells
    }
}

impl TileSource for TileGrid {
    fn tile_at(&self, col: i32, row: i32) -> TileCode {
        if col < 0 || row < 0 || col as u32 >= self.width || row as u32 >= self.height {
            return TileCode::OutOfBounds;
        }
        self.cells[row as usize * self.width as usize + col as usize]
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn tile_size(&self) -> f32 {
        self.tile_size
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            for code in row {
                write!(f, "{code}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
