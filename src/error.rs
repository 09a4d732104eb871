use thiserror::Error;

use crate::types::Rect;

/// Rejected tile grid construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("tile grid must have non-zero dimensions, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
    #[error("tile size must be finite and positive, got {0}")]
    InvalidTileSize(f32),
    #[error("expected {expected} cells for the grid, found {found}")]
    CellCountMismatch { expected: usize, found: usize },
}

/// Rejected quadtree insertion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuadtreeError {
    #[error("item box {rect:?} lies entirely outside the tree extent")]
    OutOfBounds { rect: Rect },
    #[error("item box {rect:?} is not finite or has a negative size")]
    InvalidRect { rect: Rect },
    #[error("an item with this id is already stored")]
    DuplicateId,
}
