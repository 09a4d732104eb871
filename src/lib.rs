//! tilesweep: swept-box collision against tile grids plus a quadtree for
//! actor queries (velocity resolution only, positions are the caller's job)

pub mod types;
pub mod error;
pub mod api;
pub mod narrowphase;
pub mod tiles;
pub mod resolve;
pub mod quadtree;
pub mod layer;
pub mod motion;

pub use crate::types::*;
pub use crate::error::*;
pub use crate::api::*;
pub use crate::narrowphase::Narrowphase;
pub use crate::tiles::TileGrid;
pub use crate::resolve::{AxisRange, CandidateRange, OneWayMode, TileContact, TileResolution, TileResolver};
pub use crate::quadtree::{NodeInfo, Quadtree, QuadtreeStats};
pub use crate::layer::{CollisionLayer, IndexStrategy, SyncReport};
pub use crate::motion::{advance, exp_decay, follow_camera, Mover};
