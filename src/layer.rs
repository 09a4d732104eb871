use std::collections::HashSet;

use log::{debug, trace};

use crate::api::SpatialItem;
use crate::error::QuadtreeError;
use crate::quadtree::Quadtree;
use crate::types::*;

/// How a layer keeps its quadtree in step with moving actors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexStrategy {
    /// Clear and re-insert every actor each tick.
    #[default]
    Rebuild,
    /// Relocate each actor in place; despawns must be reported explicitly.
    Incremental,
}

/// Outcome of one [`CollisionLayer::sync`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub indexed: usize,
    /// Actors left out of the index because their box was outside the room.
    pub rejected: usize,
}

/// Spatial index for one class of actors (enemies, doors, pickups, ...) in
/// one room. Layers are independent of each other and are dropped with the
/// room.
pub struct CollisionLayer<T: SpatialItem> {
    tree: Quadtree<T>,
    strategy: IndexStrategy,
}

impl<T: SpatialItem> CollisionLayer<T> {
    pub fn new(room: Rect, strategy: IndexStrategy) -> Self {
        Self::with_config(room, strategy, QuadtreeConfig::default())
    }

    pub fn with_config(room: Rect, strategy: IndexStrategy, cfg: QuadtreeConfig) -> Self {
        Self { tree: Quadtree::with_config(room, cfg), strategy }
    }

    pub fn strategy(&self) -> IndexStrategy {
        self.strategy
    }

    pub fn tree(&self) -> &Quadtree<T> {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Adds one actor (spawn).
    pub fn insert(&mut self, item: T) -> Result<(), QuadtreeError> {
        self.tree.insert(item)
    }

    /// Removes one actor (despawn).
    pub fn despawn(&mut self, id: T::Id) -> Option<T> {
        self.tree.remove(id)
    }

    /// Brings the index up to date with the actors' current boxes. Call once
    /// per tick after positions were integrated.
    pub fn sync<I: IntoIterator<Item = T>>(&mut self, items: I) -> SyncReport {
        if self.strategy == IndexStrategy::Rebuild {
            self.tree.clear();
        }
        let mut report = SyncReport::default();
        for item in items {
            let id = item.id();
            let res = match self.strategy {
                IndexStrategy::Rebuild => self.tree.insert(item),
                IndexStrategy::Incremental => self.tree.relocate(item),
            };
            match res {
                Ok(()) => report.indexed += 1,
                Err(err) => {
                    debug!("layer: {id:?} not indexed: {err}");
                    report.rejected += 1;
                }
            }
        }
        trace!("layer: synced {:?} -> {report:?}", self.strategy);
        report
    }

    /// Actors overlapping the camera viewport.
    pub fn visible(&self, camera: Rect) -> Vec<&T> {
        self.tree.search(camera)
    }

    /// Actors overlapping `item`'s box, `item` itself excluded.
    pub fn neighbours(&self, item: &T) -> Vec<&T> {
        let id = item.id();
        let mut found = self.tree.search(item.rect());
        found.retain(|other| other.id() != id);
        found
    }

    /// Every overlapping pair of indexed actors, each pair once.
    pub fn pairs(&self) -> Vec<(&T, &T)> {
        let mut done: HashSet<T::Id> = HashSet::with_capacity(self.tree.len());
        let mut out = Vec::new();
        let mut buf = Vec::new();
        for a in self.tree.iter() {
            let id = a.id();
            done.insert(id);
            self.tree.search_into(a.rect(), &mut buf);
            out.extend(buf.iter().filter(|b| !done.contains(&b.id())).map(|&b| (a, b)));
        }
        out
    }
}
