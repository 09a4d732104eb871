use std::collections::HashMap;

use log::debug;

use crate::api::SpatialItem;
use crate::error::QuadtreeError;
use crate::types::*;

struct Node<T> {
    bounds: Rect,
    depth: u32,
    items: Vec<T>,
    /// Top-left, top-right, bottom-left, bottom-right. Created together.
    children: Option<[usize; 4]>,
}

impl<T> Node<T> {
    fn new(bounds: Rect, depth: u32) -> Self {
        Self { bounds, depth, items: Vec::new(), children: None }
    }
}

/// Extent and depth of the node holding an item.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeInfo {
    pub bounds: Rect,
    pub depth: u32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadtreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub items: usize,
    pub deepest: u32,
}

/// Region quadtree over axis-aligned boxes.
///
/// Every item lives at the shallowest node whose extent contains its box and
/// no single child quadrant does (or at a max-depth node). Nodes sit in an
/// arena; `index` maps each stored id to its node so removal never walks the
/// tree. Nodes are never pruned, only dropped by [`Quadtree::clear`].
pub struct Quadtree<T: SpatialItem> {
    cfg: QuadtreeConfig,
    nodes: Vec<Node<T>>,
    index: HashMap<T::Id, usize>,
}

impl<T: SpatialItem> Quadtree<T> {
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, QuadtreeConfig::default())
    }

    pub fn with_config(bounds: Rect, cfg: QuadtreeConfig) -> Self {
        debug_assert!(bounds.is_valid(), "quadtree extent must be finite with non-negative size");
        debug_assert!(cfg.max_depth >= 1, "quadtree needs at least the root level");
        Self {
            cfg,
            nodes: vec![Node::new(bounds, 0)],
            index: HashMap::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.nodes[0].bounds
    }

    pub fn config(&self) -> &QuadtreeConfig {
        &self.cfg
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        let node = *self.index.get(&id)?;
        self.nodes[node].items.iter().find(|it| it.id() == id)
    }

    pub fn node_of(&self, id: T::Id) -> Option<NodeInfo> {
        let node = &self.nodes[*self.index.get(&id)?];
        Some(NodeInfo { bounds: node.bounds, depth: node.depth })
    }

    /// Stores `item` at its tightest-fitting node.
    ///
    /// Boxes straddling the root edge are kept at the root. Boxes that do not
    /// strictly overlap the root extent are rejected, including zero-size
    /// boxes lying on its edge.
    pub fn insert(&mut self, item: T) -> Result<(), QuadtreeError> {
        let rect = item.rect();
        if !rect.is_valid() {
            return Err(QuadtreeError::InvalidRect { rect });
        }
        let id = item.id();
        if self.index.contains_key(&id) {
            return Err(QuadtreeError::DuplicateId);
        }
        let root = self.bounds();
        if !root.overlaps(&rect) {
            debug!("quadtree: rejecting {id:?} at {rect:?}, outside {root:?}");
            return Err(QuadtreeError::OutOfBounds { rect });
        }

        let mut node = 0;
        while self.nodes[node].depth + 1 < self.cfg.max_depth {
            let quads = self.nodes[node].bounds.quadrants();
            let mut fitting = (0..4).filter(|&i| quads[i].contains_rect(&rect));
            let (Some(slot), None) = (fitting.next(), fitting.next()) else {
                break;
            };
            node = self.child(node, slot);
        }

        self.nodes[node].items.push(item);
        self.index.insert(id, node);
        Ok(())
    }

    /// Child `slot` of `node`, creating all four children on first use.
    fn child(&mut self, node: usize, slot: usize) -> usize {
        if let Some(children) = self.nodes[node].children {
            return children[slot];
        }
        let depth = self.nodes[node].depth + 1;
        let quads = self.nodes[node].bounds.quadrants();
        let first = self.nodes.len();
        self.nodes.extend(quads.into_iter().map(|q| Node::new(q, depth)));
        self.nodes[node].children = Some([first, first + 1, first + 2, first + 3]);
        first + slot
    }

    /// Removes the item with `id`, returning it if it was stored.
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let node = self.index.remove(&id)?;
        let items = &mut self.nodes[node].items;
        let pos = items.iter().position(|it| it.id() == id);
        debug_assert!(pos.is_some(), "item-location index points at a node without {id:?}");
        Some(items.swap_remove(pos?))
    }

    /// Re-files an item whose box has already been moved. Ids not present are
    /// simply inserted.
    pub fn relocate(&mut self, item: T) -> Result<(), QuadtreeError> {
        self.remove(item.id());
        self.insert(item)
    }

    /// Drops every item and every node below the root.
    pub fn clear(&mut self) {
        debug!("quadtree: clearing {} items in {} nodes", self.index.len(), self.nodes.len());
        self.nodes.truncate(1);
        let root = &mut self.nodes[0];
        root.items.clear();
        root.children = None;
        self.index.clear();
    }

    /// Every stored item whose box overlaps `area`, in no particular order.
    pub fn search(&self, area: Rect) -> Vec<&T> {
        let mut out = Vec::new();
        self.search_into(area, &mut out);
        out
    }

    /// Like [`Quadtree::search`] but fills `out`, which is cleared first.
    pub fn search_into<'a>(&'a self, area: Rect, out: &mut Vec<&'a T>) {
        debug_assert!(area.is_valid(), "query box must be finite with non-negative size");
        out.clear();
        self.search_node(0, &area, out);
    }

    fn search_node<'a>(&'a self, idx: usize, area: &Rect, out: &mut Vec<&'a T>) {
        let node = &self.nodes[idx];
        out.extend(node.items.iter().filter(|it| area.overlaps(&it.rect())));
        let Some(children) = node.children else {
            return;
        };
        for child in children {
            let bounds = self.nodes[child].bounds;
            if area.contains_rect(&bounds) {
                self.collect_all(child, out);
            } else if bounds.overlaps(area) {
                self.search_node(child, area, out);
            }
        }
    }

    /// Subtree fully inside the query: everything in it is taken untested.
    fn collect_all<'a>(&'a self, idx: usize, out: &mut Vec<&'a T>) {
        let node = &self.nodes[idx];
        out.extend(node.items.iter());
        if let Some(children) = node.children {
            for child in children {
                self.collect_all(child, out);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter().flat_map(|n| n.items.iter())
    }

    pub fn stats(&self) -> QuadtreeStats {
        QuadtreeStats {
            nodes: self.nodes.len(),
            leaves: self.nodes.iter().filter(|n| n.children.is_none()).count(),
            items: self.index.len(),
            deepest: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
        }
    }
}
