//! Live-cell binary search tree
//!
//! An ordinary unbalanced BST keyed by [`Coord::key`]. Nodes live in an arena
//! and refer to each other by index; the parent index is a navigation aid
//! only and never owns anything.
//!
//! Removing a node with two children copies its in-order successor's
//! coordinate into it and unlinks the successor instead, so a node position
//! can change payload across a removal. [`CellRef`] borrows the tree, which
//! keeps such views from surviving any mutation: re-`search` afterwards.

use std::cmp::Ordering;
use std::fmt::{self, Write as _};

use super::coord::{Coord, Key};
use crate::error::{LifeError, Result};

/// Arena index of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    coord: Coord,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
}

/// Where a node hangs in the tree
#[derive(Debug, Clone, Copy)]
enum Slot {
    Root,
    Left(NodeId),
    Right(NodeId),
}

/// Traversal order for [`CellTree::traverse`] and [`CellTree::dump`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    InOrder,
    PreOrder,
    PostOrder,
}

/// Ordered set of live cells
#[derive(Debug, Clone, Default)]
pub struct CellTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    count: usize,
}

/// Borrowed view of one node
#[derive(Clone, Copy)]
pub struct CellRef<'a> {
    tree: &'a CellTree,
    id: NodeId,
}

impl<'a> CellRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn coord(&self) -> Coord {
        self.tree.nodes[self.id.0].coord
    }

    pub fn key(&self) -> Key {
        self.coord().key()
    }

    pub fn left(&self) -> Option<CellRef<'a>> {
        self.tree.nodes[self.id.0].left.map(|id| self.tree.view(id))
    }

    pub fn right(&self) -> Option<CellRef<'a>> {
        self.tree.nodes[self.id.0].right.map(|id| self.tree.view(id))
    }

    pub fn parent(&self) -> Option<CellRef<'a>> {
        self.tree.nodes[self.id.0].parent.map(|id| self.tree.view(id))
    }
}

impl fmt::Debug for CellRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellRef")
            .field("id", &self.id)
            .field("coord", &self.coord())
            .finish()
    }
}

impl CellTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree by inserting coordinates in iteration order
    pub fn from_coords<I>(coords: I) -> Result<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut tree = Self::new();
        for coord in coords {
            tree.insert(coord)?;
        }
        Ok(tree)
    }

    /// Number of live cells
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.count = 0;
    }

    pub fn root(&self) -> Option<CellRef<'_>> {
        self.root.map(|id| self.view(id))
    }

    fn view(&self, id: NodeId) -> CellRef<'_> {
        CellRef { tree: self, id }
    }

    /// Find the node holding `coord`
    pub fn search(&self, coord: Coord) -> Option<CellRef<'_>> {
        self.find(coord.key()).map(|id| self.view(id))
    }

    /// True if `coord` is live
    pub fn contains(&self, coord: Coord) -> bool {
        self.find(coord.key()).is_some()
    }

    fn find(&self, key: Key) -> Option<NodeId> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id.0];
            cursor = match key.cmp(&node.coord.key()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Insert a new live cell.
    ///
    /// Inserting a coordinate that is already present is a caller bug and
    /// returns [`LifeError::DuplicateKey`] without touching the tree.
    pub fn insert(&mut self, coord: Coord) -> Result<()> {
        let key = coord.key();
        let mut parent = None;
        let mut cursor = self.root;
        let mut went_left = false;

        while let Some(id) = cursor {
            let node = &self.nodes[id.0];
            parent = Some(id);
            cursor = match key.cmp(&node.coord.key()) {
                Ordering::Less => {
                    went_left = true;
                    node.left
                }
                Ordering::Greater => {
                    went_left = false;
                    node.right
                }
                Ordering::Equal => {
                    log::error!("duplicate insert of live cell {}", coord);
                    return Err(LifeError::DuplicateKey { coord });
                }
            };
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            coord,
            left: None,
            right: None,
            parent,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) if went_left => self.nodes[p.0].left = Some(id),
            Some(p) => self.nodes[p.0].right = Some(id),
        }
        self.count += 1;
        Ok(())
    }

    /// Remove the live cell at `coord`.
    ///
    /// Returns `Ok(false)` if there was nothing to remove. A parent link that
    /// does not point back at the node is reported as
    /// [`LifeError::TreeInvariantViolation`] before anything is modified.
    pub fn remove(&mut self, coord: Coord) -> Result<bool> {
        let Some(target) = self.find(coord.key()) else {
            return Ok(false);
        };

        // Two children: the in-order successor gives up its coordinate and
        // is unlinked in the target's place. It never has a left child.
        let victim = match (self.nodes[target.0].left, self.nodes[target.0].right) {
            (Some(_), Some(right)) => self.minimum_id(right),
            _ => target,
        };

        let slot = self.parent_slot(victim)?;
        if victim != target {
            self.nodes[target.0].coord = self.nodes[victim.0].coord;
        }

        let Node { left, right, parent, .. } = self.nodes[victim.0];
        let child = left.or(right);
        match slot {
            Slot::Root => self.root = child,
            Slot::Left(p) => self.nodes[p.0].left = child,
            Slot::Right(p) => self.nodes[p.0].right = child,
        }
        if let Some(c) = child {
            self.nodes[c.0].parent = parent;
        }

        self.release(victim);
        self.count -= 1;
        Ok(true)
    }

    /// Leftmost node of the subtree rooted at `node`
    pub fn minimum<'a>(&'a self, node: CellRef<'a>) -> CellRef<'a> {
        self.view(self.minimum_id(node.id))
    }

    fn minimum_id(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id.0].left {
            id = left;
        }
        id
    }

    fn parent_slot(&self, id: NodeId) -> Result<Slot> {
        let node = &self.nodes[id.0];
        match node.parent {
            None if self.root == Some(id) => Ok(Slot::Root),
            None => Err(self.violation(id, "node has no parent but is not the root")),
            Some(p) if self.nodes[p.0].left == Some(id) => Ok(Slot::Left(p)),
            Some(p) if self.nodes[p.0].right == Some(id) => Ok(Slot::Right(p)),
            Some(_) => Err(self.violation(id, "parent does not link back to node")),
        }
    }

    fn violation(&self, id: NodeId, detail: &str) -> LifeError {
        let coord = self.nodes[id.0].coord;
        log::error!("tree invariant violated at {}: {}", coord, detail);
        LifeError::TreeInvariantViolation {
            coord,
            detail: detail.to_string(),
        }
    }

    /// Free an unlinked node's arena slot, moving the last node into it.
    fn release(&mut self, id: NodeId) {
        let last = NodeId(self.nodes.len() - 1);
        self.nodes.swap_remove(id.0);
        if id == last {
            return;
        }

        let Node { left, right, parent, .. } = self.nodes[id.0];
        match parent {
            None => self.root = Some(id),
            Some(p) => {
                let parent = &mut self.nodes[p.0];
                if parent.left == Some(last) {
                    parent.left = Some(id);
                } else {
                    parent.right = Some(id);
                }
            }
        }
        for child in [left, right].into_iter().flatten() {
            self.nodes[child.0].parent = Some(id);
        }
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        let mut best = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            best = best.max(depth);
            let node = &self.nodes[id.0];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        best
    }

    /// Audit ordering, parent links and the count.
    pub fn check_invariants(&self) -> Result<()> {
        let mut reachable = 0;
        if let Some(root) = self.root {
            if self.nodes[root.0].parent.is_some() {
                return Err(self.violation(root, "root has a parent"));
            }
            let mut stack: Vec<(NodeId, Option<Key>, Option<Key>)> = vec![(root, None, None)];
            while let Some((id, lo, hi)) = stack.pop() {
                reachable += 1;
                if reachable > self.nodes.len() {
                    return Err(self.violation(id, "cycle in child links"));
                }
                let node = &self.nodes[id.0];
                let key = node.coord.key();
                if lo.is_some_and(|lo| key <= lo) || hi.is_some_and(|hi| key >= hi) {
                    return Err(self.violation(id, "key out of order"));
                }
                for (child, lo, hi) in [
                    (node.left, lo, Some(key)),
                    (node.right, Some(key), hi),
                ] {
                    if let Some(child) = child {
                        if self.nodes[child.0].parent != Some(id) {
                            return Err(self.violation(child, "parent does not link back to node"));
                        }
                        stack.push((child, lo, hi));
                    }
                }
            }
        }

        if reachable != self.count || self.count != self.nodes.len() {
            return Err(LifeError::TreeInvariantViolation {
                coord: self.root.map(|r| self.nodes[r.0].coord).unwrap_or_default(),
                detail: format!(
                    "count {} but {} reachable and {} allocated",
                    self.count,
                    reachable,
                    self.nodes.len()
                ),
            });
        }
        Ok(())
    }

    /// Coordinates in key order
    pub fn iter(&self) -> InOrder<'_> {
        self.iter_in_order()
    }

    pub fn iter_in_order(&self) -> InOrder<'_> {
        InOrder {
            tree: self,
            stack: Vec::new(),
            cursor: self.root,
        }
    }

    pub fn iter_pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    pub fn iter_post_order(&self) -> PostOrder<'_> {
        PostOrder {
            tree: self,
            stack: self.root.map(|r| (r, false)).into_iter().collect(),
        }
    }

    pub fn traverse(&self, order: TraversalOrder) -> Box<dyn Iterator<Item = Coord> + '_> {
        match order {
            TraversalOrder::InOrder => Box::new(self.iter_in_order()),
            TraversalOrder::PreOrder => Box::new(self.iter_pre_order()),
            TraversalOrder::PostOrder => Box::new(self.iter_post_order()),
        }
    }

    /// Human-readable listing for diagnostics
    pub fn dump(&self, order: TraversalOrder) -> String {
        let mut out = format!("Count: {}\n", self.count);
        if self.is_empty() {
            out.push_str("Tree is empty\n");
            return out;
        }
        for c in self.traverse(order) {
            let _ = writeln!(out, "x: {}\ty: {}\tkey: {}", c.x, c.y, c.key());
        }
        out
    }
}

impl<'a> IntoIterator for &'a CellTree {
    type Item = Coord;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_in_order()
    }
}

/// In-order (ascending key) traversal
pub struct InOrder<'a> {
    tree: &'a CellTree,
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
}

impl Iterator for InOrder<'_> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        while let Some(id) = self.cursor {
            self.stack.push(id);
            self.cursor = self.tree.nodes[id.0].left;
        }
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];
        self.cursor = node.right;
        Some(node.coord)
    }
}

/// Pre-order traversal; reinserting in this order rebuilds the same shape
pub struct PreOrder<'a> {
    tree: &'a CellTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrder<'_> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some(node.coord)
    }
}

/// Post-order traversal
pub struct PostOrder<'a> {
    tree: &'a CellTree,
    stack: Vec<(NodeId, bool)>,
}

impl Iterator for PostOrder<'_> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        loop {
            let (id, expanded) = self.stack.pop()?;
            let node = &self.tree.nodes[id.0];
            if expanded {
                return Some(node.coord);
            }
            self.stack.push((id, true));
            self.stack.extend(node.right.map(|r| (r, false)));
            self.stack.extend(node.left.map(|l| (l, false)));
        }
    }
}
