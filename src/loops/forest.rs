//! Loop forest module
//!
//! This module contains the Loop and LoopForest types that hold the result
//! of loop recognition, plus the nesting/depth computation over them.

use crate::error::Result;
use petgraph::graph::NodeIndex;
use std::io::Write;

/// Stable handle to a loop inside a [`LoopForest`].
///
/// Handles stay valid while the forest grows, which lets an enclosing loop
/// adopt an already-created inner loop purely by updating links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopId(usize);

impl LoopId {
    /// Position of this loop in the forest's arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A discovered natural loop, or the synthetic root.
///
/// Member blocks are owned innermost-first: a block appears in exactly one
/// loop's member list, the innermost loop that directly claims it. Nested
/// loops are linked through `parent`/`children` instead of re-listing
/// their blocks.
#[derive(Debug, Clone)]
pub struct Loop {
    head: Option<NodeIndex>,
    blocks: Vec<NodeIndex>,
    children: Vec<LoopId>,
    parent: Option<LoopId>,
    is_root: bool,
    is_reducible: bool,
    counter: usize,
    nesting: usize,
    depth: usize,
}

impl Loop {
    fn root() -> Self {
        Self {
            head: None,
            blocks: Vec::new(),
            children: Vec::new(),
            parent: None,
            is_root: true,
            is_reducible: true,
            counter: 0,
            nesting: 0,
            depth: 0,
        }
    }

    /// Head block of the loop; `None` only for the synthetic root
    pub fn head(&self) -> Option<NodeIndex> {
        self.head
    }

    /// Directly-owned member blocks, head first
    pub fn blocks(&self) -> &[NodeIndex] {
        &self.blocks
    }

    /// Loops nested directly inside this one, in discovery order
    pub fn children(&self) -> &[LoopId] {
        &self.children
    }

    /// Enclosing loop, set during discovery or by the nesting pass
    pub fn parent(&self) -> Option<LoopId> {
        self.parent
    }

    /// Whether this is the synthetic root
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Whether the loop has a single entry dominated by its header
    pub fn is_reducible(&self) -> bool {
        self.is_reducible
    }

    /// Stable display number of this loop (0 for the root)
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Height of the subtree beneath this loop (0 for innermost loops)
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Distance from the synthetic root (1 for outermost loops)
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Forest of all loops discovered in one analysis run.
///
/// Loops live in a single arena with the synthetic root at index 0, so the
/// total loop count includes the root. Storage can be reused across runs
/// via [`LoopForest::clear`].
pub struct LoopForest {
    loops: Vec<Loop>,
    counter: usize,
}

impl LoopForest {
    /// Handle of the synthetic root
    pub const ROOT: LoopId = LoopId(0);

    /// Create a forest containing only the synthetic root
    pub fn new() -> Self {
        Self {
            loops: vec![Loop::root()],
            counter: 0,
        }
    }

    /// Reset the forest to just the root, retaining allocations.
    ///
    /// The loop counter keeps increasing across clears so dump names stay
    /// distinct between runs.
    pub fn clear(&mut self) {
        self.loops.truncate(1);
        let root = &mut self.loops[0];
        root.children.clear();
        root.nesting = 0;
        root.depth = 0;
    }

    /// Record a newly discovered loop and return its handle.
    ///
    /// The head block becomes the first member; `capacity` reserves space
    /// for the body blocks about to be collapsed into it.
    pub(crate) fn new_loop(
        &mut self,
        head: NodeIndex,
        capacity: usize,
        is_reducible: bool,
    ) -> LoopId {
        self.counter += 1;
        let mut blocks = Vec::with_capacity(capacity);
        blocks.push(head);
        let id = LoopId(self.loops.len());
        self.loops.push(Loop {
            head: Some(head),
            blocks,
            children: Vec::new(),
            parent: None,
            is_root: false,
            is_reducible,
            counter: self.counter,
            nesting: 0,
            depth: 0,
        });
        id
    }

    /// Add a directly-owned member block to a loop
    pub(crate) fn add_block(&mut self, id: LoopId, block: NodeIndex) {
        self.loops[id.0].blocks.push(block);
    }

    /// Link an inner loop under its enclosing loop
    pub(crate) fn set_parent(&mut self, child: LoopId, parent: LoopId) {
        self.loops[child.0].parent = Some(parent);
        self.loops[parent.0].children.push(child);
    }

    /// Total number of loops, including the synthetic root
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    /// Get a loop by handle
    pub fn get(&self, id: LoopId) -> &Loop {
        &self.loops[id.0]
    }

    /// Get the synthetic root
    pub fn root(&self) -> &Loop {
        &self.loops[0]
    }

    /// Iterate over all loops, root first
    pub fn iter(&self) -> impl Iterator<Item = (LoopId, &Loop)> {
        self.loops
            .iter()
            .enumerate()
            .map(|(i, l)| (LoopId(i), l))
    }

    /// Attach every parentless loop to the root, then assign depth and
    /// nesting over the whole forest.
    ///
    /// Depth is assigned pre-order from the root (root = 0, outermost
    /// loops = 1); nesting is the height of the subtree beneath each loop,
    /// so leaf loops keep 0.
    pub fn calculate_nesting(&mut self) {
        for i in 1..self.loops.len() {
            if self.loops[i].parent.is_none() {
                self.loops[i].parent = Some(Self::ROOT);
                self.loops[0].children.push(LoopId(i));
            }
        }
        self.assign_nesting(Self::ROOT, 0);
    }

    fn assign_nesting(&mut self, id: LoopId, depth: usize) {
        self.loops[id.0].depth = depth;
        for i in 0..self.loops[id.0].children.len() {
            let child = self.loops[id.0].children[i];
            self.assign_nesting(child, depth + 1);
            let candidate = self.loops[child.0].nesting + 1;
            if self.loops[id.0].nesting < candidate {
                self.loops[id.0].nesting = candidate;
            }
        }
    }

    /// Write the forest as an indented tree, root first
    pub fn dump<W: Write>(&self, w: &mut W) -> Result<()> {
        self.dump_loop(w, Self::ROOT, 0)
    }

    fn dump_loop<W: Write>(&self, w: &mut W, id: LoopId, indent: usize) -> Result<()> {
        let l = &self.loops[id.0];
        write!(
            w,
            "{:indent$}loop-{} nest: {} depth {}",
            "",
            l.counter,
            l.nesting,
            l.depth,
            indent = 2 * indent
        )?;
        if !l.is_reducible {
            write!(w, " (Irreducible)")?;
        }
        if !l.blocks.is_empty() {
            write!(w, " (")?;
            for (i, block) in l.blocks.iter().enumerate() {
                let sep = if i > 0 { " " } else { "" };
                write!(w, "{}b{}", sep, block.index())?;
                if Some(*block) == l.head {
                    write!(w, "*")?;
                }
            }
            write!(w, ")")?;
        }
        writeln!(w)?;

        for child in &l.children {
            self.dump_loop(w, *child, indent + 1)?;
        }
        Ok(())
    }
}

impl Default for LoopForest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_forest_has_only_root() {
        let forest = LoopForest::new();
        assert_eq!(forest.loop_count(), 1);
        assert!(forest.root().is_root());
        assert_eq!(forest.root().head(), None);
    }

    #[test]
    fn test_clear_keeps_counter_monotone() {
        let mut forest = LoopForest::new();
        let a = forest.new_loop(NodeIndex::new(1), 1, true);
        assert_eq!(forest.get(a).counter(), 1);

        forest.clear();
        assert_eq!(forest.loop_count(), 1);

        let b = forest.new_loop(NodeIndex::new(1), 1, true);
        assert_eq!(forest.get(b).counter(), 2);
    }

    #[test]
    fn test_nesting_attaches_orphans_to_root() {
        let mut forest = LoopForest::new();
        let outer = forest.new_loop(NodeIndex::new(1), 2, true);
        let inner = forest.new_loop(NodeIndex::new(2), 2, true);
        forest.set_parent(inner, outer);
        forest.calculate_nesting();

        assert_eq!(forest.get(outer).parent(), Some(LoopForest::ROOT));
        assert_eq!(forest.get(outer).depth(), 1);
        assert_eq!(forest.get(inner).depth(), 2);
        assert_eq!(forest.get(inner).nesting(), 0);
        assert_eq!(forest.get(outer).nesting(), 1);
        assert_eq!(forest.root().nesting(), 2);
    }
}
