//! Loop finder module
//!
//! This module implements Havlak's extension of Tarjan's interval-based
//! loop recognition: depth-first numbering of the graph, classification of
//! predecessor edges into back and forward edges, and a union-find-driven
//! collapsing pass that discovers loop bodies innermost-first.

use crate::cfg::Cfg;
use crate::loops::forest::{LoopForest, LoopId};
use petgraph::graph::NodeIndex;

/// Sentinel for a block the depth-first numbering never reached
const UNVISITED: usize = usize::MAX;

/// Classification of a block with respect to loop structure.
///
/// Only `SelfLoop`, `Irreducible` and `Dead` are ever assigned beyond the
/// initial `NonHeader`; `Reducible` is retained for completeness but
/// reducibility is recorded on the discovered [`Loop`](crate::loops::Loop)
/// instead of on the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    /// A regular block
    #[default]
    NonHeader,
    /// Header of a reducible loop
    Reducible,
    /// Single-block loop (back edge to itself)
    SelfLoop,
    /// Header of an irreducible loop
    Irreducible,
    /// Unreachable from the entry block
    Dead,
}

/// Per-block analysis record, fully reinitialized on every run
#[derive(Debug, Default)]
struct BlockState {
    /// Preorder number, 1-based position in the visitation order
    first: usize,
    /// Visitation-order length when this block's subtree finished
    last: usize,
    /// Innermost loop header this block currently reports to
    header: Option<usize>,
    kind: BlockKind,
    /// Predecessors reaching this block along back edges, in edge order
    back_preds: Vec<usize>,
    /// Predecessors reaching this block along forward/cross edges
    non_back_preds: Vec<usize>,
    /// Union-find parent, self-initialized, path-compressed on find
    union: usize,
    /// Loop this block became the header of, if any
    loop_id: Option<LoopId>,
}

impl BlockState {
    fn reset(&mut self, index: usize) {
        self.first = UNVISITED;
        self.last = UNVISITED;
        self.header = None;
        self.kind = BlockKind::NonHeader;
        self.back_preds.clear();
        self.non_back_preds.clear();
        self.union = index;
        self.loop_id = None;
    }
}

/// Explicit DFS stack frame: a block and the next successor to try
#[derive(Debug, Clone, Copy)]
struct Frame {
    block: usize,
    next: usize,
}

/// Loop finding state, reusable across repeated runs on the same graph.
///
/// All storage is retained between runs and reinitialized at the start of
/// [`LoopFinder::find_loops`]; no result of a prior run leaks into the
/// next one.
pub struct LoopFinder {
    blocks: Vec<BlockState>,
    /// Visitation order of the depth-first numbering (preorder)
    depth_first: Vec<usize>,
    /// Scratch stack for the iterative DFS
    stack: Vec<Frame>,
    /// Scratch work-list for the collapsing pass
    pool: Vec<usize>,
}

impl LoopFinder {
    /// Create a finder with empty scratch storage
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            depth_first: Vec::new(),
            stack: Vec::new(),
            pool: Vec::new(),
        }
    }

    /// Run the full analysis on `cfg`, recording discovered loops into
    /// `forest`. A zero-block graph is a no-op.
    ///
    /// The caller is expected to pass a fresh or [cleared](LoopForest::clear)
    /// forest and to invoke [`LoopForest::calculate_nesting`] afterwards.
    pub fn find_loops(&mut self, cfg: &Cfg, forest: &mut LoopForest) {
        let size = cfg.block_count();
        if size == 0 {
            return;
        }

        // Step A: reset per-block records, number blocks depth-first from
        // the entry, mark unreached blocks dead.
        if self.blocks.len() < size {
            self.blocks.resize_with(size, BlockState::default);
        } else {
            self.blocks.truncate(size);
        }
        for (i, state) in self.blocks.iter_mut().enumerate() {
            state.reset(i);
        }
        self.depth_first.clear();
        self.search(cfg, 0);
        for state in &mut self.blocks {
            if state.first == UNVISITED {
                state.kind = BlockKind::Dead;
            }
        }
        log::debug!(
            "numbered {} of {} blocks from entry",
            self.depth_first.len(),
            size
        );

        // Step B: split each reachable block's predecessor edges into back
        // edges (the block is a DFS-tree ancestor of the predecessor) and
        // forward/cross edges.
        for i in 0..self.depth_first.len() {
            let w = self.depth_first[i];
            for pred in cfg.predecessors(NodeIndex::new(w)) {
                let p = pred.index();
                if self.ancestor(w, p) {
                    self.blocks[w].back_preds.push(p);
                } else {
                    self.blocks[w].non_back_preds.push(p);
                }
            }
        }

        // The entry block heads everything that is not in a loop.
        self.blocks[0].header = Some(0);

        // Step C: walk the blocks in reverse preorder so inner loop
        // headers are resolved, and their bodies collapsed, before the
        // headers of enclosing loops.
        for i in (0..self.depth_first.len()).rev() {
            let w = self.depth_first[i];

            self.pool.clear();

            // Step D: seed the work-list with the union-find
            // representatives of w's back-edge sources. A back edge from w
            // to itself marks a single-block loop instead.
            for j in 0..self.blocks[w].back_preds.len() {
                let pred = self.blocks[w].back_preds[j];
                if pred == w {
                    self.blocks[w].kind = BlockKind::SelfLoop;
                } else {
                    let rep = self.find(pred);
                    if !self.pool.contains(&rep) {
                        self.pool.push(rep);
                    }
                }
            }

            // Step E: chase backwards through forward edges. A
            // representative that is not a descendant of w means the
            // region has another entry that avoids w, making the loop
            // irreducible; everything else inside w's interval joins the
            // body. The work-list grows while it is scanned, so the
            // length is re-read every step.
            let mut idx = 0;
            while idx < self.pool.len() {
                let x = self.pool[idx];
                idx += 1;
                for j in 0..self.blocks[x].non_back_preds.len() {
                    let y = self.blocks[x].non_back_preds[j];
                    let ydash = self.find(y);
                    if !self.ancestor(w, ydash) {
                        self.blocks[w].kind = BlockKind::Irreducible;
                        if !self.blocks[w].non_back_preds.contains(&y) {
                            self.blocks[w].non_back_preds.push(y);
                        }
                    } else if ydash != w && !self.pool.contains(&ydash) {
                        self.pool.push(ydash);
                    }
                }
            }

            // Collapse the discovered body into w and record the loop.
            if !self.pool.is_empty() || self.blocks[w].kind == BlockKind::SelfLoop {
                let is_reducible = self.blocks[w].kind != BlockKind::Irreducible;
                let id = forest.new_loop(NodeIndex::new(w), 1 + self.pool.len(), is_reducible);
                self.blocks[w].loop_id = Some(id);

                for j in 0..self.pool.len() {
                    let node = self.pool[j];
                    self.blocks[node].header = Some(w);
                    self.blocks[node].union = w;

                    // A node that already heads a loop carries its whole
                    // body; link the loops instead of re-listing blocks.
                    match self.blocks[node].loop_id {
                        Some(inner) => forest.set_parent(inner, id),
                        None => forest.add_block(id, NodeIndex::new(node)),
                    }
                }
            }
        }
    }

    /// Depth-first numbering from `root`, iterative to keep the stack
    /// bounded on deep graphs. Successors are tried in adjacency order;
    /// `first` is assigned on entry, `last` when the subtree finishes.
    fn search(&mut self, cfg: &Cfg, root: usize) {
        self.stack.clear();
        self.visit(root);
        self.stack.push(Frame {
            block: root,
            next: 0,
        });
        while !self.stack.is_empty() {
            let top = self.stack.len() - 1;
            let Frame { block, next } = self.stack[top];
            let succs = cfg.successors(NodeIndex::new(block));
            if let Some(succ) = succs.get(next) {
                self.stack[top].next = next + 1;
                let child = succ.index();
                if self.blocks[child].first == UNVISITED {
                    self.visit(child);
                    self.stack.push(Frame {
                        block: child,
                        next: 0,
                    });
                }
            } else {
                self.blocks[block].last = self.depth_first.len();
                self.stack.pop();
            }
        }
    }

    fn visit(&mut self, block: usize) {
        self.depth_first.push(block);
        self.blocks[block].first = self.depth_first.len();
    }

    /// Interval test: is `a` an ancestor of `d` in the DFS tree?
    fn ancestor(&self, a: usize, d: usize) -> bool {
        let d_first = self.blocks[d].first;
        self.blocks[a].first <= d_first && d_first <= self.blocks[a].last
    }

    /// Union-find lookup with full path compression
    fn find(&mut self, block: usize) -> usize {
        let mut root = block;
        while self.blocks[root].union != root {
            root = self.blocks[root].union;
        }
        let mut cur = block;
        while cur != root {
            let next = self.blocks[cur].union;
            self.blocks[cur].union = root;
            cur = next;
        }
        root
    }

    /// Blocks in DFS preorder from the last run
    pub fn dfs_order(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.depth_first.iter().map(|&b| NodeIndex::new(b))
    }

    /// Whether `a` is a DFS-tree ancestor of `d`, per the interval test.
    /// Valid after a run; unreached blocks are nobody's ancestor.
    pub fn is_ancestor(&self, a: NodeIndex, d: NodeIndex) -> bool {
        match (self.blocks.get(a.index()), self.blocks.get(d.index())) {
            (Some(sa), Some(sd)) => {
                sa.first != UNVISITED && sa.first <= sd.first && sd.first <= sa.last
            }
            _ => false,
        }
    }

    /// Classification of a block from the last run
    pub fn kind(&self, block: NodeIndex) -> Option<BlockKind> {
        self.blocks.get(block.index()).map(|s| s.kind)
    }

    /// Innermost loop header the block reports to; the entry block's
    /// header is itself
    pub fn header_of(&self, block: NodeIndex) -> Option<NodeIndex> {
        self.blocks
            .get(block.index())
            .and_then(|s| s.header)
            .map(NodeIndex::new)
    }

    /// Loop headed at this block, if it became a header in the last run
    pub fn loop_of(&self, block: NodeIndex) -> Option<LoopId> {
        self.blocks.get(block.index()).and_then(|s| s.loop_id)
    }
}

impl Default for LoopFinder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::CfgBuilder;

    /// Rebuild DFS-tree ancestry by recursion and compare it with the
    /// interval test on every reachable pair.
    #[test]
    fn test_interval_test_matches_tree_ancestry() {
        let mut b = CfgBuilder::new();
        let entry = b.block();
        let mid = b.diamond(entry);
        let tail = b.path(mid);
        b.base_loop(tail);
        let cfg = b.finish();

        let mut finder = LoopFinder::new();
        let mut forest = LoopForest::new();
        finder.find_loops(&cfg, &mut forest);

        // Recursive reference traversal over the same adjacency order.
        let n = cfg.block_count();
        let mut parent = vec![usize::MAX; n];
        let mut seen = vec![false; n];
        fn walk(cfg: &Cfg, seen: &mut [bool], parent: &mut [usize], b: usize) {
            seen[b] = true;
            for succ in cfg.successors(NodeIndex::new(b)) {
                let s = succ.index();
                if !seen[s] {
                    parent[s] = b;
                    walk(cfg, seen, parent, s);
                }
            }
        }
        walk(&cfg, &mut seen, &mut parent, 0);

        let tree_ancestor = |a: usize, d: usize| {
            let mut cur = d;
            loop {
                if cur == a {
                    return true;
                }
                if parent[cur] == usize::MAX {
                    return false;
                }
                cur = parent[cur];
            }
        };

        for a in 0..n {
            for d in 0..n {
                if seen[a] && seen[d] {
                    assert_eq!(
                        finder.is_ancestor(NodeIndex::new(a), NodeIndex::new(d)),
                        tree_ancestor(a, d),
                        "ancestry mismatch for ({}, {})",
                        a,
                        d
                    );
                }
            }
        }
    }

    #[test]
    fn test_entry_reports_to_itself() {
        let mut b = CfgBuilder::new();
        let entry = b.block();
        b.path(entry);
        let cfg = b.finish();

        let mut finder = LoopFinder::new();
        let mut forest = LoopForest::new();
        finder.find_loops(&cfg, &mut forest);

        assert_eq!(finder.header_of(entry), Some(entry));
    }
}
