//! Control Flow Graph (CFG) module
//!
//! This module handles building and inspecting control flow graphs used as
//! input to loop recognition.

pub mod block;
pub mod builder;
pub mod visualization;

use crate::error::Result;
use petgraph::graph::{DiGraph, NodeIndex};
use std::io::Write;

/// Main CFG struct that provides a high-level interface over the graph.
///
/// The underlying storage is a petgraph [`DiGraph`], but the analysis needs
/// each block's predecessors and successors in the exact order the edges
/// were added, so explicit adjacency vectors are maintained alongside the
/// graph. petgraph's own neighbor iteration order is not the insertion
/// order and is never relied upon.
pub struct Cfg {
    /// The underlying graph
    graph: DiGraph<block::Block, ()>,
    /// Outgoing neighbors per block, in edge insertion order
    succs: Vec<Vec<NodeIndex>>,
    /// Incoming neighbors per block, in edge insertion order
    preds: Vec<Vec<NodeIndex>>,
}

impl Cfg {
    /// Create a new empty CFG
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            succs: Vec::new(),
            preds: Vec::new(),
        }
    }

    /// Append a new block and return its index
    pub fn add_block(&mut self) -> NodeIndex {
        let id = self.graph.node_count();
        let node = self.graph.add_node(block::Block::new(id));
        self.succs.push(Vec::new());
        self.preds.push(Vec::new());
        node
    }

    /// Add an edge from `src` to `dst`, recording it at the end of both the
    /// source's successor list and the destination's predecessor list
    pub fn connect(&mut self, src: NodeIndex, dst: NodeIndex) {
        self.graph.add_edge(src, dst, ());
        self.succs[src.index()].push(dst);
        self.preds[dst.index()].push(src);
    }

    /// Get the entry block (block 0), if the graph is non-empty
    pub fn entry(&self) -> Option<NodeIndex> {
        self.graph.node_indices().next()
    }

    /// Get the number of blocks
    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Get the successors of a block in edge insertion order
    pub fn successors(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.succs[node.index()]
    }

    /// Get the predecessors of a block in edge insertion order
    pub fn predecessors(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.preds[node.index()]
    }

    /// Get the block weight for a node
    pub fn block(&self, node: NodeIndex) -> &block::Block {
        &self.graph[node]
    }

    /// Get the underlying graph
    pub fn graph(&self) -> &DiGraph<block::Block, ()> {
        &self.graph
    }

    /// Write one `bN: [preds] [succs]` line per block, in id order
    pub fn dump<W: Write>(&self, w: &mut W) -> Result<()> {
        for node in self.graph.node_indices() {
            write!(w, "{}: [", self.graph[node])?;
            for (i, pred) in self.preds[node.index()].iter().enumerate() {
                let sep = if i > 0 { " " } else { "" };
                write!(w, "{}{}", sep, self.graph[*pred])?;
            }
            write!(w, "] [")?;
            for (i, succ) in self.succs[node.index()].iter().enumerate() {
                let sep = if i > 0 { " " } else { "" };
                write!(w, "{}{}", sep, self.graph[*succ])?;
            }
            writeln!(w, "]")?;
        }
        Ok(())
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self::new()
    }
}

// Re-export main types for convenience
pub use block::Block;
pub use builder::{CfgBuilder, GraphParams};
