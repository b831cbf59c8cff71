//! CFG builder module
//!
//! This module contains the CfgBuilder struct, which assembles synthetic
//! control flow graphs for exercising and benchmarking loop recognition.

use crate::cfg::Cfg;
use petgraph::graph::NodeIndex;

/// Shape parameters for the synthetic benchmark graph.
///
/// The graph consists of `segments` independent outer segments, each a
/// chain of `iterations` single-entry loops, each of which wraps
/// `base_loops` nested base loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphParams {
    /// Number of outer segments hanging off the dispatch block
    pub segments: usize,
    /// Chained loop iterations per segment
    pub iterations: usize,
    /// Nested base loops per iteration
    pub base_loops: usize,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            segments: 10,
            iterations: 100,
            base_loops: 25,
        }
    }
}

impl GraphParams {
    /// Number of loops the benchmark graph contains, excluding the
    /// synthetic root: each base loop contributes three (two diamond
    /// loops plus its own back edge), and each iteration closes one more.
    pub fn expected_loops(&self) -> usize {
        self.segments * self.iterations * (3 * self.base_loops + 1)
    }
}

/// Builder that owns a CFG under construction
pub struct CfgBuilder {
    cfg: Cfg,
}

impl CfgBuilder {
    /// Create a builder with an empty graph
    pub fn new() -> Self {
        Self { cfg: Cfg::new() }
    }

    /// Append a new block
    pub fn block(&mut self) -> NodeIndex {
        self.cfg.add_block()
    }

    /// Add an edge from `src` to `dst`
    pub fn edge(&mut self, src: NodeIndex, dst: NodeIndex) {
        self.cfg.connect(src, dst);
    }

    /// Extend a straight-line path: new block with an edge from `from`
    pub fn path(&mut self, from: NodeIndex) -> NodeIndex {
        let n = self.block();
        self.edge(from, n);
        n
    }

    /// Attach a diamond to `from` and close it with a back edge.
    ///
    /// The join block of the diamond branches back to `from`, so every
    /// diamond is itself a reducible loop headed at `from`.
    pub fn diamond(&mut self, from: NodeIndex) -> NodeIndex {
        let x = self.path(from);
        let y = self.path(from);
        let z = self.path(x);
        self.edge(y, z);
        self.edge(z, from);
        z
    }

    /// Attach a base loop to `from`: two diamonds chained behind `from`,
    /// a back edge closing the whole region, and a trailing exit block.
    pub fn base_loop(&mut self, from: NodeIndex) -> NodeIndex {
        let d1 = self.path(from);
        let d1 = self.diamond(d1);
        let d2 = self.path(d1);
        let d2 = self.diamond(d2);
        let z = self.path(d2);
        self.edge(z, from);
        self.path(z)
    }

    /// Consume the builder and return the finished graph
    pub fn finish(self) -> Cfg {
        self.cfg
    }

    /// Build the full benchmark graph for the given parameters.
    ///
    /// Block 0 is the entry, block 1 the shared exit, block 2 the dispatch
    /// block the segments hang off.
    pub fn build_benchmark(params: &GraphParams) -> Cfg {
        let mut b = CfgBuilder::new();

        let entry = b.block();
        let exit = b.block();
        let dispatch = b.block();
        b.edge(entry, dispatch);

        for _ in 0..params.segments {
            let mut n = b.block();
            b.edge(dispatch, n);

            for _ in 0..params.iterations {
                let top = n;
                n = b.path(n);
                for _ in 0..params.base_loops {
                    n = b.base_loop(n);
                }
                let bottom = b.path(n);
                b.edge(n, top);
                n = bottom;
            }
            b.edge(n, exit);
        }

        b.finish()
    }
}

impl Default for CfgBuilder {
    fn default() -> Self {
        Self::new()
    }
}
