//! Loop recognition module
//!
//! This module discovers natural loops in a control flow graph and arranges
//! them into a nesting forest. The algorithm is Havlak's extension of
//! Tarjan's interval method: blocks are numbered depth-first, predecessor
//! edges are classified as back or forward edges, and a union-find
//! collapsing pass walks the blocks in reverse preorder so inner loops are
//! resolved before the loops enclosing them.

pub mod finder;
pub mod forest;

use crate::cfg::Cfg;

/// Run loop recognition once on `cfg` and return the completed forest,
/// with nesting depths already calculated.
///
/// Callers that run the analysis repeatedly should hold their own
/// [`LoopFinder`] and [`LoopForest`] and reuse their storage instead.
pub fn find_loops(cfg: &Cfg) -> LoopForest {
    let mut finder = LoopFinder::new();
    let mut forest = LoopForest::new();
    finder.find_loops(cfg, &mut forest);
    forest.calculate_nesting();
    forest
}

// Re-export main types for convenience
pub use finder::{BlockKind, LoopFinder};
pub use forest::{Loop, LoopForest, LoopId};
