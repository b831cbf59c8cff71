//! havlak-rs: natural-loop recognition for control flow graphs
//!
//! This library finds natural loops in a directed control flow graph and
//! builds a loop-nesting forest, distinguishing reducible from irreducible
//! loops. It ships a synthetic graph generator and a CLI driver for
//! exercising the analysis on large benchmark graphs.

pub mod cfg;
pub mod cli;
pub mod error;
pub mod loops;

pub use error::{Error, Result};

// Re-export commonly used types
pub use cfg::{Block, Cfg, CfgBuilder, GraphParams};
pub use loops::{BlockKind, Loop, LoopFinder, LoopForest, LoopId};
