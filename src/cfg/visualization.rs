//! CFG visualization module
//!
//! This module contains DOT export utilities for CFGs and loop analysis
//! results.

use crate::cfg::Cfg;
use crate::loops::LoopForest;

/// Fill colors cycled by loop depth, outermost first
const DEPTH_COLORS: &[&str] = &[
    "lightblue",
    "lightgreen",
    "khaki",
    "lightsalmon",
    "plum",
    "lightcyan",
];

/// Generate a DOT representation of a CFG
pub fn generate_dot(cfg: &Cfg) -> String {
    let mut dot = String::new();
    dot.push_str("digraph CFG {\n");
    dot.push_str("  rankdir=TB;\n");
    dot.push_str("  node [shape=box];\n\n");

    for node in cfg.graph().node_indices() {
        dot.push_str(&format!(
            "  {} [label=\"{}\"];\n",
            node.index(),
            cfg.block(node)
        ));
    }

    dot.push('\n');

    for node in cfg.graph().node_indices() {
        for succ in cfg.successors(node) {
            dot.push_str(&format!("  {} -> {};\n", node.index(), succ.index()));
        }
    }

    dot.push_str("}\n");
    dot
}

/// Generate a DOT representation with blocks filled by the depth of the
/// loop that owns them. Blocks outside any loop stay unfilled; loop heads
/// get a bold border.
pub fn generate_dot_with_loops(cfg: &Cfg, forest: &LoopForest) -> String {
    // Innermost ownership: each block appears in exactly one member list.
    let mut owner_depth = vec![None; cfg.block_count()];
    let mut is_head = vec![false; cfg.block_count()];
    for (_, l) in forest.iter() {
        if l.is_root() {
            continue;
        }
        for block in l.blocks() {
            owner_depth[block.index()] = Some(l.depth());
        }
        if let Some(head) = l.head() {
            is_head[head.index()] = true;
        }
    }

    let mut dot = String::new();
    dot.push_str("digraph CFG {\n");
    dot.push_str("  rankdir=TB;\n");
    dot.push_str("  node [shape=box];\n\n");

    for node in cfg.graph().node_indices() {
        let mut attributes = vec![format!("label=\"{}\"", cfg.block(node))];
        if let Some(depth) = owner_depth[node.index()] {
            let color = DEPTH_COLORS[(depth.saturating_sub(1)) % DEPTH_COLORS.len()];
            attributes.push(format!("style=filled, fillcolor=\"{}\"", color));
        }
        if is_head[node.index()] {
            attributes.push("penwidth=2".to_string());
        }
        dot.push_str(&format!(
            "  {} [{}];\n",
            node.index(),
            attributes.join(", ")
        ));
    }

    dot.push('\n');

    for node in cfg.graph().node_indices() {
        for succ in cfg.successors(node) {
            dot.push_str(&format!("  {} -> {};\n", node.index(), succ.index()));
        }
    }

    dot.push_str("}\n");
    dot
}
