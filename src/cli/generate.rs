use crate::cfg::visualization::generate_dot;
use crate::cfg::{CfgBuilder, GraphParams};
use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;

/// Build a synthetic benchmark CFG and report its shape
pub fn generate(params: &GraphParams, verbose: bool, output_dot: Option<&Path>) -> Result<()> {
    let cfg = CfgBuilder::build_benchmark(params);

    println!(
        "Built benchmark graph: {} segments x {} iterations x {} base loops",
        params.segments, params.iterations, params.base_loops
    );
    println!("  Basic blocks: {}", cfg.block_count());
    println!("  Edges: {}", cfg.edge_count());

    if verbose {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        cfg.dump(&mut lock)?;
        lock.flush()?;
    }

    if let Some(dot_path) = output_dot {
        let dot_content = generate_dot(&cfg);
        std::fs::write(dot_path, dot_content)
            .map_err(|e| Error::Io(format!("Failed to write DOT file: {}", e)))?;
        println!("  DOT exported to: {}", dot_path.display());
    }

    Ok(())
}
