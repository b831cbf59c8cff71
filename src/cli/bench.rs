use crate::cfg::{CfgBuilder, GraphParams};
use crate::error::Result;
use crate::loops::{LoopFinder, LoopForest};
use std::time::Instant;

/// Repeatedly run loop recognition on an unchanged graph and report the
/// stable loop count and timing.
///
/// With `reuse` set, one forest is cleared and refilled every run,
/// exercising the storage-reuse path; otherwise each run gets a freshly
/// allocated forest.
pub fn bench(params: &GraphParams, runs: usize, reuse: bool) -> Result<()> {
    let build_start = Instant::now();
    let cfg = CfgBuilder::build_benchmark(params);
    println!(
        "Built benchmark graph: {} blocks, {} edges in {:.2?}",
        cfg.block_count(),
        cfg.edge_count(),
        build_start.elapsed()
    );

    let mut finder = LoopFinder::new();
    let mut forest = LoopForest::new();

    let warmup_start = Instant::now();
    finder.find_loops(&cfg, &mut forest);
    println!("Warm-up run: {:.2?}", warmup_start.elapsed());

    let mut count = forest.loop_count();
    let timed_start = Instant::now();
    for run in 0..runs {
        if reuse {
            forest.clear();
            finder.find_loops(&cfg, &mut forest);
            count = forest.loop_count();
        } else {
            let mut fresh = LoopForest::new();
            finder.find_loops(&cfg, &mut fresh);
            count = fresh.loop_count();
        }
        log::debug!("run {}: {} loops", run, count);
    }
    let elapsed = timed_start.elapsed();

    println!(
        "# of loops: {} (including 1 artificial root node)",
        count
    );
    if runs > 0 {
        println!(
            "{} runs in {:.2?} ({:.2?} per run)",
            runs,
            elapsed,
            elapsed / runs as u32
        );
    }

    forest.calculate_nesting();
    println!("Forest nesting height: {}", forest.root().nesting());

    Ok(())
}
