//! Runs command implementation
//!
//! Lists tracked runs from a JSON tracking directory, or shows one run in
//! full.

use crate::cli::LogLevel;
use crate::config::RunsArgs;
use crate::tracking::storage::{JsonRunStore, RunStore};
use crate::tracking::Run;

pub fn run_runs(args: &RunsArgs, _level: LogLevel) -> Result<(), String> {
    let store = JsonRunStore::new(&args.dir);

    if let Some(run_id) = &args.run_id {
        let run = store
            .load_run(run_id)
            .map_err(|e| format!("Failed to load run: {e}"))?;
        show_run(&run);
        return Ok(());
    }

    let runs = store
        .list_runs()
        .map_err(|e| format!("Failed to list runs: {e}"))?;
    if runs.is_empty() {
        eprintln!("No runs found in {}", args.dir.display());
        return Ok(());
    }

    println!("{:<12} {:<20} {:<10} {:<20} {:>8}", "ID", "NAME", "STATUS", "STARTED", "AUC");
    println!("{}", "-".repeat(74));
    for run in &runs {
        let auc = run
            .last_metric("AUC")
            .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
        println!(
            "{:<12} {:<20} {:<10} {:<20} {:>8}",
            run.run_id,
            run.run_name.as_deref().unwrap_or("-"),
            run.status,
            run.started_at.format("%Y-%m-%d %H:%M:%S"),
            auc,
        );
    }
    println!("\n{} run(s)", runs.len());
    Ok(())
}

fn show_run(run: &Run) {
    println!("Run: {}", run.run_id);
    if let Some(name) = &run.run_name {
        println!("  Name:       {name}");
    }
    println!("  Experiment: {}", run.experiment);
    println!("  Status:     {}", run.status);
    println!("  Started:    {}", run.started_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(ended) = run.ended_at {
        println!("  Ended:      {}", ended.format("%Y-%m-%d %H:%M:%S"));
    }

    if !run.params.is_empty() {
        println!("  Params:");
        let mut params: Vec<_> = run.params.iter().collect();
        params.sort();
        for (key, value) in params {
            println!("    {key} = {value}");
        }
    }

    if !run.metrics.is_empty() {
        println!("  Metrics:");
        let mut metrics: Vec<_> = run.metrics.iter().collect();
        metrics.sort_by_key(|(key, _)| key.as_str());
        for (key, series) in metrics {
            if let Some(point) = series.last() {
                println!("    {key} = {} ({} point(s))", point.value, series.len());
            }
        }
    }
}
