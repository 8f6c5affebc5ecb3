use anyhow::bail;
use picblur::app::{load_config, write_json, BenchConfig};
use picblur::{init_logging, run_benchmark};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => load_config(&PathBuf::from(path))?,
        None => BenchConfig::default(),
    };
    init_logging(cfg.log_level.as_deref())?;
    let settings = cfg.resolve()?;

    let report = run_benchmark(&settings)?;

    if let Some(path) = &settings.report_json {
        write_json(path, &report)?;
        println!("report written to {}", path.display());
    }

    println!();
    for run in &report.runs {
        let status = if run.outcome.passed() { "ok" } else { "FAILED" };
        println!("{:>12}  {:>10.3} ms  {status}", run.name, run.elapsed_ms);
    }

    let failed: Vec<&str> = report.failures().map(|r| r.name.as_str()).collect();
    if !failed.is_empty() {
        bail!("{} strategies failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}
