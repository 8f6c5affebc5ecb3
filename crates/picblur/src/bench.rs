//! Blur strategy benchmark.
//!
//! Every strategy reloads the base picture, blurs it `repeats` times and saves
//! the result as `<output_dir>/<strategy>.<ext>`. Right after saving, the file
//! is reloaded and compared against the sequential one.

use crate::app::BenchSettings;
use crate::io::{load_picture, save_picture};
use anyhow::{Context, Result};
use picblur_core::{compare_pictures, BlurEngine, BlurStrategy, Comparison, Partition, Picture};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Passed,
    Failed { reason: String },
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, RunOutcome::Passed)
    }
}

/// One strategy's timing and verdict.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub name: String,
    pub elapsed_ms: f64,
    pub output: PathBuf,
    pub outcome: RunOutcome,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchReport {
    pub image: PathBuf,
    pub width: u32,
    pub height: u32,
    pub repeats: u32,
    pub workers: usize,
    pub tolerance: u8,
    pub runs: Vec<RunReport>,
}

impl BenchReport {
    pub fn all_passed(&self) -> bool {
        self.runs.iter().all(|r| r.outcome.passed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &RunReport> {
        self.runs.iter().filter(|r| !r.outcome.passed())
    }
}

/// Strategies in benchmark order; sequential first since it is the baseline.
pub fn strategies(sectors: &[Partition]) -> Vec<BlurStrategy> {
    let mut out = vec![
        BlurStrategy::Sequential,
        Partition::Column.into(),
        Partition::Row.into(),
        Partition::Pixel.into(),
    ];
    #[cfg(feature = "rayon")]
    out.push(BlurStrategy::Rayon);
    out.extend(sectors.iter().copied().map(BlurStrategy::from));
    out
}

pub fn output_path(settings: &BenchSettings, strategy: BlurStrategy) -> PathBuf {
    settings
        .output_dir
        .join(format!("{strategy}.{}", settings.extension))
}

/// Run every strategy and verify it against the sequential result.
///
/// Fails only when the base picture cannot be loaded or the engine cannot be
/// built; a failing strategy is recorded in its [`RunReport`] and the
/// benchmark moves on.
pub fn run_benchmark(settings: &BenchSettings) -> Result<BenchReport> {
    let base = load_picture(&settings.image)
        .with_context(|| format!("loading base picture {}", settings.image.display()))?;
    let engine = BlurEngine::new(settings.workers)?;
    info!(
        width = base.width(),
        height = base.height(),
        repeats = settings.repeats,
        workers = settings.workers,
        "benchmarking {}",
        settings.image.display()
    );

    let mut baseline: Option<Baseline> = None;
    let mut runs = Vec::new();
    for strategy in strategies(&settings.sectors) {
        let output = output_path(settings, strategy);
        println!("Running {strategy} blur...");
        let start = Instant::now();
        let timed = timed_run(&settings.image, &output, settings.repeats, &engine, strategy);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        println!("time taken ({strategy} blur): {elapsed_ms:.3} ms");

        let outcome = match timed {
            Ok(()) => RunOutcome::Passed,
            Err(e) => {
                warn!("{strategy} blur failed: {e:#}");
                RunOutcome::Failed {
                    reason: format!("{e:#}"),
                }
            }
        };
        let mut run = RunReport {
            name: strategy.to_string(),
            elapsed_ms,
            output,
            outcome,
        };

        // sequential runs first, so its output becomes the baseline
        let reference = baseline.get_or_insert_with(|| load_baseline(&run));
        verify_against_baseline(reference, &mut run, settings.tolerance);
        runs.push(run);
    }

    Ok(BenchReport {
        image: settings.image.clone(),
        width: base.width(),
        height: base.height(),
        repeats: settings.repeats,
        workers: settings.workers,
        tolerance: settings.tolerance,
        runs,
    })
}

/// Reloaded sequential output, or why it is unavailable.
type Baseline = Result<Picture, String>;

fn load_baseline(sequential: &RunReport) -> Baseline {
    if !sequential.outcome.passed() {
        return Err(format!("{} blur failed", sequential.name));
    }
    load_picture(&sequential.output).map_err(|e| format!("reloading {e:#}"))
}

/// Reload, blur `repeats` times, save. This is the timed region.
fn timed_run(
    image: &Path,
    output: &Path,
    repeats: u32,
    engine: &BlurEngine,
    strategy: BlurStrategy,
) -> Result<()> {
    let mut picture = load_picture(image)?;
    for i in 0..repeats {
        engine
            .blur(&mut picture, strategy)
            .with_context(|| format!("{strategy} blur, iteration {i}"))?;
    }
    save_picture(&picture, output)
}

/// Compare a saved run with the baseline and print the verdict.
///
/// A divergence or a missing baseline marks the run failed; runs that already
/// failed keep their own reason.
fn verify_against_baseline(baseline: &Baseline, run: &mut RunReport, tolerance: u8) {
    if !run.outcome.passed() {
        return;
    }
    let checked = baseline
        .as_ref()
        .map_err(|reason| format!("sequential baseline is unavailable: {reason}"))
        .and_then(|b| compare_with_file(b, &run.output, tolerance));

    match checked {
        Ok(verdict) => {
            println!("{verdict}");
            if !verdict.is_match() {
                run.outcome = RunOutcome::Failed {
                    reason: verdict.to_string(),
                };
            }
        }
        Err(reason) => {
            println!("[!] {reason}");
            run.outcome = RunOutcome::Failed { reason };
        }
    }
}

fn compare_with_file(
    baseline: &Picture,
    output: &Path,
    tolerance: u8,
) -> Result<Comparison, String> {
    let candidate = load_picture(output).map_err(|e| format!("{e:#}"))?;
    let verdict = compare_pictures(baseline, &candidate, tolerance);
    debug!(output = %output.display(), "{verdict}");
    Ok(verdict)
}
