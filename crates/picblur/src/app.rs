//! Shared application-level helpers for the CLI binaries.
//!
//! These functions wire up I/O (load picture, run a transform or blur, save
//! the result) and the benchmark configuration around the `picblur-core`
//! APIs so both binaries share the same behavior.

use crate::io::{load_picture, save_picture};
use anyhow::{Context, Result};
use picblur_core::transform::{self, Angle, Plane};
use picblur_core::{BlurEngine, BlurError, Partition, Picture, DEFAULT_TOLERANCE, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};
use std::{fmt, fs::File, io::Write, path::Path, path::PathBuf};
use tracing::info;

/// Exit status for I/O failures and invalid requests.
pub const IO_ERROR: i32 = 2;

/// Operation names accepted by `picture_lib`.
pub const OPERATION_NAMES: [&str; 6] = [
    "invert",
    "grayscale",
    "rotate",
    "flip",
    "blur",
    "parallel-blur",
];

/// A picture transformation selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Invert,
    Grayscale,
    Rotate(Angle),
    Flip(Plane),
    Blur,
    ParallelBlur(Partition),
}

impl Operation {
    /// Parse an operation name plus its optional extra argument.
    ///
    /// `rotate` needs an angle and `flip` a plane; `parallel-blur` takes an
    /// optional partition name and defaults to `row`.
    pub fn parse(name: &str, extra: Option<&str>) -> Result<Self, BlurError> {
        match name {
            "invert" => Ok(Operation::Invert),
            "grayscale" => Ok(Operation::Grayscale),
            "rotate" => extra
                .ok_or(BlurError::MissingArgument("rotate"))?
                .parse()
                .map(Operation::Rotate),
            "flip" => extra
                .ok_or(BlurError::MissingArgument("flip"))?
                .parse()
                .map(Operation::Flip),
            "blur" => Ok(Operation::Blur),
            "parallel-blur" => extra
                .map_or(Ok(Partition::Row), str::parse)
                .map(Operation::ParallelBlur),
            other => Err(BlurError::UnknownOperation(other.to_string())),
        }
    }

    /// Apply the operation to `picture` in place.
    pub fn apply(&self, picture: &mut Picture, engine: &BlurEngine) -> Result<(), BlurError> {
        match *self {
            Operation::Invert => transform::invert(picture),
            Operation::Grayscale => transform::grayscale(picture),
            Operation::Rotate(angle) => transform::rotate(picture, angle),
            Operation::Flip(plane) => transform::flip(picture, plane),
            Operation::Blur => picblur_core::blur_sequential(picture),
            Operation::ParallelBlur(p) => engine.blur(picture, p.into())?,
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Invert => f.write_str("invert"),
            Operation::Grayscale => f.write_str("grayscale"),
            Operation::Rotate(a) => write!(f, "rotate ({a})"),
            Operation::Flip(p) => write!(f, "flip ({p})"),
            Operation::Blur => f.write_str("blur"),
            Operation::ParallelBlur(p) => write!(f, "parallel blur ({p})"),
        }
    }
}

/// Load `input`, apply `op`, save to `output`.
pub fn run_operation(
    input: &Path,
    output: &Path,
    op: Operation,
    engine: &BlurEngine,
) -> Result<()> {
    let mut picture = load_picture(input)?;
    info!(
        width = picture.width(),
        height = picture.height(),
        "loaded {}",
        input.display()
    );

    println!("calling {op}");
    op.apply(&mut picture, engine)
        .with_context(|| format!("running {op}"))?;

    save_picture(&picture, output)?;
    info!("saved {}", output.display());
    Ok(())
}

/// Benchmark configuration as read from JSON. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BenchConfig {
    pub image: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub repeats: Option<u32>,
    pub workers: Option<usize>,
    pub sector_sizes: Option<Vec<u32>>,
    pub tolerance: Option<u8>,
    pub report_json: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Benchmark configuration with defaults applied and values validated.
#[derive(Debug, Clone)]
pub struct BenchSettings {
    pub image: PathBuf,
    pub output_dir: PathBuf,
    pub extension: String,
    pub repeats: u32,
    pub workers: usize,
    pub sectors: Vec<Partition>,
    pub tolerance: u8,
    pub report_json: Option<PathBuf>,
}

pub const DEFAULT_IMAGE: &str = "images/test_large.jpg";
pub const DEFAULT_REPEATS: u32 = 10;

/// Sector sizes 2, 4, ..., 4096.
pub fn default_sector_sizes() -> Vec<u32> {
    (1..=12).map(|shift| 1u32 << shift).collect()
}

impl BenchConfig {
    pub fn resolve(self) -> Result<BenchSettings> {
        let repeats = self.repeats.unwrap_or(DEFAULT_REPEATS);
        if repeats == 0 {
            anyhow::bail!("repeats must be >= 1");
        }
        let workers = self.workers.unwrap_or(DEFAULT_WORKERS);
        if workers == 0 {
            anyhow::bail!("workers must be >= 1");
        }
        let sectors = self
            .sector_sizes
            .unwrap_or_else(default_sector_sizes)
            .into_iter()
            .map(Partition::sector)
            .collect::<Result<Vec<_>, _>>()
            .context("sector sizes must be >= 1")?;
        let extension = self
            .extension
            .unwrap_or_else(|| "jpg".to_string())
            .trim_start_matches('.')
            .to_string();

        Ok(BenchSettings {
            image: self.image.unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE)),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            extension,
            repeats,
            workers,
            sectors,
            tolerance: self.tolerance.unwrap_or(DEFAULT_TOLERANCE),
            report_json: self.report_json,
        })
    }
}

pub fn load_config(path: &Path) -> Result<BenchConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: BenchConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json_file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&mut json_file, value)?;
    json_file.write_all(b"\n")?;
    Ok(())
}
