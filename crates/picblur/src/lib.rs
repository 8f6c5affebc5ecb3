//! `image`-backed front end for `picblur-core`.
//!
//! Re-exports the core crate and adds file I/O, the operations behind the
//! `picture_lib` binary and the strategy benchmark behind `blur_bench`.

pub use picblur_core::*;

pub mod app;
pub mod bench;
pub mod io;
pub mod logger;

pub use crate::app::{load_config, run_operation, write_json, BenchConfig, BenchSettings, Operation};
pub use crate::bench::{run_benchmark, BenchReport, RunOutcome, RunReport};
pub use crate::io::{load_picture, save_picture};
pub use crate::logger::init_logging;
