use anyhow::Context;
use picblur::app::{run_operation, Operation, IO_ERROR};
use picblur::{init_logging, BlurEngine};
use std::path::PathBuf;
use std::process;

const USAGE: &str = "usage: picture_lib <input> <output> <operation> [extra]";

fn main() {
    if let Err(e) = run() {
        println!("[!] {e:#}\n    aborting...");
        process::exit(IO_ERROR);
    }
}

fn run() -> anyhow::Result<()> {
    init_logging(None)?;
    println!("Running the picture processor...");

    let mut args = std::env::args().skip(1);
    let input: PathBuf = args.next().context(USAGE)?.into();
    let output: PathBuf = args.next().context(USAGE)?.into();
    let process = args.next().context(USAGE)?;
    let extra = args.next();

    println!("  filename  = {}", input.display());
    println!("  target    = {}", output.display());
    println!("  process   = {process}");
    println!("  extra arg = {}", extra.as_deref().unwrap_or("-"));
    println!();

    let op = Operation::parse(&process, extra.as_deref())?;
    run_operation(&input, &output, op, &BlurEngine::default())?;

    println!("-- picture processing complete --");
    Ok(())
}
