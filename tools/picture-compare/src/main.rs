// tools/picture-compare: exit 0 when two pictures agree within tolerance.
use anyhow::bail;
use picblur::{compare_pictures, load_picture, DEFAULT_TOLERANCE};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [first, second] = args.as_slice() else {
        bail!("usage: picture-compare <file_path_1> <file_path_2>");
    };
    let (first, second) = (PathBuf::from(first), PathBuf::from(second));

    println!("compare {} with {}:", first.display(), second.display());
    let baseline = load_picture(&first)?;
    let candidate = load_picture(&second)?;

    let verdict = compare_pictures(&baseline, &candidate, DEFAULT_TOLERANCE);
    println!("{verdict}");
    Ok(if verdict.is_match() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
