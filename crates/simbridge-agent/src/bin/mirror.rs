// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Writes the left/right mirror image of a keyframe file, e.g. a right-foot
//! kick from a left-foot one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use simbridge_motion::{load_keyframe_file, save_keyframe_file};

#[derive(Parser, Debug)]
#[command(name = "simbridge-mirror", version, about, long_about = None)]
struct Args {
    /// Keyframe file to mirror
    input: PathBuf,

    /// Output file (default: input name with "2" appended, same extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}2.{}", stem, ext.to_string_lossy()),
        None => format!("{}2", stem),
    };
    input.with_file_name(name)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let output = args.output.unwrap_or_else(|| default_output(&args.input));

    let sequence = load_keyframe_file(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    save_keyframe_file(&sequence.mirrored(), &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Mirrored {} keyframes: {} -> {}",
        sequence.len(),
        args.input.display(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("keyframes/kick.txt")),
            PathBuf::from("keyframes/kick2.txt")
        );
        assert_eq!(default_output(Path::new("pose")), PathBuf::from("pose2"));
    }
}
