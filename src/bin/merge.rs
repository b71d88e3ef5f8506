// Copyright (C) 2025 binaryfox0
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

use clap::Parser;
use std::path::Path;

use anyhow::Result;

use aparse_merger::Merger;

/// Merge the aparse sources into aparse_single.h.
///
/// Run from the repository root; the source directory, the public headers
/// and the output path are fixed by convention.
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Cli {}

pub fn main() -> Result<()> {
    Cli::parse();
    let mut merger = Merger::new(Path::new("."));
    merger.run()
}
