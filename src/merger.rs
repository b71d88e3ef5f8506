// Copyright (C) 2025 binaryfox0
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

//! Single-header assembly: system-include hoisting, ranged content copy
//! with local-include stripping and `#undef` cleanup, banner framing.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;

use crate::meta;
use crate::meta::QueueEntry;

const SRC_DIR: &str = "src";
/// Public interface headers, copied first, in this order.
const PUBLIC_HEADERS: [&str; 2] = ["include/aparse_list.h", "include/aparse.h"];
const OUTPUT_FILENAME: &str = "aparse_single.h";
const IMPL_GUARD: &str = "APARSE_IMPLEMENTATION";

const BANNER_WIDTH: i64 = 75;
const BANNER_OVERHEAD: i64 = 6; // "/* " + " */"

lazy_static! {
    static ref LOCAL_INCLUDE_RE: Regex = Regex::new(r#"^#include ""#).unwrap();
    static ref DEFINE_RE: Regex = Regex::new(r"^#define\s+(?P<name>\S+)").unwrap();
}

/// Merges the aparse sources under a repository root into one header.
pub struct Merger<'a> {
    root: &'a Path,
    output: Option<Box<dyn Write>>,
}

/// Render a fixed-width banner comment. The dash padding splits the
/// leftover width around the label; labels wider than the target come out
/// unpadded and overlong.
fn banner(label: &str) -> String {
    let pad = BANNER_WIDTH - BANNER_OVERHEAD - label.len() as i64;
    let left = (pad / 2).max(0) as usize;
    let right = (pad - left as i64).max(0) as usize;
    format!("/* {}{}{} */", "-".repeat(left), label, "-".repeat(right))
}

/// Render one queued file under a single file handle: hoist its leading
/// system includes into `headers` and return the banner-framed body block.
///
/// The include scan starts at `content_start`, skips blank lines, and ends
/// at the first non-blank line that is not an `#include`; it is not bounded
/// by `content_end`. The body copy covers `[content_start, content_end]`,
/// drops `#include "` lines, and records every `#define`d macro name for
/// the trailing `#undef` list.
fn render_file(entry: &QueueEntry, headers: &mut BTreeSet<String>) -> Result<String> {
    let fd = File::open(&entry.path)
        .with_context(|| format!("error opening {}", entry.path.display()))?;
    let reader = BufReader::new(fd);
    let content_start = entry.meta.content_start;
    let content_end = entry.meta.content_end;

    let mut block = String::new();
    block.push_str(&banner(&format!("{} BEGIN", entry.name)));
    block.push_str("\n\n");

    let mut macros = BTreeSet::new();
    let mut scanning_includes = true;
    for (index, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("error reading {}", entry.path.display()))?;
        let line_no = index as i64 + 1;
        if line_no < content_start {
            continue;
        }

        if scanning_includes {
            let stripped = line.trim();
            if stripped.is_empty() {
                // blank lines do not end the include block
            } else if let Some(target) = stripped.strip_prefix("#include") {
                let target = target.trim();
                if target.starts_with('<') && target.ends_with('>') {
                    headers.insert(target.to_string());
                }
            } else {
                scanning_includes = false;
            }
        }

        if line_no > content_end {
            if scanning_includes {
                continue;
            }
            break;
        }
        if LOCAL_INCLUDE_RE.is_match(&line) {
            continue;
        }
        if let Some(cap) = DEFINE_RE.captures(&line) {
            let name = cap.name("name").unwrap().as_str();
            macros.insert(name.split('(').next().unwrap().to_string());
        }
        block.push_str(&line);
        block.push('\n');
    }

    block.push('\n');
    for name in &macros {
        block.push_str(&format!("#undef {}\n", name));
    }
    block.push_str(&banner(&format!("{} END", entry.name)));
    block.push_str("\n\n");

    Ok(block)
}

impl<'a> Merger<'a> {
    /// Merger that writes `aparse_single.h` under `root`.
    pub fn new(root: &'a Path) -> Merger<'a> {
        Merger { root, output: None }
    }

    /// Merger that writes to the given stream instead of the fixed output
    /// path. Used by the tests to capture the document.
    pub fn new_fd(root: &'a Path, output: Box<dyn Write>) -> Merger<'a> {
        Merger {
            root,
            output: Some(output),
        }
    }

    /// Copy both public headers, dropping local includes and the
    /// compile-once pragma.
    fn interface(&self, o: &mut dyn Write) -> Result<()> {
        for header in PUBLIC_HEADERS {
            let path = self.root.join(header);
            let fd = File::open(&path)
                .with_context(|| format!("error opening {}", path.display()))?;
            for line in BufReader::new(fd).lines() {
                let line = line.with_context(|| format!("error reading {}", path.display()))?;
                let stripped = line.trim();
                if stripped.starts_with(r#"#include ""#) || stripped == "#pragma once" {
                    continue;
                }
                writeln!(o, "{}", line)?;
            }
        }
        Ok(())
    }

    /// Run the whole merge: queue the sources, render every block while
    /// accumulating the shared header set, then write the document.
    pub fn run(&mut self) -> Result<()> {
        let queue = meta::build_queue(&self.root.join(SRC_DIR))?;

        let mut headers = BTreeSet::new();
        let mut blocks = Vec::with_capacity(queue.len());
        for entry in &queue {
            blocks.push(render_file(entry, &mut headers)?);
        }

        let mut o: Box<dyn Write> = match self.output.take() {
            Some(o) => o,
            None => {
                let path = self.root.join(OUTPUT_FILENAME);
                Box::new(
                    File::create(&path)
                        .with_context(|| format!("error creating {}", path.display()))?,
                )
            }
        };

        self.interface(&mut *o)?;

        write!(o, "\n\n")?;
        writeln!(o, "#ifdef {}\n", IMPL_GUARD)?;

        writeln!(o, "{}\n", banner("System Headers BEGIN"))?;
        for header in &headers {
            writeln!(o, "#include {}", header)?;
        }
        writeln!(o)?;
        writeln!(o, "{}\n", banner("System Headers END"))?;

        for block in &blocks {
            write!(o, "{}", block)?;
        }

        write!(o, "\n#endif /* {} */\n", IMPL_GUARD)?;
        Ok(())
    }
}
