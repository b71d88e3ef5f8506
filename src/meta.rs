// Copyright (C) 2025 binaryfox0
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

//! First-line metadata parsing and merge-queue construction.
//!
//! A source file opts into the merge by starting with a block comment of
//! comma-separated `Key=Value` tokens, e.g.
//! `/* Priority=20, FileContentStart=2 */`. Files without such a line are
//! skipped without diagnostics; a non-integer value anywhere on the line
//! aborts the whole merge.

use std::cmp::Reverse;
use std::fs;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;

/// Placement and range attributes read from a file's first line.
///
/// `content_end` is `i64::MAX` when the line carries no `FileContentEnd`,
/// which copies through to end-of-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub priority: i64,
    pub content_start: i64,
    pub content_end: i64,
}

/// A source file accepted into the merge queue.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub path: PathBuf,
    /// Bare file name, used to label the output banners.
    pub name: String,
    pub meta: FileMeta,
}

/// Parse the metadata comment from a file's first line.
///
/// Returns `Ok(None)` when the line does not mark the file as a merge
/// candidate: no leading `/*`, no comma-separated tokens, or the required
/// `Priority`/`FileContentStart` keys are absent after parsing. Tokens
/// without an `=` are ignored. Every `Key=Value` token must carry an
/// integer value, recognized key or not; anything else is an error that
/// stops the whole merge.
pub fn parse_first_line(line: &str) -> Result<Option<FileMeta>> {
    let trimmed = line.trim();
    if !trimmed.contains(',') {
        return Ok(None);
    }
    let Some(body) = trimmed.strip_prefix("/*") else {
        return Ok(None);
    };
    let body = body.strip_suffix("*/").unwrap_or(body);

    let mut priority = None;
    let mut content_start = None;
    let mut content_end = None;
    for token in body.split(',') {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value: i64 = value
            .trim()
            .parse()
            .with_context(|| format!("bad integer for {} in {:?}", key, trimmed))?;
        match key {
            "Priority" => priority = Some(value),
            "FileContentStart" => content_start = Some(value),
            "FileContentEnd" => content_end = Some(value),
            _ => (), // validated above, otherwise unused
        }
    }

    match (priority, content_start) {
        (Some(priority), Some(content_start)) => Ok(Some(FileMeta {
            priority,
            content_start,
            content_end: content_end.unwrap_or(i64::MAX),
        })),
        _ => Ok(None),
    }
}

/// Enumerate `src_dir`, keep the files whose first line carries merge
/// metadata, and order them by descending priority. Equal priorities keep
/// the name-sorted directory order.
pub fn build_queue(src_dir: &Path) -> Result<Vec<QueueEntry>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(src_dir)
        .with_context(|| format!("error listing {}", src_dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut queue = Vec::new();
    for path in paths {
        let fd =
            File::open(&path).with_context(|| format!("error opening {}", path.display()))?;
        let mut first_line = String::new();
        BufReader::new(fd)
            .read_line(&mut first_line)
            .with_context(|| format!("error reading {}", path.display()))?;
        let meta = parse_first_line(&first_line)
            .with_context(|| format!("error in metadata of {}", path.display()))?;
        if let Some(meta) = meta {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            queue.push(QueueEntry { path, name, meta });
        }
    }
    queue.sort_by_key(|entry| Reverse(entry.meta.priority));
    Ok(queue)
}
