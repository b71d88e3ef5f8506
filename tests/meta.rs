// Copyright (C) 2025 binaryfox0
// This file is subject to the terms and conditions defined in
// file 'LICENSE', which is part of this source code package.

use std::fs;

use anyhow::Result;
use tempfile::TempDir;

use aparse_merger::meta::{build_queue, parse_first_line};

#[test]
fn accepts_full_metadata() -> Result<()> {
    let meta = parse_first_line("/* Priority=5, FileContentStart=2, FileContentEnd=10 */")?
        .expect("candidate line");
    assert_eq!(meta.priority, 5);
    assert_eq!(meta.content_start, 2);
    assert_eq!(meta.content_end, 10);
    Ok(())
}

#[test]
fn content_end_defaults_to_unbounded() -> Result<()> {
    let meta = parse_first_line("/* Priority=1, FileContentStart=1 */")?.expect("candidate line");
    assert_eq!(meta.content_end, i64::MAX);
    Ok(())
}

#[test]
fn skips_line_without_comment_marker() -> Result<()> {
    assert!(parse_first_line("// Priority=5, FileContentStart=2")?.is_none());
    Ok(())
}

#[test]
fn skips_line_without_comma() -> Result<()> {
    assert!(parse_first_line("/* Priority=5 */")?.is_none());
    Ok(())
}

#[test]
fn skips_missing_required_keys() -> Result<()> {
    assert!(parse_first_line("/* Priority=5, Revision=3 */")?.is_none());
    assert!(parse_first_line("/* FileContentStart=2, Revision=3 */")?.is_none());
    Ok(())
}

#[test]
fn ignores_tokens_without_equals() -> Result<()> {
    let meta = parse_first_line("/* Priority=5, generated, FileContentStart=2 */")?
        .expect("candidate line");
    assert_eq!(meta.priority, 5);
    assert_eq!(meta.content_start, 2);
    Ok(())
}

#[test]
fn ignores_unrecognized_integer_keys() -> Result<()> {
    let meta = parse_first_line("/* Priority=5, FileContentStart=2, Revision=7 */")?
        .expect("candidate line");
    assert_eq!(meta.priority, 5);
    Ok(())
}

#[test]
fn accepts_unterminated_comment() -> Result<()> {
    assert!(parse_first_line("/* Priority=5, FileContentStart=2")?.is_some());
    Ok(())
}

#[test]
fn rejects_non_integer_value() {
    assert!(parse_first_line("/* Priority=high, FileContentStart=2 */").is_err());
}

#[test]
fn rejects_non_integer_unrecognized_key() {
    assert!(parse_first_line("/* Priority=5, FileContentStart=2, Tag=v1 */").is_err());
}

#[test]
fn queue_orders_by_priority_then_name() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::write(
        tmp.path().join("a.c"),
        "/* Priority=5, FileContentStart=2 */\nint a;\n",
    )?;
    fs::write(
        tmp.path().join("b.c"),
        "/* Priority=20, FileContentStart=2 */\nint b;\n",
    )?;
    fs::write(
        tmp.path().join("c.c"),
        "/* Priority=5, FileContentStart=2 */\nint c;\n",
    )?;
    fs::write(tmp.path().join("notes.txt"), "no metadata here\n")?;

    let queue = build_queue(tmp.path())?;
    let names: Vec<&str> = queue.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, ["b.c", "a.c", "c.c"]);
    Ok(())
}

#[test]
fn queue_aborts_on_bad_integer() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::write(
        tmp.path().join("a.c"),
        "/* Priority=first, FileContentStart=2 */\nint a;\n",
    )?;
    assert!(build_queue(tmp.path()).is_err());
    Ok(())
}
