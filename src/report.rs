// src/report.rs
// =============================================================================
// Renders the dead link registry for the user.
//
// Two formats:
// - a tab-aligned Page / Link table (default)
// - JSON, for piping into other tools (--json)
//
// Rows are sorted by page, then link, so two runs over the same site print
// the same thing even though the registry itself is a HashMap.
// =============================================================================

use serde::Serialize;
use std::io::{self, Write};

use crate::checker::DeadReason;
use crate::crawl::DeadLinks;

// Space between the Page column and the Link column
const PADDING: usize = 4;

#[derive(Debug, Serialize, PartialEq)]
pub struct Row<'a> {
    pub page: &'a str,
    pub link: &'a str,
    pub url: &'a str,
    pub reason: &'a DeadReason,
}

// Everything after the last '/' of a URL
//
//   "https://example.test/docs/b" -> "b"
//   "https://example.test/docs/"  -> ""
pub fn link_segment(url: &str) -> &str {
    match url.rfind('/') {
        Some(index) => &url[index + 1..],
        None => url,
    }
}

pub fn rows(dead: &DeadLinks) -> Vec<Row<'_>> {
    let mut rows: Vec<Row<'_>> = dead
        .iter()
        .map(|(url, entry)| Row {
            page: &entry.page,
            link: link_segment(url),
            url,
            reason: &entry.reason,
        })
        .collect();

    rows.sort_by(|a, b| (a.page, a.link, a.url).cmp(&(b.page, b.link, b.url)));
    rows
}

pub fn write_table<W: Write>(out: &mut W, dead: &DeadLinks) -> io::Result<()> {
    let rows = rows(dead);

    let width = rows
        .iter()
        .map(|row| row.page.chars().count())
        .chain(std::iter::once("Page".len()))
        .max()
        .unwrap_or(0)
        + PADDING;

    writeln!(out)?;
    writeln!(out, "{:<width$}{}", "Page", "Link", width = width)?;
    for row in &rows {
        writeln!(out, "{:<width$}{}", row.page, row.link, width = width)?;
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, dead: &DeadLinks) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &rows(dead))?;
    writeln!(out).map_err(serde_json::Error::io)
}
