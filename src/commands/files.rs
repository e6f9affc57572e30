//! `codetree files` command.

use std::fmt::Write as _;

use serde::Serialize;

use super::serialize;
use crate::cli::OutputFormat;
use crate::project::Project;

/// One line of the file listing.
#[derive(Debug, Serialize)]
struct Listing<'a> {
    path: &'a str,
    language: &'a str,
    size: usize,
}

/// Renders every file in pre-order with its language and size in bytes.
///
/// # Errors
///
/// Returns an error string if serialization fails.
pub fn render(project: &Project, format: OutputFormat) -> Result<String, String> {
    let records = project.records();
    let listings: Vec<Listing<'_>> = records
        .iter()
        .map(|r| Listing { path: &r.path, language: &r.language, size: r.content.len() })
        .collect();

    if format != OutputFormat::Text {
        return serialize(&listings, format);
    }
    let width = listings.iter().map(|l| l.path.len()).max().unwrap_or(0);
    let mut out = String::new();
    for l in &listings {
        let _ = writeln!(out, "{:<width$}  {:<10}  {}", l.path, l.language, l.size);
    }
    Ok(out)
}
