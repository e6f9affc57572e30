//! `codetree tree` command.

use std::fmt::Write as _;

use super::serialize;
use crate::cli::OutputFormat;
use crate::project::Project;
use crate::tree::TreeNode;

/// Renders the project's tree.
///
/// Text output indents each level by two spaces, marks folders with a
/// trailing `/` and ends with a summary line.
///
/// # Errors
///
/// Returns an error string if serialization fails.
pub fn render(project: &Project, format: OutputFormat) -> Result<String, String> {
    if format != OutputFormat::Text {
        return serialize(&project.files, format);
    }
    let mut out = String::new();
    write_nodes(&mut out, &project.files, 0);
    let stats = project.stats();
    let _ = writeln!(
        out,
        "{} files, {} folders, {} bytes",
        stats.files, stats.folders, stats.bytes
    );
    Ok(out)
}

fn write_nodes(out: &mut String, nodes: &[TreeNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            TreeNode::File(file) => {
                let _ = writeln!(out, "{indent}{} ({})", file.name, file.language);
            }
            TreeNode::Folder(folder) => {
                let _ = writeln!(out, "{indent}{}/", folder.name);
                write_nodes(out, &folder.children, depth + 1);
            }
        }
    }
}
