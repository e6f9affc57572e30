//! Recovering records from a built tree, and read-only tree queries.

use serde::Serialize;

use crate::tree::{FileRecord, TreeNode};

/// Returns every file record in `nodes`, depth-first pre-order.
///
/// This is the left-inverse of [`build`](crate::tree::build): the result holds
/// the same path/content pairs that went in, though not necessarily in the
/// same order.
#[must_use]
pub fn flatten(nodes: &[TreeNode]) -> Vec<FileRecord> {
    let mut out = Vec::new();
    collect(nodes, &mut out);
    out
}

fn collect(nodes: &[TreeNode], out: &mut Vec<FileRecord>) {
    for node in nodes {
        match node {
            TreeNode::File(record) => out.push(record.clone()),
            TreeNode::Folder(folder) => collect(&folder.children, out),
        }
    }
}

/// Looks up the file at `path`, descending one segment at a time.
#[must_use]
pub fn find_file<'a>(nodes: &'a [TreeNode], path: &str) -> Option<&'a FileRecord> {
    let (head, rest) = match path.split_once('/') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let node = nodes.iter().find(|n| n.name() == head)?;
    match (node, rest) {
        (TreeNode::File(record), None) => Some(record),
        (TreeNode::Folder(folder), Some(rest)) => find_file(&folder.children, rest),
        _ => None,
    }
}

/// Counts of what a tree holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Number of file nodes.
    pub files: usize,
    /// Number of folder nodes.
    pub folders: usize,
    /// Sum of file content lengths in bytes.
    pub bytes: usize,
}

impl TreeStats {
    /// Walks `nodes` and tallies files, folders and content bytes.
    #[must_use]
    pub fn of(nodes: &[TreeNode]) -> Self {
        let mut stats = Self::default();
        stats.add(nodes);
        stats
    }

    fn add(&mut self, nodes: &[TreeNode]) {
        for node in nodes {
            match node {
                TreeNode::File(record) => {
                    self.files += 1;
                    self.bytes += record.content.len();
                }
                TreeNode::Folder(folder) => {
                    self.folders += 1;
                    self.add(&folder.children);
                }
            }
        }
    }
}
