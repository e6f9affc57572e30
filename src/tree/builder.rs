//! Folds a flat list of file records into a tree keyed by path segment.

use std::collections::HashMap;

use tracing::warn;

use crate::error::TreeError;
use crate::ports::IdGenerator;
use crate::tree::{FileRecord, FolderNode, TreeNode};

/// One tree depth: name-keyed slots kept in first-insertion order.
#[derive(Default)]
struct Level {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

enum Slot {
    File(FileRecord),
    Folder { id: String, name: String, path: String, children: Level },
}

impl Level {
    /// Returns the child level of folder `name`, creating the folder if needed.
    ///
    /// A file already sitting under `name` is replaced by the new folder.
    fn folder(&mut self, name: &str, path: &str, ids: &dyn IdGenerator) -> &mut Level {
        let pos = if let Some(&pos) = self.index.get(name) {
            pos
        } else {
            self.push(name, Slot::folder(ids.generate_id(), name, path))
        };

        if matches!(self.slots[pos], Slot::File(_)) {
            warn!(path, "folder replaces file of the same name");
            self.slots[pos] = Slot::folder(ids.generate_id(), name, path);
        }
        match &mut self.slots[pos] {
            Slot::Folder { children, .. } => children,
            Slot::File(_) => unreachable!("file slot was replaced by a folder above"),
        }
    }

    /// Inserts `record` under `name`, overwriting any existing slot in place.
    fn insert_file(&mut self, name: &str, record: FileRecord) {
        if let Some(&pos) = self.index.get(name) {
            match &self.slots[pos] {
                Slot::File(old) => warn!(path = %old.path, "file overwrites earlier record"),
                Slot::Folder { path, .. } => {
                    warn!(path = %path, "file replaces folder of the same name");
                }
            }
            self.slots[pos] = Slot::File(record);
        } else {
            self.push(name, Slot::File(record));
        }
    }

    fn push(&mut self, name: &str, slot: Slot) -> usize {
        self.slots.push(slot);
        let pos = self.slots.len() - 1;
        self.index.insert(name.to_string(), pos);
        pos
    }

    fn into_nodes(self) -> Vec<TreeNode> {
        self.slots
            .into_iter()
            .map(|slot| match slot {
                Slot::File(record) => TreeNode::File(record),
                Slot::Folder { id, name, path, children } => {
                    TreeNode::Folder(FolderNode { id, name, path, children: children.into_nodes() })
                }
            })
            .collect()
    }
}

impl Slot {
    fn folder(id: String, name: &str, path: &str) -> Self {
        Self::Folder { id, name: name.to_string(), path: path.to_string(), children: Level::default() }
    }
}

/// Builds the top-level nodes of the tree described by `records`.
///
/// Folders are created only for ancestors of at least one record and take
/// their IDs from `ids`. When two entries claim the same name at the same
/// level, the most recently folded one wins and keeps the original slot.
/// Sibling order is first-insertion order.
///
/// # Errors
///
/// Returns [`TreeError::MalformedPath`] if any record has an empty path or
/// an empty segment. No tree is produced in that case.
pub fn build<I>(records: I, ids: &dyn IdGenerator) -> Result<Vec<TreeNode>, TreeError>
where
    I: IntoIterator<Item = FileRecord>,
{
    let mut root = Level::default();

    for record in records {
        let segments: Vec<&str> = record.path.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(TreeError::MalformedPath { path: record.path.clone() });
        }

        let mut level = &mut root;
        let mut prefix = String::new();
        for segment in &segments[..segments.len() - 1] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            level = level.folder(segment, &prefix, ids);
        }

        let leaf = segments[segments.len() - 1].to_string();
        level.insert_file(&leaf, record);
    }

    Ok(root.into_nodes())
}
