//! File records and the hierarchical tree derived from them.

pub mod builder;
pub mod flatten;

pub use builder::build;
pub use flatten::{find_file, flatten, TreeStats};

use serde::{Deserialize, Serialize};

/// Kind tag shared by records and tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A leaf holding file content.
    File,
    /// A folder holding child nodes.
    Folder,
}

/// One uploaded file: its location in the upload, text and language.
///
/// Records are created once during traversal and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Process-unique identifier.
    pub id: String,
    /// Final path segment, e.g. `app.ts`.
    pub name: String,
    /// Slash-separated path relative to the upload root, e.g. `src/app.ts`.
    pub path: String,
    /// Language tag inferred from the file extension.
    pub language: String,
    /// Full text content.
    pub content: String,
}

impl FileRecord {
    /// Always [`NodeKind::File`].
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        NodeKind::File
    }
}

/// A folder in the built tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Identifier generated when the folder was first needed.
    pub id: String,
    /// Folder name (one path segment).
    pub name: String,
    /// Slash-joined path of this folder from the upload root.
    pub path: String,
    /// Files and folders directly inside this folder.
    pub children: Vec<TreeNode>,
}

/// A node of the built tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// A file leaf.
    File(FileRecord),
    /// A folder with children.
    Folder(FolderNode),
}

impl TreeNode {
    /// The node's identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::File(file) => &file.id,
            Self::Folder(folder) => &folder.id,
        }
    }

    /// The node's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File(file) => &file.name,
            Self::Folder(folder) => &folder.name,
        }
    }

    /// The node's path from the upload root.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::File(file) => &file.path,
            Self::Folder(folder) => &folder.path,
        }
    }

    /// File or folder.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::File(_) => NodeKind::File,
            Self::Folder(_) => NodeKind::Folder,
        }
    }

    /// Children of a folder; empty for files.
    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::File(_) => &[],
            Self::Folder(folder) => &folder.children,
        }
    }
}
