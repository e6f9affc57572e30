//! The loaded project: a built tree plus the user's current selection.

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;
use crate::tree::{find_file, flatten, FileRecord, TreeNode, TreeStats};

/// Snapshot of one upload, as presented to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Display name, taken from the first root entry.
    pub name: String,
    /// Top-level nodes of the built tree.
    pub files: Vec<TreeNode>,
    /// Path of the selected file, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

impl Project {
    /// Creates a project with nothing selected.
    pub fn new(name: impl Into<String>, files: Vec<TreeNode>) -> Self {
        Self { name: name.into(), files, selected: None }
    }

    /// Selects the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::NotFound`] if no file lives at `path`; the
    /// previous selection is kept.
    pub fn select(&mut self, path: &str) -> Result<&FileRecord, ProjectError> {
        let file =
            find_file(&self.files, path).ok_or_else(|| ProjectError::NotFound { path: path.to_string() })?;
        self.selected = Some(file.path.clone());
        Ok(file)
    }

    /// The selected file, if the selection still resolves.
    #[must_use]
    pub fn selected_file(&self) -> Option<&FileRecord> {
        self.selected.as_deref().and_then(|path| find_file(&self.files, path))
    }

    /// Swaps in a freshly built tree. The selection is cleared.
    pub fn replace(&mut self, files: Vec<TreeNode>) {
        self.files = files;
        self.selected = None;
    }

    /// All files in pre-order.
    #[must_use]
    pub fn records(&self) -> Vec<FileRecord> {
        flatten(&self.files)
    }

    /// File, folder and byte counts.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats::of(&self.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::SequentialIdGenerator;
    use crate::tree::build;

    fn record(path: &str, content: &str) -> FileRecord {
        let name = path.rsplit('/').next().unwrap_or(path);
        FileRecord {
            id: format!("f-{path}"),
            name: name.to_string(),
            path: path.to_string(),
            language: "text".to_string(),
            content: content.to_string(),
        }
    }

    fn project() -> Project {
        let ids = SequentialIdGenerator::new("d");
        let files = build(vec![record("p/a.txt", "aa"), record("p/src/b.txt", "bbb")], &ids).unwrap();
        Project::new("p", files)
    }

    #[test]
    fn select_known_file() {
        let mut project = project();
        let file = project.select("p/src/b.txt").unwrap();
        assert_eq!(file.content, "bbb");
        assert_eq!(project.selected_file().map(|f| f.name.as_str()), Some("b.txt"));
    }

    #[test]
    fn select_unknown_file_keeps_selection() {
        let mut project = project();
        project.select("p/a.txt").unwrap();
        let err = project.select("p/src").unwrap_err();
        assert_eq!(err, ProjectError::NotFound { path: "p/src".into() });
        assert_eq!(project.selected.as_deref(), Some("p/a.txt"));
    }

    #[test]
    fn reselecting_tracks_the_latest_file() {
        let mut project = project();
        let first = project.select("p/a.txt").unwrap().id.clone();
        let second = project.select("p/src/b.txt").unwrap().id.clone();
        assert_ne!(first, second);
        assert_eq!(project.selected.as_deref(), Some("p/src/b.txt"));
        assert_eq!(project.selected_file().map(|f| f.id.as_str()), Some(second.as_str()));
    }

    #[test]
    fn replace_clears_selection() {
        let mut project = project();
        project.select("p/a.txt").unwrap();
        project.replace(Vec::new());
        assert!(project.selected.is_none());
        assert!(project.records().is_empty());
    }

    #[test]
    fn stats_and_records() {
        let project = project();
        let stats = project.stats();
        assert_eq!((stats.files, stats.folders, stats.bytes), (2, 2, 5));
        let paths: Vec<_> = project.records().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["p/a.txt", "p/src/b.txt"]);
    }

    #[test]
    fn serializes_without_empty_selection() {
        let yaml = serde_yaml::to_string(&project()).unwrap();
        assert!(!yaml.contains("selected"));
        let back: Project = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, project());
    }
}
