//! `codetree show` command.

use crate::project::Project;

/// Selects the file at `path` and returns its content.
///
/// A trailing newline is added if the content lacks one.
///
/// # Errors
///
/// Returns an error string if no file lives at `path`.
pub fn render(project: &mut Project, path: &str) -> Result<String, String> {
    let file = project.select(path).map_err(|e| e.to_string())?;
    let mut out = file.content.clone();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::SequentialIdGenerator;
    use crate::tree::{build, FileRecord};

    fn project() -> Project {
        let record = FileRecord {
            id: "1".into(),
            name: "a.sh".into(),
            path: "p/a.sh".into(),
            language: "bash".into(),
            content: "echo hi".into(),
        };
        Project::new("p", build(vec![record], &SequentialIdGenerator::default()).unwrap())
    }

    #[test]
    fn shows_content_and_selects() {
        let mut project = project();
        assert_eq!(render(&mut project, "p/a.sh").unwrap(), "echo hi\n");
        assert_eq!(project.selected.as_deref(), Some("p/a.sh"));
    }

    #[test]
    fn unknown_path_is_an_error() {
        let err = render(&mut project(), "p/b.sh").unwrap_err();
        assert!(err.contains("p/b.sh"));
    }
}
