//! Core library for the `codetree` CLI.
//!
//! Uploads a set of host locations (files or directories) into flat
//! [`tree::FileRecord`]s, folds them into a folder tree and exposes the
//! result as a [`project::Project`].

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod ports;
pub mod project;
pub mod tree;
pub mod upload;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_prints_a_tree() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let root = dir.path().to_string_lossy().into_owned();
        assert!(run(["codetree", "tree", root.as_str()]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["codetree", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_missing_root() {
        let result = run(["codetree", "files", "/definitely/not/here"]);
        assert!(result.unwrap_err().contains("/definitely/not/here"));
    }
}
