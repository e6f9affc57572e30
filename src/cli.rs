//! CLI argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{Decoding, Fanout, UploadOptions};

/// Top-level CLI parser for `codetree`.
#[derive(Debug, Parser)]
#[command(name = "codetree", version, about = "Upload a project folder into a browsable file tree")]
pub struct Cli {
    /// Upload settings shared by every command.
    #[command(flatten)]
    pub upload: UploadArgs,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override `CODETREE_*` upload settings.
#[derive(Debug, Clone, Default, Args)]
pub struct UploadArgs {
    /// Walk sibling entries concurrently.
    #[arg(long, global = true)]
    pub concurrent: bool,
    /// Replace invalid UTF-8 instead of failing the upload.
    #[arg(long, global = true)]
    pub lossy: bool,
    /// Directory children fetched per listing batch.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: Option<u64>,
}

impl UploadArgs {
    /// Applies the flags that were given on top of `options`.
    #[must_use]
    pub fn apply(&self, mut options: UploadOptions) -> UploadOptions {
        if self.concurrent {
            options.fanout = Fanout::Concurrent;
        }
        if self.lossy {
            options.decoding = Decoding::Lossy;
        }
        if let Some(n) = self.batch_size {
            options.batch_size = usize::try_from(n).unwrap_or(usize::MAX);
        }
        options
    }
}

/// How command output is rendered on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented, human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload ROOTs and print the resulting tree.
    Tree {
        /// Files or directories to upload.
        #[arg(required = true)]
        roots: Vec<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Upload ROOTs and print every file with its language and size.
    Files {
        /// Files or directories to upload.
        #[arg(required = true)]
        roots: Vec<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Upload ROOTs and print the content of one file.
    Show {
        /// Files or directories to upload.
        #[arg(required = true)]
        roots: Vec<String>,
        /// Path of the file within the upload, e.g. `proj/src/main.rs`.
        #[arg(long)]
        path: String,
    },
}

impl Command {
    /// The locations this command uploads.
    #[must_use]
    pub fn roots(&self) -> &[String] {
        match self {
            Self::Tree { roots, .. } | Self::Files { roots, .. } | Self::Show { roots, .. } => roots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tree_with_format() {
        let cli = Cli::parse_from(["codetree", "tree", "proj", "--format", "json"]);
        match cli.command {
            Command::Tree { roots, format } => {
                assert_eq!(roots, vec!["proj"]);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn format_defaults_to_text() {
        let cli = Cli::parse_from(["codetree", "files", "a", "b"]);
        assert!(matches!(cli.command, Command::Files { format: OutputFormat::Text, .. }));
        assert_eq!(cli.command.roots(), ["a", "b"]);
    }

    #[test]
    fn show_requires_path() {
        assert!(Cli::try_parse_from(["codetree", "show", "proj"]).is_err());
        let cli = Cli::parse_from(["codetree", "show", "proj", "--path", "proj/a.rs"]);
        assert!(matches!(cli.command, Command::Show { ref path, .. } if path == "proj/a.rs"));
    }

    #[test]
    fn roots_are_required() {
        assert!(Cli::try_parse_from(["codetree", "tree"]).is_err());
    }

    #[test]
    fn global_flags_override_options() {
        let cli =
            Cli::parse_from(["codetree", "tree", "p", "--concurrent", "--lossy", "--batch-size", "3"]);
        let options = cli.upload.apply(UploadOptions::default());
        assert_eq!(options.fanout, Fanout::Concurrent);
        assert_eq!(options.decoding, Decoding::Lossy);
        assert_eq!(options.batch_size, 3);
    }

    #[test]
    fn absent_flags_keep_options() {
        let cli = Cli::parse_from(["codetree", "tree", "p"]);
        assert_eq!(cli.upload.apply(UploadOptions::default()), UploadOptions::default());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(Cli::try_parse_from(["codetree", "tree", "p", "--batch-size", "0"]).is_err());
    }
}
