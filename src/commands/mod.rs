//! Command dispatch and handlers.

pub mod files;
pub mod show;
pub mod tree;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Command, OutputFormat};
use crate::config::{CassetteMode, UploadOptions};
use crate::context::ServiceContext;
use crate::project::Project;
use crate::upload::upload;

/// Dispatch a parsed command line to its handler and print the result.
///
/// When `CODETREE_RECORD` is set to a file path, all host and ID
/// interactions are recorded to that cassette; `CODETREE_REPLAY` serves
/// them from one instead.
///
/// # Errors
///
/// Returns an error string if configuration is invalid, the upload fails
/// or the command cannot render its output.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let options = cli.upload.apply(UploadOptions::from_env().map_err(|e| e.to_string())?);
    let roots = cli.command.roots();
    debug!(?options, ?roots, "dispatching");

    let mode = CassetteMode::from_env();
    let ctx = ServiceContext::for_mode(&mode, &roots.join(" "), &options)
        .map_err(|e| e.to_string())?;
    let mut project = load(&ctx, roots, &options)?;

    let output = match &cli.command {
        Command::Tree { format, .. } => tree::render(&project, *format)?,
        Command::Files { format, .. } => files::render(&project, *format)?,
        Command::Show { path, .. } => show::render(&mut project, path)?,
    };
    print!("{output}");
    Ok(())
}

/// Runs an upload to completion on a single-threaded runtime.
///
/// Ctrl-C cancels the upload.
fn load(ctx: &ServiceContext, roots: &[String], options: &UploadOptions) -> Result<Project, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    let cancel = CancellationToken::new();

    runtime
        .block_on(async {
            let interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    interrupt.cancel();
                }
            });
            upload(ctx, roots, options, cancel).await
        })
        .map_err(|e| e.to_string())
}

/// Serializes `value` for the structured output formats.
fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|s| s + "\n")
            .map_err(|e| format!("failed to serialize output: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("failed to serialize output: {e}"))
        }
        OutputFormat::Text => Err("text output has no serialized form".to_string()),
    }
}
