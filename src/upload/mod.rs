//! Turning host locations into a loaded [`Project`].

pub mod language;
pub mod traverse;

pub use language::{detect_language, DEFAULT_LANGUAGE};
pub use traverse::Traversal;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::UploadOptions;
use crate::context::ServiceContext;
use crate::error::UploadError;
use crate::project::Project;
use crate::tree::build;

/// Uploads `locations` as one batch.
///
/// Resolves every location through the context's host, walks the entries,
/// builds the tree and names the project after the first root. Nothing is
/// returned unless every step succeeds.
///
/// # Errors
///
/// Returns the first resolve, read, listing or tree error, or
/// [`UploadError::Cancelled`] once `cancel` fires.
pub async fn upload(
    ctx: &ServiceContext,
    locations: &[String],
    options: &UploadOptions,
    cancel: CancellationToken,
) -> Result<Project, UploadError> {
    let traversal = Traversal::new(ctx.host.as_ref(), ctx.id_gen.as_ref())
        .fanout(options.fanout)
        .decoding(options.decoding)
        .cancel_on(cancel);

    let roots = traversal.resolve(locations).await?;
    let records = traversal.run(&roots).await?;
    let files = build(records, ctx.id_gen.as_ref())?;

    let name = roots.first().map(|root| root.name.clone()).unwrap_or_default();
    let project = Project::new(name, files);
    let stats = project.stats();
    info!(
        project = %project.name,
        files = stats.files,
        folders = stats.folders,
        bytes = stats.bytes,
        "upload complete"
    );
    Ok(project)
}
