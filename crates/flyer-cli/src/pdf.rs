use std::path::{Path, PathBuf};

use anyhow::Context;
use flyer_core::{pdf_file_name, shorten_title};
use flyer_pipeline::assemble_pdf;

/// File name the scrape pipeline would give this offer's PDF.
pub(crate) fn offer_pdf_name(title: &str, id: &str) -> String {
    pdf_file_name(&shorten_title(title), id)
}

pub(crate) fn output_path(folder: &Path, file_name: &str, out: Option<PathBuf>) -> PathBuf {
    out.unwrap_or_else(|| folder.join(file_name))
}

/// Builds the PDF for `folder` and writes it to disk.
///
/// # Errors
///
/// Returns an error if the folder cannot be read, no image decodes, or the
/// output cannot be written.
pub(crate) async fn run_pdf(
    folder: PathBuf,
    title: &str,
    id: &str,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let file_name = offer_pdf_name(title, id);
    let dest = output_path(&folder, &file_name, out);

    let source = folder.clone();
    let artifact = tokio::task::spawn_blocking(move || assemble_pdf(&source, file_name))
        .await??
        .with_context(|| format!("no images in {}", folder.display()))?;

    tokio::fs::write(&dest, &artifact.bytes)
        .await
        .with_context(|| format!("failed to write {}", dest.display()))?;

    println!(
        "wrote {} ({} pages, {} bytes)",
        dest.display(),
        artifact.page_count,
        artifact.bytes.len()
    );
    Ok(())
}
