//! Core domain types for notepress.

use std::path::{Path, PathBuf};

use crate::error::{NotepressError, Result};

/// File extension of notebooks picked up by the pipeline.
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Suffix the exporter appends to a notebook stem for its asset directory.
pub const ASSETS_SUFFIX: &str = "_files";

// ---------------------------------------------------------------------------
// NotebookPaths
// ---------------------------------------------------------------------------

/// Every path derived from a single notebook file name.
///
/// For `blog/Post.ipynb`:
/// ```text
/// notebook       blog/Post.ipynb
/// markdown       blog/post.md
/// export         blog/Post.md          (written by the exporter)
/// source_assets  blog/Post_files
/// target_assets  blog/post/Post_files
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookPaths {
    /// The notebook itself.
    pub notebook: PathBuf,
    /// Final blog post.
    pub markdown: PathBuf,
    /// Document the exporter writes next to the notebook.
    pub export: PathBuf,
    /// Asset directory the exporter writes next to the notebook.
    pub source_assets: PathBuf,
    /// Relocated asset directory beneath the post's slug directory.
    pub target_assets: PathBuf,
}

impl NotebookPaths {
    /// Derive all paths from a `*.ipynb` path.
    pub fn from_notebook(notebook: &Path) -> Result<Self> {
        let stem = notebook_stem(notebook)?;
        let slug = stem.to_lowercase();
        let dir = notebook.parent().unwrap_or_else(|| Path::new(""));
        let assets_name = format!("{stem}{ASSETS_SUFFIX}");

        Ok(Self {
            notebook: notebook.to_path_buf(),
            markdown: dir.join(format!("{slug}.md")),
            export: dir.join(format!("{stem}.md")),
            source_assets: dir.join(&assets_name),
            target_assets: dir.join(&slug).join(&assets_name),
        })
    }
}

/// File name of a notebook without its `.ipynb` extension.
fn notebook_stem(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            NotepressError::validation(format!("not a UTF-8 file name: {}", path.display()))
        })?;

    name.strip_suffix(&format!(".{NOTEBOOK_EXTENSION}"))
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| NotepressError::validation(format!("not a notebook file: {name}")))
}
