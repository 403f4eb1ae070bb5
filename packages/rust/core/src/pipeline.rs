//! End-to-end `convert` pipeline: notebooks → exporter → assets → post.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument};

use notepress_markdown::frontmatter;
use notepress_shared::{
    AppConfig, FrontMatterDefaults, NOTEBOOK_EXTENSION, NotebookPaths, NotepressError, Result,
};

use crate::assets::{self, AssetMove};
use crate::converter::Converter;
use crate::notebook;

/// Configuration for the `convert` pipeline.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory scanned for notebooks.
    pub root: PathBuf,
    /// Language written into notebook metadata and matched on form fences.
    pub language: String,
    /// Front matter used for posts that have none yet.
    pub front_matter: FrontMatterDefaults,
}

impl ConvertConfig {
    /// Pipeline settings for `root` taken from the loaded app config.
    pub fn from_app(config: &AppConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            language: config.notebook.language.clone(),
            front_matter: config.front_matter.clone(),
        }
    }
}

/// Outcome for a single notebook.
#[derive(Debug, Clone)]
pub struct ConvertedPost {
    /// Paths derived from the notebook name.
    pub paths: NotebookPaths,
    /// Number of form cells collapsed.
    pub forms_collapsed: usize,
    /// Whether the previous post's front matter was kept.
    pub front_matter_preserved: bool,
    /// Whether an asset directory was relocated.
    pub assets_moved: bool,
}

/// Result of the `convert` pipeline.
#[derive(Debug)]
pub struct ConvertSummary {
    /// One entry per notebook, in processing order.
    pub posts: Vec<ConvertedPost>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a notebook is converted.
    fn notebook_started(&self, path: &Path, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, summary: &ConvertSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn notebook_started(&self, _path: &Path, _current: usize, _total: usize) {}
    fn done(&self, _summary: &ConvertSummary) {}
}

/// List the `*.ipynb` files directly inside `dir`, sorted by name.
pub fn discover_notebooks(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| NotepressError::io(dir, e))?;

    let mut notebooks = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| NotepressError::io(dir, e))?;
        let path = entry.path();
        let is_notebook = path
            .extension()
            .is_some_and(|ext| ext == NOTEBOOK_EXTENSION);
        if is_notebook && path.is_file() {
            notebooks.push(path);
        }
    }

    notebooks.sort();
    debug!(dir = %dir.display(), count = notebooks.len(), "notebooks discovered");
    Ok(notebooks)
}

/// Convert one notebook into a post.
///
/// 1. Read front matter from the previous post (or synthesize one)
/// 2. Inject language metadata into the notebook
/// 3. Run the exporter
/// 4. Relocate the asset directory
/// 5. Collapse form cells and prepend the front matter
#[instrument(skip_all, fields(notebook = %path.display()))]
pub fn convert_notebook(
    path: &Path,
    config: &ConvertConfig,
    converter: &dyn Converter,
) -> Result<ConvertedPost> {
    let paths = NotebookPaths::from_notebook(path)?;

    let front_matter = frontmatter::load_or_default(&paths.markdown, &config.front_matter)?;

    notebook::inject_language_metadata(&paths.notebook, &config.language)?;
    let exported = converter.convert(&paths.notebook)?;
    let asset_move = assets::relocate_assets(&paths)?;

    let post = notepress_markdown::render_post(&exported, &front_matter, &config.language);
    std::fs::write(&paths.markdown, &post.markdown)
        .map_err(|e| NotepressError::io(&paths.markdown, e))?;

    info!(
        post = %paths.markdown.display(),
        forms = post.forms_collapsed,
        front_matter_preserved = front_matter.is_preserved(),
        "post written"
    );

    Ok(ConvertedPost {
        paths,
        forms_collapsed: post.forms_collapsed,
        front_matter_preserved: front_matter.is_preserved(),
        assets_moved: asset_move == AssetMove::Moved,
    })
}

/// Convert every notebook in `config.root`.
///
/// Notebooks are processed one at a time in name order; the first failure
/// stops the run and is returned.
#[instrument(skip_all, fields(root = %config.root.display()))]
pub fn convert_all(
    config: &ConvertConfig,
    converter: &dyn Converter,
    progress: &dyn ProgressReporter,
) -> Result<ConvertSummary> {
    let start = Instant::now();

    progress.phase("Discovering notebooks");
    let notebooks = discover_notebooks(&config.root)?;
    info!(count = notebooks.len(), "converting notebooks");

    progress.phase("Converting notebooks");
    let total = notebooks.len();
    let mut posts = Vec::with_capacity(total);
    for (i, path) in notebooks.iter().enumerate() {
        progress.notebook_started(path, i + 1, total);
        posts.push(convert_notebook(path, config, converter)?);
    }

    let summary = ConvertSummary {
        posts,
        elapsed: start.elapsed(),
    };
    progress.done(&summary);

    info!(
        posts = summary.posts.len(),
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "conversion complete"
    );
    Ok(summary)
}
