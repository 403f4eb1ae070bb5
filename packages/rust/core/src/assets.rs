//! Relocation of exporter-generated asset directories.
//!
//! `Post_files/` written next to `Post.ipynb` moves to `post/Post_files/`.
//! Whatever was at the destination before is deleted first.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, instrument};

use notepress_shared::{NotebookPaths, NotepressError, Result};

/// What [`relocate_assets`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetMove {
    /// The asset directory now lives at the target path.
    Moved,
    /// The exporter produced no asset directory.
    NothingToMove,
}

/// Move the notebook's asset directory beneath its post slug.
///
/// An existing destination is removed before the move. A move that fails
/// because the destination reappeared is ignored; every other failure
/// propagates.
///
/// A missing `<Stem>_files` directory is not an error: exports without
/// images produce none, so the result is [`AssetMove::NothingToMove`].
#[instrument(skip_all, fields(notebook = %paths.notebook.display()))]
pub fn relocate_assets(paths: &NotebookPaths) -> Result<AssetMove> {
    let source = &paths.source_assets;
    let target = &paths.target_assets;

    if !source.is_dir() {
        debug!(source = %source.display(), "no asset directory to relocate");
        return Ok(AssetMove::NothingToMove);
    }

    if target.exists() {
        info!(target = %target.display(), "clearing existing assets directory");
        std::fs::remove_dir_all(target).map_err(|e| NotepressError::io(target, e))?;
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| NotepressError::io(parent, e))?;
    }

    info!(
        source = %source.display(),
        target = %target.display(),
        "moving assets"
    );

    finish_move(std::fs::rename(source, target), source, target)
}

/// Map the outcome of the rename, ignoring collisions at the destination.
fn finish_move(moved: std::io::Result<()>, source: &Path, target: &Path) -> Result<AssetMove> {
    match moved {
        Ok(()) => Ok(AssetMove::Moved),
        Err(e) if is_collision(&e) => {
            debug!(target = %target.display(), error = %e, "assets already in place");
            Ok(AssetMove::Moved)
        }
        Err(e) => Err(NotepressError::io(source, e)),
    }
}

/// The destination already exists and holds entries.
fn is_collision(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::AlreadyExists | ErrorKind::DirectoryNotEmpty)
}
