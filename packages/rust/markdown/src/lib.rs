//! Markdown rewriting for exported notebooks.
//!
//! Everything here is a pure text transform over the exporter's output:
//! form cells become `<details>` disclosure blocks and the post gets its
//! front matter header. Filesystem work lives in `notepress-core`.

pub mod forms;
pub mod frontmatter;

use tracing::{debug, instrument};

pub use forms::{CollapseResult, collapse_forms};
pub use frontmatter::{FrontMatter, Origin, inject, load_or_default};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A finished post, ready to be written to disk.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    /// Final Markdown (front matter + collapsed body).
    pub markdown: String,
    /// Number of form cells collapsed into disclosure blocks.
    pub forms_collapsed: usize,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Turn exporter output into a blog post.
///
/// 1. Collapses `language` form cells
/// 2. Prepends `front_matter`, replacing any metadata block the exporter produced
#[instrument(skip_all, fields(language = %language))]
pub fn render_post(exported: &str, front_matter: &FrontMatter, language: &str) -> RenderedPost {
    let collapsed = collapse_forms(exported, language);
    debug!(forms = collapsed.collapsed, "form cells collapsed");

    let markdown = inject(front_matter, &collapsed.markdown);

    RenderedPost {
        markdown,
        forms_collapsed: collapsed.collapsed,
    }
}
