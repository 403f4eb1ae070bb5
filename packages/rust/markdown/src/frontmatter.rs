//! Front matter extraction, synthesis, and injection.
//!
//! A front matter block is the `---` delimited header at the very top of a
//! post. Hand-edited headers survive re-conversion: the block is read from
//! the previous post before the exporter runs and written back afterwards.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, Local, SecondsFormat};
use regex::Regex;
use tracing::debug;

use notepress_shared::{FrontMatterDefaults, NotepressError, Result};

const DELIMITER: &str = "---";

/// Where a [`FrontMatter`] block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Read from an existing document.
    Preserved,
    /// Synthesized from defaults.
    Default,
}

/// A complete front matter block, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    body: String,
    origin: Origin,
}

impl FrontMatter {
    /// Parse the block at the top of `text`, if there is one.
    ///
    /// Leading blank lines are ignored. The block must be closed and have a
    /// non-blank body.
    pub fn parse(text: &str) -> Option<Self> {
        split_leading(text).map(|(body, _)| Self {
            body,
            origin: Origin::Preserved,
        })
    }

    /// Build the placeholder block for a post that has none yet.
    pub fn synthesize(defaults: &FrontMatterDefaults, now: DateTime<Local>) -> Self {
        let body = format!(
            "title: \"{}\"\ndate: {}\ndraft: {}\nsummary: {}",
            escape_yaml_string(&defaults.title),
            now.to_rfc3339_opts(SecondsFormat::Secs, false),
            defaults.draft,
            defaults.summary,
        );
        Self {
            body,
            origin: Origin::Default,
        }
    }

    /// Lines between the delimiters.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn is_preserved(&self) -> bool {
        self.origin == Origin::Preserved
    }

    /// Value of a top-level `key: value` line, surrounding quotes removed.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.body.lines().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            if k.trim_end() != key || k.starts_with(char::is_whitespace) {
                return None;
            }
            let v = v.trim();
            Some(
                v.strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(v),
            )
        })
    }
}

impl fmt::Display for FrontMatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DELIMITER}\n{}\n{DELIMITER}", self.body)
    }
}

/// Read the front matter of an existing post, or synthesize a default one.
///
/// A missing file or a file without a block both yield the default.
pub fn load_or_default(path: &Path, defaults: &FrontMatterDefaults) -> Result<FrontMatter> {
    if !path.exists() {
        debug!(path = %path.display(), "no previous post, using default front matter");
        return Ok(FrontMatter::synthesize(defaults, Local::now()));
    }

    let text = std::fs::read_to_string(path).map_err(|e| NotepressError::io(path, e))?;

    match FrontMatter::parse(&text) {
        Some(fm) => {
            debug!(
                path = %path.display(),
                title = fm.field("title").unwrap_or_default(),
                "preserving front matter"
            );
            Ok(fm)
        }
        None => {
            debug!(path = %path.display(), "previous post has no front matter, using default");
            Ok(FrontMatter::synthesize(defaults, Local::now()))
        }
    }
}

/// Put `front_matter` on top of `markdown`.
///
/// A leading block of `key: value` lines in `markdown` is dropped so the post
/// never carries two. A leading `---` pair around prose is author content and
/// stays.
pub fn inject(front_matter: &FrontMatter, markdown: &str) -> String {
    let rest = match split_leading(markdown) {
        Some((body, rest)) if looks_like_metadata(&body) => rest,
        _ => markdown,
    };
    let rest = rest.trim_start_matches(['\r', '\n']);

    if rest.is_empty() {
        format!("{front_matter}\n")
    } else {
        format!("{front_matter}\n\n{rest}")
    }
}

/// Split a leading block into its body and the remaining text.
fn split_leading(text: &str) -> Option<(String, &str)> {
    let start = text.len() - text.trim_start_matches(['\r', '\n']).len();
    let mut offset = start;
    let mut lines = text[start..].split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }
    offset += first.len();

    let mut body: Vec<&str> = Vec::new();
    for line in lines {
        offset += line.len();
        let content = line.trim_end_matches(['\r', '\n']);
        if content.trim_end() == DELIMITER {
            if body.iter().all(|l| l.trim().is_empty()) {
                return None;
            }
            return Some((body.join("\n"), &text[offset..]));
        }
        body.push(content);
    }

    None
}

/// Every top-level line is a `key:` entry; indented lines continue one.
fn looks_like_metadata(body: &str) -> bool {
    static KEY_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+\s*:(\s|$)").expect("valid regex"));

    body.lines()
        .filter(|line| !line.trim().is_empty())
        .all(|line| line.starts_with(char::is_whitespace) || KEY_RE.is_match(line))
}

/// Escape special characters in a YAML string value.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
