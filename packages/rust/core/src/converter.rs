//! Notebook-to-Markdown export.
//!
//! The pipeline only sees the [`Converter`] trait. [`CommandConverter`]
//! drives an external exporter such as `jupyter nbconvert`; tests plug in
//! their own implementation.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info, instrument};

use notepress_shared::{ConverterConfig, NotebookPaths, NotepressError, Result};

/// Turns a notebook into Markdown text.
///
/// Implementations may write side files next to the notebook (the
/// `<Stem>_files` asset directory); the pipeline relocates them afterwards.
pub trait Converter {
    /// Export `notebook` and return the Markdown body.
    fn convert(&self, notebook: &Path) -> Result<String>;
}

/// Runs an external exporter and collects the document it writes.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
    format: String,
}

impl CommandConverter {
    /// Build from the `[converter]` config section.
    pub fn from_config(config: &ConverterConfig) -> Result<Self> {
        let (program, args) = config.command.split_first().ok_or_else(|| {
            NotepressError::config("converter.command must name at least the exporter program")
        })?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            format: config.format.clone(),
        })
    }

    /// The command line as shown in logs and errors.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for CommandConverter {
    fn default() -> Self {
        Self {
            program: "jupyter".into(),
            args: vec!["nbconvert".into()],
            format: "markdown".into(),
        }
    }
}

impl Converter for CommandConverter {
    #[instrument(skip_all, fields(notebook = %notebook.display()))]
    fn convert(&self, notebook: &Path) -> Result<String> {
        let paths = NotebookPaths::from_notebook(notebook)?;
        let command = self.display_command();

        info!(command = %command, "running exporter");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("--to")
            .arg(&self.format)
            .arg(notebook)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                NotepressError::converter(
                    &command,
                    format!("failed to start: {e}. Is the exporter installed and on PATH?"),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotepressError::converter(
                &command,
                format!(
                    "exited with status {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }

        let markdown = std::fs::read_to_string(&paths.export)
            .map_err(|e| NotepressError::io(&paths.export, e))?;

        // The final post is written under the lower-cased name.
        std::fs::remove_file(&paths.export).map_err(|e| NotepressError::io(&paths.export, e))?;

        debug!(
            export = %paths.export.display(),
            bytes = markdown.len(),
            "exporter output collected"
        );
        Ok(markdown)
    }
}
