//! notepress CLI: turn Jupyter notebooks into blog posts.
//!
//! Exports every notebook in a directory to Markdown, collapses form cells,
//! relocates generated assets, and keeps each post's front matter.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
