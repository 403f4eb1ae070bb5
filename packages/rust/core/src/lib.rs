//! Core pipeline orchestration for notepress.
//!
//! This crate ties together notebook metadata injection, the external
//! exporter, asset relocation, and Markdown rewriting into the end-to-end
//! `convert` workflow.

pub mod assets;
pub mod converter;
pub mod notebook;
pub mod pipeline;
