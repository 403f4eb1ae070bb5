//! In-place notebook metadata rewriting.

use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use notepress_shared::{NotepressError, Result};

/// Indentation used when writing the notebook back.
const INDENT: &[u8] = b"    ";

/// Set `metadata.language_info` to `{"name": language}` and rewrite the file.
///
/// The exporter picks the code fence language from this field, so notebooks
/// saved without a kernel still export with highlighted fences.
#[instrument(skip_all, fields(path = %path.display(), language = %language))]
pub fn inject_language_metadata(path: &Path, language: &str) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| NotepressError::io(path, e))?;

    let mut notebook: Value = serde_json::from_str(&content).map_err(|e| {
        NotepressError::parse(format!("invalid notebook JSON in {}: {e}", path.display()))
    })?;

    set_language(&mut notebook, language).map_err(|msg| {
        NotepressError::validation(format!("{}: {msg}", path.display()))
    })?;

    let json = to_indented_json(&notebook)?;
    std::fs::write(path, json).map_err(|e| NotepressError::io(path, e))?;

    debug!("language metadata injected");
    Ok(())
}

fn set_language(notebook: &mut Value, language: &str) -> std::result::Result<(), &'static str> {
    let root = notebook
        .as_object_mut()
        .ok_or("notebook root is not a JSON object")?;

    let metadata = root
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or("notebook metadata is not a JSON object")?;

    metadata.insert("language_info".into(), json!({ "name": language }));
    Ok(())
}

fn to_indented_json(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value
        .serialize(&mut ser)
        .map_err(|e| NotepressError::validation(format!("JSON serialization failed: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "notepress-notebook-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn injects_language_field() {
        let tmp = temp_dir();
        let path = tmp.join("Post.ipynb");
        std::fs::write(
            &path,
            r#"{"cells": [], "metadata": {"kernelspec": {"name": "python3"}}, "nbformat": 4, "nbformat_minor": 5}"#,
        )
        .unwrap();

        inject_language_metadata(&path, "python").unwrap();

        let notebook = read_json(&path);
        assert_eq!(notebook["metadata"]["language_info"]["name"], "python");
        assert_eq!(notebook["metadata"]["kernelspec"]["name"], "python3");
        assert_eq!(notebook["nbformat"], 4);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn replaces_existing_language_info() {
        let tmp = temp_dir();
        let path = tmp.join("Post.ipynb");
        std::fs::write(
            &path,
            r#"{"metadata": {"language_info": {"name": "R", "version": "4.3"}}}"#,
        )
        .unwrap();

        inject_language_metadata(&path, "python").unwrap();

        let notebook = read_json(&path);
        assert_eq!(notebook["metadata"]["language_info"], json!({ "name": "python" }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn writes_four_space_indent_in_original_key_order() {
        let tmp = temp_dir();
        let path = tmp.join("Post.ipynb");
        std::fs::write(&path, r#"{"nbformat": 4, "cells": [], "metadata": {}}"#).unwrap();

        inject_language_metadata(&path, "python").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n    \"nbformat\": 4,\n    \"cells\": []"));
        assert!(written.contains("\n        \"language_info\": {"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn creates_missing_metadata() {
        let tmp = temp_dir();
        let path = tmp.join("Bare.ipynb");
        std::fs::write(&path, r#"{"cells": []}"#).unwrap();

        inject_language_metadata(&path, "python").unwrap();
        assert_eq!(read_json(&path)["metadata"]["language_info"]["name"], "python");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let tmp = temp_dir();
        let path = tmp.join("Broken.ipynb");
        std::fs::write(&path, "{not json").unwrap();

        let err = inject_language_metadata(&path, "python").unwrap_err();
        assert!(matches!(err, NotepressError::Parse { .. }));
        // Left untouched on failure
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn non_object_metadata_is_validation_error() {
        let tmp = temp_dir();
        let path = tmp.join("Odd.ipynb");
        std::fs::write(&path, r#"{"metadata": []}"#).unwrap();

        let err = inject_language_metadata(&path, "python").unwrap_err();
        assert!(matches!(err, NotepressError::Validation { .. }));
        assert!(err.to_string().contains("metadata is not a JSON object"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
