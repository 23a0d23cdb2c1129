use super::definition::Coercer;
use crate::errors::ArgumentError;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Read a structured file and return its parsed content.
///
/// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
pub async fn load_structured_file(path: &Path) -> Result<Value, ArgumentError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ArgumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );

    let parsed = if is_yaml {
        serde_yaml::from_str::<Value>(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Value>(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| ArgumentError::ConfigParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Coercer loading the referenced file; relative paths are taken from `base`.
pub fn structured_file_loader(base: PathBuf) -> Coercer {
    Coercer::new(move |raw| {
        let path = base.join(raw);
        async move { load_structured_file(&path).await }
    })
}
