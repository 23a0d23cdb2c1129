use crate::errors::PipelineError;
use std::path::{Component, Path, PathBuf};

/// Validates a glob pattern and ensures it cannot escape the root directory
pub fn validate_path_pattern(pattern: &str) -> Result<&str, PipelineError> {
    if pattern.is_empty() {
        return Err(PipelineError::InvalidPattern(
            "Empty patterns are not allowed".to_string(),
        ));
    }

    // Check for directory traversal attempts
    if pattern.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(PipelineError::InvalidPattern(format!(
            "Path traversal patterns are not allowed: {pattern}"
        )));
    }

    if Path::new(pattern).is_absolute() || pattern.starts_with('/') {
        return Err(PipelineError::InvalidPattern(format!(
            "Patterns must be relative to the target root: {pattern}"
        )));
    }

    Ok(pattern)
}

/// Joins a computed relative path onto `root`, rejecting anything that would leave it
pub fn resolve_within_root(root: &Path, relative: &str) -> Result<PathBuf, PipelineError> {
    let candidate = Path::new(relative);
    let escapes = candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes || relative.is_empty() {
        return Err(PipelineError::InvalidPattern(format!(
            "Path is outside the target root: {relative}"
        )));
    }

    Ok(root.join(candidate))
}

/// Relative path rendered with `/` separators, as handed to rename transforms
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
