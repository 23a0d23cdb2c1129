use super::path_validation::validate_path_pattern;
use crate::errors::PipelineError;
use globset::{GlobBuilder, GlobMatcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Selects the files under a root that match an include pattern and not an exclude pattern.
///
/// Matching is done against root-relative paths; `*` never crosses a `/`, `**` does.
#[derive(Debug, Clone)]
pub struct FileSetResolver {
    root: PathBuf,
}

impl FileSetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative paths of every matching regular file. Zero matches is not an error.
    pub fn resolve(
        &self,
        include: &str,
        exclude: Option<&str>,
    ) -> Result<BTreeSet<PathBuf>, PipelineError> {
        let include = compile(include)?;
        let exclude = exclude.map(compile).transpose()?;

        let mut files = BTreeSet::new();
        for entry in WalkDir::new(&self.root).min_depth(1).follow_links(false) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if !include.is_match(relative) {
                continue;
            }
            if exclude.as_ref().is_some_and(|ex| ex.is_match(relative)) {
                continue;
            }
            files.insert(relative.to_path_buf());
        }

        Ok(files)
    }
}

fn compile(pattern: &str) -> Result<GlobMatcher, PipelineError> {
    let pattern = validate_path_pattern(pattern)?;
    let glob = GlobBuilder::new(pattern).literal_separator(true).build()?;
    Ok(glob.compile_matcher())
}
