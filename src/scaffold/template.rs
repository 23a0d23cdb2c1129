use crate::errors::PipelineError;
use std::path::Path;
use walkdir::WalkDir;

/// Recursively copy `source` into `target`, creating directories as needed.
///
/// Returns the number of files copied. Existing files in `target` are overwritten.
pub async fn copy_template(source: &Path, target: &Path) -> Result<usize, PipelineError> {
    let metadata = tokio::fs::metadata(source)
        .await
        .map_err(|err| PipelineError::io(source, err))?;
    if !metadata.is_dir() {
        return Err(PipelineError::Target(format!(
            "Template is not a directory: {}",
            source.display()
        )));
    }

    tokio::fs::create_dir_all(target)
        .await
        .map_err(|err| PipelineError::io(target, err))?;

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            tokio::fs::create_dir_all(&destination)
                .await
                .map_err(|err| PipelineError::io(&destination, err))?;
        } else {
            tokio::fs::copy(entry.path(), &destination)
                .await
                .map_err(|err| PipelineError::io(entry.path(), err))?;
            copied += 1;
        }
    }

    Ok(copied)
}
