//! # Transformation Pipeline
//!
//! Executes an ordered list of [`Step`]s against `<cwd>/<root_name>`. Steps run strictly in
//! sequence; the first failure aborts the remaining steps and nothing is rolled back.

use super::file_set::FileSetResolver;
use super::path_validation::{resolve_within_root, to_slash_path};
use super::step::{ContentTransform, NameTransform, Step, StepAction};
use super::substitute::substitute_settings;
use crate::argument::ResolvedSettings;
use crate::errors::PipelineError;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub kind: &'static str,
    pub include: String,
    pub skipped: bool,
    /// Files matched by the step, relative to the root
    pub files: Vec<PathBuf>,
    /// Files the step actually modified, moved or deleted
    pub changed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub root: PathBuf,
    pub steps: Vec<StepReport>,
}

#[derive(Debug, Clone)]
pub struct TransformationPipeline {
    cwd: PathBuf,
}

impl TransformationPipeline {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub async fn run(&self, root_name: &str, steps: &[Step]) -> Result<PipelineReport, PipelineError> {
        let root = self.check_target(root_name).await?;
        let resolver = FileSetResolver::new(&root);
        let mut report = PipelineReport {
            root: root.clone(),
            steps: Vec::with_capacity(steps.len()),
        };

        for (index, step) in steps.iter().enumerate() {
            if !step.required {
                tracing::info!(step = index, kind = step.kind(), pattern = %step.include, "skipping step");
                report.steps.push(StepReport {
                    kind: step.kind(),
                    include: step.include.clone(),
                    skipped: true,
                    files: Vec::new(),
                    changed: 0,
                });
                continue;
            }

            let files = resolver.resolve(&step.include, step.exclude.as_deref())?;
            tracing::debug!(step = index, kind = step.kind(), ?files, "matched files");

            let changed = match &step.action {
                StepAction::Replace(transform) => replace_content(&root, &files, transform).await?,
                StepAction::Substitute(settings) => substitute_files(&root, &files, settings).await?,
                StepAction::Rename(transform) => rename_files(&root, &files, transform).await?,
                StepAction::Remove => remove_files(&root, &files).await?,
            };

            tracing::info!(step = index, kind = step.kind(), matched = files.len(), changed, "step complete");
            report.steps.push(StepReport {
                kind: step.kind(),
                include: step.include.clone(),
                skipped: false,
                files: files.into_iter().collect(),
                changed,
            });
        }

        Ok(report)
    }

    async fn check_target(&self, root_name: &str) -> Result<PathBuf, PipelineError> {
        if root_name.is_empty() {
            return Err(PipelineError::Target(
                "The name of the folder is required".to_string(),
            ));
        }

        let root = self.cwd.join(root_name);
        let metadata = match tokio::fs::metadata(&root).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(PipelineError::Target(format!(
                    "Target folder does not exist: {}",
                    root.display()
                )));
            }
            Err(err) => return Err(PipelineError::io(root, err)),
        };

        if !metadata.is_dir() {
            return Err(PipelineError::Target(format!(
                "Target is a file: {}",
                root.display()
            )));
        }

        Ok(root)
    }
}

async fn read_file(path: &Path) -> Result<String, PipelineError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| PipelineError::io(path, err))
}

async fn write_file(path: &Path, content: &str) -> Result<(), PipelineError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|err| PipelineError::io(path, err))
}

async fn replace_content(
    root: &Path,
    files: &BTreeSet<PathBuf>,
    transform: &ContentTransform,
) -> Result<usize, PipelineError> {
    let mut changed = 0;
    for file in files {
        let path = root.join(file);
        let content = read_file(&path).await?;
        let new_content = transform(content.clone())
            .await
            .map_err(|source| PipelineError::Transform {
                path: file.clone(),
                source,
            })?;
        if new_content != content {
            write_file(&path, &new_content).await?;
            changed += 1;
        }
    }
    Ok(changed)
}

async fn substitute_files(
    root: &Path,
    files: &BTreeSet<PathBuf>,
    settings: &ResolvedSettings,
) -> Result<usize, PipelineError> {
    let mut changed = 0;
    for file in files {
        let path = root.join(file);
        let content = read_file(&path).await?;
        let new_content = substitute_settings(&content, settings);
        if new_content != content {
            write_file(&path, &new_content).await?;
            changed += 1;
        }
    }
    Ok(changed)
}

async fn rename_files(
    root: &Path,
    files: &BTreeSet<PathBuf>,
    transform: &NameTransform,
) -> Result<usize, PipelineError> {
    let mut changed = 0;
    for file in files {
        let old_name = to_slash_path(file);
        let new_name = transform(old_name.clone())
            .await
            .map_err(|source| PipelineError::Transform {
                path: file.clone(),
                source,
            })?;
        if new_name == old_name {
            continue;
        }

        let from = root.join(file);
        let to = resolve_within_root(root, &new_name)?;
        let exists = tokio::fs::try_exists(&to)
            .await
            .map_err(|err| PipelineError::io(&to, err))?;
        if exists {
            return Err(PipelineError::RenameCollision {
                from: file.clone(),
                to: PathBuf::from(new_name),
            });
        }

        if let Some(parent) = to.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| PipelineError::io(parent, err))?;
        }
        tokio::fs::rename(&from, &to)
            .await
            .map_err(|err| PipelineError::io(&from, err))?;
        changed += 1;
    }
    Ok(changed)
}

async fn remove_files(root: &Path, files: &BTreeSet<PathBuf>) -> Result<usize, PipelineError> {
    for file in files {
        let path = root.join(file);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|err| PipelineError::io(&path, err))?;
    }
    Ok(files.len())
}
