use crate::argument::ResolvedSettings;
use futures::future::{self, BoxFuture};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub type TransformFuture = BoxFuture<'static, anyhow::Result<String>>;

/// Rewrites a file's full content.
pub type ContentTransform = Arc<dyn Fn(String) -> TransformFuture + Send + Sync>;

/// Computes a new root-relative name (with `/` separators) from the current one.
pub type NameTransform = Arc<dyn Fn(String) -> TransformFuture + Send + Sync>;

fn boxed<F, Fut>(transform: F) -> Arc<dyn Fn(String) -> TransformFuture + Send + Sync>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    Arc::new(move |input| -> TransformFuture { Box::pin(transform(input)) })
}

fn boxed_sync<F>(transform: F) -> Arc<dyn Fn(String) -> TransformFuture + Send + Sync>
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
{
    Arc::new(move |input: String| -> TransformFuture {
        Box::pin(future::ready(transform(&input)))
    })
}

#[derive(Clone)]
pub enum StepAction {
    Replace(ContentTransform),
    /// Replace `{{key}}` tokens with setting values
    Substitute(ResolvedSettings),
    Rename(NameTransform),
    Remove,
}

impl StepAction {
    pub fn kind(&self) -> &'static str {
        match self {
            StepAction::Replace(_) => "replace",
            StepAction::Substitute(_) => "substitute",
            StepAction::Rename(_) => "rename",
            StepAction::Remove => "remove",
        }
    }
}

impl fmt::Debug for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// One unit of the pipeline. Steps run in the order they are given.
#[derive(Debug, Clone)]
pub struct Step {
    pub action: StepAction,
    pub include: String,
    pub exclude: Option<String>,
    /// Steps with `required == false` are skipped without touching the filesystem
    pub required: bool,
}

impl Step {
    pub fn new(action: StepAction, include: impl Into<String>) -> Self {
        Self {
            action,
            include: include.into(),
            exclude: None,
            required: true,
        }
    }

    pub fn replace<F>(include: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self::new(StepAction::Replace(boxed_sync(transform)), include)
    }

    /// Replace step whose transform may suspend, e.g. to read another file.
    pub fn replace_with<F, Fut>(include: impl Into<String>, transform: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        Self::new(StepAction::Replace(boxed(transform)), include)
    }

    pub fn substitute(include: impl Into<String>, settings: ResolvedSettings) -> Self {
        Self::new(StepAction::Substitute(settings), include)
    }

    pub fn rename<F>(include: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self::new(StepAction::Rename(boxed_sync(transform)), include)
    }

    pub fn rename_with<F, Fut>(include: impl Into<String>, transform: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        Self::new(StepAction::Rename(boxed(transform)), include)
    }

    pub fn remove(include: impl Into<String>) -> Self {
        Self::new(StepAction::Remove, include)
    }

    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclude = Some(pattern.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn kind(&self) -> &'static str {
        self.action.kind()
    }
}
