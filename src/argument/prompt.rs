//! # Prompt Presentation
//!
//! The resolver talks to the user through the [`Prompter`] trait. Prompts carry plain text;
//! styling belongs to the implementation. [`TerminalPrompter`] renders them with `cliclack`.

use async_trait::async_trait;
use colored::Colorize;
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub is_default: bool,
}

/// One-of-many prompt. The answer is the index of the chosen entry in `choices`.
#[derive(Debug, Clone)]
pub struct SelectPrompt {
    pub key: String,
    pub title: String,
    pub description: String,
    pub choices: Vec<Choice>,
}

impl SelectPrompt {
    /// Index of the entry marked as default, or the first one.
    pub fn initial(&self) -> usize {
        self.choices
            .iter()
            .position(|choice| choice.is_default)
            .unwrap_or(0)
    }
}

/// Free-form input prompt.
#[derive(Debug, Clone)]
pub struct TextPrompt {
    pub key: String,
    pub title: String,
    pub description: String,
    pub placeholder: Option<String>,
    /// Previously submitted input that failed validation
    pub initial: Option<String>,
    /// Validation message for `initial`
    pub error: Option<String>,
}

/// Presents prompts and returns the answer, or `None` when the user cancels.
#[async_trait]
pub trait Prompter: Send {
    async fn select(&mut self, prompt: &SelectPrompt) -> io::Result<Option<usize>>;

    async fn text(&mut self, prompt: &TextPrompt) -> io::Result<Option<String>>;
}

/// Terminal prompts. Each `interact` blocks, so it runs under `block_in_place`; this needs the
/// multi-threaded runtime.
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    started: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&mut self) -> io::Result<()> {
        if !self.started {
            cliclack::intro(env!("CARGO_PKG_NAME").on_cyan().black().to_string())?;
            self.started = true;
        }
        Ok(())
    }

    /// Close the prompt session, if one was opened.
    pub fn finish(&mut self, message: &str) -> io::Result<()> {
        if self.started {
            cliclack::outro(message)?;
            self.started = false;
        }
        Ok(())
    }
}

fn heading(title: &str, description: &str) -> String {
    format!("{} {}", title.bright_cyan(), description)
}

/// Run a blocking prompt off the async scheduler's hot path.
fn interact<T>(prompt: impl FnOnce() -> io::Result<T>) -> io::Result<Option<T>> {
    canceled(tokio::task::block_in_place(prompt))
}

fn canceled<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn select(&mut self, prompt: &SelectPrompt) -> io::Result<Option<usize>> {
        self.start()?;
        let mut select = cliclack::select(heading(&prompt.title, &prompt.description));
        for (index, choice) in prompt.choices.iter().enumerate() {
            let label = if choice.is_default {
                format!("{} (default)", choice.label)
            } else {
                choice.label.clone()
            };
            select = select.item(index, label, "");
        }
        let mut select = select.initial_value(prompt.initial());
        interact(|| select.interact())
    }

    async fn text(&mut self, prompt: &TextPrompt) -> io::Result<Option<String>> {
        self.start()?;
        if let Some(error) = &prompt.error {
            cliclack::log::error(error)?;
        }
        let mut input = cliclack::input(heading(&prompt.title, &prompt.description)).required(false);
        if let Some(placeholder) = &prompt.placeholder {
            input = input.placeholder(placeholder);
        }
        if let Some(initial) = &prompt.initial {
            input = input.default_input(initial);
        }
        interact(|| input.interact::<String>())
    }
}
