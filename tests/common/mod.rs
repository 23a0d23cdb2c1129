// Common test utilities
use async_trait::async_trait;
use create_neko::argument::{Prompter, SelectPrompt, TextPrompt};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum Answer {
    Pick(usize),
    Type(&'static str),
    Cancel,
}

/// Prompter answering from a fixed script and recording every prompt it was shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub selects: Vec<SelectPrompt>,
    pub texts: Vec<TextPrompt>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn prompts_shown(&self) -> usize {
        self.selects.len() + self.texts.len()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn select(&mut self, prompt: &SelectPrompt) -> io::Result<Option<usize>> {
        self.selects.push(prompt.clone());
        match self.answers.pop_front() {
            Some(Answer::Pick(index)) => Ok(Some(index)),
            Some(Answer::Cancel) | None => Ok(None),
            Some(Answer::Type(_)) => Err(io::Error::other("expected a select answer")),
        }
    }

    async fn text(&mut self, prompt: &TextPrompt) -> io::Result<Option<String>> {
        self.texts.push(prompt.clone());
        match self.answers.pop_front() {
            Some(Answer::Type(input)) => Ok(Some(input.to_string())),
            Some(Answer::Cancel) | None => Ok(None),
            Some(Answer::Pick(_)) => Err(io::Error::other("expected a text answer")),
        }
    }
}

pub fn create_test_file(dir: &Path, name: &str, content: &str) {
    let file_path = dir.join(name);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(file_path, content).unwrap();
}

pub fn tokens(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}
