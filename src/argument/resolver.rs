//! # Argument Resolution
//!
//! Turns an [`ArgumentSet`] plus the raw invocation into [`ResolvedSettings`].
//!
//! With no tokens every definition is prompted for, in order, and aborting any prompt
//! cancels the whole resolution. With tokens, each definition is read from its flag or
//! positional slot; per-field failures fall back to the computed default and produce an
//! [`Advisory`] instead of an error.

use super::definition::{ArgType, ArgumentDefinition, ArgumentSet, Variant};
use super::help::{default_padding, display_value, render_help};
use super::invocation::Invocation;
use super::loader::structured_file_loader;
use super::prompt::{Choice, Prompter, SelectPrompt, TextPrompt};
use super::settings::ResolvedSettings;
use crate::errors::{ArgumentError, ResolveError};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

const TRUE_TOKENS: [&str; 3] = ["true", "yes", "1"];
const FALSE_TOKENS: [&str; 3] = ["false", "no", "0"];

/// Non-fatal notice accompanying an automatic fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub key: String,
    pub message: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone)]
pub struct Resolved {
    pub settings: ResolvedSettings,
    pub advisories: Vec<Advisory>,
}

#[derive(Debug, Clone)]
pub enum Resolution {
    Settings(Resolved),
    /// The user aborted the interactive prompts; no settings exist
    Canceled,
    /// `--version` was requested
    Version(String),
    /// `--help` was requested; carries the rendered help text
    Help(String),
}

impl Resolution {
    pub fn settings(&self) -> Option<&ResolvedSettings> {
        match self {
            Resolution::Settings(resolved) => Some(&resolved.settings),
            _ => None,
        }
    }
}

/// Match a boolean token case-insensitively.
pub fn parse_boolean(raw: &str) -> Result<bool, ArgumentError> {
    let lowered = raw.to_lowercase();
    if TRUE_TOKENS.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSE_TOKENS.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(ArgumentError::Coercion(format!(
            "\"{raw}\" is not one of {}",
            TRUE_TOKENS.iter().chain(FALSE_TOKENS.iter()).copied().collect::<Vec<_>>().join(", ")
        )))
    }
}

/// Find the variant whose name matches `raw` case-insensitively.
pub fn match_variant<'a>(variants: &'a [Variant], raw: &str) -> Result<&'a Variant, ArgumentError> {
    let lowered = raw.to_lowercase();
    variants
        .iter()
        .find(|variant| variant.name.to_lowercase() == lowered)
        .ok_or_else(|| {
            let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
            ArgumentError::Coercion(format!("\"{raw}\" is not one of {}", names.join(", ")))
        })
}

pub struct ArgumentResolver<'a> {
    definitions: &'a ArgumentSet,
    cwd: PathBuf,
    version: String,
}

impl<'a> ArgumentResolver<'a> {
    pub fn new(definitions: &'a ArgumentSet, cwd: PathBuf) -> Self {
        Self {
            definitions,
            cwd,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Resolve every definition exactly once. Empty `tokens` selects the interactive mode.
    pub async fn resolve<P>(
        &self,
        tokens: &[String],
        prompter: &mut P,
    ) -> Result<Resolution, ResolveError>
    where
        P: Prompter + ?Sized,
    {
        if tokens.is_empty() {
            self.resolve_interactive(prompter).await
        } else {
            self.resolve_tokens(tokens).await
        }
    }

    async fn compute_default(&self, def: &ArgumentDefinition) -> Result<Value, ResolveError> {
        def.default
            .compute()
            .await
            .map_err(|source| ResolveError::Default {
                key: def.key.clone(),
                source,
            })
    }

    /// Apply the definition's coercer; file arguments without one are loaded from disk.
    async fn coerce(&self, def: &ArgumentDefinition, raw: String) -> Result<Value, ArgumentError> {
        match (&def.coerce, &def.arg_type) {
            (Some(coercer), _) => coercer.apply(raw).await,
            (None, ArgType::FileRef) => structured_file_loader(self.cwd.clone()).apply(raw).await,
            (None, _) => Ok(Value::String(raw)),
        }
    }

    async fn resolve_interactive<P>(&self, prompter: &mut P) -> Result<Resolution, ResolveError>
    where
        P: Prompter + ?Sized,
    {
        let mut settings = ResolvedSettings::default();

        for def in self.definitions.iter() {
            let default = self.compute_default(def).await?;
            let answer = match &def.arg_type {
                ArgType::Text => self.prompt_text(def, &default, prompter).await?,
                ArgType::Boolean => {
                    let values = [Value::Bool(true), Value::Bool(false)];
                    let labels = ["True", "False"];
                    let choices = labels
                        .iter()
                        .zip(values.iter())
                        .map(|(label, value)| Choice {
                            label: label.to_string(),
                            is_default: *value == default,
                        })
                        .collect();
                    self.prompt_select(def, choices, values.to_vec(), prompter)
                        .await?
                }
                ArgType::FileRef => {
                    let choices = vec![
                        Choice {
                            label: "Use default".to_string(),
                            is_default: false,
                        },
                        Choice {
                            label: "Disable".to_string(),
                            is_default: false,
                        },
                    ];
                    self.prompt_select(def, choices, vec![default.clone(), Value::Null], prompter)
                        .await?
                }
                ArgType::Enum(variants) => {
                    let choices = variants
                        .iter()
                        .map(|variant| Choice {
                            label: variant.display.clone(),
                            is_default: default.as_str() == Some(variant.name.as_str()),
                        })
                        .collect();
                    let values = variants
                        .iter()
                        .map(|variant| Value::String(variant.name.clone()))
                        .collect();
                    self.prompt_select(def, choices, values, prompter).await?
                }
            };

            match answer {
                Some(value) => settings.insert(def.key.clone(), value),
                None => {
                    tracing::warn!("User canceled the prompt.");
                    return Ok(Resolution::Canceled);
                }
            }
        }

        Ok(Resolution::Settings(Resolved {
            settings,
            advisories: Vec::new(),
        }))
    }

    async fn prompt_select<P>(
        &self,
        def: &ArgumentDefinition,
        choices: Vec<Choice>,
        values: Vec<Value>,
        prompter: &mut P,
    ) -> Result<Option<Value>, ResolveError>
    where
        P: Prompter + ?Sized,
    {
        let prompt = SelectPrompt {
            key: def.key.clone(),
            title: def.display.clone(),
            description: def.description.clone(),
            choices,
        };
        let picked = prompter
            .select(&prompt)
            .await
            .map_err(ResolveError::Prompt)?;
        Ok(picked.and_then(|index| values.get(index).cloned()))
    }

    /// Ask until the coercer accepts the input or the user cancels.
    async fn prompt_text<P>(
        &self,
        def: &ArgumentDefinition,
        default: &Value,
        prompter: &mut P,
    ) -> Result<Option<Value>, ResolveError>
    where
        P: Prompter + ?Sized,
    {
        let mut prompt = TextPrompt {
            key: def.key.clone(),
            title: def.display.clone(),
            description: def.description.clone(),
            placeholder: (!default.is_null()).then(|| display_value(default)),
            initial: None,
            error: None,
        };

        loop {
            let Some(raw) = prompter.text(&prompt).await.map_err(ResolveError::Prompt)? else {
                return Ok(None);
            };
            match self.coerce(def, raw.clone()).await {
                Ok(value) => return Ok(Some(value)),
                Err(err) => {
                    tracing::debug!(key = %def.key, "rejected input: {err}");
                    prompt.initial = Some(raw);
                    prompt.error = Some(err.to_string());
                }
            }
        }
    }

    async fn resolve_tokens(&self, tokens: &[String]) -> Result<Resolution, ResolveError> {
        let invocation = Invocation::parse(tokens.iter().cloned(), self.definitions)?;

        if invocation.version {
            return Ok(Resolution::Version(self.version.clone()));
        }
        if invocation.help {
            return self.render_help().await.map(Resolution::Help);
        }

        let mut settings = ResolvedSettings::default();
        let mut advisories = Vec::new();

        for def in self.definitions.iter() {
            let default = self.compute_default(def).await?;
            let mut advise = |message: String| {
                tracing::warn!(key = %def.key, "{message}");
                advisories.push(Advisory {
                    key: def.key.clone(),
                    message,
                });
            };

            let Some(raw) = invocation.raw_value(def) else {
                advise(format!(
                    "The value of \"{}\" is not specified. The default value {}is used.",
                    def.key,
                    default_padding(&default)
                ));
                settings.insert(def.key.clone(), default);
                continue;
            };

            let value = match &def.arg_type {
                ArgType::Text | ArgType::FileRef => {
                    match self.coerce(def, raw.to_string()).await {
                        Ok(value) => value,
                        Err(err) => {
                            advise(format!(
                                "An error occurred while retrieving the value of \"{}\". The default value {}is used instead. {err}",
                                def.key,
                                default_padding(&default)
                            ));
                            default
                        }
                    }
                }
                // An unrecognised token resolves to `false`, not to the default.
                ArgType::Boolean => match parse_boolean(raw) {
                    Ok(flag) => Value::Bool(flag),
                    Err(_) => {
                        advise(format!(
                            "An error occurred due to expecting a boolean value of \"{}\". The default value {}is used instead.",
                            def.key,
                            default_padding(&default)
                        ));
                        Value::Bool(false)
                    }
                },
                ArgType::Enum(variants) => match match_variant(variants, raw) {
                    Ok(variant) => Value::String(variant.name.clone()),
                    Err(_) => {
                        let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
                        advise(format!(
                            "An error occurred due to an invalid value for \"{}\", which must be within {}. The default value {}is used instead.",
                            def.key,
                            serde_json::to_string(&names).unwrap_or_default(),
                            default_padding(&default)
                        ));
                        default
                    }
                },
            };

            settings.insert(def.key.clone(), value);
        }

        Ok(Resolution::Settings(Resolved {
            settings,
            advisories,
        }))
    }

    async fn render_help(&self) -> Result<String, ResolveError> {
        let mut defaults = Vec::with_capacity(self.definitions.len());
        for def in self.definitions.iter() {
            let default = match def.arg_type {
                ArgType::FileRef => None,
                _ => Some(self.compute_default(def).await?),
            };
            defaults.push(default);
        }

        Ok(render_help(
            self.definitions.iter().zip(defaults.iter().map(Option::as_ref)),
        ))
    }
}
