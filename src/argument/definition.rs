//! # Argument Definitions
//!
//! Declarative description of every configurable key: its type domain, default and optional
//! coercer. Definitions are immutable once collected into an [`ArgumentSet`].

use crate::errors::{ArgumentError, ResolveError};
use futures::future::{self, BoxFuture};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Keys claimed by the `--help` and `--version` flags.
pub const RESERVED_KEYS: [&str; 2] = ["help", "version"];

pub type ValueFuture = BoxFuture<'static, Result<Value, ArgumentError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub display: String,
}

impl Variant {
    pub fn new(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display: display.into(),
        }
    }
}

/// Type domain of an argument. Prompt shape, coercion and help rendering all dispatch on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    Text,
    Boolean,
    /// Path to a structured file whose parsed content becomes the value
    FileRef,
    Enum(Vec<Variant>),
}

impl ArgType {
    /// Name shown in help output.
    pub fn name(&self) -> &'static str {
        match self {
            ArgType::Text => "string",
            ArgType::Boolean => "boolean",
            ArgType::FileRef => "file",
            ArgType::Enum(_) => "enum",
        }
    }
}

/// Zero-argument, possibly suspending, default computation.
#[derive(Clone)]
pub struct DefaultProvider(Arc<dyn Fn() -> ValueFuture + Send + Sync>);

impl DefaultProvider {
    pub fn new<F, Fut>(provider: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ArgumentError>> + Send + 'static,
    {
        Self(Arc::new(move || -> ValueFuture { Box::pin(provider()) }))
    }
}

#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Provider(DefaultProvider),
}

impl DefaultValue {
    pub async fn compute(&self) -> Result<Value, ArgumentError> {
        match self {
            DefaultValue::Literal(value) => Ok(value.clone()),
            DefaultValue::Provider(provider) => (provider.0)().await,
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Turns a raw string into the final value, or rejects it.
#[derive(Clone)]
pub struct Coercer(Arc<dyn Fn(String) -> ValueFuture + Send + Sync>);

impl Coercer {
    pub fn new<F, Fut>(coerce: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ArgumentError>> + Send + 'static,
    {
        Self(Arc::new(move |raw| -> ValueFuture { Box::pin(coerce(raw)) }))
    }

    /// Wrap a synchronous validator.
    pub fn from_fn<F>(coerce: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ArgumentError> + Send + Sync + 'static,
    {
        Self(Arc::new(move |raw: String| -> ValueFuture {
            Box::pin(future::ready(coerce(&raw)))
        }))
    }

    pub async fn apply(&self, raw: String) -> Result<Value, ArgumentError> {
        (self.0)(raw).await
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Coercer(..)")
    }
}

#[derive(Debug, Clone)]
pub struct ArgumentDefinition {
    pub key: String,
    pub display: String,
    pub description: String,
    pub arg_type: ArgType,
    pub default: DefaultValue,
    pub coerce: Option<Coercer>,
    /// Index into the positional tokens used when no explicit flag is given
    pub positional: Option<usize>,
}

impl ArgumentDefinition {
    pub fn new(key: impl Into<String>, arg_type: ArgType) -> Self {
        let key = key.into();
        Self {
            display: key.clone(),
            key,
            description: String::new(),
            arg_type,
            default: DefaultValue::Literal(Value::Null),
            coerce: None,
            positional: None,
        }
    }

    pub fn text(key: impl Into<String>) -> Self {
        Self::new(key, ArgType::Text)
    }

    pub fn boolean(key: impl Into<String>) -> Self {
        Self::new(key, ArgType::Boolean)
    }

    pub fn file(key: impl Into<String>) -> Self {
        Self::new(key, ArgType::FileRef)
    }

    pub fn choice(key: impl Into<String>, variants: Vec<Variant>) -> Self {
        Self::new(key, ArgType::Enum(variants))
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = DefaultValue::Literal(value.into());
        self
    }

    pub fn default_with(mut self, provider: DefaultProvider) -> Self {
        self.default = DefaultValue::Provider(provider);
        self
    }

    pub fn coerce(mut self, coercer: Coercer) -> Self {
        self.coerce = Some(coercer);
        self
    }

    pub fn positional(mut self, index: usize) -> Self {
        self.positional = Some(index);
        self
    }
}

/// Ordered, validated collection of definitions.
#[derive(Debug, Clone)]
pub struct ArgumentSet {
    definitions: Vec<ArgumentDefinition>,
}

impl ArgumentSet {
    pub fn new(definitions: Vec<ArgumentDefinition>) -> Result<Self, ResolveError> {
        let mut keys = HashSet::new();
        let mut positions = HashSet::new();

        for def in &definitions {
            if def.key.is_empty() {
                return Err(ResolveError::InvalidDefinition(
                    "argument key must not be empty".to_string(),
                ));
            }
            if RESERVED_KEYS.contains(&def.key.as_str()) {
                return Err(ResolveError::InvalidDefinition(format!(
                    "\"{}\" is reserved for a built-in flag",
                    def.key
                )));
            }
            if !keys.insert(def.key.as_str()) {
                return Err(ResolveError::InvalidDefinition(format!(
                    "duplicate key \"{}\"",
                    def.key
                )));
            }
            if let Some(index) = def.positional {
                if !positions.insert(index) {
                    return Err(ResolveError::InvalidDefinition(format!(
                        "positional index {index} of \"{}\" is already taken",
                        def.key
                    )));
                }
            }
            if let ArgType::Enum(variants) = &def.arg_type {
                if variants.is_empty() {
                    return Err(ResolveError::InvalidDefinition(format!(
                        "enum \"{}\" has no variants",
                        def.key
                    )));
                }
                let mut names = HashSet::new();
                for variant in variants {
                    if !names.insert(variant.name.as_str()) {
                        return Err(ResolveError::InvalidDefinition(format!(
                            "enum \"{}\" declares variant \"{}\" twice",
                            def.key, variant.name
                        )));
                    }
                }
            }
        }

        Ok(Self { definitions })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgumentDefinition> {
        self.definitions.iter()
    }

    pub fn get(&self, key: &str) -> Option<&ArgumentDefinition> {
        self.definitions.iter().find(|def| def.key == key)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
