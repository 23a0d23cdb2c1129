//! Tokenizes a raw invocation into explicit flag values and positional tokens.
//!
//! The `clap` command is generated from the argument definitions, so every definition key is
//! accepted as `--key=value` or `--key value`. A bare `--key` means `"true"`.

use super::definition::{ArgumentDefinition, ArgumentSet};
use crate::errors::ResolveError;
use clap::{Arg, ArgAction, Command};
use std::collections::HashMap;

const VERSION_ID: &str = "version";
const HELP_ID: &str = "help";
const POSITIONALS_ID: &str = "<positionals>";

#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub version: bool,
    pub help: bool,
    values: HashMap<String, String>,
    positionals: Vec<String>,
}

impl Invocation {
    pub fn parse<I, T>(tokens: I, definitions: &ArgumentSet) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();

        // Reserved flags win over anything else on the line, including tokens clap would reject
        let version = scan_flag(&tokens, "-v", "--version");
        let help = scan_flag(&tokens, "-h", "--help");
        if version || help {
            return Ok(Self {
                version,
                help,
                ..Self::default()
            });
        }

        let matches = command(definitions).try_get_matches_from(tokens)?;

        let values = definitions
            .iter()
            .filter_map(|def| {
                matches
                    .get_one::<String>(&def.key)
                    .map(|value| (def.key.clone(), value.clone()))
            })
            .collect();

        let positionals = matches
            .get_many::<String>(POSITIONALS_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        Ok(Self {
            version: matches.get_flag(VERSION_ID),
            help: matches.get_flag(HELP_ID),
            values,
            positionals,
        })
    }

    /// Explicit flag value, else the positional token at the definition's index.
    pub fn raw_value(&self, def: &ArgumentDefinition) -> Option<&str> {
        self.values
            .get(&def.key)
            .map(String::as_str)
            .or_else(|| {
                def.positional
                    .and_then(|index| self.positionals.get(index))
                    .map(String::as_str)
            })
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }
}

fn scan_flag(tokens: &[String], short: &str, long: &str) -> bool {
    tokens
        .iter()
        .take_while(|token| token.as_str() != "--")
        .any(|token| token == short || token == long)
}

fn command(definitions: &ArgumentSet) -> Command {
    let mut cmd = Command::new(env!("CARGO_PKG_NAME"))
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .arg(
            Arg::new(VERSION_ID)
                .short('v')
                .long("version")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(HELP_ID)
                .short('h')
                .long("help")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(POSITIONALS_ID)
                .num_args(0..)
                .action(ArgAction::Append),
        );

    for def in definitions.iter() {
        cmd = cmd.arg(
            Arg::new(def.key.clone())
                .long(def.key.clone())
                .action(ArgAction::Set)
                .num_args(0..=1)
                .default_missing_value("true"),
        );
    }

    cmd
}
