use super::definition::{ArgType, ArgumentDefinition};
use serde_json::Value;
use std::fmt::Write;

/// Human readable rendering of a setting value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `"(<default>) "` for scalar defaults, empty for structured or missing ones.
pub fn default_padding(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) | Value::Null => String::new(),
        other => format!("({}) ", display_value(other)),
    }
}

/// Render the `--help` text. Each entry pairs a definition with its computed default; file
/// arguments may pass `None`.
pub fn render_help<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a ArgumentDefinition, Option<&'a Value>)>,
{
    let mut out = String::new();
    let _ = writeln!(out, "Usage:");
    let _ = writeln!(
        out,
        "To specify arguments, you can use the following format: \"--argument=value\" or \"--argument value\".\n"
    );
    let _ = writeln!(out, "--version or -v\nDisplay the version of this application.\n");
    let _ = writeln!(out, "--help or -h\nDisplay this help message.\n");

    for (def, default) in entries {
        let _ = writeln!(out, "{}", def.display);
        let _ = writeln!(out, "{}", def.description);
        let _ = writeln!(out, "argument: {}", def.key);
        let _ = writeln!(out, "type: {}", def.arg_type.name());
        if let Some(index) = def.positional {
            let _ = writeln!(out, "sequence: {}", index + 1);
        }

        match &def.arg_type {
            ArgType::Boolean => {
                let _ = writeln!(out, "available values: true, false");
            }
            ArgType::FileRef => {
                let _ = writeln!(
                    out,
                    "Specify the value of the argument by setting the file path, or disable the argument if it is not specified."
                );
            }
            ArgType::Enum(variants) => {
                let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
                let _ = writeln!(out, "available values: {}", names.join(", "));
            }
            ArgType::Text => {}
        }

        if def.arg_type == ArgType::FileRef {
            let _ = writeln!(out, "example: --{}=path/to/the/file", def.key);
        } else {
            let shown = default.map(display_value).unwrap_or_default();
            let _ = writeln!(out, "default value: {shown}");
            if shown.contains(' ') {
                let _ = writeln!(out, "example: --{}=\"{shown}\"", def.key);
            } else {
                let _ = writeln!(out, "example: --{}={shown}", def.key);
            }
        }
        out.push('\n');
    }

    out
}
