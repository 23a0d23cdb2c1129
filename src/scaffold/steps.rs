use crate::argument::ResolvedSettings;
use crate::pipeline::Step;
use anyhow::{Context, anyhow};
use serde::Serialize;
use serde_json::{Map, Value};

const DEFAULT_TAB_WIDTH: f64 = 4.0;
const MAX_TAB_WIDTH: f64 = 10.0;

/// Rewrite `package.json` for the chosen module style and backend stack.
pub fn rewrite_manifest(content: &str, settings: &ResolvedSettings) -> anyhow::Result<String> {
    let mut pkg: Value = serde_json::from_str(content).context("package.json is not valid JSON")?;
    let fields = pkg
        .as_object_mut()
        .ok_or_else(|| anyhow!("package.json must contain a JSON object"))?;

    let name = settings.get_str("project").unwrap_or_default();
    fields.insert("name".into(), Value::from(name));
    let module_type = if settings.get_str("module") == Some("esm") {
        "module"
    } else {
        "commonjs"
    };
    fields.insert("type".into(), Value::from(module_type));

    let mut dependencies = Map::new();
    dependencies.insert("express".into(), "^4.19.2".into());
    if settings.get_str("db") == Some("sqlite") {
        dependencies.insert("sqlite3".into(), "^5.1.7".into());
    }
    if settings.get_str("orm") == Some("sequelize") {
        dependencies.insert("sequelize".into(), "^6.37.3".into());
    }
    if settings.flag("user") {
        dependencies.insert("bcrypt".into(), "^5.1.1".into());
        dependencies.insert("jsonwebtoken".into(), "^9.0.2".into());
        dependencies.insert("uuid".into(), "^9.0.1".into());
    }
    fields.insert("dependencies".into(), Value::Object(dependencies));

    Ok(serde_json::to_string_pretty(&pkg)?)
}

/// Serialize the prettier settings, indented by their own `tabWidth`.
///
/// The indent is capped at ten spaces; a width below one gives compact output.
pub fn prettier_config(value: &Value) -> anyhow::Result<String> {
    let width = value
        .get("tabWidth")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_TAB_WIDTH)
        .min(MAX_TAB_WIDTH)
        .trunc();
    if width < 1.0 {
        return Ok(serde_json::to_string(value)?);
    }
    let indent = " ".repeat(width as usize);

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

fn backend_extension(settings: &ResolvedSettings) -> &'static str {
    if settings.get_str("module") == Some("esm") {
        ".mjs"
    } else {
        ".cjs"
    }
}

/// Ordered steps applied to a freshly copied template.
pub fn project_steps(settings: &ResolvedSettings) -> Vec<Step> {
    let manifest_settings = settings.clone();
    let extension = backend_extension(settings);
    let prettier = settings.get("prettier").cloned().unwrap_or(Value::Null);
    let prettier_enabled = settings.is_enabled("prettier");

    vec![
        Step::replace("package.json", move |content| {
            rewrite_manifest(content, &manifest_settings)
        }),
        Step::substitute("**/*.js", settings.clone()).excluding("frontend/**"),
        Step::rename("**/*.js", move |name| {
            Ok(match name.strip_suffix(".js") {
                Some(stem) => format!("{stem}{extension}"),
                None => name.to_string(),
            })
        })
        .excluding("frontend/**/*.js")
        .required(settings.flag("ext")),
        Step::remove("nodemon.json").required(!settings.flag("nodemon")),
        Step::remove(".prettierrc").required(!prettier_enabled),
        Step::replace(".prettierrc", move |_| prettier_config(&prettier)).required(prettier_enabled),
        // Formatting hook over the generated sources; currently leaves content as is
        Step::replace("**/*.{js,cjs,mjs,html,vue,json}", |content| Ok(content.to_string()))
            .required(prettier_enabled),
    ]
}
