//! Tests for ArgumentResolver in both input modes.

mod common;

use common::{Answer, ScriptedPrompter, create_test_file, tokens};
use create_neko::argument::{
    ArgumentDefinition, ArgumentResolver, ArgumentSet, Coercer, DefaultProvider, Resolution,
    Resolved, Variant,
};
use create_neko::errors::{ArgumentError, ResolveError};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

fn cwd() -> PathBuf {
    std::env::temp_dir()
}

async fn resolve_flags(defs: &ArgumentSet, args: &[&str]) -> Resolved {
    let mut prompter = ScriptedPrompter::default();
    let resolution = ArgumentResolver::new(defs, cwd())
        .resolve(&tokens(args), &mut prompter)
        .await
        .unwrap();
    assert_eq!(prompter.prompts_shown(), 0, "flag mode must never prompt");
    match resolution {
        Resolution::Settings(resolved) => resolved,
        other => panic!("expected settings, got {other:?}"),
    }
}

fn mode_definitions() -> ArgumentSet {
    ArgumentSet::new(vec![
        ArgumentDefinition::choice("mode", vec![Variant::new("a", "A"), Variant::new("b", "B")])
            .default_value("a"),
    ])
    .unwrap()
}

#[tokio::test]
async fn test_boolean_flag_no_resolves_false() {
    let defs =
        ArgumentSet::new(vec![ArgumentDefinition::boolean("flag").default_value(true)]).unwrap();
    let resolved = resolve_flags(&defs, &["--flag=no"]).await;
    assert_eq!(resolved.settings.get("flag"), Some(&Value::Bool(false)));
    assert!(resolved.advisories.is_empty());
}

#[tokio::test]
async fn test_boolean_tokens_any_case() {
    let defs =
        ArgumentSet::new(vec![ArgumentDefinition::boolean("flag").default_value(false)]).unwrap();
    for token in ["true", "TRUE", "Yes", "1"] {
        let arg = format!("--flag={token}");
        let resolved = resolve_flags(&defs, &[&arg]).await;
        assert_eq!(resolved.settings.get("flag"), Some(&json!(true)), "{token}");
    }
    for token in ["false", "False", "NO", "0"] {
        let arg = format!("--flag={token}");
        let resolved = resolve_flags(&defs, &[&arg]).await;
        assert_eq!(resolved.settings.get("flag"), Some(&json!(false)), "{token}");
    }
}

#[tokio::test]
async fn test_invalid_boolean_resolves_false_not_default() {
    let defs =
        ArgumentSet::new(vec![ArgumentDefinition::boolean("flag").default_value(true)]).unwrap();
    let resolved = resolve_flags(&defs, &["--flag=maybe"]).await;

    assert_eq!(resolved.settings.get("flag"), Some(&json!(false)));
    assert_eq!(resolved.advisories.len(), 1);
    assert_eq!(
        resolved.advisories[0].message,
        "An error occurred due to expecting a boolean value of \"flag\". The default value (true) is used instead."
    );
}

#[tokio::test]
async fn test_enum_is_normalized_to_canonical_name() {
    let resolved = resolve_flags(&mode_definitions(), &["--mode=B"]).await;
    assert_eq!(resolved.settings.get_str("mode"), Some("b"));
}

#[tokio::test]
async fn test_unknown_enum_value_falls_back_to_default() {
    let resolved = resolve_flags(&mode_definitions(), &["--mode", "c"]).await;
    assert_eq!(resolved.settings.get_str("mode"), Some("a"));
    assert_eq!(
        resolved.advisories[0].message,
        "An error occurred due to an invalid value for \"mode\", which must be within [\"a\",\"b\"]. The default value (a) is used instead."
    );
}

#[tokio::test]
async fn test_positional_fallback() {
    let defs = ArgumentSet::new(vec![
        ArgumentDefinition::text("name").positional(0).default_value("x"),
    ])
    .unwrap();
    let resolved = resolve_flags(&defs, &["myname"]).await;
    assert_eq!(resolved.settings.get_str("name"), Some("myname"));
}

#[tokio::test]
async fn test_missing_values_use_defaults_with_advisory() {
    let defs = ArgumentSet::new(vec![
        ArgumentDefinition::text("name").default_value("x"),
        ArgumentDefinition::text("title").positional(3).default_value("t"),
        ArgumentDefinition::boolean("flag").default_value(true),
    ])
    .unwrap();
    let resolved = resolve_flags(&defs, &["first"]).await;

    assert_eq!(resolved.settings.len(), 3);
    assert_eq!(resolved.settings.get_str("name"), Some("x"));
    assert_eq!(resolved.settings.get_str("title"), Some("t"));
    assert!(resolved.settings.flag("flag"));
    assert_eq!(resolved.advisories.len(), 3);
    assert_eq!(
        resolved.advisories[0].message,
        "The value of \"name\" is not specified. The default value (x) is used."
    );
}

#[tokio::test]
async fn test_rejected_text_reverts_to_default() {
    let defs = ArgumentSet::new(vec![
        ArgumentDefinition::text("name")
            .default_value("fallback")
            .coerce(Coercer::from_fn(|raw| {
                if raw.chars().all(char::is_alphanumeric) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(ArgumentError::validation("only letters and digits"))
                }
            })),
    ])
    .unwrap();

    let resolved = resolve_flags(&defs, &["--name=bad!name"]).await;
    assert_eq!(resolved.settings.get_str("name"), Some("fallback"));
    assert_eq!(
        resolved.advisories[0].message,
        "An error occurred while retrieving the value of \"name\". The default value (fallback) is used instead. only letters and digits"
    );
}

#[tokio::test]
async fn test_file_reference_is_loaded_relative_to_cwd() {
    let temp_dir = TempDir::new().unwrap();
    create_test_file(temp_dir.path(), "conf/rc.json", r#"{"semi": false}"#);
    let defs = ArgumentSet::new(vec![
        ArgumentDefinition::file("prettier").default_value(json!({ "semi": true })),
    ])
    .unwrap();

    let mut prompter = ScriptedPrompter::default();
    let resolution = ArgumentResolver::new(&defs, temp_dir.path().to_path_buf())
        .resolve(&tokens(&["--prettier", "conf/rc.json"]), &mut prompter)
        .await
        .unwrap();

    let settings = resolution.settings().unwrap();
    assert_eq!(settings.get("prettier"), Some(&json!({ "semi": false })));
}

#[tokio::test]
async fn test_malformed_file_reference_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    create_test_file(temp_dir.path(), "broken.json", "{ semi: ");
    let defs = ArgumentSet::new(vec![
        ArgumentDefinition::file("prettier").default_value(json!({ "semi": true })),
    ])
    .unwrap();

    let mut prompter = ScriptedPrompter::default();
    let resolution = ArgumentResolver::new(&defs, temp_dir.path().to_path_buf())
        .resolve(&tokens(&["--prettier=broken.json"]), &mut prompter)
        .await
        .unwrap();

    let Resolution::Settings(resolved) = resolution else {
        panic!("expected settings");
    };
    assert_eq!(resolved.settings.get("prettier"), Some(&json!({ "semi": true })));
    // Structured defaults are not echoed in the advisory
    assert!(
        resolved.advisories[0]
            .message
            .starts_with("An error occurred while retrieving the value of \"prettier\". The default value is used instead. Failed to parse")
    );
}

#[tokio::test]
async fn test_default_provider_runs_once_per_pass() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let defs = ArgumentSet::new(vec![ArgumentDefinition::text("name").default_with(
        DefaultProvider::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(json!("computed")) }
        }),
    )])
    .unwrap();

    let resolved = resolve_flags(&defs, &["ignored"]).await;
    assert_eq!(resolved.settings.get_str("name"), Some("computed"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failing_default_provider_is_fatal() {
    let defs = ArgumentSet::new(vec![ArgumentDefinition::text("name").default_with(
        DefaultProvider::new(|| async { Err(ArgumentError::validation("no default today")) }),
    )])
    .unwrap();

    let mut prompter = ScriptedPrompter::default();
    let result = ArgumentResolver::new(&defs, cwd())
        .resolve(&tokens(&["x"]), &mut prompter)
        .await;
    assert!(matches!(result, Err(ResolveError::Default { ref key, .. }) if key == "name"));
}

#[tokio::test]
async fn test_version_and_help_short_circuit() {
    let defs = mode_definitions();
    let mut prompter = ScriptedPrompter::default();
    let resolver = ArgumentResolver::new(&defs, cwd()).with_version("9.9.9");

    let version = resolver.resolve(&tokens(&["-v"]), &mut prompter).await.unwrap();
    assert!(matches!(version, Resolution::Version(ref v) if v == "9.9.9"));

    let help = resolver
        .resolve(&tokens(&["--mode=b", "--help"]), &mut prompter)
        .await
        .unwrap();
    let Resolution::Help(text) = help else {
        panic!("expected help");
    };
    assert!(text.starts_with("Usage:\n"));
    assert!(text.contains("argument: mode\ntype: enum\navailable values: a, b\ndefault value: a\n"));
}

#[tokio::test]
async fn test_unknown_flag_is_rejected() {
    let defs = mode_definitions();
    let mut prompter = ScriptedPrompter::default();
    let result = ArgumentResolver::new(&defs, cwd())
        .resolve(&tokens(&["--colour=red"]), &mut prompter)
        .await;
    assert!(matches!(result, Err(ResolveError::Invocation(_))));
}

#[tokio::test]
async fn test_reserved_flags_win_over_invalid_tokens() {
    let defs = mode_definitions();
    let mut prompter = ScriptedPrompter::default();
    let resolver = ArgumentResolver::new(&defs, cwd()).with_version("1.2.3");

    let version = resolver
        .resolve(&tokens(&["--version", "--bogus"]), &mut prompter)
        .await
        .unwrap();
    assert!(matches!(version, Resolution::Version(ref v) if v == "1.2.3"));

    let help = resolver
        .resolve(&tokens(&["--help", "--x=1"]), &mut prompter)
        .await
        .unwrap();
    assert!(matches!(help, Resolution::Help(_)));
}

#[tokio::test]
async fn test_bare_enum_flag_falls_back_with_advisory() {
    let resolved = resolve_flags(&mode_definitions(), &["--mode"]).await;
    assert_eq!(resolved.settings.get_str("mode"), Some("a"));
    assert_eq!(resolved.advisories.len(), 1);
}

fn interactive_definitions() -> ArgumentSet {
    ArgumentSet::new(vec![
        ArgumentDefinition::text("name")
            .display("Project name")
            .default_value("demo")
            .coerce(Coercer::from_fn(|raw| {
                if raw.is_empty() {
                    Err(ArgumentError::validation("name is required"))
                } else {
                    Ok(Value::String(raw.to_string()))
                }
            })),
        ArgumentDefinition::boolean("nodemon").default_value(false),
        ArgumentDefinition::file("prettier").default_value(json!({ "tabWidth": 2 })),
        ArgumentDefinition::choice(
            "module",
            vec![Variant::new("esm", "ESM"), Variant::new("cjs", "CommonJS")],
        )
        .default_value("cjs"),
    ])
    .unwrap()
}

#[tokio::test]
async fn test_interactive_resolves_every_key() {
    let defs = interactive_definitions();
    let mut prompter = ScriptedPrompter::new([
        Answer::Type("neko"),
        Answer::Pick(0),
        Answer::Pick(0),
        Answer::Pick(0),
    ]);

    let resolution = ArgumentResolver::new(&defs, cwd())
        .resolve(&[], &mut prompter)
        .await
        .unwrap();
    let settings = resolution.settings().unwrap();

    assert_eq!(settings.get_str("name"), Some("neko"));
    assert!(settings.flag("nodemon"));
    assert_eq!(settings.get("prettier"), Some(&json!({ "tabWidth": 2 })));
    assert_eq!(settings.get_str("module"), Some("esm"));

    // Default markers follow the computed defaults
    let nodemon = &prompter.selects[0];
    assert_eq!(nodemon.choices[0].label, "True");
    assert!(!nodemon.choices[0].is_default);
    assert!(nodemon.choices[1].is_default);
    let module = &prompter.selects[2];
    assert_eq!(module.choices[1].label, "CommonJS");
    assert!(module.choices[1].is_default);
}

#[tokio::test]
async fn test_interactive_file_reference_can_be_disabled() {
    let defs = interactive_definitions();
    let mut prompter = ScriptedPrompter::new([
        Answer::Type("neko"),
        Answer::Pick(1),
        Answer::Pick(1),
        Answer::Pick(1),
    ]);

    let resolution = ArgumentResolver::new(&defs, cwd())
        .resolve(&[], &mut prompter)
        .await
        .unwrap();
    let settings = resolution.settings().unwrap();

    assert_eq!(settings.get("prettier"), Some(&Value::Null));
    assert!(!settings.is_enabled("prettier"));
    assert_eq!(prompter.selects[1].choices[0].label, "Use default");
    assert_eq!(prompter.selects[1].choices[1].label, "Disable");
}

#[tokio::test]
async fn test_interactive_text_is_asked_again_until_valid() {
    let defs = interactive_definitions();
    let mut prompter = ScriptedPrompter::new([
        Answer::Type(""),
        Answer::Type("neko"),
        Answer::Pick(1),
        Answer::Pick(0),
        Answer::Pick(1),
    ]);

    let resolution = ArgumentResolver::new(&defs, cwd())
        .resolve(&[], &mut prompter)
        .await
        .unwrap();

    assert_eq!(resolution.settings().unwrap().get_str("name"), Some("neko"));
    assert_eq!(prompter.texts.len(), 2);
    assert_eq!(prompter.texts[0].placeholder.as_deref(), Some("demo"));
    assert_eq!(prompter.texts[1].error.as_deref(), Some("name is required"));
    assert_eq!(prompter.texts[1].initial.as_deref(), Some(""));
}

#[tokio::test]
async fn test_interactive_cancel_returns_no_settings() {
    let defs = interactive_definitions();
    let mut prompter = ScriptedPrompter::new([Answer::Type("neko"), Answer::Pick(0), Answer::Cancel]);

    let resolution = ArgumentResolver::new(&defs, cwd())
        .resolve(&[], &mut prompter)
        .await
        .unwrap();

    assert!(matches!(resolution, Resolution::Canceled));
    assert!(resolution.settings().is_none());
    // Nothing after the canceled prompt is asked
    assert_eq!(prompter.prompts_shown(), 3);
}
