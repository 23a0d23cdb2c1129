//! # Neko Project Scaffold
//!
//! The concrete argument definitions and step list used by the `create-neko` binary.

pub mod steps;
pub mod template;

pub use steps::{prettier_config, project_steps, rewrite_manifest};
pub use template::copy_template;

use crate::argument::{
    ArgumentDefinition, ArgumentSet, Coercer, DefaultProvider, ResolvedSettings, Variant,
    load_structured_file,
};
use crate::config::ScaffoldConfig;
use crate::errors::{ArgumentError, PipelineError, ResolveError};
use crate::pipeline::{PipelineReport, TransformationPipeline};
use regex::Regex;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::LazyLock;

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\- ]+$").expect("valid project name regex"));

/// Accepts a project name made of safe characters whose directory does not exist yet.
pub fn project_name_coercer(cwd: PathBuf) -> Coercer {
    Coercer::new(move |name: String| {
        let target = cwd.join(&name);
        async move {
            if !PROJECT_NAME.is_match(&name) {
                return Err(ArgumentError::validation(
                    "VALIDATE: The name must consist of alphabets, numbers, underscores (_), hyphens (-), or spaces (' ')",
                ));
            }
            let exists = tokio::fs::try_exists(&target).await.unwrap_or(true);
            if exists {
                return Err(ArgumentError::validation(format!(
                    "VALIDATE: The directory \"{name}\" already exists."
                )));
            }
            Ok(Value::String(name))
        }
    })
}

pub fn definitions(config: &ScaffoldConfig) -> Result<ArgumentSet, ResolveError> {
    let prettier_defaults = config.prettier_defaults.clone();

    ArgumentSet::new(vec![
        ArgumentDefinition::text("project")
            .display("Project name")
            .description("The name of the project.")
            .default_value("my neko project")
            .positional(0)
            .coerce(project_name_coercer(config.cwd.clone())),
        ArgumentDefinition::boolean("nodemon")
            .display("Enable Nodemon")
            .description(
                "If enabled, a file named nodemon.json containing basic settings will be created in your project directory.",
            )
            .default_value(true),
        ArgumentDefinition::file("prettier")
            .display("Enable Prettier")
            .description(
                "If enabled, a file named .prettierrc will be created in your project directory. If you want to customize the content, use this CLI with an argument to specify the path of the file containing the Prettier configuration.",
            )
            .default_with(DefaultProvider::new(move || {
                let path = prettier_defaults.clone();
                async move { load_structured_file(&path).await }
            })),
        ArgumentDefinition::choice(
            "module",
            vec![Variant::new("esm", "ESM"), Variant::new("cjs", "CommonJS")],
        )
        .display("JavaScript module style")
        .description(
            "Specifying your preference for using either CommonJS or ECMAScript Modules (ESM) for JavaScript modules.",
        )
        .default_value("esm"),
        ArgumentDefinition::boolean("ext")
            .display("Backend JavaScript file extension")
            .description(
                "Specifying whether you would like to use the file extensions .mjs/.cjs instead of simply using .js for your backend JavaScript files.",
            )
            .default_value(true),
        ArgumentDefinition::choice("server", vec![Variant::new("express", "Express")])
            .display("Server engine")
            .description(
                "Specifying the Node.js backend HTTP engine. Currently only Express is supported.",
            )
            .default_value("express"),
        ArgumentDefinition::choice(
            "db",
            vec![Variant::new("sqlite", "Sqlite3"), Variant::new("file", "File system")],
        )
        .display("Database engine")
        .description("Specifying the backend database engine.")
        .default_value("sqlite"),
        ArgumentDefinition::choice(
            "orm",
            vec![Variant::new("sequelize", "Sequelize"), Variant::new("vanilla", "Vanilla")],
        )
        .display("ORM framework")
        .description("Specifying the ORM framework.")
        .default_value("sequelize"),
        ArgumentDefinition::choice(
            "communicate",
            vec![Variant::new("rpc", "RPC"), Variant::new("restful", "RESTful")],
        )
        .display("Communication style")
        .description("Specifying the communication style between the server and clients.")
        .default_value("rpc"),
        ArgumentDefinition::boolean("user")
            .display("Enable the APIs of users")
            .description(
                "If enabled, a series of APIs will be created, including user registration, modification, login, and logout.",
            )
            .default_value(true),
    ])
}

/// Copy the template into `<cwd>/<project>` and run the project steps over it.
pub async fn generate(
    config: &ScaffoldConfig,
    settings: &ResolvedSettings,
) -> Result<PipelineReport, PipelineError> {
    let project = settings.get_str("project").unwrap_or_default();

    if !project.is_empty() {
        let target = config.cwd.join(project);
        match copy_template(&config.template_dir, &target).await {
            Ok(copied) => tracing::info!(copied, target = %target.display(), "template copied"),
            Err(err) => tracing::error!("Failed to copy the template: {err}"),
        }
    }

    TransformationPipeline::new(&config.cwd)
        .run(project, &project_steps(settings))
        .await
}
