use anyhow::Result;
use colored::Colorize;
use tracing_subscriber::{self, filter::EnvFilter};

use create_neko::{
    argument::{ArgumentResolver, Resolution, TerminalPrompter},
    config::ScaffoldConfig,
    scaffold,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for user facing output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = ScaffoldConfig::default();
    let tokens: Vec<String> = std::env::args().skip(1).collect();
    tracing::debug!(?config, ?tokens, "starting");

    let definitions = scaffold::definitions(&config)?;
    let resolver =
        ArgumentResolver::new(&definitions, config.cwd.clone()).with_version(&config.version);
    let mut prompter = TerminalPrompter::new();

    let resolved = match resolver.resolve(&tokens, &mut prompter).await? {
        Resolution::Version(version) => {
            println!("{version}");
            return Ok(());
        }
        Resolution::Help(text) => {
            print!("{text}");
            return Ok(());
        }
        Resolution::Canceled => {
            println!("{}", "User canceled the prompt.".yellow());
            return Ok(());
        }
        Resolution::Settings(resolved) => resolved,
    };

    for advisory in &resolved.advisories {
        println!("{}", advisory.message.yellow());
    }
    tracing::info!(settings = %serde_json::to_string(&resolved.settings)?, "resolved settings");

    let report = scaffold::generate(&config, &resolved.settings).await?;
    let done = format!("Project created in {}", report.root.display());
    if tokens.is_empty() {
        prompter.finish(&done)?;
    } else {
        println!("{}", done.green());
    }
    Ok(())
}
