use std::path::PathBuf;

/// Environment variable overriding the template directory.
pub const TEMPLATE_DIR_ENV: &str = "CREATE_NEKO_TEMPLATE_DIR";

#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    /// Directory the project is generated in
    pub cwd: PathBuf,
    /// Static project template copied into `<cwd>/<project>`
    pub template_dir: PathBuf,
    /// JSON file holding the default prettier configuration
    pub prettier_defaults: PathBuf,
    /// Version printed for `--version`
    pub version: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let template_dir = std::env::var_os(TEMPLATE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_template_dir);
        Self::with_template_dir(cwd, template_dir)
    }
}

impl ScaffoldConfig {
    /// Build a config whose prettier defaults live next to the template directory.
    pub fn with_template_dir(cwd: PathBuf, template_dir: PathBuf) -> Self {
        let prettier_defaults = template_dir
            .parent()
            .map(|p| p.join(".prettierrc"))
            .unwrap_or_else(|| PathBuf::from(".prettierrc"));
        Self {
            cwd,
            template_dir,
            prettier_defaults,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

fn default_template_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("template")))
        .unwrap_or_else(|| PathBuf::from("template"))
}
