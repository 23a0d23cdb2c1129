pub mod definition;
pub mod help;
pub mod invocation;
pub mod loader;
pub mod prompt;
pub mod resolver;
pub mod settings;

// Re-export commonly used types
pub use definition::{
    ArgType, ArgumentDefinition, ArgumentSet, Coercer, DefaultProvider, DefaultValue, Variant,
};
pub use invocation::Invocation;
pub use loader::{load_structured_file, structured_file_loader};
pub use prompt::{Choice, Prompter, SelectPrompt, TerminalPrompter, TextPrompt};
pub use resolver::{Advisory, ArgumentResolver, Resolution, Resolved};
pub use settings::ResolvedSettings;
