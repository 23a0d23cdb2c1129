pub mod argument;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod scaffold;

// Re-export commonly used types
pub use argument::{
    Advisory, ArgType, ArgumentDefinition, ArgumentResolver, ArgumentSet, Resolution, Resolved,
    ResolvedSettings, Variant,
};
pub use errors::{ArgumentError, PipelineError, ResolveError};
pub use pipeline::{FileSetResolver, Step, StepAction, TransformationPipeline};
