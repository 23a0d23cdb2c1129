pub mod file_set;
pub mod path_validation;
pub mod runner;
pub mod step;
pub mod substitute;

// Re-export commonly used types
pub use file_set::FileSetResolver;
pub use runner::{PipelineReport, StepReport, TransformationPipeline};
pub use step::{ContentTransform, NameTransform, Step, StepAction, TransformFuture};
pub use substitute::substitute_settings;
