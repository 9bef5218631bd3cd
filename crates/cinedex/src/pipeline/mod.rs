pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;

pub use config::PipelineConfig;
pub use context::ExtractionContext;
pub use error::{PipelineError, PipelineWarning};
pub use progress::{ConsoleProgress, NoopProgress, ProgressEvent, ProgressReporter, RecordingProgress};
pub use runner::{ExtractionPipeline, SourceOutcome};
