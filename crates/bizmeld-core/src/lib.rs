pub mod coerce;
pub mod error;
pub mod frame;
pub mod merge;
pub mod normalize;
pub mod pipeline;

pub use error::{PipelineError, Result};
pub use merge::{merge_sources, CompositeDataset};
pub use pipeline::{run_pipeline, PipelineOutput, RawSources, SourcePaths};
