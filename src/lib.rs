pub mod clean;
pub mod error;
pub mod export;
pub mod load;
pub mod pipeline;
pub mod summary;
pub mod table;

pub use error::EtlError;
pub use pipeline::{Pipeline, PipelineOutcome};
