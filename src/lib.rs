pub mod config;
pub mod error;
pub mod mkv;
pub mod pipeline;
pub mod select;
pub mod subtitle;
pub mod tool;

pub use config::Config;
pub use error::{DualsubError, Result};
pub use pipeline::{print_summary, BatchPipeline, BatchResult, BatchState, SelectionState};
