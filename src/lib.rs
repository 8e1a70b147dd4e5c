mod changelog;
pub mod cli;
pub mod config;
mod error;
pub mod forge;
pub mod orchestrator;
pub mod output;

pub use error::{ChangelogError, Result};
pub use orchestrator::{Orchestrator, RunOptions, RunReport};
