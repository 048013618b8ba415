pub mod config;
pub mod errors;
pub mod graph;
pub mod host;
pub mod replay;
pub mod resolution;
pub mod search;
pub mod types;

pub use errors::{RefGraphError, Result};
pub use search::ReferenceSearcher;
