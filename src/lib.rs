pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod table;
pub mod types;
pub mod write;

pub use config::Config;
pub use error::{Error, Result};
pub use fetch::Fetcher;
pub use pipeline::{run, RunSummary};
pub use types::{Category, Item, ItemId, Record, Scalar};
