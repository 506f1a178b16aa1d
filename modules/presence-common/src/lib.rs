pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Result, ScrapeError, ScrapeErrorKind};
pub use types::*;
