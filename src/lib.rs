pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::http::{router, serve, AppState};
pub use adapters::memory_store::MemoryStore;
pub use config::LibraryConfig;
pub use core::service::LibraryService;
pub use utils::error::{LibraryError, Result};
