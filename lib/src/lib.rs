pub mod config;
pub mod error;
pub mod import_export;
pub mod models;
pub mod store;
pub mod utils;

// Re-export error types for convenience
pub use error::WebmarksError;
pub use store::BookmarkStore;
