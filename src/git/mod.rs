pub mod operations;
pub mod transport;

// Public API - curated exports only
pub mod api;

// Re-export commonly used items
pub use api::*;
