/// Scoring Mock Server Library
///
/// This crate provides both a standalone binary and library components
/// for mocking the RWA scoring backend in tokenization tests.

pub mod handlers;
pub mod scoring;
pub mod server;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use server::{create_router, run_server};
pub use store::AssetStore;
pub use types::*;
