// ============================================================================
// src/keylog/mod.rs – key log subsystem root
// ============================================================================
pub mod entry; // line formats
pub mod recorder; // consent-gated writer
pub mod store; // file access

pub use entry::LogSummary;
pub use recorder::{KeyLogger, Recorded};
pub use store::LogStore;
