// Handler modules
pub mod analyze;
pub mod generators;

// Re-export all handler functions
pub use analyze::{AnalyzeOptions, handle_analyze};
pub use generators::handle_generators;
