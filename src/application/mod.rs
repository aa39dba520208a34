pub mod service;

pub use service::{ExtractionService, RunSummary};
