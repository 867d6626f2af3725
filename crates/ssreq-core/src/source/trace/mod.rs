//! JSON Lines trace files: one [`TraceStep`](super::TraceStep) object per
//! line, blank lines skipped.

pub mod error;
pub mod parser;
pub mod reader;

pub use parser::TraceFileSource;
