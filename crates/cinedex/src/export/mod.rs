//! Writing extraction results to disk.

pub mod writer;

pub use writer::{CopySummary, MetadataWriter, EXTRACTION_LAYOUT};
