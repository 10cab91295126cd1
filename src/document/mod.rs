//! Configuration document model
//!
//! - **entry**: the section/key/value triple
//! - **parser**: INI text to an ordered list of entries
//! - **serializer**: entries back to canonical INI text

pub mod entry;
pub mod parser;
pub mod serializer;

// Re-export commonly used items
pub use entry::Entry;
pub use parser::parse;
pub use serializer::serialize;
