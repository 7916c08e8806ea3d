//! Source text management for the Gatling compiler.
//!
//! Tracks loaded macro source files and resolves byte-offset spans back to
//! 1-based line/column coordinates for diagnostics.

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
