//! vault-export library
//!
//! Collects a note, the notes it links to and the media they embed from an
//! Obsidian-style vault, and packs them into a zip archive.
//!
//! # Modules
//!
//! - `core`: link extraction, note resolution, media collection, the
//!   breadth-first traversal and the archiver

pub mod core;

// Re-exports for convenience
pub use core::archive::{archive_and_remove, zip_dir, ArchiveStats};
pub use core::config::ExportConfig;
pub use core::error::{ConfigError, ExportError};
pub use core::media::collect_media;
pub use core::paths::ExportPaths;
pub use core::resolver::resolve_note;
pub use core::traversal::{ExportReport, Traversal};
pub use core::wikilink::{extract_links, extract_media_embeds, extract_note_links, ExtractedLinks};
