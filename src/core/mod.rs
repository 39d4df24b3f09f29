pub mod archive;
pub mod config;
pub mod error;
pub mod media;
pub mod paths;
pub mod resolver;
pub mod traversal;
pub mod wikilink;
