use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::paths::{extension, strip_extension};

lazy_static! {
    // [[target]] or [[target|display]]; also sees the inner part of ![[...]]
    static ref NOTE_LINK_RE: Regex = Regex::new(r"\[\[(.*?)\]\]").unwrap();
    // ![[target]] or ![[target|400]]
    static ref MEDIA_EMBED_RE: Regex = Regex::new(r"!\[\[(.*?)(\|[0-9]*)?\]\]").unwrap();
}

const IMAGE_EXTENSIONS: [&str; 7] = [".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tiff", ".svg"];

/// Links found in one note, in discovery order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedLinks {
    pub notes: Vec<String>,
    pub media: Vec<String>,
}

impl ExtractedLinks {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.media.is_empty()
    }
}

/// Run both extraction passes over every line of `content`.
pub fn extract_links(content: &str) -> ExtractedLinks {
    let mut links = ExtractedLinks::default();
    for line in content.lines() {
        links.notes.extend(extract_note_links(line));
        links.media.extend(extract_media_embeds(line));
    }
    links
}

/// Note names referenced by `[[...]]` on a single line.
///
/// Display text after `|` is dropped. Targets with an image extension are
/// not notes and are skipped.
pub fn extract_note_links(line: &str) -> Vec<String> {
    NOTE_LINK_RE
        .captures_iter(line)
        .filter_map(|c| {
            let inner = c.get(1)?.as_str();
            let target = inner.split('|').next().unwrap_or(inner);
            if target.is_empty() || is_image_file(target) {
                return None;
            }
            Some(target.to_string())
        })
        .collect()
}

/// Media base-names embedded with `![[...]]` on a single line.
pub fn extract_media_embeds(line: &str) -> Vec<String> {
    MEDIA_EMBED_RE
        .captures_iter(line)
        .filter_map(|c| {
            let base = strip_extension(c.get(1)?.as_str());
            if base.is_empty() {
                None
            } else {
                Some(base.to_string())
            }
        })
        .collect()
}

pub fn is_image_file(name: &str) -> bool {
    let ext = extension(name).to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}
