//! Breadth-first walk over the note link graph.
//!
//! Starting from one note, every reachable note within the nesting limit is
//! resolved on disk, copied into the staging tree together with the media it
//! embeds, and its own links are queued one level deeper. Failures on one
//! note are logged and recorded in the report; they never stop the walk.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::config::ExportConfig;
use super::error::{ExportError, Result};
use super::media::collect_media;
use super::paths::ExportPaths;
use super::resolver::resolve_note;
use super::wikilink::{extract_links, ExtractedLinks};

/// A note waiting in the queue, with the level it was discovered at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedNote {
    pub name: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedNote {
    pub name: String,
    pub depth: usize,
    pub source: String,
    pub media_copied: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteFailure {
    pub note: String,
    pub operation: &'static str,
    pub message: String,
}

/// What a traversal did. Purely informational: the export tree on disk is
/// the actual result.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub start: String,
    pub max_depth: usize,
    pub started_at: DateTime<Local>,
    pub exported: Vec<ExportedNote>,
    pub missing: Vec<String>,
    pub failures: Vec<NoteFailure>,
    pub media_copied: usize,
    /// Queue entries dropped for exceeding the nesting limit.
    pub pruned: usize,
    pub blacklisted: usize,
    /// Queue entries dropped because the note was already visited.
    pub revisits: usize,
}

impl ExportReport {
    fn new(start: &str, max_depth: usize) -> Self {
        Self {
            start: start.to_string(),
            max_depth,
            started_at: Local::now(),
            exported: Vec::new(),
            missing: Vec::new(),
            failures: Vec::new(),
            media_copied: 0,
            pruned: 0,
            blacklisted: 0,
            revisits: 0,
        }
    }

    fn fail(&mut self, note: &str, operation: &'static str, err: &ExportError) {
        warn!("Failed to {} for '{}': {}", operation, note, err);
        self.failures.push(NoteFailure {
            note: note.to_string(),
            operation,
            message: err.to_string(),
        });
    }

    pub fn exported_names(&self) -> Vec<&str> {
        self.exported.iter().map(|n| n.name.as_str()).collect()
    }
}

pub struct Traversal {
    start: String,
    blacklist: HashSet<String>,
    source_dirs: Vec<PathBuf>,
    media_root: PathBuf,
    max_depth: usize,
    paths: ExportPaths,
}

impl Traversal {
    pub fn new(
        start: impl Into<String>,
        source_dirs: Vec<PathBuf>,
        media_root: PathBuf,
        max_depth: usize,
        paths: ExportPaths,
    ) -> Self {
        Self {
            start: start.into(),
            blacklist: HashSet::new(),
            source_dirs,
            media_root,
            max_depth,
            paths,
        }
    }

    pub fn with_blacklist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(
            config.parse_file_path.clone(),
            config.files_paths.clone(),
            config.media_path.clone(),
            config.level_nesting,
            config.export_paths(),
        )
        .with_blacklist(config.black_list.iter().cloned())
    }

    pub fn paths(&self) -> &ExportPaths {
        &self.paths
    }

    /// Walk the graph until the queue is empty.
    ///
    /// Because the queue is FIFO and children are always one level deeper
    /// than their parent, dequeued depths never decrease. A note is
    /// therefore first visited at the shallowest depth it is reachable at,
    /// and a note pruned for depth can never come back shallower.
    pub fn run(&self) -> ExportReport {
        let mut report = ExportReport::new(&self.start, self.max_depth);
        let mut queue = VecDeque::from([QueuedNote {
            name: self.start.clone(),
            depth: 1,
        }]);
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(current) = queue.pop_front() {
            if current.depth > self.max_depth {
                debug!("Skipping '{}' at depth {}", current.name, current.depth);
                report.pruned += 1;
                continue;
            }
            if self.blacklist.contains(&current.name) {
                debug!("Skipping blacklisted '{}'", current.name);
                report.blacklisted += 1;
                continue;
            }
            if !visited.insert(current.name.clone()) {
                report.revisits += 1;
                continue;
            }

            let children = self.visit(&current, &mut report);
            queue.extend(children.into_iter().map(|name| QueuedNote {
                name,
                depth: current.depth + 1,
            }));
        }

        info!(
            exported = report.exported.len(),
            missing = report.missing.len(),
            media = report.media_copied,
            "Traversal finished"
        );
        report
    }

    /// Export one note and return the names it links to.
    fn visit(&self, note: &QueuedNote, report: &mut ExportReport) -> Vec<String> {
        let Some(source) = resolve_note(&self.source_dirs, &note.name) else {
            warn!("Note '{}' not found", note.name);
            report.missing.push(note.name.clone());
            return Vec::new();
        };

        let links = match read_links(&source) {
            Ok(links) => links,
            Err(e) => {
                report.fail(&note.name, "read note", &e);
                ExtractedLinks::default()
            }
        };

        let media_names: HashSet<String> = links.media.iter().cloned().collect();
        let media_copied = match collect_media(&self.media_root, &self.paths.media, &media_names) {
            Ok(count) => count,
            Err(e) => {
                report.fail(&note.name, "copy media", &e);
                0
            }
        };
        report.media_copied += media_copied;

        match self.copy_note(&note.name, &source) {
            Ok(()) => {
                info!(depth = note.depth, "Exported '{}'", note.name);
                report.exported.push(ExportedNote {
                    name: note.name.clone(),
                    depth: note.depth,
                    source: source.display().to_string(),
                    media_copied,
                });
            }
            Err(e) => report.fail(&note.name, "copy note", &e),
        }

        links.notes
    }

    fn copy_note(&self, name: &str, source: &Path) -> Result<()> {
        let dest = self.paths.note_destination(name);
        fs::copy(source, &dest).map_err(|e| ExportError::io(source, e))?;
        Ok(())
    }
}

/// Read a note and extract its links. Invalid UTF-8 is replaced rather
/// than rejected.
pub fn read_links(path: &Path) -> Result<ExtractedLinks> {
    let bytes = fs::read(path).map_err(|e| ExportError::io(path, e))?;
    Ok(extract_links(&String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Vault {
        dir: TempDir,
    }

    impl Vault {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("Notes")).unwrap();
            fs::create_dir_all(dir.path().join("Attachments")).unwrap();
            Self { dir }
        }

        fn note(&self, name: &str, content: &str) -> &Self {
            let path = self.dir.path().join("Notes").join(format!("{}.md", name));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
            self
        }

        fn media(&self, file: &str) -> &Self {
            fs::write(self.dir.path().join("Attachments").join(file), file).unwrap();
            self
        }

        fn traversal(&self, start: &str, max_depth: usize) -> Traversal {
            let paths = ExportPaths::new(&self.dir.path().join("export"), "notes", "media");
            paths.prepare().unwrap();
            Traversal::new(
                start,
                vec![self.dir.path().join("Notes")],
                self.dir.path().join("Attachments"),
                max_depth,
                paths,
            )
        }

        fn exported(&self) -> Vec<String> {
            let mut names: Vec<String> = fs::read_dir(self.dir.path().join("export/notes"))
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            names
        }
    }

    #[test]
    fn test_exports_linked_notes_and_media() {
        let vault = Vault::new();
        vault
            .note("Start", "Links to [[Child]] and ![[diagram.png|300]]")
            .note("Child", "Leaf note")
            .media("diagram.png")
            .media("unused.png");

        let report = vault.traversal("Start", 3).run();

        assert_eq!(vault.exported(), vec!["Child.md", "Start.md"]);
        assert!(vault.dir.path().join("export/media/diagram.png").exists());
        assert!(!vault.dir.path().join("export/media/unused.png").exists());
        assert_eq!(report.exported_names(), vec!["Start", "Child"]);
        assert_eq!(report.media_copied, 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_cycle_terminates_and_visits_once() {
        let vault = Vault::new();
        vault
            .note("A", "[[B]] [[A]]")
            .note("B", "[[A]] [[B]]");

        let report = vault.traversal("A", 10).run();

        assert_eq!(report.exported_names(), vec!["A", "B"]);
        assert_eq!(vault.exported(), vec!["A.md", "B.md"]);
        assert!(report.revisits >= 2);
    }

    #[test]
    fn test_note_linked_many_times_is_exported_once() {
        let vault = Vault::new();
        vault
            .note("Hub", "[[X]] [[Y]] [[Shared]]")
            .note("X", "[[Shared]]")
            .note("Y", "[[Shared|again]]")
            .note("Shared", "");

        let report = vault.traversal("Hub", 5).run();
        let shared = report.exported.iter().filter(|n| n.name == "Shared").count();
        assert_eq!(shared, 1);
        assert_eq!(vault.exported().len(), 4);
    }

    #[test]
    fn test_depth_limit_prunes_without_expanding() {
        let vault = Vault::new();
        vault
            .note("L1", "[[L2]]")
            .note("L2", "[[L3]] ![[deep.png]]")
            .note("L3", "[[L4]] ![[deeper.png]]")
            .note("L4", "")
            .media("deep.png")
            .media("deeper.png");

        let report = vault.traversal("L1", 2).run();

        assert_eq!(vault.exported(), vec!["L1.md", "L2.md"]);
        assert!(vault.dir.path().join("export/media/deep.png").exists());
        assert!(!vault.dir.path().join("export/media/deeper.png").exists());
        assert_eq!(report.pruned, 1);
    }

    #[test]
    fn test_depth_one_exports_only_start() {
        let vault = Vault::new();
        vault.note("Solo", "[[Other]]").note("Other", "");

        let report = vault.traversal("Solo", 1).run();
        assert_eq!(report.exported_names(), vec!["Solo"]);
    }

    #[test]
    fn test_first_visit_is_at_shallowest_depth() {
        let vault = Vault::new();
        // Target is two hops away via Long and one hop away directly.
        vault
            .note("Root", "[[Long]] [[Target]]")
            .note("Long", "[[Target]]")
            .note("Target", "[[Beyond]]")
            .note("Beyond", "");

        let report = vault.traversal("Root", 3).run();
        let target = report.exported.iter().find(|n| n.name == "Target").unwrap();
        assert_eq!(target.depth, 2);
        assert!(report.exported_names().contains(&"Beyond"));
    }

    #[test]
    fn test_blacklisted_note_never_processed() {
        let vault = Vault::new();
        vault
            .note("Start", "[[Daily]] [[Kept]]")
            .note("Kept", "[[Daily]]")
            .note("Daily", "[[Hidden]]")
            .note("Hidden", "");

        let report = vault
            .traversal("Start", 5)
            .with_blacklist(["Daily"])
            .run();

        assert_eq!(vault.exported(), vec!["Kept.md", "Start.md"]);
        assert_eq!(report.blacklisted, 2);
    }

    #[test]
    fn test_blacklisted_start_exports_nothing() {
        let vault = Vault::new();
        vault.note("Start", "[[Other]]");

        let report = vault.traversal("Start", 3).with_blacklist(["Start"]).run();
        assert!(report.exported.is_empty());
        assert!(vault.exported().is_empty());
    }

    #[test]
    fn test_missing_note_is_recorded_and_skipped() {
        let vault = Vault::new();
        vault.note("Start", "[[Ghost]] [[Real]]").note("Real", "");

        let report = vault.traversal("Start", 3).run();

        assert_eq!(report.missing, vec!["Ghost"]);
        assert_eq!(vault.exported(), vec!["Real.md", "Start.md"]);
    }

    #[test]
    fn test_media_set_is_per_note() {
        let vault = Vault::new();
        vault
            .note("Start", "![[one.png]] [[Next]]")
            .note("Next", "![[two.png]]")
            .media("one.png")
            .media("two.png");

        let report = vault.traversal("Start", 2).run();
        let per_note: Vec<usize> = report.exported.iter().map(|n| n.media_copied).collect();
        assert_eq!(per_note, vec![1, 1]);
    }

    #[test]
    fn test_media_failure_does_not_stop_traversal() {
        let vault = Vault::new();
        vault.note("Start", "![[pic.png]] [[Next]]").note("Next", "");

        let paths = ExportPaths::new(&vault.dir.path().join("export"), "notes", "media");
        paths.prepare().unwrap();
        let traversal = Traversal::new(
            "Start",
            vec![vault.dir.path().join("Notes")],
            vault.dir.path().join("no-such-media"),
            3,
            paths,
        );

        let report = traversal.run();
        assert_eq!(report.exported_names(), vec!["Start", "Next"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].operation, "copy media");
    }

    #[test]
    fn test_copy_failure_is_recorded_and_walk_continues() {
        let vault = Vault::new();
        vault.note("A", "[[B]]").note("B", "");

        let traversal = vault.traversal("A", 3);
        // a directory squatting on the destination makes the copy fail
        fs::create_dir_all(traversal.paths().note_destination("A")).unwrap();

        let report = traversal.run();
        assert_eq!(report.exported_names(), vec!["B"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].note, "A");
        assert_eq!(report.failures[0].operation, "copy note");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_note_is_recorded_and_not_expanded() {
        let vault = Vault::new();
        vault
            .note("Start", "[[Broken]] [[Sibling]]")
            .note("Sibling", "");
        // resolves by name but points nowhere, so reading it fails
        std::os::unix::fs::symlink(
            vault.dir.path().join("gone.md"),
            vault.dir.path().join("Notes/Broken.md"),
        )
        .unwrap();

        let report = vault.traversal("Start", 3).run();

        assert_eq!(report.exported_names(), vec!["Start", "Sibling"]);
        assert!(report.missing.is_empty());
        let broken: Vec<&str> = report
            .failures
            .iter()
            .filter(|f| f.note == "Broken")
            .map(|f| f.operation)
            .collect();
        assert_eq!(broken, vec!["read note", "copy note"]);
    }

    #[test]
    fn test_path_qualified_link_is_a_miss() {
        let vault = Vault::new();
        vault.note("Start", "[[Sub/Leaf]]").note("Sub/Leaf", "");

        let report = vault.traversal("Start", 2).run();
        assert_eq!(report.missing, vec!["Sub/Leaf"]);
        assert_eq!(vault.exported(), vec!["Start.md"]);
    }

    #[test]
    fn test_unicode_link_resolves_decomposed_file() {
        let vault = Vault::new();
        vault
            .note("Start", "[[Café]]")
            .note("Cafe\u{0301}", "decomposed on disk");

        let report = vault.traversal("Start", 2).run();
        assert!(report.missing.is_empty());
        assert!(vault
            .dir
            .path()
            .join("export/notes/Café.md")
            .exists());
    }

    #[test]
    fn test_invalid_utf8_still_yields_links() {
        let vault = Vault::new();
        let path = vault.dir.path().join("Notes/Binary.md");
        fs::write(&path, b"\xff\xfe [[Next]]\n").unwrap();
        vault.note("Next", "");

        let report = vault.traversal("Binary", 2).run();
        assert_eq!(report.exported_names(), vec!["Binary", "Next"]);
    }
}
