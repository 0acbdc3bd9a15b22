//! File watcher for development mode.
//!
//! This module watches the input directory and reports changes to
//! declaration manifests so that generation can be re-run.

use crate::config::MANIFEST_SUFFIX;
use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Event types for manifest changes.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A manifest was created or modified.
    Modified(PathBuf),
    /// A manifest was deleted.
    Deleted(PathBuf),
    /// An error occurred.
    Error(String),
}

/// File watcher for monitoring declaration manifests.
pub struct FileWatcher {
    /// Root directory to watch.
    root: PathBuf,
    /// Manifest file name suffix.
    suffix: String,
    /// Debounce duration in milliseconds.
    debounce_ms: u64,
}

impl FileWatcher {
    /// Create a new file watcher for the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: MANIFEST_SUFFIX.to_string(),
            debounce_ms: 500,
        }
    }

    /// Set the manifest file name suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Whether a change to `path` should trigger regeneration.
    pub fn is_relevant(&self, path: &Path) -> bool {
        has_suffix(path, &self.suffix)
    }

    /// Start watching for file changes.
    ///
    /// The debouncer must be kept alive for as long as events are wanted.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();
        let suffix = self.suffix.clone();

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        let path = event.path;
                        if !has_suffix(&path, &suffix) {
                            continue;
                        }

                        let watch_event = if path.exists() {
                            WatchEvent::Modified(path)
                        } else {
                            WatchEvent::Deleted(path)
                        };
                        let _ = tx.send(watch_event);
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Notify(e.to_string()))?;

        tracing::debug!(root = %self.root.display(), suffix = %self.suffix, "watching for manifest changes");
        Ok((debouncer, rx))
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Whether the file name of `path` ends with `suffix`.
fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(suffix))
}

impl WatchEvent {
    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Check if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, WatchEvent::Error(_))
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_event_path() {
        let path = PathBuf::from("/test/shop.crudgen.toml");

        let modified = WatchEvent::Modified(path.clone());
        assert_eq!(modified.path(), Some(path.as_path()));

        let deleted = WatchEvent::Deleted(path.clone());
        assert_eq!(deleted.path(), Some(path.as_path()));

        let error = WatchEvent::Error("test error".to_string());
        assert_eq!(error.path(), None);
        assert!(error.is_error());
        assert_eq!(error.error_message(), Some("test error"));
    }

    #[test]
    fn test_relevant_paths() {
        let watcher = FileWatcher::new("/test").with_suffix(".decl.toml");
        assert!(watcher.is_relevant(Path::new("/test/a/shop.decl.toml")));
        assert!(!watcher.is_relevant(Path::new("/test/shop.crudgen.toml")));
        assert!(!watcher.is_relevant(Path::new("/test/Order.java")));
    }

    #[test]
    fn test_has_suffix_matches_file_name_only() {
        assert!(has_suffix(Path::new("shop.crudgen.toml"), ".crudgen.toml"));
        assert!(!has_suffix(Path::new("x.crudgen.toml/Order.java"), ".crudgen.toml"));
        assert!(!has_suffix(Path::new("/"), ".crudgen.toml"));
    }

    #[test]
    fn test_file_watcher_with_debounce() {
        let watcher = FileWatcher::new("/test/path").with_debounce(1000);
        assert_eq!(watcher.root(), Path::new("/test/path"));
        assert_eq!(watcher.debounce_ms, 1000);
    }
}
