//! Watching action sources for changes.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::Result;

/// Paths in `event` that are action sources touched by a write, create or
/// remove.
pub fn relevant_paths(event: &Event, suffix: &str) -> Vec<PathBuf> {
    let touches_content = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    if !touches_content {
        return Vec::new();
    }

    event
        .paths
        .iter()
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().ends_with(suffix))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Recursive watcher over a source directory.
///
/// Changes arriving within the debounce window of each other are reported
/// as one batch.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<Event>,
    suffix: String,
    debounce: Duration,
}

impl SourceWatcher {
    /// Start watching `dir` for files ending in `suffix`.
    pub fn new(dir: &Path, suffix: &str, debounce: Duration) -> Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            forward_event(res, &tx);
        })?;
        watcher.watch(dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching {} for *{}", dir.display(), suffix);

        Ok(Self {
            _watcher: watcher,
            rx,
            suffix: suffix.to_string(),
            debounce,
        })
    }

    /// Block until the next batch of relevant changes.
    ///
    /// Returns `None` once the watcher has shut down.
    pub fn next_change(&self) -> Option<Vec<PathBuf>> {
        loop {
            let event = self.rx.recv().ok()?;
            let paths = relevant_paths(&event, &self.suffix);
            if !paths.is_empty() {
                return Some(self.settle(paths));
            }
        }
    }

    /// Like [`SourceWatcher::next_change`], giving up after `wait`.
    pub fn next_change_within(&self, wait: Duration) -> Option<Vec<PathBuf>> {
        let deadline = std::time::Instant::now() + wait;
        loop {
            let remaining = deadline.checked_duration_since(std::time::Instant::now())?;
            let event = self.rx.recv_timeout(remaining).ok()?;
            let paths = relevant_paths(&event, &self.suffix);
            if !paths.is_empty() {
                return Some(self.settle(paths));
            }
        }
    }

    fn settle(&self, mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
        loop {
            match self.rx.recv_timeout(self.debounce) {
                Ok(event) => paths.extend(relevant_paths(&event, &self.suffix)),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        paths.sort();
        paths.dedup();
        paths
    }
}

/// Hand a watcher event to the receiving side, logging what cannot be.
///
/// Returns whether the event was delivered.
fn forward_event(res: notify::Result<Event>, tx: &Sender<Event>) -> bool {
    match res {
        Ok(event) => match tx.send(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dropped change event, watcher is shutting down: {:?}", e.0.paths);
                false
            }
        },
        Err(e) => {
            tracing::warn!("File watcher error: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind};
    use tempfile::TempDir;

    const SUFFIX: &str = ".action.ts";

    #[test]
    fn modified_source_is_relevant() {
        let event = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("/p/src/foo.action.ts"));
        assert_eq!(
            relevant_paths(&event, SUFFIX),
            [PathBuf::from("/p/src/foo.action.ts")]
        );
    }

    #[test]
    fn other_files_are_ignored() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/p/src/notes.md"))
            .add_path(PathBuf::from("/p/src/foo.action.ts.swp"));
        assert!(relevant_paths(&event, SUFFIX).is_empty());
    }

    #[test]
    fn access_events_are_ignored() {
        let event = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("/p/src/foo.action.ts"));
        assert!(relevant_paths(&event, SUFFIX).is_empty());
    }

    #[test]
    fn watcher_errors_are_not_forwarded() {
        let (tx, rx) = channel();
        assert!(!forward_event(Err(notify::Error::generic("inotify limit")), &tx));
        assert!(rx.try_recv().is_err());

        let event = Event::new(EventKind::Create(CreateKind::File));
        assert!(forward_event(Ok(event), &tx));
        assert!(rx.try_recv().is_ok());

        drop(rx);
        let event = Event::new(EventKind::Create(CreateKind::File));
        assert!(!forward_event(Ok(event), &tx));
    }

    #[test]
    fn watcher_reports_written_source() {
        let temp = TempDir::new().unwrap();
        let watcher =
            SourceWatcher::new(temp.path(), SUFFIX, Duration::from_millis(50)).unwrap();

        std::fs::write(temp.path().join("foo.action.ts"), "// VAR: Foo").unwrap();

        let batch = watcher
            .next_change_within(Duration::from_secs(5))
            .expect("expected a change");
        assert!(batch.iter().all(|p| p.ends_with("foo.action.ts")));
    }

    #[test]
    fn watcher_times_out_without_changes() {
        let temp = TempDir::new().unwrap();
        let watcher =
            SourceWatcher::new(temp.path(), SUFFIX, Duration::from_millis(10)).unwrap();
        assert!(watcher
            .next_change_within(Duration::from_millis(100))
            .is_none());
    }
}
