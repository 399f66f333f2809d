use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

/// File name of the saved-state document inside the state directory.
pub const STATE_FILE: &str = "state.json";

/// The persisted document: all-time best, the running score, and the grid
/// snapshot. `game` is absent once the grid went terminal (a dead game is
/// not resumable), and the saved score is zeroed along with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SavedState {
    pub best: u64,
    pub score: u64,
    pub game: Option<Vec<u8>>,
}

/// Synchronous JSON store for the saved-state document.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Open (and create if needed) the state directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create state dir {}", dir.display()))?;
        Ok(Self {
            path: dir.join(STATE_FILE),
        })
    }

    /// Read the document; a missing or unreadable file degrades to the
    /// default state rather than refusing to start.
    pub fn load(&self) -> SavedState {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return SavedState::default();
            }
            Err(err) => {
                warn!("could not read {}: {err}", self.path.display());
                return SavedState::default();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(state) => state,
            Err(err) => {
                warn!("corrupt saved state in {}: {err}", self.path.display());
                SavedState::default()
            }
        }
    }

    /// Write the document via a sibling temp file and rename.
    pub fn save(&self, state: &SavedState) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to move state into {}", self.path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Trailing-edge debounce wrapper around a [`StateStore`].
///
/// Every push restarts the quiet-period timer; only the newest state is
/// written once pushes stop for `delay`. Whatever is pending when the
/// wrapper drops is flushed before the worker exits.
pub struct Debounced {
    tx: Option<Sender<SavedState>>,
    worker: Option<JoinHandle<()>>,
}

impl Debounced {
    pub fn new(store: StateStore, delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<SavedState>();
        let worker = thread::spawn(move || {
            while let Ok(mut latest) = rx.recv() {
                loop {
                    match rx.recv_timeout(delay) {
                        Ok(next) => latest = next,
                        Err(RecvTimeoutError::Timeout) => break,
                        Err(RecvTimeoutError::Disconnected) => {
                            if let Err(err) = store.save(&latest) {
                                warn!("state save failed: {err:#}");
                            }
                            return;
                        }
                    }
                }
                if let Err(err) = store.save(&latest) {
                    warn!("state save failed: {err:#}");
                }
            }
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queue a state for writing after the quiet period.
    pub fn push(&self, state: SavedState) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(state);
        }
    }
}

impl Drop for Debounced {
    fn drop(&mut self) {
        // Closing the channel tells the worker to flush and exit.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn it_defaults_when_no_file_exists() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state")).unwrap();
        assert_eq!(store.load(), SavedState::default());
    }

    #[test]
    fn it_round_trips_the_document() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        let state = SavedState {
            best: 2048,
            score: 512,
            game: Some(vec![0; 16]),
        };
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
    }

    #[test]
    fn it_survives_a_corrupt_file() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        fs::write(store.path(), b"not json at all").unwrap();
        assert_eq!(store.load(), SavedState::default());
    }

    #[test]
    fn it_flushes_the_newest_state_on_drop() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        let debounced = Debounced::new(store.clone(), Duration::from_millis(50));
        for score in 0..10 {
            debounced.push(SavedState {
                best: 100,
                score,
                game: Some(vec![1; 16]),
            });
        }
        // Dropping closes the channel; the worker flushes the last push.
        drop(debounced);
        assert_eq!(store.load().score, 9);
    }

    #[test]
    fn it_writes_after_the_quiet_period() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path()).unwrap();
        let debounced = Debounced::new(store.clone(), Duration::from_millis(10));
        debounced.push(SavedState {
            best: 4,
            score: 4,
            game: None,
        });
        thread::sleep(Duration::from_millis(100));
        assert_eq!(store.load().best, 4);
        drop(debounced);
    }
}
