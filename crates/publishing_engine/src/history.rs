use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::session::Navigator;

/// Browser-like history kept in memory.
#[derive(Debug)]
pub struct HistoryNavigator {
    entries: Mutex<History>,
}

#[derive(Debug)]
struct History {
    paths: Vec<String>,
    cursor: usize,
}

impl HistoryNavigator {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(History {
                paths: vec![initial_path.into()],
                cursor: 0,
            }),
        }
    }

    /// Moves one entry back. Returns false at the oldest entry.
    pub fn back(&self) -> bool {
        let mut history = self.lock();
        if history.cursor == 0 {
            return false;
        }
        history.cursor -= 1;
        true
    }

    pub fn forward(&self) -> bool {
        let mut history = self.lock();
        if history.cursor + 1 >= history.paths.len() {
            return false;
        }
        history.cursor += 1;
        true
    }

    /// Every path pushed so far, oldest first.
    pub fn paths(&self) -> Vec<String> {
        self.lock().paths.clone()
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for HistoryNavigator {
    fn push(&self, path: &str) {
        let mut history = self.lock();
        let keep = history.cursor + 1;
        history.paths.truncate(keep);
        history.paths.push(path.to_string());
        history.cursor = history.paths.len() - 1;
    }

    fn current_path(&self) -> String {
        let history = self.lock();
        history.paths[history.cursor].clone()
    }
}
