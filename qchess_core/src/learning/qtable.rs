use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_SIZE: usize = 10_000;

#[derive(Debug, Error)]
pub enum QTableError {
    #[error("no file path configured for this table")]
    NoPath,
    #[error("failed to write table to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize table: {0}")]
    Serialize(#[from] serde_json::Error),
}

type Entries = BTreeMap<String, BTreeMap<String, f64>>;

/// Learned (position, move) preferences, persisted as one JSON object per file.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    path: Option<PathBuf>,
    max_size: usize,
    q: Entries,
}

impl Default for QTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl QTable {
    /// Empty table with no backing file.
    #[must_use]
    pub const fn new(max_size: usize) -> Self {
        Self {
            path: None,
            max_size,
            q: BTreeMap::new(),
        }
    }

    /// Table backed by `path`, loaded eagerly. A missing or unreadable file
    /// yields an empty table.
    pub fn open(path: impl Into<PathBuf>, max_size: usize) -> Self {
        let path = path.into();
        let q = load_entries(&path);
        Self {
            path: Some(path),
            max_size,
            q,
        }
    }

    pub fn get_q(&self, position: &str, mv: &str) -> f64 {
        self.q
            .get(position)
            .and_then(|moves| moves.get(mv))
            .copied()
            .unwrap_or(0.0)
    }

    /// `Q ← Q + α·(reward − Q)`; unseen keys start at 0.
    pub fn update(&mut self, position: &str, mv: &str, reward: f64, alpha: f64) {
        let slot = self
            .q
            .entry(position.to_string())
            .or_default()
            .entry(mv.to_string())
            .or_insert(0.0);
        *slot += alpha * (reward - *slot);
    }

    /// Overwrite the backing file with the whole table.
    pub fn save(&self) -> Result<(), QTableError> {
        let path = self.path.as_deref().ok_or(QTableError::NoPath)?;
        self.save_to(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), QTableError> {
        let json = serde_json::to_string(&self.q)?;
        fs::write(path, json).map_err(|source| QTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Saved Q-table to {} ({} positions, {} entries)",
            path.display(),
            self.position_count(),
            self.len()
        );
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Configured capacity. Recorded for reporting; never enforced.
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn position_count(&self) -> usize {
        self.q.len()
    }

    /// Number of (position, move) entries.
    pub fn len(&self) -> usize {
        self.q.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.q.values().all(BTreeMap::is_empty)
    }

    pub fn average_q(&self) -> f64 {
        let count = self.len();
        if count == 0 {
            return 0.0;
        }
        let total: f64 = self.q.values().flat_map(BTreeMap::values).sum();
        #[allow(clippy::cast_precision_loss)]
        {
            total / count as f64
        }
    }

    /// Preferences recorded for `position`, if any.
    pub fn moves_for(&self, position: &str) -> Option<&BTreeMap<String, f64>> {
        self.q.get(position)
    }
}

fn load_entries(path: &Path) -> Entries {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No Q-table found at {}, starting fresh.", path.display());
            return Entries::new();
        }
        Err(e) => {
            warn!(
                "Error reading Q-table {}: {e}, initializing empty table.",
                path.display()
            );
            return Entries::new();
        }
    };

    match serde_json::from_str::<Entries>(&text) {
        Ok(q) => {
            info!("Loaded Q-table from {}", path.display());
            q
        }
        Err(e) => {
            warn!(
                "Error loading Q-table {}: {e}, initializing empty table.",
                path.display()
            );
            Entries::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_key_reads_zero() {
        let table = QTable::default();
        assert!(table.get_q("anything", "e2e4").abs() < f64::EPSILON);
        assert!(table.is_empty());
        assert_eq!(table.max_size(), DEFAULT_MAX_SIZE);
    }

    #[test]
    fn test_first_update_is_alpha_times_reward() {
        let mut table = QTable::default();
        table.update("pos", "e2e4", 2.5, 0.1);
        assert!((table.get_q("pos", "e2e4") - 0.1 * 2.5).abs() < 1e-12);
        assert_eq!(table.len(), 1);
        assert_eq!(table.position_count(), 1);
    }

    #[test]
    fn test_updates_converge_monotonically() {
        let mut table = QTable::default();
        let target = 1.0;
        let mut previous = 0.0;
        for _ in 0..200 {
            table.update("pos", "mv", target, 0.1);
            let current = table.get_q("pos", "mv");
            assert!(current > previous);
            assert!(current <= target);
            previous = current;
        }
        assert!((target - previous).abs() < 1e-6);
    }

    #[test]
    fn test_negative_reward_converges_from_above() {
        let mut table = QTable::default();
        table.update("pos", "mv", 1.0, 0.5);
        let mut previous = table.get_q("pos", "mv");
        for _ in 0..20 {
            table.update("pos", "mv", -1.0, 0.5);
            let current = table.get_q("pos", "mv");
            assert!(current < previous);
            assert!(current >= -1.0);
            previous = current;
        }
    }

    #[test]
    fn test_average_q() {
        let mut table = QTable::default();
        assert!(table.average_q().abs() < f64::EPSILON);
        table.update("a", "m1", 1.0, 1.0);
        table.update("a", "m2", 3.0, 1.0);
        table.update("b", "m1", -1.0, 1.0);
        assert!((table.average_q() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_is_not_enforced() {
        let mut table = QTable::new(2);
        for i in 0..5 {
            table.update(&format!("pos{i}"), "mv", 1.0, 0.1);
        }
        assert_eq!(table.len(), 5);
        assert_eq!(table.max_size(), 2);
    }

    #[test]
    fn test_save_without_path_fails() {
        let table = QTable::default();
        assert!(matches!(table.save(), Err(QTableError::NoPath)));
    }
}
