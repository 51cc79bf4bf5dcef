use crate::logic::Side;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub mv: String,
    pub score: i32,
}

/// Root move values per completed search depth, in root move order.
///
/// Scores are White-referenced; `root` is the side that picks among them.
/// Pure diagnostics: nothing here feeds back into search or ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    root: Side,
    rows: BTreeMap<u8, Vec<ScoreEntry>>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::new(Side::White)
    }
}

impl ScoreTable {
    #[must_use]
    pub const fn new(root: Side) -> Self {
        Self {
            root,
            rows: BTreeMap::new(),
        }
    }

    /// Side to move at the searched position.
    pub const fn root(&self) -> Side {
        self.root
    }

    pub fn record(&mut self, depth: u8, mv: impl Into<String>, score: i32) {
        self.rows.entry(depth).or_default().push(ScoreEntry {
            mv: mv.into(),
            score,
        });
    }

    pub fn row(&self, depth: u8) -> Option<&[ScoreEntry]> {
        self.rows.get(&depth).map(Vec::as_slice)
    }

    pub fn get(&self, depth: u8, mv: &str) -> Option<i32> {
        self.row(depth)?
            .iter()
            .find(|entry| entry.mv == mv)
            .map(|entry| entry.score)
    }

    /// Entry the root side prefers at `depth`: highest for White, lowest
    /// for Black. The first one wins ties.
    pub fn best(&self, depth: u8) -> Option<&ScoreEntry> {
        let sign = self.root.sign();
        self.row(depth)?
            .iter()
            .fold(None, |best: Option<&ScoreEntry>, entry| match best {
                Some(b) if sign * b.score >= sign * entry.score => Some(b),
                _ => Some(entry),
            })
    }

    pub fn deepest(&self) -> Option<u8> {
        self.rows.keys().next_back().copied()
    }

    pub fn depths(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.keys().copied()
    }

    /// Number of depth rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_keep_insertion_order() {
        let mut table = ScoreTable::new(Side::White);
        table.record(1, "e2e4", 20);
        table.record(1, "d2d4", 20);
        table.record(2, "e2e4", 0);

        assert_eq!(table.len(), 2);
        assert_eq!(table.deepest(), Some(2));
        let row = table.row(1).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.first().map(|e| e.mv.as_str()), Some("e2e4"));
        assert_eq!(table.get(2, "e2e4"), Some(0));
        assert_eq!(table.get(2, "d2d4"), None);
    }

    #[test]
    fn test_best_prefers_first_on_ties() {
        let mut table = ScoreTable::new(Side::White);
        table.record(1, "a2a3", -5);
        table.record(1, "e2e4", 20);
        table.record(1, "d2d4", 20);
        assert_eq!(table.best(1).map(|e| e.mv.as_str()), Some("e2e4"));
        assert!(table.best(3).is_none());
    }

    #[test]
    fn test_best_for_black_is_lowest() {
        let mut table = ScoreTable::new(Side::Black);
        table.record(1, "e7e5", -20);
        table.record(1, "a7a6", 0);
        table.record(1, "d7d5", -20);
        table.record(1, "g8f6", 5);

        assert_eq!(table.root(), Side::Black);
        assert_eq!(table.best(1).map(|e| e.mv.as_str()), Some("e7e5"));
    }

    #[test]
    fn test_serializes_to_json() {
        let mut table = ScoreTable::new(Side::White);
        table.record(1, "e2e4", 20);
        let json = serde_json::to_string(&table).unwrap();
        let back: ScoreTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
