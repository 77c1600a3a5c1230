use super::{ScoreEntry, ScoreTable};

/// In-process table. Rows are kept in arrival order; a stable sort keeps
/// that order among equal scores.
#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: Vec<ScoreEntry>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ScoreTable for MemoryTable {
    fn insert(&mut self, entry: &ScoreEntry) -> Result<(), String> {
        self.rows.push(entry.clone());
        Ok(())
    }

    fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, String> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows.truncate(limit);
        Ok(rows)
    }
}
