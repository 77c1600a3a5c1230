mod memory;
mod sqlite;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use memory::MemoryTable;
pub use sqlite::SqliteTable;

/// One leaderboard row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaderboardError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    NoScore,
    /// The backing table failed; the message is shown to the player as is.
    Service(String),
}

impl LeaderboardError {
    /// Rejected before any table call was made.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Service(_))
    }
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "Please enter a user name"),
            Self::UsernameTooLong { max } => {
                write!(f, "User name must be at most {max} characters")
            }
            Self::NoScore => write!(f, "No score to submit"),
            Self::Service(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for LeaderboardError {}

/// A checked `(username, score)` pair, ready to append.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission(ScoreEntry);

impl Submission {
    /// Trims the name; rejects blank or over-long names and a zero score.
    pub fn new(username: &str, score: u32, max_len: usize) -> Result<Self, LeaderboardError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LeaderboardError::EmptyUsername);
        }
        if username.chars().count() > max_len {
            return Err(LeaderboardError::UsernameTooLong { max: max_len });
        }
        if score == 0 {
            return Err(LeaderboardError::NoScore);
        }
        Ok(Self(ScoreEntry {
            username: username.to_string(),
            score,
        }))
    }

    pub fn entry(&self) -> &ScoreEntry {
        &self.0
    }
}

/// The hosted score table: append rows, read the best ones back.
///
/// `top` orders by score descending; equal scores keep arrival order.
pub trait ScoreTable {
    fn insert(&mut self, entry: &ScoreEntry) -> Result<(), String>;
    fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, String>;
}

/// Thin request/response client. No retries: a resubmit after a failure may
/// append a duplicate row.
pub struct LeaderboardClient {
    table: Box<dyn ScoreTable>,
    max_name_len: usize,
}

impl LeaderboardClient {
    pub fn new(table: Box<dyn ScoreTable>, max_name_len: usize) -> Self {
        Self {
            table,
            max_name_len,
        }
    }

    pub fn validate(&self, username: &str, score: u32) -> Result<Submission, LeaderboardError> {
        Submission::new(username, score, self.max_name_len)
    }

    pub fn submit(&mut self, username: &str, score: u32) -> Result<ScoreEntry, LeaderboardError> {
        let submission = self.validate(username, score)?;
        self.send(&submission)?;
        Ok(submission.0)
    }

    /// Append an already validated submission.
    pub fn send(&mut self, submission: &Submission) -> Result<(), LeaderboardError> {
        let entry = submission.entry();
        self.table.insert(entry).map_err(|e| {
            tracing::warn!(username = %entry.username, score = entry.score, "score submit failed: {e}");
            LeaderboardError::Service(e)
        })?;
        tracing::info!(username = %entry.username, score = entry.score, "score submitted");
        Ok(())
    }

    pub fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        self.table.top(limit).map_err(|e| {
            tracing::warn!(limit, "ranking fetch failed: {e}");
            LeaderboardError::Service(e)
        })
    }
}
