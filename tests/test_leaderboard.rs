use std::cell::Cell;
use std::rc::Rc;

use bismuth_strike::leaderboard::*;

fn entry(username: &str, score: u32) -> ScoreEntry {
    ScoreEntry {
        username: username.to_string(),
        score,
    }
}

/// Table that counts calls and can be told to fail.
struct CountingTable {
    inserts: Rc<Cell<usize>>,
    fail: Option<&'static str>,
}

impl ScoreTable for CountingTable {
    fn insert(&mut self, _entry: &ScoreEntry) -> Result<(), String> {
        self.inserts.set(self.inserts.get() + 1);
        match self.fail {
            Some(message) => Err(message.to_string()),
            None => Ok(()),
        }
    }

    fn top(&self, _limit: usize) -> Result<Vec<ScoreEntry>, String> {
        match self.fail {
            Some(message) => Err(message.to_string()),
            None => Ok(Vec::new()),
        }
    }
}

fn counting_client(fail: Option<&'static str>) -> (LeaderboardClient, Rc<Cell<usize>>) {
    let inserts = Rc::new(Cell::new(0));
    let table = CountingTable {
        inserts: Rc::clone(&inserts),
        fail,
    };
    (LeaderboardClient::new(Box::new(table), 12), inserts)
}

// ── Validation ────────────────────────────────────────────────────────────────

#[test]
fn submission_trims_the_name() {
    let s = Submission::new("  ada  ", 5, 12).unwrap();
    assert_eq!(s.entry(), &entry("ada", 5));
}

#[test]
fn blank_names_are_rejected() {
    assert_eq!(Submission::new("", 5, 12), Err(LeaderboardError::EmptyUsername));
    assert_eq!(Submission::new("   ", 5, 12), Err(LeaderboardError::EmptyUsername));
}

#[test]
fn long_names_are_rejected_by_characters() {
    assert_eq!(
        Submission::new("abcdefghijklm", 5, 12),
        Err(LeaderboardError::UsernameTooLong { max: 12 })
    );
    assert!(Submission::new("abcdefghijkl", 5, 12).is_ok());
    // Twelve multi-byte characters still fit.
    assert!(Submission::new("ニホニウムニホニウムニホ", 5, 12).is_ok());
}

#[test]
fn zero_score_is_rejected() {
    assert_eq!(Submission::new("ada", 0, 12), Err(LeaderboardError::NoScore));
}

#[test]
fn error_messages() {
    assert_eq!(LeaderboardError::EmptyUsername.to_string(), "Please enter a user name");
    assert_eq!(
        LeaderboardError::UsernameTooLong { max: 12 }.to_string(),
        "User name must be at most 12 characters"
    );
    assert!(LeaderboardError::NoScore.is_validation());
    assert!(!LeaderboardError::Service("x".into()).is_validation());
}

#[test]
fn invalid_submit_never_reaches_the_table() {
    let (mut client, inserts) = counting_client(None);
    assert_eq!(client.submit(" ", 5), Err(LeaderboardError::EmptyUsername));
    assert_eq!(client.submit("ada", 0), Err(LeaderboardError::NoScore));
    assert_eq!(inserts.get(), 0);

    assert_eq!(client.submit("ada", 5), Ok(entry("ada", 5)));
    assert_eq!(inserts.get(), 1);
}

#[test]
fn service_errors_keep_their_message() {
    let (mut client, inserts) = counting_client(Some("row-level security violation"));
    let err = client.submit("ada", 5).unwrap_err();
    assert_eq!(err, LeaderboardError::Service("row-level security violation".into()));
    assert_eq!(err.to_string(), "row-level security violation");
    assert_eq!(inserts.get(), 1);

    assert!(matches!(client.fetch_top(10), Err(LeaderboardError::Service(_))));
}

// ── Ordering ──────────────────────────────────────────────────────────────────

fn fill(table: &mut dyn ScoreTable) {
    for (name, score) in [("a", 5), ("b", 9), ("c", 5), ("d", 1), ("e", 9)] {
        table.insert(&entry(name, score)).unwrap();
    }
}

fn names(entries: &[ScoreEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.username.as_str()).collect()
}

#[test]
fn memory_table_orders_by_score_then_arrival() {
    let mut table = MemoryTable::new();
    assert!(table.is_empty());
    fill(&mut table);
    assert_eq!(table.len(), 5);
    assert_eq!(names(&table.top(10).unwrap()), vec!["b", "e", "a", "c", "d"]);
    assert_eq!(names(&table.top(2).unwrap()), vec!["b", "e"]);
    assert!(table.top(0).unwrap().is_empty());
}

#[test]
fn sqlite_table_orders_by_score_then_arrival() {
    let mut table = SqliteTable::in_memory().unwrap();
    fill(&mut table);
    assert_eq!(names(&table.top(10).unwrap()), vec!["b", "e", "a", "c", "d"]);
    assert_eq!(names(&table.top(3).unwrap()), vec!["b", "e", "a"]);
}

#[test]
fn sqlite_table_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("scores.db");
    {
        let table = SqliteTable::open(&path).unwrap();
        let mut client = LeaderboardClient::new(Box::new(table), 12);
        client.submit("ada", 3).unwrap();
        client.submit("grace", 8).unwrap();
    }
    let client = LeaderboardClient::new(Box::new(SqliteTable::open(&path).unwrap()), 12);
    assert_eq!(
        client.fetch_top(10).unwrap(),
        vec![entry("grace", 8), entry("ada", 3)]
    );
}

#[test]
fn duplicate_submissions_are_separate_rows() {
    let mut client = LeaderboardClient::new(Box::new(MemoryTable::new()), 12);
    client.submit("ada", 4).unwrap();
    client.submit("ada", 4).unwrap();
    assert_eq!(client.fetch_top(10).unwrap().len(), 2);
}

#[test]
fn score_entry_serializes_as_json() {
    let json = serde_json::to_string(&entry("ada", 1234)).unwrap();
    assert_eq!(json, r#"{"username":"ada","score":1234}"#);
}
