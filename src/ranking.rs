/// Game-over ranking panel: name entry, submit state and the top-N list.
///
/// The panel never talks to a terminal. The front end feeds it keys and
/// draws what it exposes; the leaderboard calls go through
/// [`LeaderboardClient`].

use crate::leaderboard::{LeaderboardClient, LeaderboardError, ScoreEntry, Submission};

pub const MSG_SUBMITTED: &str = "Submitted!";
pub const MSG_LOADING: &str = "Loading ranking...";
pub const MSG_FETCH_ERROR: &str = "Ranking fetch error";
pub const MSG_EMPTY: &str = "No ranking data yet";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Name,
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankRow {
    pub rank: usize,
    /// Medal for the podium, `"N."` otherwise.
    pub badge: String,
    pub username: String,
    pub score: String,
    pub podium: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RankingView {
    Loading,
    Error,
    Empty,
    Rows(Vec<RankRow>),
}

impl RankingView {
    pub fn from_entries(entries: &[ScoreEntry]) -> Self {
        if entries.is_empty() {
            return Self::Empty;
        }
        Self::Rows(
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let rank = i + 1;
                    RankRow {
                        rank,
                        badge: badge(rank),
                        username: entry.username.clone(),
                        score: group_thousands(entry.score),
                        podium: rank <= 3,
                    }
                })
                .collect(),
        )
    }
}

fn badge(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{n}."),
    }
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// What the front end should do after a key reached the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelOutcome {
    Stay,
    Restart,
}

#[derive(Clone, Debug)]
pub struct RankingPanel {
    name: String,
    max_len: usize,
    limit: usize,
    final_score: u32,
    status: Option<String>,
    submitting: bool,
    focus: Focus,
    view: RankingView,
    enabled: bool,
}

impl RankingPanel {
    pub fn new(max_len: usize, limit: usize) -> Self {
        Self {
            name: String::new(),
            max_len,
            limit,
            final_score: 0,
            status: None,
            submitting: false,
            focus: Focus::Name,
            view: RankingView::Loading,
            enabled: true,
        }
    }

    /// A panel with no leaderboard behind it: score and restart only.
    pub fn disabled() -> Self {
        Self {
            focus: Focus::Restart,
            enabled: false,
            ..Self::new(0, 0)
        }
    }

    /// Show the panel for a finished run.
    pub fn open(&mut self, final_score: u32) {
        self.final_score = final_score;
        self.name.clear();
        self.status = None;
        self.submitting = false;
        self.view = RankingView::Loading;
        self.focus = if self.enabled { Focus::Name } else { Focus::Restart };
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// While `true` the submit button is disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn view(&self) -> &RankingView {
        &self.view
    }

    /// Typed characters beyond the max length are dropped.
    pub fn type_char(&mut self, c: char) {
        if !self.enabled || self.submitting || self.focus != Focus::Name || c.is_control() {
            return;
        }
        if self.name.chars().count() < self.max_len {
            self.name.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.enabled && !self.submitting && self.focus == Focus::Name {
            self.name.pop();
        }
    }

    pub fn toggle_focus(&mut self) {
        if self.enabled {
            self.focus = match self.focus {
                Focus::Name => Focus::Restart,
                Focus::Restart => Focus::Name,
            };
        }
    }

    /// Validate the current input. On success the panel is marked as
    /// submitting and the checked submission is returned; on failure the
    /// reason becomes the status line and nothing is sent.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if !self.enabled || self.submitting {
            return None;
        }
        match Submission::new(&self.name, self.final_score, self.max_len) {
            Ok(submission) => {
                self.submitting = true;
                self.status = None;
                Some(submission)
            }
            Err(e) => {
                if e == LeaderboardError::EmptyUsername {
                    self.focus = Focus::Name;
                }
                self.status = Some(e.to_string());
                None
            }
        }
    }

    /// Record the outcome of a submit and re-enable the fields.
    pub fn finish_submit(&mut self, result: Result<(), LeaderboardError>) {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.status = Some(MSG_SUBMITTED.to_string());
                self.name.clear();
            }
            Err(e) => self.status = Some(format!("Submit failed: {e}")),
        }
    }

    pub fn show_ranking(&mut self, result: Result<Vec<ScoreEntry>, LeaderboardError>) {
        self.view = match result {
            Ok(entries) => RankingView::from_entries(&entries),
            Err(_) => RankingView::Error,
        };
    }

    pub fn refresh(&mut self, client: &LeaderboardClient) {
        if !self.enabled {
            return;
        }
        self.view = RankingView::Loading;
        self.show_ranking(client.fetch_top(self.limit));
    }

    /// Validate, send, and refresh the list on success. Returns `true` when
    /// the score was stored.
    pub fn submit(&mut self, client: &mut LeaderboardClient) -> bool {
        let Some(submission) = self.begin_submit() else {
            return false;
        };
        let result = client.send(&submission);
        let stored = result.is_ok();
        self.finish_submit(result);
        if stored {
            self.refresh(client);
        }
        stored
    }

    /// Enter on the focused element.
    pub fn activate(&mut self, client: Option<&mut LeaderboardClient>) -> PanelOutcome {
        match (self.focus, client) {
            (Focus::Restart, _) => PanelOutcome::Restart,
            (Focus::Name, Some(client)) => {
                self.submit(client);
                PanelOutcome::Stay
            }
            (Focus::Name, None) => PanelOutcome::Stay,
        }
    }
}
