//! Session state: the ordered turn list and the current selection.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use shared::Sender;

use crate::ClientError;

/// Subjects offered by the tutor.
pub const SUBJECTS: [&str; 13] = [
    "General",
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "Computer Science",
    "English Literature",
    "History",
    "Geography",
    "Economics",
    "Psychology",
    "Art",
    "Music",
];

/// Grade levels offered by the tutor.
pub const GRADES: [&str; 6] = [
    "Any",
    "Elementary (K-5)",
    "Middle School (6-8)",
    "High School (9-12)",
    "College",
    "University",
];

/// Number of most recent turns sent as context.
pub const CONTEXT_WINDOW: usize = 3;

/// Text shown in place of any failed exchange.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// One message in a session. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: String,
    pub is_error: bool,
}

impl ChatTurn {
    /// Local wall-clock time of the turn, or the raw timestamp if it does not parse.
    pub fn time_label(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|ts| ts.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

fn lookup(options: &[&'static str], name: &str) -> Option<&'static str> {
    let name = name.trim();
    options
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(name))
}

/// Canonical spelling of a known subject.
pub fn canonical_subject(name: &str) -> Option<&'static str> {
    lookup(&SUBJECTS, name)
}

/// Canonical spelling of a known grade.
pub fn canonical_grade(name: &str) -> Option<&'static str> {
    lookup(&GRADES, name)
}

/// State of one tutoring session.
#[derive(Debug, Clone)]
pub struct SessionState {
    turns: Vec<ChatTurn>,
    subject: &'static str,
    grade: &'static str,
    draft: String,
    pending: bool,
    last_id: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            turns: Vec::new(),
            subject: SUBJECTS[0],
            grade: GRADES[0],
            draft: String::new(),
            pending: false,
            last_id: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with a preselected subject and grade.
    pub fn with_selection(subject: &str, grade: &str) -> Result<Self, ClientError> {
        let mut state = Self::default();
        state.set_subject(subject)?;
        state.set_grade(grade)?;
        Ok(state)
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn subject(&self) -> &str {
        self.subject
    }

    pub fn grade(&self) -> &str {
        self.grade
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The last `CONTEXT_WINDOW` turns as `sender: text` lines.
    pub fn context_window(&self) -> String {
        let start = self.turns.len().saturating_sub(CONTEXT_WINDOW);
        self.turns[start..]
            .iter()
            .map(|turn| format!("{}: {}", turn.sender, turn.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Append a turn with a fresh id.
    pub fn push_turn(
        &mut self,
        sender: Sender,
        text: impl Into<String>,
        timestamp: impl Into<String>,
        is_error: bool,
    ) -> &ChatTurn {
        let id = self.next_id();
        self.turns.push(ChatTurn {
            id,
            text: text.into(),
            sender,
            timestamp: timestamp.into(),
            is_error,
        });
        &self.turns[self.turns.len() - 1]
    }

    // Creation time in ms, bumped past the previous id when the clock has not moved.
    fn next_id(&mut self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    pub fn set_subject(&mut self, subject: &str) -> Result<(), ClientError> {
        self.subject = canonical_subject(subject)
            .ok_or_else(|| ClientError::UnknownSubject(subject.to_string()))?;
        Ok(())
    }

    pub fn set_grade(&mut self, grade: &str) -> Result<(), ClientError> {
        self.grade =
            canonical_grade(grade).ok_or_else(|| ClientError::UnknownGrade(grade.to_string()))?;
        Ok(())
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Drop all turns; the selection is kept.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub(crate) fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_turns(texts: &[(&str, Sender)]) -> SessionState {
        let mut state = SessionState::new();
        for (text, sender) in texts {
            state.push_turn(*sender, *text, shared::iso_timestamp(), false);
        }
        state
    }

    #[test]
    fn test_defaults() {
        let state = SessionState::new();
        assert_eq!(state.subject(), "General");
        assert_eq!(state.grade(), "Any");
        assert!(state.turns().is_empty());
        assert!(!state.is_pending());
    }

    #[test]
    fn test_context_window_empty_and_short() {
        assert_eq!(SessionState::new().context_window(), "");

        let state = with_turns(&[("hi", Sender::User), ("hello!", Sender::Ai)]);
        assert_eq!(state.context_window(), "user: hi\nai: hello!");
    }

    #[test]
    fn test_context_window_keeps_last_three() {
        let state = with_turns(&[
            ("q1", Sender::User),
            ("a1", Sender::Ai),
            ("q2", Sender::User),
            ("a2", Sender::Ai),
            ("q3", Sender::User),
        ]);
        assert_eq!(state.context_window(), "user: q2\nai: a2\nuser: q3");
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut state = SessionState::new();
        let ids: Vec<u64> = (0..50)
            .map(|i| state.push_turn(Sender::User, format!("m{i}"), "t", false).id)
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_selection_is_validated_and_canonical() {
        let mut state = SessionState::new();
        state.set_subject("computer science").unwrap();
        assert_eq!(state.subject(), "Computer Science");

        state.set_grade(" college ").unwrap();
        assert_eq!(state.grade(), "College");

        assert!(matches!(
            state.set_subject("Astrology"),
            Err(ClientError::UnknownSubject(_))
        ));
        assert_eq!(state.subject(), "Computer Science");
        assert!(matches!(state.set_grade("PhD"), Err(ClientError::UnknownGrade(_))));
    }

    #[test]
    fn test_clear_keeps_selection() {
        let mut state = SessionState::with_selection("Physics", "University").unwrap();
        state.push_turn(Sender::User, "F=ma?", "t", false);
        state.clear();
        assert!(state.turns().is_empty());
        assert_eq!(state.subject(), "Physics");
        assert_eq!(state.grade(), "University");
    }

    #[test]
    fn test_turn_serializes_camel_case() {
        let mut state = SessionState::new();
        let turn = state.push_turn(Sender::Ai, ERROR_REPLY, "2024-05-01T12:00:00.000Z", true).clone();
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["isError"], true);
        assert_eq!(json["sender"], "ai");
    }

    #[test]
    fn test_time_label_falls_back_to_raw() {
        let mut state = SessionState::new();
        let turn = state.push_turn(Sender::Ai, "x", "not a time", false).clone();
        assert_eq!(turn.time_label(), "not a time");

        let turn = state.push_turn(Sender::Ai, "x", "2024-05-01T12:00:00.000Z", false).clone();
        assert_eq!(turn.time_label().len(), 8);
    }
}
