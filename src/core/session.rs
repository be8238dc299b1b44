//! # Session State
//!
//! The explicit, per-session object: who is logged in, the two history logs,
//! and the turn currently shown in the main panel. Constructed when the client
//! starts, reset on logout, dropped when the client exits. Nothing here is
//! written to disk.
//!
//! ```text
//! Session
//! ├── identity: Identity                  // username + authenticated flag
//! ├── documents: Vec<DocumentTurn>        // seeded from backend at login, then appended
//! ├── chats: Vec<ChatTurn>                // this session only
//! └── selected: Option<SelectedTurn>      // copy of one turn, never a third log
//! ```
//!
//! Both logs are append-only. The only way to shrink them is [`Session::reset`].
//! Mutating methods are crate-private: `SessionController` is the sole writer.

use crate::backend::HistoryRecord;

/// Answer substrings that mean "the backend could not really answer".
/// When one is present, references are not displayed.
pub const FALLBACK_PHRASES: [&str; 5] = [
    "no answer found",
    "does not provide",
    "unable to answer",
    "couldn\u{2019}t find",
    "sorry",
];

/// Whether supporting references should be displayed beside `answer`.
pub fn shows_references(answer: &str, references: &[String]) -> bool {
    if answer.is_empty() || references.is_empty() {
        return false;
    }
    let lowered = answer.to_lowercase();
    FALLBACK_PHRASES
        .iter()
        .all(|phrase| !lowered.contains(phrase))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub authenticated: bool,
}

impl Identity {
    fn logged_in(username: String) -> Self {
        Self {
            username,
            authenticated: true,
        }
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// One answered document question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTurn {
    pub question: String,
    pub answer: String,
    pub references: Vec<String>,
}

impl From<HistoryRecord> for DocumentTurn {
    fn from(record: HistoryRecord) -> Self {
        Self {
            question: record.question,
            answer: record.answer,
            references: record.matched_paragraphs.unwrap_or_default(),
        }
    }
}

/// One free-form chat exchange. `reply` holds the error text when the call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub prompt: String,
    pub reply: String,
}

/// The turn rendered in the main panel.
/// `references` is `None` for chat turns and `Some` (possibly empty) for document turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTurn {
    pub question: String,
    pub answer: String,
    pub references: Option<Vec<String>>,
}

impl SelectedTurn {
    /// References to render, after applying the fallback-phrase policy.
    pub fn visible_references(&self) -> &[String] {
        match &self.references {
            Some(refs) if shows_references(&self.answer, refs) => refs,
            _ => &[],
        }
    }
}

impl From<&DocumentTurn> for SelectedTurn {
    fn from(turn: &DocumentTurn) -> Self {
        Self {
            question: turn.question.clone(),
            answer: turn.answer.clone(),
            references: Some(turn.references.clone()),
        }
    }
}

impl From<&ChatTurn> for SelectedTurn {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            question: turn.prompt.clone(),
            answer: turn.reply.clone(),
            references: None,
        }
    }
}

/// Which log a combined-history entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    Document,
    Chat,
}

/// One row of the combined history view, borrowed from the underlying log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry<'a> {
    pub source: HistorySource,
    pub question: &'a str,
    pub answer: &'a str,
    pub references: Option<&'a [String]>,
}

impl HistoryEntry<'_> {
    pub fn to_selected(&self) -> SelectedTurn {
        SelectedTurn {
            question: self.question.to_string(),
            answer: self.answer.to_string(),
            references: self.references.map(<[String]>::to_vec),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    identity: Identity,
    documents: Vec<DocumentTurn>,
    chats: Vec<ChatTurn>,
    selected: Option<SelectedTurn>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> SessionState {
        if self.identity.authenticated {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::LoggedIn
    }

    pub fn document_history(&self) -> &[DocumentTurn] {
        &self.documents
    }

    pub fn chat_history(&self) -> &[ChatTurn] {
        &self.chats
    }

    pub fn selected(&self) -> Option<&SelectedTurn> {
        self.selected.as_ref()
    }

    pub fn has_history(&self) -> bool {
        !self.documents.is_empty() || !self.chats.is_empty()
    }

    /// Combined view: chat log newest-first, then document log newest-first.
    ///
    /// The two logs are not merged by time. A chat from an hour ago still
    /// lists above a document answer from a minute ago.
    pub fn combined_history(&self) -> Vec<HistoryEntry<'_>> {
        let chats = self.chats.iter().rev().map(|turn| HistoryEntry {
            source: HistorySource::Chat,
            question: &turn.prompt,
            answer: &turn.reply,
            references: None,
        });
        let documents = self.documents.iter().rev().map(|turn| HistoryEntry {
            source: HistorySource::Document,
            question: &turn.question,
            answer: &turn.answer,
            references: Some(turn.references.as_slice()),
        });
        chats.chain(documents).collect()
    }

    /// LoggedOut → LoggedIn. Replaces the document log with the persisted one.
    pub(crate) fn begin(&mut self, username: String, documents: Vec<DocumentTurn>) {
        self.identity = Identity::logged_in(username);
        self.documents = documents;
        self.chats.clear();
        self.selected = None;
    }

    /// Back to the initial state.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn push_document(&mut self, turn: DocumentTurn) -> &DocumentTurn {
        self.selected = Some(SelectedTurn::from(&turn));
        self.documents.push(turn);
        &self.documents[self.documents.len() - 1]
    }

    pub(crate) fn push_chat(&mut self, turn: ChatTurn) -> &ChatTurn {
        self.chats.push(turn);
        &self.chats[self.chats.len() - 1]
    }

    /// Selects a combined-history row. Out-of-range leaves the selection untouched.
    pub(crate) fn select(&mut self, combined_index: usize) -> Option<&SelectedTurn> {
        let picked = self
            .combined_history()
            .get(combined_index)
            .map(HistoryEntry::to_selected)?;
        self.selected = Some(picked);
        self.selected.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(q: &str, refs: &[&str]) -> DocumentTurn {
        DocumentTurn {
            question: q.to_string(),
            answer: format!("answer to {q}"),
            references: refs.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn chat(p: &str) -> ChatTurn {
        ChatTurn {
            prompt: p.to_string(),
            reply: format!("reply to {p}"),
        }
    }

    fn logged_in() -> Session {
        let mut session = Session::new();
        session.begin("alice".to_string(), Vec::new());
        session
    }

    #[test]
    fn test_new_session_is_logged_out_and_empty() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(session.identity(), &Identity::default());
        assert!(!session.has_history());
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_history_record_defaults_missing_references() {
        let turn = DocumentTurn::from(HistoryRecord {
            question: "Q".to_string(),
            answer: "A".to_string(),
            matched_paragraphs: None,
        });
        assert!(turn.references.is_empty());
    }

    #[test]
    fn test_begin_replaces_documents_and_clears_chats() {
        let mut session = logged_in();
        session.push_chat(chat("hi"));
        session.begin("bob".to_string(), vec![doc("a", &[])]);
        assert_eq!(session.identity().username, "bob");
        assert_eq!(session.document_history().len(), 1);
        assert!(session.chat_history().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = logged_in();
        session.push_document(doc("a", &["p1"]));
        session.push_chat(chat("hi"));
        session.select(0);

        session.reset();

        assert_eq!(session.state(), SessionState::LoggedOut);
        assert!(session.identity().username.is_empty());
        assert!(session.document_history().is_empty());
        assert!(session.chat_history().is_empty());
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_push_document_selects_it() {
        let mut session = logged_in();
        session.push_document(doc("a", &["p1"]));
        let selected = session.selected().unwrap();
        assert_eq!(selected.question, "a");
        assert_eq!(selected.references, Some(vec!["p1".to_string()]));
    }

    #[test]
    fn test_push_chat_leaves_selection_alone() {
        let mut session = logged_in();
        session.push_document(doc("a", &[]));
        session.push_chat(chat("hi"));
        assert_eq!(session.selected().unwrap().question, "a");
    }

    #[test]
    fn test_combined_history_order_is_chats_then_documents_each_reversed() {
        let mut session = logged_in();
        session.push_document(doc("d1", &[]));
        session.push_chat(chat("c1"));
        session.push_document(doc("d2", &[]));
        session.push_chat(chat("c2"));

        let labels: Vec<(HistorySource, &str)> = session
            .combined_history()
            .iter()
            .map(|e| (e.source, e.question))
            .collect();

        assert_eq!(
            labels,
            vec![
                (HistorySource::Chat, "c2"),
                (HistorySource::Chat, "c1"),
                (HistorySource::Document, "d2"),
                (HistorySource::Document, "d1"),
            ]
        );
    }

    #[test]
    fn test_select_chat_entry_has_no_references() {
        let mut session = logged_in();
        session.push_document(doc("d1", &["p1"]));
        session.push_chat(chat("c1"));

        let selected = session.select(0).unwrap();
        assert_eq!(selected.question, "c1");
        assert!(selected.references.is_none());

        let selected = session.select(1).unwrap();
        assert_eq!(selected.question, "d1");
        assert_eq!(selected.references.as_deref(), Some(&["p1".to_string()][..]));
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut session = logged_in();
        session.push_document(doc("d1", &["p1"]));
        session.push_document(doc("d2", &[]));

        let first = session.select(1).cloned();
        let second = session.select(1).cloned();
        assert_eq!(first, second);
        assert_eq!(first.unwrap().question, "d1");
    }

    #[test]
    fn test_select_out_of_range_keeps_selection() {
        let mut session = logged_in();
        session.push_document(doc("d1", &[]));
        assert!(session.select(5).is_none());
        assert_eq!(session.selected().unwrap().question, "d1");
    }

    #[test]
    fn test_references_suppressed_by_fallback_phrase() {
        let refs = vec!["p.3: ...".to_string()];
        assert!(!shows_references("Sorry, I could not find that", &refs));
        assert!(!shows_references("The text DOES NOT PROVIDE this.", &refs));
        assert!(!shows_references("I couldn\u{2019}t find it.", &refs));
        assert!(shows_references("Chlorophyll absorbs light.", &refs));
    }

    #[test]
    fn test_every_fallback_phrase_hides_references() {
        let refs = vec!["p.7".to_string()];
        let cases = [
            ("No Answer Found in the uploaded notes.", "no answer found"),
            ("The document Does Not Provide dates.", "does not provide"),
            ("I am UNABLE TO ANSWER from these pages.", "unable to answer"),
            ("I Couldn\u{2019}t Find that term.", "couldn\u{2019}t find"),
            ("SORRY, nothing matched.", "sorry"),
        ];
        assert_eq!(cases.len(), FALLBACK_PHRASES.len());
        for (answer, phrase) in cases {
            assert!(FALLBACK_PHRASES.contains(&phrase), "unknown phrase {phrase:?}");
            assert!(!shows_references(answer, &refs), "{answer:?} showed references");
        }
        for phrase in FALLBACK_PHRASES {
            let answer = format!("Well, {} here.", phrase.to_uppercase());
            assert!(!shows_references(&answer, &refs), "{answer:?} showed references");
        }
        assert!(shows_references("Mitochondria produce ATP.", &refs));
    }

    #[test]
    fn test_straight_apostrophe_is_not_a_fallback_phrase() {
        let refs = vec!["p1".to_string()];
        assert!(shows_references("I couldn't find a better summary than this.", &refs));
    }

    #[test]
    fn test_references_require_answer_and_refs() {
        assert!(!shows_references("Real answer", &[]));
        assert!(!shows_references("", &["p1".to_string()]));
    }

    #[test]
    fn test_visible_references_for_chat_turn_is_empty() {
        let selected = SelectedTurn::from(&chat("hi"));
        assert!(selected.visible_references().is_empty());
    }
}
