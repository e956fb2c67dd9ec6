use std::time::Duration;

use gameshelf_library::LibraryError;
use tracing::debug;

/// Default notice display duration.
const DEFAULT_DURATION: Duration = Duration::from_secs(4);

/// Error notice display duration.
const ERROR_DURATION: Duration = Duration::from_secs(6);

/// The visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A user-visible notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub title: String,
    pub message: Option<String>,
    pub duration: Duration,
}

/// A library action whose outcome gets reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Search,
    Add,
    Edit,
    Remove,
    Reorder,
}

impl Action {
    fn success_title(self) -> &'static str {
        match self {
            Action::Load => "Library loaded",
            Action::Search => "Search complete",
            Action::Add => "Game added",
            Action::Edit => "Game saved",
            Action::Remove => "Game removed",
            Action::Reorder => "Order saved",
        }
    }

    fn error_title(self) -> &'static str {
        match self {
            Action::Load => "Could not load library",
            Action::Search => "Search failed",
            Action::Add => "Could not add game",
            Action::Edit => "Could not save game",
            Action::Remove => "Could not remove game",
            Action::Reorder => "Could not save order",
        }
    }
}

/// In-memory notice queue with monotonic ID assignment.
///
/// Timed dismissal is up to the front end; `duration` says how long to show
/// each notice.
#[derive(Debug, Clone, Default)]
pub struct NoticeQueue {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a notice and return its ID.
    pub fn push(
        &mut self,
        kind: NoticeKind,
        title: impl Into<String>,
        message: Option<String>,
        duration: Duration,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            kind,
            title: title.into(),
            message,
            duration,
        });
        id
    }

    pub fn success(&mut self, title: impl Into<String>) -> u64 {
        self.push(NoticeKind::Success, title, None, DEFAULT_DURATION)
    }

    pub fn info(&mut self, title: impl Into<String>) -> u64 {
        self.push(NoticeKind::Info, title, None, DEFAULT_DURATION)
    }

    /// Push an error notice with body text and extended duration.
    pub fn error_with(&mut self, title: impl Into<String>, message: impl Into<String>) -> u64 {
        self.push(
            NoticeKind::Error,
            title,
            Some(message.into()),
            ERROR_DURATION,
        )
    }

    /// Push exactly one notice for the outcome of `action`.
    pub fn report<T>(&mut self, action: Action, outcome: &Result<T, LibraryError>) -> u64 {
        match outcome {
            Ok(_) => self.success(action.success_title()),
            Err(err) => {
                debug!(?action, error = %err, "reporting failed action");
                self.error_with(action.error_title(), err.to_string())
            }
        }
    }

    /// Remove a notice by ID. Returns `true` if found and removed.
    pub fn remove(&mut self, id: u64) -> bool {
        let len_before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != len_before
    }

    pub fn get(&self, id: u64) -> Option<&Notice> {
        self.notices.iter().find(|n| n.id == id)
    }

    /// Notices in insertion order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(|n| n.kind == NoticeKind::Error)
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Take every queued notice, leaving the queue empty. IDs keep counting.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
