//! User feedback for library actions: a notice queue and per-action wording.

pub mod notice;

pub use notice::{Action, Notice, NoticeKind, NoticeQueue};
