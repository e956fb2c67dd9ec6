//! Plain-text rendering of library state and notices.

use std::fmt::Write as _;

use gameshelf_feedback::{Notice, NoticeKind};
use gameshelf_library::{
    CatalogResult, DisplayGroups, FilterCriteria, GenreFilter, LibraryEntry, Partition, SortMode,
    StatusFilter,
};
use serde::Serialize;

/// JSON shape of `gameshelf list --json`.
#[derive(Debug, Serialize)]
pub struct ListJson<'a> {
    pub sort: SortMode,
    pub genres: Vec<&'a str>,
    #[serde(flatten)]
    pub groups: &'a DisplayGroups,
}

pub fn criteria_line(filter: &FilterCriteria, sort: SortMode) -> String {
    let status = match filter.status {
        StatusFilter::All => "ALL",
        StatusFilter::Only(status) => status.as_str(),
    };
    format!("Status: {status}  Genre: {}  Sort: {sort}", filter.genre.label())
}

/// Genre options with the current selection marked.
pub fn genre_line(options: &[GenreFilter], selected: &GenreFilter) -> String {
    let labels: Vec<String> = options
        .iter()
        .map(|option| {
            if option == selected {
                format!("[{}]", option.label())
            } else {
                option.label().to_string()
            }
        })
        .collect();
    format!("Genres: {}", labels.join(", "))
}

pub fn entry_line(entry: &LibraryEntry) -> String {
    let mut line = format!(
        "#{:<5} {}  [{}]  {}",
        entry.id,
        entry.title,
        entry.status,
        rating_text(entry)
    );
    if let Some(genres) = entry.genres.as_deref().filter(|g| !g.trim().is_empty()) {
        let _ = write!(line, "  ({genres})");
    }
    line
}

fn rating_text(entry: &LibraryEntry) -> String {
    if entry.rating.is_rated() {
        format!("{}/5 {}", entry.rating, entry.rating.label())
    } else {
        entry.rating.label().to_string()
    }
}

/// Both groups with headers; an empty group shows its empty state.
pub fn groups(groups: &DisplayGroups) -> String {
    let mut out = String::new();
    for (partition, header) in [(Partition::Active, "Active"), (Partition::Finished, "Finished")] {
        let entries = groups.group(partition);
        let _ = writeln!(out, "== {header} ({}) ==", entries.len());
        if entries.is_empty() {
            let (title, message) = partition.empty_state();
            let _ = writeln!(out, "  {title}");
            let _ = writeln!(out, "  {message}");
        }
        for entry in entries {
            let _ = writeln!(out, "  {}", entry_line(entry));
        }
    }
    out
}

pub fn catalog_hits(hits: &[CatalogResult]) -> String {
    let mut out = String::new();
    for (index, hit) in hits.iter().enumerate() {
        let _ = write!(out, "{index:>3}. {}", hit.title);
        if let Some(year) = hit.release_year {
            let _ = write!(out, " ({year})");
        }
        if let Some(score) = hit.critic_score {
            let _ = write!(out, "  metacritic {score}");
        }
        if !hit.genres.is_empty() {
            let _ = write!(out, "  [{}]", hit.genres.join(", "));
        }
        out.push('\n');
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    let tag = match notice.kind {
        NoticeKind::Success => "ok",
        NoticeKind::Error => "error",
        NoticeKind::Info => "info",
    };
    match &notice.message {
        Some(message) => format!("[{tag}] {}: {message}", notice.title),
        None => format!("[{tag}] {}", notice.title),
    }
}
