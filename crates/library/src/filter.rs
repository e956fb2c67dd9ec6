//! Filter and sort criteria, and the pure derivation of the displayed order.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::ParseCriteriaError;
use crate::types::{GameStatus, LibraryEntry};

/// Wire/CLI spelling of the "no restriction" option.
pub const ALL: &str = "ALL";

/// Status restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(GameStatus),
}

impl StatusFilter {
    pub fn matches(self, entry: &LibraryEntry) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => entry.status == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseCriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Genre restriction. Labels are matched exactly against trimmed tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum GenreFilter {
    #[default]
    All,
    Only(String),
}

impl GenreFilter {
    pub fn matches(&self, entry: &LibraryEntry) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Only(label) => entry.has_genre(label),
        }
    }

    /// Option text as offered to the user.
    pub fn label(&self) -> &str {
        match self {
            GenreFilter::All => ALL,
            GenreFilter::Only(label) => label,
        }
    }
}

impl From<&str> for GenreFilter {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == ALL {
            GenreFilter::All
        } else {
            GenreFilter::Only(s.to_owned())
        }
    }
}

/// Combined filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub status: StatusFilter,
    pub genre: GenreFilter,
}

impl FilterCriteria {
    pub fn matches(&self, entry: &LibraryEntry) -> bool {
        self.status.matches(entry) && self.genre.matches(entry)
    }
}

/// Display order of the library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Most recently added first.
    #[default]
    Newest,
    RatingDesc,
    RatingAsc,
    NameAsc,
    /// Manual order (`listOrder`), the only mode that allows reordering.
    Custom,
}

impl SortMode {
    pub const ALL: [SortMode; 5] = [
        SortMode::Newest,
        SortMode::RatingDesc,
        SortMode::RatingAsc,
        SortMode::NameAsc,
        SortMode::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::RatingDesc => "rating_desc",
            SortMode::RatingAsc => "rating_asc",
            SortMode::NameAsc => "name_asc",
            SortMode::Custom => "custom",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ParseCriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCriteriaError::new("sort mode", s))
    }
}

/// Filters and orders `collection` without touching it.
///
/// Sorting is stable, so ties keep the collection's order.
pub fn derive(collection: &[LibraryEntry], filter: &FilterCriteria, sort: SortMode) -> Vec<LibraryEntry> {
    let mut out: Vec<LibraryEntry> = collection
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect();

    match sort {
        SortMode::Newest => out.sort_by(|a, b| b.id.cmp(&a.id)),
        SortMode::RatingDesc => out.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortMode::RatingAsc => out.sort_by(|a, b| a.rating.cmp(&b.rating)),
        SortMode::NameAsc => out.sort_by_cached_key(|e| (title_key(&e.title), e.title.clone())),
        SortMode::Custom => out.sort_by(compare_manual),
    }

    out
}

/// Primary key for name sorting: accents stripped, case folded.
///
/// "Édith" sorts with "Edith" and "Ōkami" with "Okami". Equal keys fall
/// back to the raw title.
fn title_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Ascending `listOrder`, unset last, then newest first.
fn compare_manual(a: &LibraryEntry, b: &LibraryEntry) -> Ordering {
    manual_rank(a)
        .cmp(&manual_rank(b))
        .then_with(|| b.id.cmp(&a.id))
}

fn manual_rank(entry: &LibraryEntry) -> (bool, i32) {
    match entry.list_order {
        Some(order) => (false, order),
        None => (true, 0),
    }
}

/// Genre options for the whole collection: `All` first, then every distinct
/// token in lexicographic order.
pub fn genre_options(collection: &[LibraryEntry]) -> Vec<GenreFilter> {
    let labels: BTreeSet<&str> = collection.iter().flat_map(LibraryEntry::genre_tokens).collect();

    std::iter::once(GenreFilter::All)
        .chain(labels.into_iter().map(|g| GenreFilter::Only(g.to_owned())))
        .collect()
}

/// Keeps `selected` if it is still offered, otherwise falls back to `All`.
pub fn retain_genre_selection(selected: &GenreFilter, options: &[GenreFilter]) -> GenreFilter {
    if options.contains(selected) {
        selected.clone()
    } else {
        GenreFilter::All
    }
}
