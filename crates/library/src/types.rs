//! Domain types for the owned game library.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseCriteriaError;
use crate::partition::Partition;

/// Store-assigned identifier of a library entry. Higher means added later.
pub type EntryId = i64;

/// Progress status of an owned game. The only partition key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    #[default]
    Backlog,
    Playing,
    Completed,
    Dropped,
}

impl GameStatus {
    /// Every status, in display order.
    pub const ALL: [GameStatus; 4] = [
        GameStatus::Backlog,
        GameStatus::Playing,
        GameStatus::Completed,
        GameStatus::Dropped,
    ];

    /// The displayed group this status belongs to.
    pub fn partition(self) -> Partition {
        match self {
            GameStatus::Backlog | GameStatus::Playing => Partition::Active,
            GameStatus::Completed | GameStatus::Dropped => Partition::Finished,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            GameStatus::Backlog => "Backlog",
            GameStatus::Playing => "Playing",
            GameStatus::Completed => "Completed",
            GameStatus::Dropped => "Dropped",
        }
    }

    /// Wire name (`BACKLOG`, `PLAYING`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Backlog => "BACKLOG",
            GameStatus::Playing => "PLAYING",
            GameStatus::Completed => "COMPLETED",
            GameStatus::Dropped => "DROPPED",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = ParseCriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCriteriaError::new("status", s))
    }
}

/// Labels indexed by rating value.
const RATING_LABELS: [&str; 6] = ["Unrated", "Bad", "Fair", "Good", "Very good", "Masterpiece"];

/// Star rating in `0..=5`. Zero means unrated.
///
/// Deserializes from a nullable integer; `null` is treated as unrated.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Option<u8>", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const UNRATED: Rating = Rating(0);
    pub const MAX: u8 = 5;

    /// Returns `None` when `value` exceeds [`Rating::MAX`].
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_rated(self) -> bool {
        self.0 > 0
    }

    pub fn label(self) -> &'static str {
        RATING_LABELS[usize::from(self.0)]
    }
}

/// Rejected rating value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rating {0} is out of range 0..=5")]
pub struct RatingOutOfRange(pub u8);

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or(RatingOutOfRange(value))
    }
}

impl TryFrom<Option<u8>> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: Option<u8>) -> Result<Self, Self::Error> {
        value.map_or(Ok(Rating::UNRATED), Rating::try_from)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user-owned record of a catalog game, as loaded from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: EntryId,
    #[serde(default, rename = "rawgId")]
    pub external_id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Comma-delimited genre labels. Order carries no meaning.
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(rename = "gameStatus")]
    pub status: GameStatus,
    #[serde(default)]
    pub rating: Rating,
    /// Manual position among active entries. Never assume it is set.
    #[serde(default)]
    pub list_order: Option<i32>,
}

impl LibraryEntry {
    /// Trimmed, non-empty genre labels.
    pub fn genre_tokens(&self) -> impl Iterator<Item = &str> {
        self.genres
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }

    /// Exact membership test against the genre set.
    pub fn has_genre(&self, label: &str) -> bool {
        self.genre_tokens().any(|g| g == label)
    }

    pub fn partition(&self) -> Partition {
        self.status.partition()
    }

    /// Upsert payload carrying this entry's current fields.
    pub fn to_payload(&self) -> EntryPayload {
        EntryPayload {
            id: Some(self.id),
            external_id: self.external_id,
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            genres: self.genres.clone(),
            status: self.status,
            rating: self.rating,
            list_order: self.list_order,
        }
    }
}

/// Entry shape sent to the store on save. `id` is absent before first persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(default, rename = "rawgId")]
    pub external_id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(rename = "gameStatus")]
    pub status: GameStatus,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub list_order: Option<i32>,
}

impl EntryPayload {
    /// New, unpersisted entry built from a catalog search hit.
    pub fn from_catalog(result: &CatalogResult, status: GameStatus, rating: Rating) -> Self {
        let genres = (!result.genres.is_empty()).then(|| result.genres.join(", "));
        Self {
            id: None,
            external_id: Some(result.external_id),
            title: result.title.clone(),
            image_url: result.image_url.clone(),
            genres,
            status,
            rating,
            list_order: None,
        }
    }
}

/// A game returned by catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResult {
    pub external_id: i32,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub critic_score: Option<i32>,
}

/// Status/rating change submitted by the edit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryUpdate {
    pub id: EntryId,
    pub status: GameStatus,
    pub rating: Rating,
}
