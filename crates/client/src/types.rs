//! Wire types of the game-organizer API that do not map 1:1 onto library types.

use gameshelf_library::CatalogResult;
use serde::{Deserialize, Serialize};

/// A game returned by `GET /api/games/organize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogHit {
    pub name: String,
    pub rawg_id: i32,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub metacritic: Option<i32>,
}

impl From<CatalogHit> for CatalogResult {
    fn from(hit: CatalogHit) -> Self {
        CatalogResult {
            external_id: hit.rawg_id,
            title: hit.name,
            image_url: hit.background_image.filter(|url| !url.is_empty()),
            genres: hit.genres.unwrap_or_default(),
            release_year: hit.release_year,
            critic_score: hit.metacritic,
        }
    }
}
