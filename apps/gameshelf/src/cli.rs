use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gameshelf_library::{EntryId, GameStatus, GenreFilter, Rating, SortMode, StatusFilter};

#[derive(Debug, Parser)]
#[command(name = "gameshelf")]
#[command(version)]
#[command(about = "Track a personal game backlog against a game-organizer server")]
pub struct Cli {
    #[arg(
        short = 's',
        long,
        env = "GAMESHELF_SERVER_URL",
        help = "Server base URL. Overrides server_url from the config file."
    )]
    pub server: Option<String>,

    #[arg(
        short = 'c',
        long,
        env = "GAMESHELF_CONFIG",
        help = "Path to the TOML config file."
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Search the game catalog by name.")]
    Search(SearchArgs),
    #[command(about = "Show the library grouped into active and finished games.")]
    List(ListArgs),
    #[command(about = "Search the catalog and add one hit to the library.")]
    Add(AddArgs),
    #[command(about = "Change status or rating of a library entry.")]
    Edit(EditArgs),
    #[command(about = "Remove a library entry.")]
    Remove(RemoveArgs),
    #[command(about = "Set the manual order of active games (switches to custom sort).")]
    Reorder(ReorderArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(help = "Game name to search for.")]
    pub query: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, default_value = "ALL", help = "Status filter (ALL, BACKLOG, PLAYING, COMPLETED, DROPPED).")]
    pub status: StatusFilter,

    #[arg(long, default_value = "ALL", help = "Genre filter; exact genre label or ALL.")]
    pub genre: GenreFilter,

    #[arg(long, help = "Sort mode (newest, rating_desc, rating_asc, name_asc, custom).")]
    pub sort: Option<SortMode>,

    #[arg(long, help = "Print groups as JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(help = "Game name to search for.")]
    pub query: String,

    #[arg(long, default_value_t = 0, help = "Index of the search hit to add.")]
    pub pick: usize,

    #[arg(long, default_value = "BACKLOG", help = "Initial status.")]
    pub status: GameStatus,

    #[arg(long, value_parser = parse_rating, default_value = "0", help = "Initial rating, 0-5.")]
    pub rating: Rating,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(help = "Library entry id.")]
    pub id: EntryId,

    #[arg(long, help = "New status.")]
    pub status: Option<GameStatus>,

    #[arg(long, value_parser = parse_rating, help = "New rating, 0-5.")]
    pub rating: Option<Rating>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[arg(help = "Library entry id.")]
    pub id: EntryId,
}

#[derive(Debug, Args)]
pub struct ReorderArgs {
    #[arg(
        required = true,
        num_args = 1..,
        help = "Entry ids in the desired order. Active games not listed keep their relative order after them."
    )]
    pub ids: Vec<EntryId>,
}

fn parse_rating(raw: &str) -> Result<Rating, String> {
    let value: u8 = raw
        .trim()
        .parse()
        .map_err(|_| format!("rating must be a number from 0 to {}", Rating::MAX))?;
    Rating::try_from(value).map_err(|err| err.to_string())
}
