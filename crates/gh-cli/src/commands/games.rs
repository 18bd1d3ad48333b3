//! Catalog commands.

use gh_model::Game;
use serde::Serialize;
use tabled::Tabled;

use crate::app::App;
use crate::cli::GamesCommand;
use crate::output::output;
use crate::routes::Route;
use crate::CliResult;

use super::open::run_open;

/// Game row for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct GameRow {
    /// Position in the listing.
    #[tabled(rename = "#")]
    pub rank: usize,
    /// Game id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Developer.
    pub developer: String,
    /// Category.
    pub category: String,
    /// Rating as written in the catalog.
    pub rating: String,
}

impl GameRow {
    /// Creates a row.
    #[must_use]
    pub fn new(rank: usize, game: &Game) -> Self {
        Self {
            rank,
            id: game.id.clone(),
            title: game.title.clone(),
            developer: game.developer.clone(),
            category: game.category.clone(),
            rating: game.ratings.clone(),
        }
    }
}

/// Runs a games command.
pub fn run_games(cmd: GamesCommand, app: &App) -> CliResult<()> {
    match cmd {
        GamesCommand::List { top } => {
            let games = match top {
                Some(n) => app.catalog.popular(n),
                None => app.catalog.sorted_by_rating(),
            };
            let rows: Vec<GameRow> = games
                .into_iter()
                .enumerate()
                .map(|(i, game)| GameRow::new(i + 1, game))
                .collect();
            output(&rows, app.output)
        }
        GamesCommand::Show { id } => run_open(&Route::GameDetails(id).path(), app),
    }
}
