//! # gh-catalog
//!
//! The read-only game catalog.
//!
//! Games are loaded once, either from a JSON file or from the data set
//! compiled into the crate, and never change afterwards. Views read the
//! catalog in file order, sorted by rating, or by identifier.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use gh_model::Game;

pub use error::{CatalogError, CatalogResult};

/// Number of games shown on the home page.
pub const POPULAR_COUNT: usize = 6;

const BUNDLED_GAMES: &str = include_str!("../data/games.json");

/// Ordered, immutable list of games.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    games: Vec<Game>,
}

impl Catalog {
    /// Creates a catalog from games in file order.
    ///
    /// Games are kept as given. A repeated id is logged; [`find`](Self::find)
    /// returns the first game with that id.
    #[must_use]
    pub fn new(games: Vec<Game>) -> Self {
        let mut seen = HashSet::with_capacity(games.len());
        for game in &games {
            if !seen.insert(game.id.as_str()) {
                tracing::warn!(id = %game.id, "duplicate game id in catalog");
            }
        }
        Self { games }
    }

    /// Parses a JSON array of games.
    ///
    /// ## Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let games: Vec<Game> = serde_json::from_str(json)?;
        Ok(Self::new(games))
    }

    /// Loads the catalog from a JSON file.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;

        tracing::debug!(path = %path.display(), games = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Returns the data set compiled into the crate.
    ///
    /// ## Errors
    ///
    /// Only fails if the bundled data is corrupt.
    pub fn bundled() -> CatalogResult<Self> {
        Self::from_json(BUNDLED_GAMES)
    }

    /// Returns all games in file order.
    #[must_use]
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Returns the number of games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Returns all games, best rated first.
    ///
    /// The sort is stable: equal ratings keep their file order. Games whose
    /// rating cannot be parsed come last, also in file order.
    #[must_use]
    pub fn sorted_by_rating(&self) -> Vec<&Game> {
        let mut sorted: Vec<&Game> = self.games.iter().collect();
        sorted.sort_by(|a, b| compare_ratings(a.rating(), b.rating()));
        sorted
    }

    /// Returns the `n` best rated games.
    #[must_use]
    pub fn popular(&self, n: usize) -> Vec<&Game> {
        let mut sorted = self.sorted_by_rating();
        sorted.truncate(n);
        sorted
    }

    /// Looks a game up by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }
}

/// Descending order with unrated games last.
fn compare_ratings(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
