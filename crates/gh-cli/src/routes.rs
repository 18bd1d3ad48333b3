//! Route table and access guard.
//!
//! Paths map to [`Route`]s; [`resolve`] applies the access guard and picks
//! the [`View`] to show for the current session state.
//!
//! | Path | Route | Needs identity |
//! |---|---|---|
//! | `/` | home | no |
//! | `/games` | catalog | no |
//! | `/game/{id}` | game details | only with `protect_game_details` |
//! | `/login`, `/register`, `/forgot-password` | forms | no |
//! | `/profile`, `/update-profile` | account | yes |

use gh_catalog::Catalog;
use gh_model::{Game, Identity};
use gh_session::SessionState;
use url::Url;

const ROUTE_BASE: &str = "http://gamehub.local/";

/// Navigable locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/games`
    Games,
    /// `/game/{id}`
    GameDetails(String),
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/forgot-password`, optionally prefilled with `?email=`.
    ForgotPassword {
        /// Address to prefill.
        email: Option<String>,
    },
    /// `/profile`
    Profile,
    /// `/update-profile`
    UpdateProfile,
    /// Anything else.
    NotFound(String),
}

impl Route {
    /// Parses a path such as `/game/3` or `/forgot-password?email=a%40b.co`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let Ok(url) = Url::parse(ROUTE_BASE).and_then(|base| base.join(path.trim())) else {
            return Self::NotFound(path.to_string());
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Self::Home,
            ["games"] => Self::Games,
            ["game", id] => Self::GameDetails((*id).to_string()),
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["forgot-password"] => Self::ForgotPassword {
                email: url
                    .query_pairs()
                    .find(|(k, _)| k == "email")
                    .map(|(_, v)| v.into_owned())
                    .filter(|v| !v.is_empty()),
            },
            ["profile"] => Self::Profile,
            ["update-profile"] => Self::UpdateProfile,
            _ => Self::NotFound(path.to_string()),
        }
    }

    /// Returns the canonical path.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Games => "/games".to_string(),
            Self::GameDetails(id) => format!("/game/{id}"),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::ForgotPassword { email: None } => "/forgot-password".to_string(),
            Self::ForgotPassword { email: Some(email) } => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("email", email)
                    .finish();
                format!("/forgot-password?{query}")
            }
            Self::Profile => "/profile".to_string(),
            Self::UpdateProfile => "/update-profile".to_string(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Checks if the route needs a signed-in user.
    #[must_use]
    pub const fn requires_identity(&self, options: &RouteOptions) -> bool {
        match self {
            Self::Profile | Self::UpdateProfile => true,
            Self::GameDetails(_) => options.protect_game_details,
            _ => false,
        }
    }
}

/// Switches affecting routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOptions {
    /// Whether game details require a signed-in user.
    pub protect_game_details: bool,
    /// Number of games on the home page.
    pub popular_count: usize,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            protect_game_details: false,
            popular_count: gh_catalog::POPULAR_COUNT,
        }
    }
}

/// Content to show.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Best rated games.
    Home {
        /// Games to feature.
        popular: Vec<Game>,
    },
    /// Full catalog, best rated first.
    Games {
        /// All games.
        games: Vec<Game>,
    },
    /// One game.
    GameDetails(Game),
    /// Unknown game id.
    GameNotFound(String),
    /// Login form.
    Login,
    /// Registration form.
    Register,
    /// Password reset form.
    ForgotPassword {
        /// Address to prefill.
        email: Option<String>,
    },
    /// Signed-in user's profile.
    Profile(Identity),
    /// Profile edit form, prefilled from the identity.
    UpdateProfile(Identity),
    /// Unknown path.
    NotFound(String),
}

/// Result of resolving a path.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Show the view.
    Render(View),
    /// The session is still loading; show a loading indicator.
    Pending,
    /// Navigate elsewhere.
    Redirect(Route),
}

/// Resolves `path` for the given session state.
#[must_use]
pub fn resolve(path: &str, session: &SessionState, catalog: &Catalog, options: &RouteOptions) -> Resolution {
    let route = Route::parse(path);

    let identity = if route.requires_identity(options) {
        if session.loading {
            return Resolution::Pending;
        }
        match &session.identity {
            Some(identity) => Some(identity.clone()),
            None => {
                tracing::debug!(path = %route.path(), "protected route without identity; redirecting");
                return Resolution::Redirect(Route::Login);
            }
        }
    } else {
        session.identity.clone()
    };

    let view = match route {
        Route::Home => View::Home {
            popular: catalog.popular(options.popular_count).into_iter().cloned().collect(),
        },
        Route::Games => View::Games {
            games: catalog.sorted_by_rating().into_iter().cloned().collect(),
        },
        Route::GameDetails(id) => match catalog.find(&id) {
            Some(game) => View::GameDetails(game.clone()),
            None => View::GameNotFound(id),
        },
        Route::Login => View::Login,
        Route::Register => View::Register,
        Route::ForgotPassword { email } => View::ForgotPassword { email },
        Route::Profile => match identity {
            Some(identity) => View::Profile(identity),
            None => return Resolution::Redirect(Route::Login),
        },
        Route::UpdateProfile => match identity {
            Some(identity) => View::UpdateProfile(identity),
            None => return Resolution::Redirect(Route::Login),
        },
        Route::NotFound(path) => View::NotFound(path),
    };

    Resolution::Render(view)
}
