//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use frost_core::LeaderboardEntry;

use crate::catalog::{self, Product};
use crate::filters;
use crate::routes::layout::Layout;
use crate::state::AppState;

/// Hero counters.
pub struct HeroStat {
    pub value: &'static str,
    pub label: &'static str,
}

const HERO_STATS: [HeroStat; 3] = [
    HeroStat {
        value: "10,000+",
        label: "Happy Players",
    },
    HeroStat {
        value: "50+",
        label: "Unique Ranks",
    },
    HeroStat {
        value: "24/7",
        label: "Support",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub hero_stats: &'static [HeroStat],
    pub featured: Vec<&'static Product>,
    pub popular: Vec<&'static Product>,
    pub spotlight: Option<&'static Product>,
    pub leaderboard: Vec<LeaderboardEntry>,
    /// The standings could not be loaded.
    pub leaderboard_failed: bool,
}

/// Display the home page.
///
/// A leaderboard failure only hides the standings; the page still renders.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let (leaderboard, leaderboard_failed) =
        match state.leaderboard().standings(state.purchases()).await {
            Ok(entries) => (entries.as_ref().clone(), false),
            Err(e) => {
                tracing::error!("Failed to load leaderboard: {e}");
                (Vec::new(), true)
            }
        };

    HomeTemplate {
        layout: Layout::load(&state, &session, "home").await,
        hero_stats: &HERO_STATS,
        featured: catalog::featured(),
        popular: catalog::popular().collect(),
        spotlight: catalog::find("rank-diamond-rank"),
        leaderboard,
        leaderboard_failed,
    }
}
