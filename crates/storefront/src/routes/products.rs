//! Catalog page handlers: ranks, crate keys and unban services.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use frost_core::Category;

use crate::catalog::{self, Product, ProductKind};
use crate::filters;
use crate::routes::layout::Layout;
use crate::state::AppState;

/// A group of product cards under one heading.
pub struct ProductSection {
    pub heading: &'static str,
    pub badge: Option<&'static str>,
    pub products: Vec<&'static Product>,
}

impl ProductSection {
    fn new(
        heading: &'static str,
        badge: Option<&'static str>,
        category: Category,
        kind: ProductKind,
    ) -> Self {
        Self {
            heading,
            badge,
            products: catalog::section(category, kind).collect(),
        }
    }
}

/// Numbered explainer step.
pub struct Step {
    pub title: &'static str,
    pub body: &'static str,
}

/// Boxed notice above the cards.
pub struct Notice {
    pub text: &'static str,
    pub points: &'static [&'static str],
}

/// Shared template for the three catalog pages.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct CatalogTemplate {
    pub layout: Layout,
    pub title: &'static str,
    pub intro: &'static str,
    pub notice: Option<Notice>,
    pub sections: Vec<ProductSection>,
    pub steps_heading: Option<&'static str>,
    pub steps: &'static [Step],
    /// Path the add-to-cart forms return to.
    pub path: &'static str,
}

const KEY_STEPS: [Step; 4] = [
    Step {
        title: "Buy Key",
        body: "Pick a key tier and complete checkout.",
    },
    Step {
        title: "Open Crate",
        body: "Use the key on the matching crate at spawn.",
    },
    Step {
        title: "Get Rewards",
        body: "Higher tiers roll better odds for rare loot.",
    },
    Step {
        title: "Enjoy Items",
        body: "Everything lands straight in your inventory.",
    },
];

const UNBAN_STEPS: [Step; 4] = [
    Step {
        title: "Submit Request",
        body: "Purchase service and provide detailed information about your ban.",
    },
    Step {
        title: "Case Review",
        body: "Our team reviews your case, server logs, and violation history.",
    },
    Step {
        title: "Decision",
        body: "We make a fair decision based on evidence and server policies.",
    },
    Step {
        title: "Resolution",
        body: "You're notified of the decision and can return to playing if approved.",
    },
];

const UNBAN_NOTICE: [&str; 3] = [
    "Refunds available if unban is denied after review",
    "Provide accurate information for faster processing",
    "Multiple violations may require higher tier services",
];

/// Server ranks and rank upgrades.
#[instrument(skip(state, session))]
pub async fn ranks(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    CatalogTemplate {
        layout: Layout::load(&state, &session, "ranks").await,
        title: "Server Ranks",
        intro: "Unlock exclusive perks, commands, and privileges with our premium server ranks. \
                Each rank builds upon the previous one.",
        notice: None,
        sections: vec![
            ProductSection::new("All Ranks", None, Category::Rank, ProductKind::Standard),
            ProductSection::new(
                "Rank Upgrades",
                Some("Save Money"),
                Category::Rank,
                ProductKind::Upgrade,
            ),
        ],
        steps_heading: None,
        steps: &[],
        path: "/ranks",
    }
}

/// Crate keys and key bundles.
#[instrument(skip(state, session))]
pub async fn keys(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    CatalogTemplate {
        layout: Layout::load(&state, &session, "keys").await,
        title: "Crate Keys",
        intro: "Open crates to discover rare items, powerful weapons, exclusive cosmetics, and \
                valuable rewards. Each key tier offers better chances for epic loot.",
        notice: None,
        sections: vec![
            ProductSection::new(
                "Individual Keys",
                None,
                Category::Key,
                ProductKind::Standard,
            ),
            ProductSection::new(
                "Key Bundles",
                Some("Best Value"),
                Category::Key,
                ProductKind::Bundle,
            ),
        ],
        steps_heading: Some("How Crates Work"),
        steps: &KEY_STEPS,
        path: "/keys",
    }
}

/// Unban services and packages.
#[instrument(skip(state, session))]
pub async fn unbans(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    CatalogTemplate {
        layout: Layout::load(&state, &session, "unbans").await,
        title: "Unban Services",
        intro: "Made a mistake? Our professional unban services help you return to the server \
                quickly and fairly. Choose the service that matches your situation.",
        notice: Some(Notice {
            text: "Unban services are reviewed case-by-case. Not all bans are eligible for \
                   removal. Purchasing an unban service does not guarantee unbanning; it \
                   guarantees a thorough review of your case.",
            points: &UNBAN_NOTICE,
        }),
        sections: vec![
            ProductSection::new(
                "Unban Services",
                None,
                Category::Unban,
                ProductKind::Standard,
            ),
            ProductSection::new(
                "Unban Packages",
                Some("Special Offers"),
                Category::Unban,
                ProductKind::Package,
            ),
        ],
        steps_heading: Some("How Our Unban Process Works"),
        steps: &UNBAN_STEPS,
        path: "/unbans",
    }
}
