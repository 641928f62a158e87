//! Static page route handlers: terms, privacy and partners.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::routes::layout::Layout;
use crate::state::AppState;

/// Date shown under legal page titles.
const LEGAL_UPDATED: &str = "January 2025";

/// Support address printed on legal pages.
pub const SUPPORT_EMAIL: &str = "Frostasistance@gmail.com";

/// A numbered section of a legal page.
pub struct LegalSection {
    pub heading: &'static str,
    pub body: &'static str,
    pub points: &'static [&'static str],
    pub footer: Option<&'static str>,
}

const fn section(heading: &'static str, body: &'static str) -> LegalSection {
    LegalSection {
        heading,
        body,
        points: &[],
        footer: None,
    }
}

/// Terms and privacy share one template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/legal.html")]
pub struct LegalTemplate {
    pub layout: Layout,
    pub title: &'static str,
    pub updated: &'static str,
    pub sections: &'static [LegalSection],
    pub support_email: &'static str,
}

const TERMS: [LegalSection; 7] = [
    section(
        "Acceptance of Terms",
        "By accessing and using Frost Network's services, you agree to be bound by these Terms \
         of Service. If you do not agree to these terms, please do not use our services.",
    ),
    section(
        "Products and Services",
        "All products purchased through our store are digital items for use on our Minecraft \
         server. Products are delivered instantly upon successful payment. All sales are final \
         unless otherwise stated.",
    ),
    LegalSection {
        heading: "Refund Policy",
        body: "Refunds may be issued under the following circumstances:",
        points: &[
            "Product was not delivered due to technical issues",
            "Duplicate purchase made in error",
            "Unban request denied after review",
        ],
        footer: Some(
            "Refund requests must be submitted within 7 days of purchase through our Discord server.",
        ),
    },
    section(
        "User Conduct",
        "Users must not engage in fraudulent activities, chargebacks, or abuse of our services. \
         Violation of these terms may result in permanent ban from our services without refund.",
    ),
    section(
        "Limitation of Liability",
        "Frost Network shall not be liable for any indirect, incidental, special, or \
         consequential damages resulting from the use or inability to use our services.",
    ),
    section(
        "Changes to Terms",
        "We reserve the right to modify these terms at any time. Continued use of our services \
         after changes constitutes acceptance of the new terms.",
    ),
    section(
        "Contact",
        "For questions regarding these Terms of Service, please contact us through our Discord \
         server or by email.",
    ),
];

const PRIVACY: [LegalSection; 5] = [
    section(
        "Information We Collect",
        "We collect information you provide directly to us, including your email address, \
         Minecraft username, and payment information when you make a purchase. We also \
         automatically collect certain information when you use our services, including your \
         IP address and browser type.",
    ),
    LegalSection {
        heading: "How We Use Your Information",
        body: "We use the information we collect to:",
        points: &[
            "Process transactions and send related information",
            "Send technical notices and support messages",
            "Respond to your comments and questions",
            "Deliver products and services you purchase",
            "Protect against fraudulent or illegal activity",
        ],
        footer: None,
    },
    section(
        "Information Sharing",
        "We do not sell, trade, or otherwise transfer your personal information to outside \
         parties. This does not include trusted third parties who assist us in operating our \
         website, conducting our business, or servicing you, so long as those parties agree to \
         keep this information confidential.",
    ),
    section(
        "Data Security",
        "We implement appropriate security measures to protect your personal information. \
         However, no method of transmission over the Internet is 100% secure, and we cannot \
         guarantee absolute security.",
    ),
    section(
        "Contact Us",
        "If you have any questions about this Privacy Policy, please contact us through our \
         Discord server or by email.",
    ),
];

/// A partner community.
pub struct Partner {
    pub name: &'static str,
    pub badge: &'static str,
    pub message: &'static str,
    pub discord: &'static str,
    /// At most five are shown.
    pub photos: &'static [&'static str],
}

impl Partner {
    /// Photos to display.
    #[must_use]
    pub fn gallery(&self) -> &'static [&'static str] {
        self.photos.get(..5).unwrap_or(self.photos)
    }
}

const PARTNERS: [Partner; 3] = [
    Partner {
        name: "CraftMania Network",
        badge: "Official Partner",
        message: "CraftMania is our longest-standing partner, providing cross-server events and \
                  exclusive collaborative content for both communities.",
        discord: "https://discord.gg/craftmania",
        photos: &[
            "/static/images/partners/minecraft-server-logo-blue.png",
            "/static/images/partners/minecraft-gameplay.png",
            "/static/images/partners/minecraft-community-event.png",
            "/static/images/partners/minecraft-server-spawn.png",
            "/static/images/partners/minecraft-pvp-arena.png",
        ],
    },
    Partner {
        name: "BlockBuilders Inc",
        badge: "Build Partner",
        message: "BlockBuilders provides amazing build services and custom maps for our server. \
                  Their team has created some of our most iconic locations!",
        discord: "https://discord.gg/blockbuilders",
        photos: &[
            "/static/images/partners/minecraft-castle.png",
            "/static/images/partners/minecraft-medieval-town.jpg",
            "/static/images/partners/minecraft-fantasy-build.jpg",
        ],
    },
    Partner {
        name: "PixelCraft Studios",
        badge: "Content Partner",
        message: "PixelCraft creates stunning resource packs and textures that enhance the visual \
                  experience on Frost Network.",
        discord: "https://discord.gg/pixelcraft",
        photos: &[
            "/static/images/partners/minecraft-texture-pack-preview.jpg",
            "/static/images/partners/minecraft-shaders-screenshot.jpg",
            "/static/images/partners/minecraft-resource-pack-comparison.jpg",
            "/static/images/partners/minecraft-custom-textures.jpg",
        ],
    },
];

/// Partners page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/partners.html")]
pub struct PartnersTemplate {
    pub layout: Layout,
    pub partners: &'static [Partner],
}

/// Display the Terms of Service page.
#[instrument(skip(state, session))]
pub async fn terms(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    LegalTemplate {
        layout: Layout::load(&state, &session, "terms").await,
        title: "Terms of Service",
        updated: LEGAL_UPDATED,
        sections: &TERMS,
        support_email: SUPPORT_EMAIL,
    }
}

/// Display the Privacy Policy page.
#[instrument(skip(state, session))]
pub async fn privacy(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    LegalTemplate {
        layout: Layout::load(&state, &session, "privacy").await,
        title: "Privacy Policy",
        updated: LEGAL_UPDATED,
        sections: &PRIVACY,
        support_email: SUPPORT_EMAIL,
    }
}

/// Display the partners page.
#[instrument(skip(state, session))]
pub async fn partners(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    PartnersTemplate {
        layout: Layout::load(&state, &session, "partners").await,
        partners: &PARTNERS,
    }
}
