//! Product catalog.
//!
//! The store sells a fixed set of in-game entitlements. Products are
//! compiled in; prices live here and nowhere else, so the cart always
//! re-reads them by id instead of trusting form input.

use std::sync::LazyLock;

use frost_core::{CartItem, Category, Price};

/// How a product is presented within its category page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductKind {
    /// Ranks, single crate keys, unban tiers.
    Standard,
    /// Rank-to-rank upgrades.
    Upgrade,
    /// Multi-key bundles.
    Bundle,
    /// Unban insurance and multi-account packs.
    Package,
}

/// A product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// `{category}-{slug}`, e.g. `rank-diamond-rank`.
    pub id: String,
    pub title: &'static str,
    pub price: Price,
    pub original_price: Option<Price>,
    pub image: String,
    pub description: &'static str,
    pub badge: &'static str,
    pub popular: bool,
    pub category: Category,
    pub kind: ProductKind,
    /// Perks for ranks, rewards for keys, features for unbans.
    pub highlights: Vec<&'static str>,
    /// Unban review turnaround.
    pub processing_time: Option<&'static str>,
    /// Violations an unban tier covers.
    pub coverage: Vec<&'static str>,
}

impl Product {
    /// Whole-percent discount from the original price, if any.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        self.original_price
            .and_then(|original| self.price.discount_from(original))
    }

    /// Cart line for one unit of this product.
    #[must_use]
    pub fn to_cart_item(&self) -> CartItem {
        CartItem {
            id: self.id.clone(),
            title: self.title.to_string(),
            price: self.price,
            original_price: self.original_price,
            image: self.image.clone(),
            category: self.category,
            quantity: 1,
        }
    }
}

/// Lowercase, alphanumerics only, runs of anything else collapsed to `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

struct Listing {
    title: &'static str,
    cents: i64,
    original_cents: Option<i64>,
    image: &'static str,
    description: &'static str,
    badge: &'static str,
    popular: bool,
    highlights: &'static [&'static str],
    processing_time: Option<&'static str>,
    coverage: &'static [&'static str],
}

const fn listing(
    title: &'static str,
    cents: i64,
    original_cents: Option<i64>,
    image: &'static str,
    description: &'static str,
    badge: &'static str,
) -> Listing {
    Listing {
        title,
        cents,
        original_cents,
        image,
        description,
        badge,
        popular: false,
        highlights: &[],
        processing_time: None,
        coverage: &[],
    }
}

impl Listing {
    const fn popular(mut self) -> Self {
        self.popular = true;
        self
    }

    const fn highlights(mut self, highlights: &'static [&'static str]) -> Self {
        self.highlights = highlights;
        self
    }

    const fn unban(
        mut self,
        processing_time: &'static str,
        coverage: &'static [&'static str],
    ) -> Self {
        self.processing_time = Some(processing_time);
        self.coverage = coverage;
        self
    }

    fn build(self, category: Category, kind: ProductKind) -> Product {
        Product {
            id: format!("{}-{}", category.as_str(), slugify(self.title)),
            title: self.title,
            price: Price::from_cents(self.cents),
            original_price: self.original_cents.map(Price::from_cents),
            image: format!("/static/images/{}.png", self.image),
            description: self.description,
            badge: self.badge,
            popular: self.popular,
            category,
            kind,
            highlights: self.highlights.to_vec(),
            processing_time: self.processing_time,
            coverage: self.coverage.to_vec(),
        }
    }
}

fn ranks() -> Vec<Product> {
    let standard = [
        listing(
            "VIP Rank",
            999,
            None,
            "minecraft-vip-rank",
            "Basic VIP perks including colored chat, priority join, and exclusive areas.",
            "STARTER",
        )
        .highlights(&[
            "Colored Chat",
            "Priority Join",
            "VIP Areas",
            "Daily Rewards",
        ]),
        listing(
            "Premium Rank",
            1999,
            None,
            "minecraft-premium-rank",
            "Enhanced gameplay with fly permissions, extra homes, and premium commands.",
            "POPULAR",
        )
        .highlights(&[
            "All VIP Perks",
            "Fly Permission",
            "5 Extra Homes",
            "Premium Commands",
        ]),
        listing(
            "Elite Rank",
            3499,
            None,
            "minecraft-elite-rank",
            "Advanced rank with creative mode access, world edit, and exclusive kits.",
            "ADVANCED",
        )
        .highlights(&[
            "All Premium Perks",
            "Creative Mode",
            "WorldEdit",
            "Elite Kits",
            "Custom Prefix",
        ]),
        listing(
            "Diamond Rank",
            4999,
            Some(6999),
            "minecraft-diamond-rank-badge",
            "Top-tier rank with god mode, unlimited homes, and diamond exclusive perks.",
            "30% OFF",
        )
        .popular()
        .highlights(&[
            "All Elite Perks",
            "God Mode",
            "Unlimited Homes",
            "Diamond Kits",
            "Custom Commands",
        ]),
        listing(
            "Legendary Rank",
            7999,
            None,
            "minecraft-legendary-rank",
            "Ultimate rank with server operator privileges and legendary exclusive content.",
            "ULTIMATE",
        )
        .highlights(&[
            "All Diamond Perks",
            "OP Privileges",
            "Legendary Kits",
            "Custom Worlds",
            "Staff Chat",
        ]),
        listing(
            "Mythic Rank",
            9999,
            None,
            "minecraft-mythic-rank",
            "The highest achievable rank with mythic powers and exclusive server privileges.",
            "EXCLUSIVE",
        )
        .highlights(&[
            "All Legendary Perks",
            "Mythic Powers",
            "Server Events",
            "Custom Plugins",
            "VIP Support",
        ]),
    ];
    let upgrades = [
        listing(
            "VIP → Premium Upgrade",
            1299,
            Some(1999),
            "minecraft-rank-upgrade",
            "Upgrade from VIP to Premium rank and keep all your progress.",
            "UPGRADE",
        ),
        listing(
            "Premium → Elite Upgrade",
            1899,
            Some(3499),
            "minecraft-rank-upgrade",
            "Upgrade from Premium to Elite rank with exclusive benefits.",
            "UPGRADE",
        ),
        listing(
            "Elite → Diamond Upgrade",
            2299,
            Some(4999),
            "minecraft-rank-upgrade",
            "Upgrade to Diamond rank and unlock premium features.",
            "UPGRADE",
        ),
    ];

    let upgrades = upgrades
        .into_iter()
        .map(|s| s.build(Category::Rank, ProductKind::Upgrade));
    standard
        .into_iter()
        .map(|s| s.build(Category::Rank, ProductKind::Standard))
        .chain(upgrades)
        .collect()
}

fn keys() -> Vec<Product> {
    let standard = [
        listing(
            "Common Crate Key",
            299,
            None,
            "minecraft-common-crate-key",
            "Open common crates for basic items, materials, and small rewards.",
            "STARTER",
        )
        .highlights(&[
            "Basic Materials",
            "Common Tools",
            "Small Coin Rewards",
            "Food Items",
        ]),
        listing(
            "Rare Crate Key",
            799,
            None,
            "minecraft-rare-crate-key",
            "Unlock rare crates containing valuable items and enchanted gear.",
            "POPULAR",
        )
        .popular()
        .highlights(&[
            "Enchanted Tools",
            "Rare Materials",
            "Medium Coin Rewards",
            "Armor Sets",
        ]),
        listing(
            "Epic Crate Key",
            1499,
            None,
            "minecraft-epic-crate-key",
            "Access epic crates with powerful weapons and exclusive cosmetics.",
            "ADVANCED",
        )
        .highlights(&[
            "Epic Weapons",
            "Exclusive Cosmetics",
            "Large Coin Rewards",
            "Special Blocks",
        ]),
        listing(
            "Legendary Crate Key",
            2499,
            None,
            "minecraft-legendary-crate-key",
            "Open legendary crates for the rarest items and mythic equipment.",
            "PREMIUM",
        )
        .highlights(&[
            "Mythic Equipment",
            "Legendary Items",
            "Huge Coin Rewards",
            "Custom Skins",
        ]),
        listing(
            "Mythic Crate Key",
            3999,
            None,
            "minecraft-mythic-crate-key",
            "The ultimate crate key for the most exclusive and powerful items.",
            "ULTIMATE",
        )
        .highlights(&[
            "Godlike Items",
            "Exclusive Titles",
            "Massive Rewards",
            "Server Perks",
        ]),
    ];
    let bundles = [
        listing(
            "Starter Key Bundle",
            1999,
            Some(2999),
            "minecraft-key-bundle-starter",
            "5x Common Keys + 2x Rare Keys + 1x Epic Key",
            "BUNDLE",
        ),
        listing(
            "Premium Key Bundle",
            4999,
            Some(7499),
            "minecraft-key-bundle-premium",
            "3x Rare Keys + 3x Epic Keys + 2x Legendary Keys",
            "BEST VALUE",
        )
        .popular(),
        listing(
            "Ultimate Key Bundle",
            8999,
            Some(12999),
            "minecraft-key-bundle-ultimate",
            "5x Epic Keys + 3x Legendary Keys + 2x Mythic Keys",
            "ULTIMATE",
        ),
    ];

    let bundles = bundles
        .into_iter()
        .map(|s| s.build(Category::Key, ProductKind::Bundle));
    standard
        .into_iter()
        .map(|s| s.build(Category::Key, ProductKind::Standard))
        .chain(bundles)
        .collect()
}

fn unbans() -> Vec<Product> {
    let standard = [
        listing(
            "Standard Unban",
            999,
            None,
            "minecraft-standard-unban",
            "Basic unban service for minor infractions. Processing time: 24-48 hours.",
            "BASIC",
        )
        .highlights(&[
            "Minor Infractions",
            "24-48h Processing",
            "Email Support",
            "One-time Use",
        ])
        .unban(
            "24-48 hours",
            &[
                "Chat Violations",
                "Minor Griefing",
                "AFK Violations",
                "First Offenses",
            ],
        ),
        listing(
            "Premium Unban",
            1999,
            None,
            "minecraft-unban-service",
            "Fast-track unban service for moderate violations. Processing time: 12-24 hours.",
            "POPULAR",
        )
        .popular()
        .highlights(&[
            "Moderate Violations",
            "12-24h Processing",
            "Priority Support",
            "Appeal Assistance",
        ])
        .unban(
            "12-24 hours",
            &[
                "Moderate Griefing",
                "PvP Violations",
                "Building Violations",
                "Repeat Offenses",
            ],
        ),
        listing(
            "Express Unban",
            3499,
            None,
            "minecraft-express-unban",
            "Immediate unban service for urgent cases. Processing time: 1-6 hours.",
            "FAST",
        )
        .highlights(&[
            "Urgent Cases",
            "1-6h Processing",
            "Live Chat Support",
            "Guaranteed Review",
        ])
        .unban(
            "1-6 hours",
            &[
                "Major Violations",
                "Hacking Accusations",
                "Serious Griefing",
                "Complex Cases",
            ],
        ),
        listing(
            "Ultimate Unban",
            4999,
            None,
            "minecraft-ultimate-unban",
            "Premium unban service for severe violations with personal case manager.",
            "PREMIUM",
        )
        .highlights(&[
            "Severe Violations",
            "Instant Processing",
            "Personal Manager",
            "Full Documentation",
        ])
        .unban(
            "Instant",
            &[
                "Permanent Bans",
                "IP Bans",
                "Hardware Bans",
                "All Violations",
            ],
        ),
    ];
    let packages = [
        listing(
            "Unban Insurance",
            1499,
            None,
            "minecraft-unban-insurance",
            "3-month protection plan covering up to 2 unbans for any violations.",
            "PROTECTION",
        ),
        listing(
            "Family Unban Pack",
            3999,
            Some(5999),
            "minecraft-family-unban",
            "Unban service for up to 3 accounts in your household.",
            "FAMILY",
        ),
        listing(
            "Guild Unban Service",
            8999,
            Some(14999),
            "minecraft-guild-unban",
            "Mass unban service for guild/clan members (up to 10 accounts).",
            "BULK",
        ),
    ];

    let packages = packages
        .into_iter()
        .map(|s| s.build(Category::Unban, ProductKind::Package));
    standard
        .into_iter()
        .map(|s| s.build(Category::Unban, ProductKind::Standard))
        .chain(packages)
        .collect()
}

static CATALOG: LazyLock<Vec<Product>> = LazyLock::new(|| {
    let mut all = ranks();
    all.extend(keys());
    all.extend(unbans());
    all
});

/// Products highlighted on the home page.
const FEATURED: [&str; 3] = [
    "rank-diamond-rank",
    "key-legendary-crate-key",
    "unban-premium-unban",
];

/// Every product, ranks first.
#[must_use]
pub fn all() -> &'static [Product] {
    &CATALOG
}

/// Look a product up by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.id == id)
}

/// Products of one category and presentation kind, in catalog order.
pub fn section(category: Category, kind: ProductKind) -> impl Iterator<Item = &'static Product> {
    CATALOG
        .iter()
        .filter(move |p| p.category == category && p.kind == kind)
}

/// Home page picks.
#[must_use]
pub fn featured() -> Vec<&'static Product> {
    FEATURED.iter().filter_map(|id| find(id)).collect()
}

/// Products flagged popular, in catalog order.
pub fn popular() -> impl Iterator<Item = &'static Product> {
    CATALOG.iter().filter(|p| p.popular)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("VIP Rank"), "vip-rank");
        assert_eq!(slugify("VIP → Premium Upgrade"), "vip-premium-upgrade");
        assert_eq!(slugify("  Guild  Unban Service "), "guild-unban-service");
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(section(Category::Rank, ProductKind::Standard).count(), 6);
        assert_eq!(section(Category::Rank, ProductKind::Upgrade).count(), 3);
        assert_eq!(section(Category::Key, ProductKind::Standard).count(), 5);
        assert_eq!(section(Category::Key, ProductKind::Bundle).count(), 3);
        assert_eq!(section(Category::Unban, ProductKind::Standard).count(), 4);
        assert_eq!(section(Category::Unban, ProductKind::Package).count(), 3);
        assert_eq!(all().len(), 24);
    }

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<&str> = all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn test_find_and_prices() {
        let vip = find("rank-vip-rank").unwrap();
        assert_eq!(vip.price, Price::from_cents(999));
        assert_eq!(vip.category, Category::Rank);
        assert!(find("rank-owner").is_none());
    }

    #[test]
    fn test_discounts() {
        assert_eq!(
            find("rank-diamond-rank").unwrap().discount_percent(),
            Some(29)
        );
        assert_eq!(
            find("key-ultimate-key-bundle").unwrap().discount_percent(),
            Some(31)
        );
        assert_eq!(find("key-rare-crate-key").unwrap().discount_percent(), None);
    }

    #[test]
    fn test_popular_spans_categories() {
        let ids: Vec<&str> = popular().map(|p| p.id.as_str()).collect();
        assert!(ids.contains(&"rank-diamond-rank"));
        assert!(ids.contains(&"key-premium-key-bundle"));
        assert!(ids.contains(&"unban-premium-unban"));
    }

    #[test]
    fn test_featured_resolve() {
        let featured = featured();
        assert_eq!(featured.len(), 3);
        assert_eq!(featured[0].title, "Diamond Rank");
    }

    #[test]
    fn test_to_cart_item() {
        let item = find("unban-express-unban").unwrap().to_cart_item();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, Price::from_cents(3499));
        assert_eq!(item.category, Category::Unban);
    }
}
