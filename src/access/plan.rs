use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription levels, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Free,
    Monthly,
    Yearly,
    Lifetime,
}

/// Capabilities a page or demo module can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    PowAccess,
    PosAccess,
    DposAccess,
    BftAccess,
    PohAccess,
    PremiumArticles,
    ExportData,
    AdFree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    ArticleViews,
    Exports,
}

/// Usage caps; `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub max_article_views: Option<u64>,
    pub max_exports: Option<u64>,
}

impl PlanLimits {
    pub fn limit(&self, kind: LimitKind) -> Option<u64> {
        match kind {
            LimitKind::ArticleViews => self.max_article_views,
            LimitKind::Exports => self.max_exports,
        }
    }
}

impl PlanTier {
    pub const ALL: [PlanTier; 4] = [
        PlanTier::Free,
        PlanTier::Monthly,
        PlanTier::Yearly,
        PlanTier::Lifetime,
    ];

    pub fn permissions(self) -> &'static [Permission] {
        use Permission::*;
        match self {
            PlanTier::Free => &[PowAccess],
            PlanTier::Monthly => &[PowAccess, PosAccess, DposAccess, PremiumArticles],
            PlanTier::Yearly => &[
                PowAccess,
                PosAccess,
                DposAccess,
                BftAccess,
                PohAccess,
                PremiumArticles,
                ExportData,
            ],
            PlanTier::Lifetime => &[
                PowAccess,
                PosAccess,
                DposAccess,
                BftAccess,
                PohAccess,
                PremiumArticles,
                ExportData,
                AdFree,
            ],
        }
    }

    pub fn grants(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn limits(self) -> PlanLimits {
        match self {
            PlanTier::Free => PlanLimits {
                max_article_views: Some(10),
                max_exports: Some(0),
            },
            PlanTier::Monthly => PlanLimits {
                max_article_views: Some(100),
                max_exports: Some(10),
            },
            PlanTier::Yearly => PlanLimits {
                max_article_views: None,
                max_exports: Some(100),
            },
            PlanTier::Lifetime => PlanLimits {
                max_article_views: None,
                max_exports: None,
            },
        }
    }

    /// Cheapest tier that grants `permission`.
    pub fn cheapest_with(permission: Permission) -> Option<PlanTier> {
        Self::ALL.into_iter().find(|t| t.grants(permission))
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PlanTier::Free => "Free",
            PlanTier::Monthly => "Monthly",
            PlanTier::Yearly => "Yearly",
            PlanTier::Lifetime => "Lifetime",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Permission::PowAccess => "pow_access",
            Permission::PosAccess => "pos_access",
            Permission::DposAccess => "dpos_access",
            Permission::BftAccess => "bft_access",
            Permission::PohAccess => "poh_access",
            Permission::PremiumArticles => "premium_articles",
            Permission::ExportData => "export_data",
            Permission::AdFree => "ad_free",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::{LimitKind, Permission, PlanTier};

    #[test]
    fn higher_tiers_include_lower_ones() {
        for pair in PlanTier::ALL.windows(2) {
            for p in pair[0].permissions() {
                assert!(pair[1].grants(*p), "{:?} lost {p}", pair[1]);
            }
        }
    }

    #[test]
    fn cheapest_tier_lookup() {
        assert_eq!(
            PlanTier::cheapest_with(Permission::PowAccess),
            Some(PlanTier::Free)
        );
        assert_eq!(
            PlanTier::cheapest_with(Permission::PosAccess),
            Some(PlanTier::Monthly)
        );
        assert_eq!(
            PlanTier::cheapest_with(Permission::AdFree),
            Some(PlanTier::Lifetime)
        );
    }

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&Permission::PosAccess).unwrap();
        assert_eq!(json, "\"pos_access\"");
        assert_eq!(Permission::PosAccess.to_string(), "pos_access");
        assert_eq!(
            PlanTier::Yearly.limits().limit(LimitKind::ArticleViews),
            None
        );
    }
}
