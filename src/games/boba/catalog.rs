//! Upgrade catalog and cost curve.
//!
//! A catalog *entry* carries display text and its own base cost; an
//! [`UpgradeId`] is the level counter the entry feeds. Several entries may
//! share one id (every staff flavour raises the same `staff` level), so cost
//! is computed per entry while the level is looked up per id.

use super::config::GROWTH_FACTOR;
use super::state::{ProgressSnapshot, UpgradeId};

/// Shop section an entry is listed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Raises boba per click.
    Click,
    /// Raises boba per second.
    Passive,
    /// Percentage bonus applied to both click and passive totals.
    Multiplier,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[Category::Click, Category::Passive, Category::Multiplier]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Click => "Brewing",
            Category::Passive => "Staff",
            Category::Multiplier => "Promotion",
        }
    }
}

/// Static definition of one purchasable shop line.
#[derive(Debug)]
pub struct CatalogEntry {
    pub id: UpgradeId,
    pub category: Category,
    pub name: &'static str,
    pub description: &'static str,
    pub base_cost: f64,
    /// Display-only effect at a given level; monotonic non-decreasing.
    pub effect: fn(u32) -> f64,
    /// Unit shown after the effect value.
    pub effect_unit: &'static str,
}

impl CatalogEntry {
    /// Price of the next level given the current shared level.
    pub fn cost_at(&self, level: u32) -> u64 {
        cost(self.base_cost, level)
    }

    /// Price of the next level for this entry in the given snapshot.
    pub fn next_cost(&self, snapshot: &ProgressSnapshot) -> u64 {
        self.cost_at(snapshot.level(self.id))
    }

    pub fn effect_at(&self, level: u32) -> f64 {
        (self.effect)(level)
    }

    /// Effect after buying one more level.
    pub fn next_effect(&self, snapshot: &ProgressSnapshot) -> f64 {
        self.effect_at(snapshot.level(self.id) + 1)
    }
}

fn linear(level: u32) -> f64 {
    level as f64
}

fn half_per_level(level: u32) -> f64 {
    level as f64 * 0.5
}

fn promotion(level: u32) -> f64 {
    level as f64 * 1.5
}

/// All shop entries in display order. Immutable at runtime.
pub static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: UpgradeId::Tapioca,
        category: Category::Click,
        name: "Premium Tapioca",
        description: "Better pearls, more boba per click",
        base_cost: 10.0,
        effect: linear,
        effect_unit: "x click",
    },
    CatalogEntry {
        id: UpgradeId::Staff,
        category: Category::Passive,
        name: "Hire Staff",
        description: "Employees brew while you focus",
        base_cost: 25.0,
        effect: half_per_level,
        effect_unit: "/s",
    },
    CatalogEntry {
        id: UpgradeId::Staff,
        category: Category::Passive,
        name: "Taro Milk Tea Stand",
        description: "A new flavour station for your staff",
        base_cost: 40.0,
        effect: half_per_level,
        effect_unit: "/s",
    },
    CatalogEntry {
        id: UpgradeId::Staff,
        category: Category::Passive,
        name: "Brown Sugar Bar",
        description: "Caramelised syrup keeps the line moving",
        base_cost: 60.0,
        effect: half_per_level,
        effect_unit: "/s",
    },
    CatalogEntry {
        id: UpgradeId::Marketing,
        category: Category::Multiplier,
        name: "Marketing",
        description: "+10% to every click and every second",
        base_cost: 50.0,
        effect: promotion,
        effect_unit: "reach",
    },
    CatalogEntry {
        id: UpgradeId::Marketing,
        category: Category::Multiplier,
        name: "Wholesale Supplies",
        description: "Bulk cups and straws, +10% everywhere",
        base_cost: 120.0,
        effect: promotion,
        effect_unit: "reach",
    },
];

/// `floor(base_cost * GROWTH_FACTOR^level)`.
pub fn cost(base_cost: f64, level: u32) -> u64 {
    (base_cost * GROWTH_FACTOR.powi(level as i32)).floor() as u64
}

pub fn entry(index: usize) -> Option<&'static CatalogEntry> {
    CATALOG.get(index)
}

/// Index of the first entry feeding `id`.
pub fn primary_entry(id: UpgradeId) -> Option<usize> {
    CATALOG.iter().position(|e| e.id == id)
}

/// Entries grouped by category, each group in insertion order. Indices refer
/// back into [`CATALOG`].
pub fn grouped() -> Vec<(Category, Vec<(usize, &'static CatalogEntry)>)> {
    Category::all()
        .iter()
        .map(|cat| {
            let entries: Vec<(usize, &'static CatalogEntry)> = CATALOG
                .iter()
                .enumerate()
                .filter(|(_, e)| e.category == *cat)
                .collect();
            (*cat, entries)
        })
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Each level adds at least `base / 2`, so from 2 up the floor moves.
        #[test]
        fn prop_cost_strictly_increases(base in 2.0f64..1e6, level in 0u32..50) {
            let a = cost(base, level);
            let b = cost(base, level + 1);
            prop_assert!(b > a, "cost did not increase: {} -> {} (base={})", a, b, base);
        }

        #[test]
        fn prop_cost_never_decreases(base in 0.001f64..1e6, level in 0u32..50) {
            prop_assert!(cost(base, level + 1) >= cost(base, level));
        }

        #[test]
        fn prop_cost_never_exceeds_exact_value(base in 1.0f64..1e6, level in 0u32..40) {
            let exact = base * GROWTH_FACTOR.powi(level as i32);
            let c = cost(base, level) as f64;
            prop_assert!(c <= exact && exact - c < 1.0);
        }

        #[test]
        fn prop_cost_is_deterministic(base in 1.0f64..1e6, level in 0u32..40) {
            prop_assert_eq!(cost(base, level), cost(base, level));
        }
    }
}
