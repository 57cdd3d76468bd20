//! Per-category stock and the rules that keep it in bounds.
//!
//! Every mutation clamps stock into `[min_stock, max_stock]` and recomputes
//! the warning flag before returning, so no caller ever observes a stale
//! flag or an out-of-range level.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use warehouse_types::{Category, InventoryItem};

use crate::config::{CategoryConfig, InventoryConfig};

/// Errors that can occur when building an inventory.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// A fixed category has no baseline configured.
    #[error("no baseline configured for category {category}")]
    MissingCategory {
        /// The category without a baseline.
        category: Category,
    },

    /// The stock bounds are inverted.
    #[error("min_stock {min} exceeds max_stock {max}")]
    InvertedBounds {
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
}

// ---------------------------------------------------------------------------
// PerCategory
// ---------------------------------------------------------------------------

/// One value per fixed category.
///
/// Lookups are infallible because the category set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerCategory<T> {
    electronics: T,
    apparel: T,
    accessories: T,
}

impl<T> PerCategory<T> {
    /// Build a value for every category.
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            electronics: f(Category::Electronics),
            apparel: f(Category::Apparel),
            accessories: f(Category::Accessories),
        }
    }

    /// Build a value for every category, stopping at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Category) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            electronics: f(Category::Electronics)?,
            apparel: f(Category::Apparel)?,
            accessories: f(Category::Accessories)?,
        })
    }

    /// Borrow the value for `category`.
    pub const fn get(&self, category: Category) -> &T {
        match category {
            Category::Electronics => &self.electronics,
            Category::Apparel => &self.apparel,
            Category::Accessories => &self.accessories,
        }
    }

    /// Mutably borrow the value for `category`.
    pub const fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Electronics => &mut self.electronics,
            Category::Apparel => &mut self.apparel,
            Category::Accessories => &mut self.accessories,
        }
    }

    /// Iterate in [`Category::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().map(|category| (category, self.get(category)))
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Bounds and thresholds shared by every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRules {
    /// Lowest stock a category can hold.
    pub min_stock: u32,
    /// Highest stock a category can hold.
    pub max_stock: u32,
    /// Warn below `demand * warning_demand_multiplier`.
    pub warning_demand_multiplier: u32,
    /// Overstocked above `optimal * overstock_percent / 100`.
    pub overstock_percent: u32,
}

impl StockRules {
    /// Clamp a signed target level into the stock bounds.
    pub fn clamp(&self, target: i64) -> u32 {
        let clamped = target.clamp(i64::from(self.min_stock), i64::from(self.max_stock));
        u32::try_from(clamped).unwrap_or(self.max_stock)
    }

    /// Whether `item` sits above the overstock threshold.
    ///
    /// Compared in integer percent so that `150` means strictly more than
    /// one and a half times optimal.
    pub fn is_overstocked(&self, item: &InventoryItem) -> bool {
        let scaled_stock = u64::from(item.stock).saturating_mul(100);
        let threshold = u64::from(item.optimal).saturating_mul(u64::from(self.overstock_percent));
        scaled_stock > threshold
    }

    /// Whether `item` should display a warning.
    pub fn needs_warning(&self, item: &InventoryItem) -> bool {
        let low_water = item.demand.saturating_mul(self.warning_demand_multiplier);
        item.stock < low_water || self.is_overstocked(item)
    }
}

impl From<&InventoryConfig> for StockRules {
    fn from(config: &InventoryConfig) -> Self {
        Self {
            min_stock: config.min_stock,
            max_stock: config.max_stock,
            warning_demand_multiplier: config.warning_demand_multiplier,
            overstock_percent: config.overstock_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Direction an adjustment moved stock relative to optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMovement {
    /// Distance to optimal shrank.
    TowardOptimal,
    /// Distance to optimal grew.
    AwayFromOptimal,
    /// Distance to optimal is unchanged (including clamped no-ops).
    Unchanged,
}

/// What a single stock adjustment did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustOutcome {
    /// The adjusted category.
    pub category: Category,
    /// Stock before the adjustment.
    pub previous_stock: u32,
    /// Stock after clamping.
    pub stock: u32,
    /// Distance to optimal before.
    pub previous_diff: u32,
    /// Distance to optimal after.
    pub new_diff: u32,
    /// Direction of the move.
    pub movement: StockMovement,
}

/// Whether a category covered its demand draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandOutcome {
    /// Stock covered the draw and was reduced by it.
    Fulfilled {
        /// Units drawn.
        demand: u32,
        /// Stock after the draw.
        stock: u32,
    },
    /// Stock could not cover the draw and was left untouched.
    Stockout {
        /// Units drawn.
        demand: u32,
        /// Stock on hand.
        stock: u32,
    },
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Stock levels for all categories, plus the baseline they reset to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    items: PerCategory<InventoryItem>,
    baseline: PerCategory<CategoryConfig>,
    rules: StockRules,
}

impl Inventory {
    /// Build an inventory at its baseline.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::MissingCategory`] if a category has no
    /// baseline, or [`InventoryError::InvertedBounds`] if the stock bounds
    /// are inverted.
    pub fn from_config(config: &InventoryConfig) -> Result<Self, InventoryError> {
        if config.min_stock > config.max_stock {
            return Err(InventoryError::InvertedBounds {
                min: config.min_stock,
                max: config.max_stock,
            });
        }
        let baseline = PerCategory::try_from_fn(|category| {
            config
                .categories
                .get(&category)
                .copied()
                .ok_or(InventoryError::MissingCategory { category })
        })?;
        let rules = StockRules::from(config);
        let items = PerCategory::from_fn(|category| Self::baseline_item(&rules, baseline.get(category)));
        Ok(Self {
            items,
            baseline,
            rules,
        })
    }

    fn baseline_item(rules: &StockRules, config: &CategoryConfig) -> InventoryItem {
        let mut item = InventoryItem {
            stock: rules.clamp(i64::from(config.starting_stock)),
            demand: config.base_demand,
            optimal: config.optimal,
            warning: false,
        };
        item.warning = rules.needs_warning(&item);
        item
    }

    /// Restore every category to its baseline.
    pub fn reset(&mut self) {
        let rules = self.rules;
        let baseline = &self.baseline;
        self.items = PerCategory::from_fn(|category| Self::baseline_item(&rules, baseline.get(category)));
    }

    /// Add `amount` (possibly negative) to one category's stock.
    ///
    /// The result is clamped into the stock bounds and the warning flag is
    /// recomputed. Only `category` is touched.
    pub fn adjust(&mut self, category: Category, amount: i32) -> AdjustOutcome {
        let rules = self.rules;
        let item = self.items.get_mut(category);

        let previous_stock = item.stock;
        let previous_diff = previous_stock.abs_diff(item.optimal);
        item.stock = rules.clamp(i64::from(previous_stock).saturating_add(i64::from(amount)));
        let new_diff = item.stock.abs_diff(item.optimal);
        item.warning = rules.needs_warning(item);

        let movement = match new_diff.cmp(&previous_diff) {
            Ordering::Less => StockMovement::TowardOptimal,
            Ordering::Greater => StockMovement::AwayFromOptimal,
            Ordering::Equal => StockMovement::Unchanged,
        };

        AdjustOutcome {
            category,
            previous_stock,
            stock: item.stock,
            previous_diff,
            new_diff,
            movement,
        }
    }

    /// Draw `demand` units from one category if stock covers it.
    ///
    /// On a stockout the stock is left as is. The warning flag is
    /// recomputed either way.
    pub fn apply_demand(&mut self, category: Category, demand: u32) -> DemandOutcome {
        let rules = self.rules;
        let item = self.items.get_mut(category);

        let outcome = if item.stock >= demand {
            item.stock = rules.clamp(i64::from(item.stock.saturating_sub(demand)));
            DemandOutcome::Fulfilled {
                demand,
                stock: item.stock,
            }
        } else {
            DemandOutcome::Stockout {
                demand,
                stock: item.stock,
            }
        };
        item.warning = rules.needs_warning(item);
        outcome
    }

    /// Whether `category` is above its overstock threshold.
    pub fn is_overstocked(&self, category: Category) -> bool {
        self.rules.is_overstocked(self.items.get(category))
    }

    /// Current state of one category.
    pub const fn item(&self, category: Category) -> &InventoryItem {
        self.items.get(category)
    }

    /// The bounds and thresholds in force.
    pub const fn rules(&self) -> &StockRules {
        &self.rules
    }

    /// Copy of every category keyed by category, for snapshots.
    pub fn to_map(&self) -> BTreeMap<Category, InventoryItem> {
        self.items.iter().map(|(category, item)| (category, *item)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn make_inventory() -> Inventory {
        Inventory::from_config(&InventoryConfig::default()).unwrap()
    }

    fn assert_warning_consistent(inventory: &Inventory) {
        for category in Category::ALL {
            let item = inventory.item(category);
            let expected = item.stock < item.demand.saturating_mul(2)
                || u64::from(item.stock).saturating_mul(2) > u64::from(item.optimal).saturating_mul(3);
            assert_eq!(item.warning, expected, "warning drift on {category}: {item:?}");
        }
    }

    #[test]
    fn baseline_matches_classic_round() {
        let inventory = make_inventory();
        let electronics = inventory.item(Category::Electronics);
        assert_eq!(electronics.stock, 50);
        assert_eq!(electronics.demand, 10);
        assert_eq!(electronics.optimal, 50);
        assert!(!electronics.warning);
        assert_eq!(inventory.item(Category::Apparel).demand, 8);
        assert_eq!(inventory.item(Category::Accessories).demand, 15);
    }

    #[test]
    fn adjust_clamps_into_bounds() {
        let mut inventory = make_inventory();
        let up = inventory.adjust(Category::Apparel, 500);
        assert_eq!(up.stock, 100);
        let down = inventory.adjust(Category::Apparel, -1_000);
        assert_eq!(down.stock, 0);
        let extreme = inventory.adjust(Category::Apparel, i32::MIN);
        assert_eq!(extreme.stock, 0);
        assert_eq!(extreme.movement, StockMovement::Unchanged);
    }

    #[test]
    fn adjust_reports_direction_relative_to_optimal() {
        let mut inventory = make_inventory();

        let away = inventory.adjust(Category::Electronics, -10);
        assert_eq!(away.previous_diff, 0);
        assert_eq!(away.new_diff, 10);
        assert_eq!(away.movement, StockMovement::AwayFromOptimal);

        let toward = inventory.adjust(Category::Electronics, 5);
        assert_eq!(toward.movement, StockMovement::TowardOptimal);

        // Overshooting to the same distance on the other side is neutral.
        let across = inventory.adjust(Category::Electronics, 10);
        assert_eq!(across.stock, 55);
        assert_eq!(across.movement, StockMovement::Unchanged);
    }

    #[test]
    fn adjust_at_optimal_never_moves_toward() {
        for amount in [-50, -1, 1, 7, 50] {
            let mut inventory = make_inventory();
            let outcome = inventory.adjust(Category::Accessories, amount);
            assert_ne!(outcome.movement, StockMovement::TowardOptimal, "amount {amount}");
        }
    }

    #[test]
    fn adjust_touches_only_one_category() {
        let mut inventory = make_inventory();
        let _ = inventory.adjust(Category::Electronics, 30);
        assert_eq!(inventory.item(Category::Electronics).stock, 80);
        assert_eq!(inventory.item(Category::Apparel).stock, 50);
        assert_eq!(inventory.item(Category::Accessories).stock, 50);
    }

    #[test]
    fn warning_tracks_every_mutation() {
        let mut inventory = make_inventory();
        for amount in [-35, 20, 40, -80, 100, -3, 26, -100] {
            for category in Category::ALL {
                let _ = inventory.adjust(category, amount);
                assert_warning_consistent(&inventory);
                let _ = inventory.apply_demand(category, 9);
                assert_warning_consistent(&inventory);
            }
        }
    }

    #[test]
    fn warning_thresholds() {
        let mut inventory = make_inventory();
        // electronics: demand 10 -> low water 20; optimal 50 -> overstock above 75.
        let _ = inventory.adjust(Category::Electronics, -30);
        assert!(!inventory.item(Category::Electronics).warning); // 20
        let _ = inventory.adjust(Category::Electronics, -1);
        assert!(inventory.item(Category::Electronics).warning); // 19
        let _ = inventory.adjust(Category::Electronics, 56);
        assert!(!inventory.item(Category::Electronics).warning); // 75
        assert!(!inventory.is_overstocked(Category::Electronics));
        let _ = inventory.adjust(Category::Electronics, 1);
        assert!(inventory.item(Category::Electronics).warning); // 76
        assert!(inventory.is_overstocked(Category::Electronics));
    }

    #[test]
    fn demand_fulfilled_reduces_stock() {
        let mut inventory = make_inventory();
        let outcome = inventory.apply_demand(Category::Accessories, 15);
        assert_eq!(outcome, DemandOutcome::Fulfilled { demand: 15, stock: 35 });
    }

    #[test]
    fn demand_equal_to_stock_is_fulfilled() {
        let mut inventory = make_inventory();
        let outcome = inventory.apply_demand(Category::Apparel, 50);
        assert_eq!(outcome, DemandOutcome::Fulfilled { demand: 50, stock: 0 });
    }

    #[test]
    fn stockout_leaves_stock_untouched() {
        let mut inventory = make_inventory();
        let _ = inventory.adjust(Category::Electronics, -45);
        let outcome = inventory.apply_demand(Category::Electronics, 10);
        assert_eq!(outcome, DemandOutcome::Stockout { demand: 10, stock: 5 });
        assert_eq!(inventory.item(Category::Electronics).stock, 5);
        assert!(inventory.item(Category::Electronics).warning);
    }

    #[test]
    fn reset_restores_baseline() {
        let mut inventory = make_inventory();
        let _ = inventory.adjust(Category::Electronics, 40);
        let _ = inventory.apply_demand(Category::Apparel, 30);
        inventory.reset();
        assert_eq!(inventory, make_inventory());
    }

    #[test]
    fn to_map_lists_every_category() {
        let map = make_inventory().to_map();
        assert_eq!(map.len(), 3);
        assert!(Category::ALL.iter().all(|c| map.contains_key(c)));
    }

    #[test]
    fn missing_baseline_is_rejected() {
        let mut config = InventoryConfig::default();
        config.categories.remove(&Category::Apparel);
        let result = Inventory::from_config(&config);
        assert!(matches!(
            result,
            Err(InventoryError::MissingCategory {
                category: Category::Apparel
            })
        ));
    }
}
