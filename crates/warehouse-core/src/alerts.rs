//! Per-tick alert collection.
//!
//! A tick builds a fresh [`TickAlerts`], raises alerts as categories stock
//! out or overstock, and then replaces the engine's alert list with the
//! result. Alerts never carry over from one tick to the next.

use warehouse_types::{Alert, AlertKind, Category};

/// Alerts raised during a single tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickAlerts {
    alerts: Vec<Alert>,
}

impl TickAlerts {
    /// Start an empty tick.
    pub const fn new() -> Self {
        Self { alerts: Vec::new() }
    }

    /// Record a stockout or overstock for `category`.
    pub fn raise(&mut self, kind: AlertKind, category: Category) {
        self.alerts.push(Alert::new(kind, category));
    }

    /// Whether the tick was free of stockouts and overstock.
    pub fn is_perfect(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Number of alerts of `kind` raised so far.
    pub fn count(&self, kind: AlertKind) -> usize {
        self.alerts.iter().filter(|alert| alert.kind == kind).count()
    }

    /// Finish the tick, yielding its alerts in the order they were raised.
    pub fn into_vec(self) -> Vec<Alert> {
        self.alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tick_is_perfect() {
        let alerts = TickAlerts::new();
        assert!(alerts.is_perfect());
        assert!(alerts.into_vec().is_empty());
    }

    #[test]
    fn any_alert_breaks_perfection() {
        let mut alerts = TickAlerts::new();
        alerts.raise(AlertKind::Overstock, Category::Apparel);
        assert!(!alerts.is_perfect());
    }

    #[test]
    fn alerts_keep_raise_order() {
        let mut alerts = TickAlerts::new();
        alerts.raise(AlertKind::Stockout, Category::Electronics);
        alerts.raise(AlertKind::Overstock, Category::Accessories);
        alerts.raise(AlertKind::Stockout, Category::Accessories);
        assert_eq!(alerts.count(AlertKind::Stockout), 2);

        let messages: Vec<_> = alerts.into_vec().into_iter().map(|a| a.message).collect();
        assert_eq!(
            messages,
            [
                "Stockout: electronics",
                "Overstock: accessories",
                "Stockout: accessories"
            ]
        );
    }
}
