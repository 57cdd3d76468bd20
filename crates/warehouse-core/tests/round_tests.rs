//! Integration tests for full rounds.
//!
//! Engine tests drive [`RoundEngine`] directly with deterministic demand.
//! Session tests run the real ticker on a paused tokio clock, so a 30
//! second round completes instantly.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time::Duration;
use warehouse_core::config::GameConfig;
use warehouse_core::demand::{DemandSource, FixedDemand, ScriptedDemand, SeededDemand};
use warehouse_core::engine::{RoundEngine, TickOutcome};
use warehouse_core::session::GameSession;
use warehouse_types::{Category, Phase, ScoreAction, UpdateReason};

fn make_engine(demand: impl DemandSource + 'static) -> RoundEngine {
    RoundEngine::new(&GameConfig::default(), Box::new(demand)).unwrap()
}

fn started(demand: impl DemandSource + 'static) -> RoundEngine {
    let mut engine = make_engine(demand);
    let _ = engine.start_game();
    engine
}

fn stock(engine: &RoundEngine, category: Category) -> u32 {
    engine.inventory().item(category).stock
}

fn alert_messages(engine: &RoundEngine) -> Vec<String> {
    engine.alerts().iter().map(|a| a.message.clone()).collect()
}

fn play_to_end(engine: &mut RoundEngine) -> u32 {
    let mut ticks = 0_u32;
    loop {
        ticks = ticks.saturating_add(1);
        if let TickOutcome::Ended { .. } = engine.tick() {
            return ticks;
        }
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn electronics_walkthrough() {
    let mut engine = started(FixedDemand::new(0));

    assert!(engine.adjust_stock(Category::Electronics, -10));
    assert_eq!(stock(&engine, Category::Electronics), 40);
    assert_eq!(engine.score().total, -5);
    assert_eq!(engine.score().efficiency_points, -5);

    let outcome = engine.tick();
    assert_eq!(
        outcome,
        TickOutcome::Advanced {
            remaining: 29,
            perfect: true
        }
    );
    assert_eq!(stock(&engine, Category::Electronics), 30);
    assert_eq!(stock(&engine, Category::Apparel), 42);
    assert_eq!(stock(&engine, Category::Accessories), 35);
    // -5 + 3 * 15 + 50
    assert_eq!(engine.score().total, 90);
    assert_eq!(engine.score().perfect_order_count, 1);

    let actions: Vec<_> = engine.history().iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        [
            ScoreAction::Efficiency,
            ScoreAction::FulfilledOrder,
            ScoreAction::FulfilledOrder,
            ScoreAction::FulfilledOrder,
            ScoreAction::PerfectOrder,
        ]
    );
}

#[test]
fn stockout_floors_total_and_raises_alert() {
    let mut engine = started(FixedDemand::new(0));
    let _ = engine.adjust_stock(Category::Electronics, -50);
    assert_eq!(engine.score().total, -5);

    let outcome = engine.tick();
    assert_eq!(
        outcome,
        TickOutcome::Advanced {
            remaining: 29,
            perfect: false
        }
    );
    // max(0, -5 - 25) then two fulfilled orders.
    assert_eq!(engine.score().total, 30);
    assert_eq!(engine.score().stockout_count, 1);
    assert_eq!(engine.score().perfect_order_count, 0);
    assert_eq!(stock(&engine, Category::Electronics), 0);
    assert_eq!(alert_messages(&engine), ["Stockout: electronics"]);
}

#[test]
fn overstock_costs_ten_and_breaks_perfection() {
    let mut engine = started(FixedDemand::new(0));
    let _ = engine.adjust_stock(Category::Electronics, 50);
    assert_eq!(stock(&engine, Category::Electronics), 100);

    let _ = engine.tick();
    assert_eq!(stock(&engine, Category::Electronics), 90);
    // -5 + 15 - 10 + 15 + 15
    assert_eq!(engine.score().total, 30);
    assert_eq!(engine.score().perfect_order_count, 0);
    assert_eq!(alert_messages(&engine), ["Overstock: electronics"]);
    assert!(engine.inventory().item(Category::Electronics).warning);
}

#[test]
fn stockout_penalty_is_exactly_twenty_five() {
    let mut engine = started(FixedDemand::new(0));
    let _ = engine.tick();
    assert_eq!(engine.score().total, 95);

    let _ = engine.adjust_stock(Category::Electronics, -40);
    assert_eq!(engine.score().total, 90);

    let _ = engine.tick();
    assert_eq!(engine.score().stockout_count, 1);
    // -25 + 15 + 15
    assert_eq!(engine.score().total, 95);

    let stockouts: Vec<_> = engine
        .history()
        .iter()
        .filter(|e| e.action == ScoreAction::Stockout)
        .map(|e| e.value)
        .collect();
    assert_eq!(stockouts, [-25]);
}

#[test]
fn alerts_are_replaced_every_tick() {
    let mut engine = started(FixedDemand::new(0));
    let _ = engine.adjust_stock(Category::Electronics, 50);
    let _ = engine.tick();
    assert_eq!(engine.alerts().len(), 1);

    let _ = engine.adjust_stock(Category::Electronics, -50);
    let _ = engine.tick();
    assert!(engine.alerts().is_empty());
}

#[test]
fn stockout_and_overstock_in_one_tick() {
    // electronics stocks out, accessories overstocks.
    let mut engine = started(ScriptedDemand::new([0, 0, 0]));
    let _ = engine.adjust_stock(Category::Electronics, -45);
    let _ = engine.adjust_stock(Category::Accessories, 50);

    let _ = engine.tick();
    assert_eq!(
        alert_messages(&engine),
        ["Stockout: electronics", "Overstock: accessories"]
    );
    assert_eq!(engine.score().stockout_count, 1);
    assert_eq!(engine.score().perfect_order_count, 0);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn stock_stays_in_bounds_and_warning_stays_consistent() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let mut engine = started(SeededDemand::new(17, 2));

    for step in 0..2_000_u32 {
        let category = Category::ALL
            .get(rng.random_range(0..Category::ALL.len()))
            .copied()
            .unwrap();
        let amount = rng.random_range(-150..=150);
        let _ = engine.adjust_stock(category, amount);
        if step % 7 == 0 {
            let _ = engine.process_demand();
        }

        for category in Category::ALL {
            let item = engine.inventory().item(category);
            assert!(item.stock <= 100, "stock {} out of bounds", item.stock);
            let expected = item.stock < item.demand * 2 || item.stock * 2 > item.optimal * 3;
            assert_eq!(item.warning, expected, "{category}: {item:?}");
        }
    }
}

#[test]
fn adjusting_at_optimal_never_earns_efficiency() {
    let mut rng = SmallRng::seed_from_u64(5);
    for _ in 0..200 {
        let mut engine = started(FixedDemand::new(0));
        let mut amount = rng.random_range(-100..=100);
        if amount == 0 {
            amount = 1;
        }
        let _ = engine.adjust_stock(Category::Apparel, amount);
        assert!(
            engine.score().efficiency_points <= 0,
            "amount {amount} earned {}",
            engine.score().efficiency_points
        );
    }
}

#[test]
fn clean_first_tick_scores_ninety_five() {
    for seed in 0..50 {
        let mut engine = started(SeededDemand::new(seed, 2));
        let _ = engine.tick();
        assert_eq!(engine.score().total, 95, "seed {seed}");
        assert_eq!(engine.score().perfect_order_count, 1);
    }
}

#[test]
fn start_resets_everything_but_high_score() {
    let mut engine = started(FixedDemand::new(0));
    let _ = engine.adjust_stock(Category::Electronics, 50);
    for _ in 0..10 {
        let _ = engine.tick();
    }
    let _ = play_to_end(&mut engine);
    let high = engine.high_score();

    let _ = engine.start_game();
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::Playing);
    assert_eq!(snapshot.day, 1);
    assert_eq!(snapshot.time_remaining_seconds, 30);
    assert_eq!(snapshot.score.total, 0);
    assert_eq!(snapshot.score.stockout_count, 0);
    assert_eq!(snapshot.score.perfect_order_count, 0);
    assert_eq!(snapshot.score.efficiency_points, 0);
    assert!(snapshot.score.last_action.is_none());
    assert!(snapshot.alerts.is_empty());
    assert!(snapshot.inventory.values().all(|item| item.stock == 50));
    assert!(engine.history().is_empty());
    assert_eq!(snapshot.high_score, high);
}

#[test]
fn round_ends_after_duration_and_freezes() {
    let mut engine = started(FixedDemand::new(0));
    let ticks = play_to_end(&mut engine);
    assert_eq!(ticks, 30);
    assert_eq!(engine.phase(), Phase::Ended);

    let frozen = engine.snapshot();
    let history_len = engine.history().len();
    assert_eq!(frozen.time_remaining_seconds, 0);
    assert_eq!(frozen.high_score, frozen.score.total);

    assert_eq!(engine.tick(), TickOutcome::Inactive);
    assert!(!engine.adjust_stock(Category::Electronics, -20));
    assert_eq!(engine.process_demand(), None);
    assert_eq!(engine.snapshot(), frozen);
    assert_eq!(engine.history().len(), history_len);
}

#[test]
fn ending_tick_skips_demand() {
    let mut engine = started(FixedDemand::new(0));
    for _ in 0..29 {
        let _ = engine.tick();
    }
    let before = engine.snapshot();
    let history_len = engine.history().len();

    let outcome = engine.tick();
    assert_eq!(
        outcome,
        TickOutcome::Ended {
            final_total: before.score.total,
            high_score: before.score.total.max(0),
        }
    );
    assert_eq!(engine.snapshot().inventory, before.inventory);
    assert_eq!(engine.history().len(), history_len);
}

#[test]
fn high_score_is_max_of_rounds() {
    // Demand never exceeds zero, so stock only moves when adjusted.
    let mut engine = started(FixedDemand::new(-20));
    let _ = play_to_end(&mut engine);
    let first = engine.score().total;
    assert_eq!(first, 29 * 95);
    assert_eq!(engine.high_score(), first);

    // A worse round: every category held overstocked.
    let _ = engine.start_game();
    for category in Category::ALL {
        let _ = engine.adjust_stock(category, 50);
    }
    let _ = play_to_end(&mut engine);
    let second = engine.score().total;
    // -15 for the adjustments, then +15 - 10 per category per tick.
    assert_eq!(second, 29 * 15 - 15);
    assert_eq!(engine.high_score(), first);

    let _ = engine.start_game();
    assert_eq!(engine.snapshot().high_score, first);
    assert_eq!(engine.score().total, 0);
}

#[test]
fn day_counter_never_advances() {
    let mut engine = started(FixedDemand::new(0));
    let _ = play_to_end(&mut engine);
    assert_eq!(engine.snapshot().day, 1);
    assert!(engine.history().iter().all(|e| e.day == 1));
}

#[test]
fn same_seed_replays_same_round() {
    let play = |seed| {
        let mut engine = started(SeededDemand::new(seed, 2));
        let _ = engine.adjust_stock(Category::Accessories, 30);
        let _ = play_to_end(&mut engine);
        (engine.score().clone(), engine.snapshot().inventory)
    };
    let (score_a, inventory_a) = play(77);
    let (score_b, inventory_b) = play(77);
    assert_eq!(score_a.total, score_b.total);
    assert_eq!(score_a.stockout_count, score_b.stockout_count);
    assert_eq!(inventory_a, inventory_b);
}

#[test]
fn snapshot_serializes_for_clients() {
    let engine = started(FixedDemand::new(0));
    let json = serde_json::to_value(engine.snapshot()).unwrap();
    assert_eq!(json["phase"], "playing");
    assert_eq!(json["time_remaining_seconds"], 30);
    assert_eq!(json["inventory"]["accessories"]["demand"], 15);
}

// ---------------------------------------------------------------------------
// Session with the real ticker
// ---------------------------------------------------------------------------

fn make_session() -> GameSession {
    GameSession::from_config(&GameConfig::default(), Box::new(FixedDemand::new(0))).unwrap()
}

#[tokio::test(start_paused = true)]
async fn session_plays_full_round_on_timer() {
    let session = make_session();
    let mut updates = session.subscribe();
    let _ = session.start_game().await;

    tokio::time::sleep(Duration::from_millis(30_500)).await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Ended);
    assert_eq!(snapshot.time_remaining_seconds, 0);

    let mut reasons = Vec::new();
    while let Ok(update) = updates.try_recv() {
        reasons.push(update.reason);
    }
    assert_eq!(reasons.first(), Some(&UpdateReason::RoundStarted));
    assert_eq!(reasons.last(), Some(&UpdateReason::RoundEnded));
    assert_eq!(
        reasons.iter().filter(|r| **r == UpdateReason::Tick).count(),
        29
    );

    // Nothing moves once the round is over.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(session.snapshot().await, snapshot);
    assert!(updates.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn session_adjust_between_ticks() {
    let session = make_session();
    let _ = session.start_game().await;

    let outcome = session.adjust_stock(Category::Electronics, -10).await;
    assert!(outcome.applied);
    assert_eq!(outcome.snapshot.score.total, -5);

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.time_remaining_seconds, 29);
    assert_eq!(snapshot.score.total, 90);
    let _ = session.stop().await;
}
