//! Round lifecycle, inventory, demand, and scoring for the Warehouse Optimizer.
//!
//! A round runs for a fixed countdown. Each tick draws demand against the
//! stock of every category, and the player adjusts stock between ticks to
//! stay close to the optimal level.
//!
//! # Modules
//!
//! - [`alerts`] -- Per-tick stockout and overstock alert collection.
//! - [`clock`] -- Round countdown and day counter.
//! - [`config`] -- Configuration loading from `warehouse-config.yaml` into
//!   strongly-typed structs.
//! - [`demand`] -- [`DemandSource`] trait with seeded, fixed, and scripted
//!   implementations.
//! - [`engine`] -- [`RoundEngine`], the owner of all round state.
//! - [`inventory`] -- Per-category stock with clamping and warning rules.
//! - [`scoring`] -- The score mutator and score history.
//! - [`session`] -- [`GameSession`], the shared engine plus its ticker.
//! - [`ticker`] -- The cancellable repeating tick task.
//!
//! [`DemandSource`]: demand::DemandSource
//! [`RoundEngine`]: engine::RoundEngine
//! [`GameSession`]: session::GameSession

pub mod alerts;
pub mod clock;
pub mod config;
pub mod demand;
pub mod engine;
pub mod inventory;
pub mod scoring;
pub mod session;
pub mod ticker;
