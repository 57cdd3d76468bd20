//! REST API endpoint handlers for the Observer server.
//!
//! All handlers go through the shared
//! [`GameSession`](warehouse_core::session::GameSession) in [`AppState`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/round` | Current round snapshot |
//! | `GET` | `/api/history` | Score history of the current round |
//! | `POST` | `/api/round/start` | Start a new round |
//! | `POST` | `/api/inventory/{category}/adjust` | Adjust one category's stock |

use std::fmt::Write as _;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use warehouse_types::{Category, RoundSnapshot};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/inventory/{category}/adjust`.
#[derive(Debug, serde::Deserialize)]
pub struct AdjustRequest {
    /// Units to add (negative to remove).
    pub amount: i32,
}

/// Response body for `POST /api/inventory/{category}/adjust`.
#[derive(Debug, serde::Serialize)]
pub struct AdjustResponse {
    /// Whether the adjustment was applied. `false` outside play.
    pub applied: bool,
    /// Round state after the request.
    pub snapshot: RoundSnapshot,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the round and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.session.snapshot().await;
    let phase = format!("{:?}", snapshot.phase);
    let time = snapshot.time_remaining_seconds;
    let total = snapshot.score.total;
    let high_score = snapshot.high_score;
    let last_action = snapshot
        .score
        .last_action
        .as_ref()
        .map_or_else(|| String::from("--"), warehouse_types::LastAction::label);

    let mut rows = String::new();
    for (category, item) in &snapshot.inventory {
        let flag = if item.warning { "warning" } else { "" };
        let _ = write!(
            rows,
            r#"<tr class="{flag}"><td>{category}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            item.stock, item.optimal, item.demand
        );
    }

    let mut alerts = String::new();
    for alert in &snapshot.alerts {
        let _ = write!(alerts, "<li>{}</li>", alert.message);
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Warehouse Optimizer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        table {{ border-collapse: collapse; }}
        td, th {{ padding: 0.3rem 1rem; border-bottom: 1px solid #30363d; text-align: left; }}
        tr.warning td {{ color: #f85149; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ padding-left: 1.2rem; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Warehouse Optimizer</h1>

    <div>
        <div class="metric">
            <div class="label">Phase</div>
            <div class="value">{phase}</div>
        </div>
        <div class="metric">
            <div class="label">Time</div>
            <div class="value">{time}s</div>
        </div>
        <div class="metric">
            <div class="label">Score</div>
            <div class="value">{total}</div>
        </div>
        <div class="metric">
            <div class="label">High Score</div>
            <div class="value">{high_score}</div>
        </div>
        <div class="metric">
            <div class="label">Last Action</div>
            <div class="value">{last_action}</div>
        </div>
    </div>

    <h2>Inventory</h2>
    <table>
        <tr><th>Category</th><th>Stock</th><th>Optimal</th><th>Demand</th></tr>
        {rows}
    </table>

    <h2>Alerts</h2>
    <ul>{alerts}</ul>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li>GET <a href="/api/round">/api/round</a> -- Current round snapshot</li>
        <li>GET <a href="/api/history">/api/history</a> -- Score history</li>
        <li>POST /api/round/start -- Start a new round</li>
        <li>POST /api/inventory/{{category}}/adjust -- Body <code>{{"amount": 10}}</code></li>
        <li>WS <code>ws://host:port/ws/round</code> -- Live round updates</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/round -- current snapshot
// ---------------------------------------------------------------------------

/// Return the current round snapshot.
pub async fn get_round(State(state): State<Arc<AppState>>) -> Json<RoundSnapshot> {
    Json(state.session.snapshot().await)
}

// ---------------------------------------------------------------------------
// GET /api/history -- score history
// ---------------------------------------------------------------------------

/// Return every scoring event of the current round, oldest first.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let engine = state.session.engine().lock().await;
    let entries = engine.history();

    Ok(Json(serde_json::json!({
        "round_id": engine.round_id(),
        "count": entries.len(),
        "entries": serde_json::to_value(entries)?,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/round/start -- start a round
// ---------------------------------------------------------------------------

/// Start a new round from any phase and return its initial snapshot.
pub async fn start_round(State(state): State<Arc<AppState>>) -> Json<RoundSnapshot> {
    Json(state.session.start_game().await)
}

// ---------------------------------------------------------------------------
// POST /api/inventory/{category}/adjust -- adjust stock
// ---------------------------------------------------------------------------

/// Add `amount` units to one category.
///
/// Outside play the request succeeds with `applied: false` and nothing
/// changes. An unknown category is a 400.
pub async fn adjust_stock(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Json(body): Json<AdjustRequest>,
) -> Result<Json<AdjustResponse>, ObserverError> {
    let category: Category = category.parse()?;
    let outcome = state.session.adjust_stock(category, body.amount).await;

    Ok(Json(AdjustResponse {
        applied: outcome.applied,
        snapshot: outcome.snapshot,
    }))
}
