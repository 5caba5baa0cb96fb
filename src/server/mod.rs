use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, error};

use crate::model::ModelMetadata;
use crate::predictor::catalog;
use crate::predictor::{derive, predict, Classifier, MatchState, MatchStateInput};

/// Shared read-only state for the HTTP layer. The classifier is loaded once
/// at startup; requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub metadata: ModelMetadata,
    pub allow_same_team: bool,
}

/// Build the Axum router for the predictor page and API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/model", get(model_handler))
        .route("/api/health", get(health_handler))
        .route("/api/predict", post(predict_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Serialize)]
struct CatalogResponse {
    teams: Vec<&'static str>,
    cities: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    version: String,
    trained_on: String,
    n_samples: usize,
    log_loss: Option<f64>,
    accuracy: Option<f64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    model_version: String,
}

/// Raw and derived fields backing a prediction, echoed for display.
#[derive(Debug, Serialize)]
struct MatchDetails {
    target: u32,
    score: u32,
    overs: f64,
    wickets_lost: u8,
    runs_left: i64,
    balls_left: u32,
    wickets_in_hand: u8,
    current_run_rate: f64,
    required_run_rate: f64,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    batting_team: &'static str,
    bowling_team: &'static str,
    city: &'static str,
    /// Exact probabilities; percentage rounding is the page's concern.
    win_probability: f64,
    loss_probability: f64,
    details: MatchDetails,
}

/// Serve the predictor page, injecting the model version.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let html = PREDICTOR_HTML.replace(
        r#"<body>"#,
        &format!(r#"<body data-model-version="{}">"#, state.metadata.version),
    );
    Html(html)
}

/// GET /api/catalog
async fn catalog_handler() -> impl IntoResponse {
    Json(CatalogResponse {
        teams: catalog::teams_sorted(),
        cities: catalog::cities_sorted(),
    })
}

/// GET /api/model
async fn model_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ModelInfo {
        name: state.classifier.name().to_string(),
        version: state.metadata.version.clone(),
        trained_on: state.metadata.trained_on.clone(),
        n_samples: state.metadata.n_samples,
        log_loss: state.metadata.log_loss,
        accuracy: state.metadata.accuracy,
    })
}

/// GET /api/health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        model_version: state.metadata.version.clone(),
    })
}

/// POST /api/predict
///
/// Validation failures are the caller's fault (400); that includes a body
/// that does not deserialize into the DTO (malformed JSON, integer fields
/// outside their declared ranges). A classifier failure is ours (500).
/// Neither produces a fabricated probability.
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MatchStateInput>, JsonRejection>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let Json(input) = payload.map_err(|rejection| {
        debug!("Rejected prediction payload: {}", rejection.body_text());
        (StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let match_state = MatchState::from_input(&input, state.allow_same_team).map_err(|e| {
        debug!("Rejected prediction input: {}", e);
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let features = derive(&match_state);
    let result = predict(&features, state.classifier.as_ref()).map_err(|e| {
        error!("Classifier '{}' failed: {}", state.classifier.name(), e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    debug!(
        "{} vs {} at {}, {} overs: win {:.4}",
        match_state.batting_team,
        match_state.bowling_team,
        match_state.city,
        match_state.overs,
        result.win_probability
    );

    Ok(Json(PredictResponse {
        batting_team: match_state.batting_team.as_str(),
        bowling_team: match_state.bowling_team.as_str(),
        city: match_state.city.as_str(),
        win_probability: result.win_probability,
        loss_probability: result.loss_probability,
        details: MatchDetails {
            target: match_state.target,
            score: match_state.score,
            overs: match_state.overs.as_notation(),
            wickets_lost: match_state.wickets_lost,
            runs_left: features.runs_left,
            balls_left: features.balls_left,
            wickets_in_hand: features.wickets_in_hand,
            current_run_rate: features.current_run_rate,
            required_run_rate: features.required_run_rate,
        },
    }))
}

/// Embedded single-file predictor page (HTML + CSS + JS).
const PREDICTOR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>IPL Win Predictor</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  .badge { padding: .2rem .6rem; border-radius: 4px; font-size: .75rem; font-weight: 700; background: rgba(108,99,255,.2); color: var(--accent); }
  main { max-width: 860px; margin: 0 auto; padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; }
  .form-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; padding: 1.2rem; }
  .form-grid .wide { grid-column: span 2; }
  label { display: block; color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; margin-bottom: .35rem; }
  select, input { width: 100%; background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .55rem .7rem; font-size: .95rem; }
  select:focus, input:focus { outline: none; border-color: var(--accent); }
  button { grid-column: span 2; background: var(--accent); color: #fff; border: none; border-radius: 8px; padding: .7rem; font-size: 1rem; font-weight: 600; cursor: pointer; }
  button:hover { filter: brightness(1.1); }
  button:disabled { opacity: .5; cursor: wait; }
  .prob-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
  .prob-card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.4rem; text-align: center; }
  .prob-card .label { margin-bottom: .5rem; font-size: .85rem; }
  .prob-card .value { font-size: 2.2rem; font-weight: 700; }
  .prob-card.win .value { color: var(--green); }
  .prob-card.loss .value { color: var(--red); }
  .details-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(150px, 1fr)); gap: 1rem; padding: 1.2rem; }
  .detail .label { margin-bottom: .3rem; }
  .detail .value { font-size: 1.15rem; font-weight: 600; }
  .error { background: rgba(255,79,106,.12); border: 1px solid var(--red); border-radius: 10px; padding: 1rem 1.2rem; color: var(--red); }
  footer { text-align: center; color: var(--muted); font-size: .8rem; padding: 1rem 0 2rem; }
  [hidden] { display: none !important; }
  @media (max-width: 640px) { .form-grid, .prob-grid { grid-template-columns: 1fr; } .form-grid .wide, button { grid-column: span 1; } }
</style>
</head>
<body>
<header>
  <h1>🏏 IPL Win Predictor</h1>
  <span class="badge" id="model-badge">…</span>
</header>

<main>
  <div class="panel">
    <div class="panel-header">Match Situation</div>
    <form id="predict-form" class="form-grid">
      <div>
        <label for="batting-team">Batting team</label>
        <select id="batting-team" required></select>
      </div>
      <div>
        <label for="bowling-team">Bowling team</label>
        <select id="bowling-team" required></select>
      </div>
      <div class="wide">
        <label for="city">Host city</label>
        <select id="city" required></select>
      </div>
      <div>
        <label for="target">Target</label>
        <input id="target" type="number" min="1" step="1" value="180" required>
      </div>
      <div>
        <label for="score">Score</label>
        <input id="score" type="number" min="0" step="1" value="0" required>
      </div>
      <div>
        <label for="overs">Overs completed (e.g. 10.3 = 10 ov 3 balls)</label>
        <input id="overs" type="number" min="0" max="20" step="0.1" value="0.0" required>
      </div>
      <div>
        <label for="wickets">Wickets lost</label>
        <input id="wickets" type="number" min="0" max="10" step="1" value="0" required>
      </div>
      <button type="submit" id="predict-btn">Predict Probability</button>
    </form>
  </div>

  <div class="error" id="error" hidden></div>

  <div id="result" hidden>
    <div class="prob-grid">
      <div class="prob-card win">
        <div class="label" id="batting-label">–</div>
        <div class="value" id="win-prob">–</div>
      </div>
      <div class="prob-card loss">
        <div class="label" id="bowling-label">–</div>
        <div class="value" id="loss-prob">–</div>
      </div>
    </div>
  </div>

  <div class="panel" id="details-panel" hidden>
    <div class="panel-header">Match Details</div>
    <div class="details-grid" id="details-grid"></div>
  </div>
</main>

<footer id="model-footer"></footer>

<script>
const pct = v => (v * 100).toFixed(2) + '%';
const rate = v => v.toFixed(2);

async function loadCatalog() {
  const r = await fetch('/api/catalog');
  if (!r.ok) return;
  const catalog = await r.json();
  const fill = (id, names) => {
    const select = document.getElementById(id);
    select.innerHTML = names.map(n => `<option value="${n}">${n}</option>`).join('');
  };
  fill('batting-team', catalog.teams);
  fill('bowling-team', catalog.teams);
  fill('city', catalog.cities);
  // Default to a non-identical pairing.
  if (catalog.teams.length > 1) document.getElementById('bowling-team').selectedIndex = 1;
}

async function loadModelInfo() {
  const badge = document.getElementById('model-badge');
  badge.textContent = 'model v' + (document.body.dataset.modelVersion || '?');
  const r = await fetch('/api/model');
  if (!r.ok) return;
  const m = await r.json();
  document.getElementById('model-footer').textContent =
    `${m.name} v${m.version} · trained on ${m.trained_on} (${m.n_samples.toLocaleString()} samples)`;
}

function showError(message) {
  const box = document.getElementById('error');
  box.textContent = message;
  box.hidden = false;
  document.getElementById('result').hidden = true;
  document.getElementById('details-panel').hidden = true;
}

function showResult(r) {
  document.getElementById('error').hidden = true;
  document.getElementById('batting-label').textContent = r.batting_team;
  document.getElementById('bowling-label').textContent = r.bowling_team;
  document.getElementById('win-prob').textContent = pct(r.win_probability);
  document.getElementById('loss-prob').textContent = pct(r.loss_probability);

  const d = r.details;
  const rows = [
    ['City', r.city],
    ['Target', d.target],
    ['Score', `${d.score}/${d.wickets_lost}`],
    ['Overs', d.overs.toFixed(1)],
    ['Runs left', d.runs_left],
    ['Balls left', d.balls_left],
    ['Wickets in hand', d.wickets_in_hand],
    ['Current RR', rate(d.current_run_rate)],
    ['Required RR', rate(d.required_run_rate)],
  ];
  document.getElementById('details-grid').innerHTML = rows.map(([label, value]) =>
    `<div class="detail"><div class="label">${label}</div><div class="value">${value}</div></div>`
  ).join('');
  document.getElementById('result').hidden = false;
  document.getElementById('details-panel').hidden = false;
}

document.getElementById('predict-form').addEventListener('submit', async e => {
  e.preventDefault();
  const btn = document.getElementById('predict-btn');
  btn.disabled = true;
  try {
    const body = {
      batting_team: document.getElementById('batting-team').value,
      bowling_team: document.getElementById('bowling-team').value,
      city: document.getElementById('city').value,
      target: parseInt(document.getElementById('target').value, 10),
      score: parseInt(document.getElementById('score').value, 10),
      overs: parseFloat(document.getElementById('overs').value),
      wickets_lost: parseInt(document.getElementById('wickets').value, 10),
    };
    const r = await fetch('/api/predict', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body),
    });
    if (!r.ok) {
      showError(await r.text());
      return;
    }
    showResult(await r.json());
  } catch (err) {
    showError('Request failed: ' + err);
  } finally {
    btn.disabled = false;
  }
});

loadCatalog();
loadModelInfo();
</script>
</body>
</html>"#;
