//! Dashboard route handlers.
//!
//! JSON endpoints plus the server-rendered HTML page. State is shared via
//! `Arc<DashboardState>` and is read-only: every request fetches and scores
//! from scratch.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::render;
use crate::config::FeedConfig;
use crate::engine::ticket::{self, SquadHits};
use crate::engine::ScoringEngine;
use crate::feed::{self, DrawSource};
use crate::types::{Analysis, BingoError};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub engine: ScoringEngine,
    pub source: Arc<dyn DrawSource>,
    pub feed: FeedConfig,
}

impl DashboardState {
    pub fn new(engine: ScoringEngine, source: Arc<dyn DrawSource>, feed: FeedConfig) -> Self {
        Self {
            engine,
            source,
            feed,
        }
    }

    /// The requested date, or today in the feed's timezone.
    fn resolve_date(&self, raw: Option<&str>) -> Result<NaiveDate, BingoError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                BingoError::InvalidInput(format!("date must be YYYY-MM-DD, got '{s}'"))
            }),
            None => Ok(feed::today_at(self.feed.utc_offset_hours)),
        }
    }

    /// Fetch (with fallback) and score the draws for `date`.
    async fn analyze_date(&self, date: NaiveDate) -> Analysis {
        let draws =
            feed::fetch_with_fallback(self.source.as_ref(), date, self.feed.merge_previous_day)
                .await;
        if draws.is_empty() {
            warn!(%date, source = self.source.name(), "No draws available");
        }
        self.engine.analyze(&draws)
    }

    fn now_local(&self) -> chrono::DateTime<FixedOffset> {
        let offset =
            FixedOffset::east_opt(self.feed.utc_offset_hours * 3600).unwrap_or(Utc.fix());
        Utc::now().with_timezone(&offset)
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub numbers: String,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub draws: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub analysis: Analysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub date: NaiveDate,
    pub winning: Vec<u8>,
    pub best_hits: usize,
    pub results: Vec<SquadHits>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for BingoError {
    fn into_response(self) -> Response {
        let status = match &self {
            BingoError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BingoError::InvalidDraw(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BingoError::Feed { .. } => StatusCode::BAD_GATEWAY,
            BingoError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn get_index(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Html<String>, BingoError> {
    let date = state.resolve_date(query.date.as_deref())?;
    let analysis = state.analyze_date(date).await;
    let generated_at = state.now_local().format("%Y-%m-%d %H:%M:%S").to_string();
    Ok(Html(render::render_dashboard(&analysis, date, &generated_at)))
}

/// GET /api/analysis
pub async fn get_analysis(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<AnalysisResponse>, BingoError> {
    let date = state.resolve_date(query.date.as_deref())?;
    let analysis = state.analyze_date(date).await;
    Ok(Json(AnalysisResponse { date, analysis }))
}

/// POST /api/analyze
pub async fn post_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Analysis>, BingoError> {
    let analysis = state.engine.analyze_raw(&req.draws)?;
    info!(draws = analysis.draws_analyzed, "Analyzed submitted draws");
    Ok(Json(analysis))
}

/// GET /api/check
pub async fn get_check(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<CheckResponse>, BingoError> {
    let winning = ticket::parse_winning_numbers(&query.numbers);
    if winning.is_empty() {
        return Err(BingoError::InvalidInput(
            "no winning numbers in 1..=80 found".into(),
        ));
    }

    let date = state.resolve_date(query.date.as_deref())?;
    let analysis = state.analyze_date(date).await;
    let results = ticket::check_squads(&analysis, &winning);
    let best_hits = results.iter().map(|r| r.hits.len()).max().unwrap_or(0);

    Ok(Json(CheckResponse {
        date,
        winning,
        best_hits,
        results,
    }))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScoringConfig;
    use crate::feed::MockDrawSource;
    use crate::types::Draw;

    fn draws(count: usize) -> Vec<Draw> {
        (0..count)
            .map(|i| {
                let nums: Vec<u32> = (0..20u32).map(|k| ((i as u32 * 3 + k * 4) % 80) + 1).collect();
                Draw::new(&nums).unwrap()
            })
            .collect()
    }

    fn state_with(count: usize) -> AppState {
        let mut source = MockDrawSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_fetch_draws()
            .returning(move |_| Ok(draws(count)));
        Arc::new(DashboardState::new(
            ScoringEngine::new(ScoringConfig::default()),
            Arc::new(source),
            FeedConfig::default(),
        ))
    }

    #[test]
    fn test_resolve_date() {
        let state = state_with(0);
        assert_eq!(
            state.resolve_date(Some("2026-02-03")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()
        );
        assert!(state.resolve_date(Some("")).is_ok());
        assert!(state.resolve_date(None).is_ok());
        assert!(matches!(
            state.resolve_date(Some("03/02/2026")),
            Err(BingoError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_get_analysis_handler() {
        let state = state_with(40);
        let query = DateQuery { date: Some("2026-02-03".into()) };
        let Json(resp) = get_analysis(State(state), Query(query)).await.unwrap();
        assert_eq!(resp.analysis.draws_analyzed, 40);
        assert_eq!(resp.analysis.scores.len(), 80);
    }

    #[tokio::test]
    async fn test_get_analysis_no_data() {
        let state = state_with(0);
        let Json(resp) = get_analysis(State(state), Query(DateQuery::default())).await.unwrap();
        assert!(resp.analysis.is_empty());
        assert!(resp.analysis.squad_sets.is_empty());
    }

    #[tokio::test]
    async fn test_post_analyze_rejects_bad_draw() {
        let state = state_with(0);
        let req = AnalyzeRequest { draws: vec![vec![1, 2, 3]] };
        let err = post_analyze(State(state), Json(req)).await.unwrap_err();
        assert!(matches!(err, BingoError::InvalidDraw(_)));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_check_counts_hits() {
        let state = state_with(30);
        let latest: Vec<String> = draws(1)[0].numbers().iter().map(|n| n.to_string()).collect();
        let query = CheckQuery {
            numbers: latest.join(" "),
            date: None,
        };
        let Json(resp) = get_check(State(state), Query(query)).await.unwrap();
        assert_eq!(resp.winning.len(), 20);
        assert_eq!(resp.results.len(), 20);
        assert!(resp.best_hits <= 6);
    }

    #[tokio::test]
    async fn test_get_check_requires_numbers() {
        let state = state_with(30);
        let query = CheckQuery {
            numbers: "abc".into(),
            date: None,
        };
        let err = get_check(State(state), Query(query)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_status_mapping() {
        let feed_err = BingoError::Feed {
            source_name: "winwin".into(),
            message: "down".into(),
        };
        assert_eq!(feed_err.into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            BingoError::Config("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
