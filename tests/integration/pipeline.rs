//! End-to-end scoring properties through the public API.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt;

use bingo_scout::config::{AppConfig, FeedConfig};
use bingo_scout::dashboard::build_router;
use bingo_scout::dashboard::routes::DashboardState;
use bingo_scout::engine::synergy::CoOccurrenceMatrix;
use bingo_scout::engine::{ScoringConfig, ScoringEngine, SYNERGY_WINDOW};
use bingo_scout::feed::fetch_with_fallback;
use bingo_scout::types::{SquadPlan, SquadSize};

use crate::mock_source::{draw_of, history, MockSource};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}

fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

#[test]
fn test_empty_history_is_no_data() {
    let a = engine().analyze(&[]);
    assert!(a.scores.is_empty());
    assert!(a.squad_sets.is_empty());
    assert!(a.latest_draw.is_none());
}

#[test]
fn test_three_identical_draws() {
    let draws = vec![draw_of(1..=20); 3];
    let a = engine().analyze(&draws);

    for n in 1..=20u8 {
        assert_eq!(a.scores[&n].streak, 3);
        assert_eq!(a.scores[&n].base, 3);
    }
    for n in 21..=80u8 {
        assert_eq!(a.scores[&n].streak, 0);
        assert_eq!(a.scores[&n].base, 0);
        assert_eq!(a.scores[&n].omission, 99);
    }
}

#[test]
fn test_synergy_bounded_by_window() {
    let draws = vec![draw_of(41..=60); 150];
    let m = CoOccurrenceMatrix::from_draws(&draws, SYNERGY_WINDOW);
    assert_eq!(m.synergy(41, 60), 100);
    assert_eq!(m.synergy(60, 41), 100);
}

#[test]
fn test_scores_deterministic_across_engines() {
    let draws = history(150, 13);
    assert_eq!(engine().analyze(&draws), engine().analyze(&draws));
}

#[test]
fn test_custom_plans() {
    let cfg = ScoringConfig {
        drag_weight: 0.0,
        squads: vec![
            SquadPlan::new("six", SquadSize::Six, 10, true),
            SquadPlan::new("three", SquadSize::Three, 10, false),
            SquadPlan::new("six-open", SquadSize::Six, 4, false),
        ],
    };
    let a = ScoringEngine::new(cfg).analyze(&history(80, 9));
    assert_eq!(a.squad_sets.len(), 3);

    let mut seen = HashSet::new();
    for squad in &a.squad_sets[0].squads {
        for &n in &squad.numbers {
            assert!(seen.insert(n));
        }
    }

    for set in &a.squad_sets {
        for squad in &set.squads {
            let unique: HashSet<_> = squad.numbers.iter().collect();
            assert_eq!(unique.len(), set.plan.size.get());
            assert!(squad.numbers.contains(&squad.seed));
        }
    }
    assert_eq!(a.squad_sets[2].squads.len(), 4);
}

#[tokio::test]
async fn test_fallback_to_previous_day() {
    let source = MockSource::new().with_day(day(9), history(50, 7));
    let draws = fetch_with_fallback(&source, day(10), false).await;
    assert_eq!(draws.len(), 50);
    assert_eq!(source.requests(), vec![day(10), day(9)]);
}

#[tokio::test]
async fn test_no_fallback_when_day_present() {
    let source = MockSource::new()
        .with_day(day(10), history(5, 3))
        .with_day(day(9), history(50, 7));
    let draws = fetch_with_fallback(&source, day(10), false).await;
    assert_eq!(draws.len(), 5);
    assert_eq!(source.requests(), vec![day(10)]);
}

#[tokio::test]
async fn test_failing_source_degrades() {
    let source = MockSource::new().with_day(day(10), history(5, 3));
    source.set_error("connection reset");
    let draws = fetch_with_fallback(&source, day(10), true).await;
    assert!(draws.is_empty());
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn test_router_end_to_end() {
    let source = MockSource::new().with_day(day(10), history(120, 11));
    let cfg = AppConfig::parse("").unwrap();
    let state = Arc::new(DashboardState::new(
        ScoringEngine::new(cfg.scoring),
        Arc::new(source.clone()),
        FeedConfig::default(),
    ));

    let resp = build_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/analysis?date=2026-04-10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["draws_analyzed"], 120);

    let latest = json["latest_draw"].as_array().unwrap();
    for n in latest {
        let key = n.as_u64().unwrap().to_string();
        assert_eq!(json["scores"][key.as_str()]["omission"], 0);
    }
    assert_eq!(source.requests(), vec![day(10)]);
}
