use std::collections::BTreeMap;

use tempfile::tempdir;

use wrangler_model::{
    PipelineState, PipelineStep, QualityDelta, QualityMetrics, RankedTransformation,
    Transformation, TransformationCandidate, TransformationType, ValidationResult,
};
use wrangler_pipeline::{JsonStateStore, StateStore};

fn metrics(overall: f64) -> QualityMetrics {
    QualityMetrics {
        completeness: overall,
        consistency: overall,
        validity: overall,
        uniqueness: overall,
        overall,
    }
}

fn candidate(id: &str, before: f64, after: f64) -> TransformationCandidate {
    let mut params = BTreeMap::new();
    params.insert(
        "method".to_string(),
        wrangler_model::ParamValue::from("standard"),
    );
    TransformationCandidate {
        transformation: Transformation::new(
            id,
            TransformationType::Normalize,
            vec!["age".to_string()],
            params,
            true,
            "Standard normalize age (z-score)",
        ),
        validation_result: ValidationResult {
            passed: true,
            issues: Vec::new(),
            original_row_count: 10,
            transformed_row_count: 10,
            schema_compatible: true,
        },
        quality_before: metrics(before),
        quality_after: metrics(after),
        quality_delta: QualityDelta::between(metrics(before), metrics(after)),
    }
}

fn populated_state() -> PipelineState {
    let first = candidate("normalize-age-standard", 0.5, 0.8);
    let second = candidate("normalize-age-minmax", 0.5, 0.6);
    PipelineState {
        current_step: PipelineStep::Ranking,
        completed_steps: vec![
            PipelineStep::Profiling,
            PipelineStep::Generation,
            PipelineStep::Validation,
            PipelineStep::Ranking,
        ],
        data_profile: None,
        candidates: vec![first.clone(), second],
        ranked_transformations: vec![RankedTransformation {
            rank: 1,
            candidate: first,
            composite_score: 0.45,
            reasoning: "top pick".to_string(),
        }],
        error: None,
    }
}

#[test]
fn state_round_trips_through_the_store() {
    let dir = tempdir().unwrap();
    let store = JsonStateStore::new(dir.path());
    let state = populated_state();

    let path = store.save("demo", &state).unwrap();
    assert!(path.exists());

    let loaded = store.load("demo").unwrap().expect("saved state");
    assert_eq!(loaded.current_step, state.current_step);
    assert_eq!(loaded.completed_steps, state.completed_steps);
    assert_eq!(loaded.candidates.len(), 2);
    assert_eq!(loaded.ranked_transformations.len(), 1);
    assert_eq!(loaded.ranked_transformations[0].rank, 1);
    assert!(
        (loaded.ranked_transformations[0].composite_score - 0.45).abs() < 1e-12
    );
    assert_eq!(loaded.error, None);
    assert_eq!(loaded, state);
}

#[test]
fn persisted_document_is_json_with_a_timestamp() {
    let dir = tempdir().unwrap();
    let store = JsonStateStore::new(dir.path());
    let path = store.save("demo", &populated_state()).unwrap();

    let raw = std::fs::read_to_string(path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(document.get("saved_at").is_some());
    assert_eq!(document["current_step"], "ranking");
    assert_eq!(document["candidates"].as_array().unwrap().len(), 2);
    assert!(document.get("error").is_some());
}

#[test]
fn loading_a_missing_state_yields_none() {
    let dir = tempdir().unwrap();
    let store = JsonStateStore::new(dir.path());
    assert!(store.load("missing").unwrap().is_none());
}

#[test]
fn list_and_remove_manage_saved_states() {
    let dir = tempdir().unwrap();
    let store = JsonStateStore::new(dir.path());
    store.save("alpha", &PipelineState::new()).unwrap();
    store.save("beta", &PipelineState::new()).unwrap();

    assert_eq!(store.list().unwrap(), vec!["alpha", "beta"]);

    store.remove("alpha").unwrap();
    assert_eq!(store.list().unwrap(), vec!["beta"]);

    // Removing a missing state is not an error.
    store.remove("alpha").unwrap();
}

#[test]
fn error_field_survives_round_trip() {
    let dir = tempdir().unwrap();
    let store = JsonStateStore::new(dir.path());
    let mut state = PipelineState::new();
    state.error = Some("profiling skipped: bad input".to_string());

    store.save("failed", &state).unwrap();
    let loaded = store.load("failed").unwrap().expect("saved state");
    assert_eq!(loaded.error.as_deref(), Some("profiling skipped: bad input"));
}
