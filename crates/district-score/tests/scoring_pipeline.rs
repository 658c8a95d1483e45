use district_score::scoring::{
    normalize, rank, round_display, CategoryKey, Direction, ExplainMode, ScoreError,
    ScoringEngine, WeightVector,
};
use district_score::table::{IndicatorTable, TableStore};
use std::io::Cursor;
use std::sync::Arc;

const SEOUL_SAMPLE: &str = "district,latitude,longitude,crime_rate,senior_pedestrian_accidents,sidewalk_ratio,crosswalk_density,hospital_density,pharmacy_density,park_area_ratio,green_space_ratio\n\
Jongno-gu,37.5735,126.9788,0.62,0.55,0.48,0.71,0.80,0.66,0.52,0.47\n\
Jung-gu,37.5641,126.9979,0.90,0.74,0.55,0.83,0.76,0.71,0.21,0.25\n\
Yongsan-gu,37.5326,126.9905,0.45,0.40,0.50,0.52,0.44,0.42,0.63,0.58\n\
Seongdong-gu,37.5633,127.0371,0.30,0.35,0.62,0.49,0.38,0.45,0.41,0.44\n\
Gangnam-gu,37.5172,127.0473,0.40,0.61,0.70,0.66,0.96,0.90,0.35,0.32\n\
Dobong-gu,37.6688,127.0471,0.15,0.22,0.41,0.30,0.31,0.36,0.88,0.91\n";

fn sample_engine() -> ScoringEngine {
    let table = IndicatorTable::from_reader(Cursor::new(SEOUL_SAMPLE)).expect("sample loads");
    ScoringEngine::new(Arc::new(table))
}

fn two_district_engine() -> ScoringEngine {
    let table = IndicatorTable::from_reader(Cursor::new(
        "district,crime_rate,senior_pedestrian_accidents\nA,0.2,0.1\nB,0.8,0.9\n",
    ))
    .expect("table loads");
    ScoringEngine::new(Arc::new(table))
}

#[test]
fn inverted_extremes_swap() {
    assert_eq!(normalize(0.0, true), 1.0);
    assert_eq!(normalize(1.0, true), 0.0);
}

#[test]
fn crime_rate_weight_contributes_its_complement() {
    let engine = two_district_engine();
    let weights = WeightVector::from_pairs([("crime_rate", 1.0)]).expect("valid weights");

    let scores = engine.weighted_scores(&weights).expect("scores");
    let a = scores.iter().find(|result| result.district == "A").expect("A scored");
    assert!((a.score - 0.8).abs() < 1e-9);
}

#[test]
fn descending_rank_is_bounded_ordered_and_gap_free() {
    let engine = sample_engine();
    let overall = engine.overall_scores();

    for limit in [1, 3, 6, 10] {
        let ranked = rank(&overall, Direction::Descending, limit).expect("ranked");
        assert_eq!(ranked.len(), (limit as usize).min(engine.table().len()));
        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
        for (index, entry) in ranked.iter().enumerate() {
            assert_eq!(entry.rank, index + 1);
        }
    }
}

#[test]
fn repeated_pipelines_serialize_identically() {
    let engine = sample_engine();
    let weights =
        WeightVector::from_pairs([("safety", 2.0), ("hospital_density", 1.0)]).expect("valid");

    let run = || {
        let scores = engine.weighted_scores(&weights).expect("scores");
        let ranked = rank(&scores, Direction::Descending, 5).expect("ranked");
        serde_json::to_string(&ranked).expect("serializes")
    };

    assert_eq!(run(), run());
}

#[test]
fn safety_topic_lists_lower_risk_first() {
    let engine = two_district_engine();
    let ranked = engine
        .topic_ranking(CategoryKey::Safety, 5)
        .expect("ranked");

    assert_eq!(ranked.len(), 2);
    assert_eq!((ranked[0].rank, ranked[0].district.as_str()), (1, "A"));
    assert_eq!(round_display(ranked[0].score), Some(0.15));
    assert_eq!((ranked[1].rank, ranked[1].district.as_str()), (2, "B"));
    assert_eq!(round_display(ranked[1].score), Some(0.85));
}

#[test]
fn explanations_compare_against_other_districts() {
    let engine = sample_engine();

    let best = engine
        .explain("Dobong-gu", ExplainMode::Positive)
        .expect("explains");
    assert_eq!(best.category, CategoryKey::Nature);
    assert_eq!(best.sentence, "Dobong-gu is the greenest district.");

    let worst = engine
        .explain("Jung-gu", ExplainMode::Negative)
        .expect("explains");
    assert_eq!(worst.category, CategoryKey::Safety);
    assert_eq!(worst.sentence, "Jung-gu is the least safe district.");
}

#[test]
fn unknown_districts_are_not_found_everywhere() {
    let engine = sample_engine();
    let missing = ScoreError::NotFound("Atlantis".to_string());

    assert_eq!(
        engine.explain("Atlantis", ExplainMode::Positive).unwrap_err(),
        missing
    );
    assert_eq!(engine.features("Atlantis").unwrap_err(), missing);
    assert_eq!(engine.metric_breakdown("Atlantis").unwrap_err(), missing);
}

#[test]
fn features_cover_every_category() {
    let engine = sample_engine();
    let snapshot = engine.features("Gangnam-gu").expect("features");

    assert_eq!(snapshot.features.len(), CategoryKey::ALL.len());
    assert_eq!(snapshot.features[&CategoryKey::Medical], Some(0.93));
    assert_eq!(snapshot.features[&CategoryKey::Transport], None);
}

#[test]
fn reload_does_not_disturb_engines_built_on_the_old_snapshot() {
    let store = TableStore::new(
        IndicatorTable::from_reader(Cursor::new(SEOUL_SAMPLE)).expect("sample loads"),
    );
    let engine = ScoringEngine::new(store.snapshot());

    store.replace(
        IndicatorTable::from_reader(Cursor::new("district,crime_rate\nSolo,0.5\n"))
            .expect("replacement loads"),
    );

    assert_eq!(engine.table().len(), 6);
    assert_eq!(store.snapshot().len(), 1);
}
