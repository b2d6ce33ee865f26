mod common;

use assert2::{check, let_assert};
use common::{LoadedSession, TempDataset, dataset, session};
use rstest::rstest;
use std::sync::Arc;
use tour_recommender::{EngineConfig, EngineError, Session, SessionHandle, SimilarityMatrix, fuse};

fn assert_valid_similarity(matrix: &SimilarityMatrix) {
    for &a in matrix.ids() {
        for &b in matrix.ids() {
            let_assert!(Some(ab) = matrix.get(a, b));
            let_assert!(Some(ba) = matrix.get(b, a));
            check!(ab == ba, "asymmetric at ({}, {})", a, b);
            check!((0.0..=1.0).contains(&ab), "out of range at ({}, {}): {}", a, b, ab);
            check!(!ab.is_nan());
        }
    }
}

/// Test: both similarity matrices are symmetric, bounded, and NaN-free.
#[rstest]
fn similarity_matrices_are_well_formed(session: LoadedSession) {
    let session = &session.session;
    assert_valid_similarity(session.collaborative());
    assert_valid_similarity(session.content());

    for &id in session.collaborative().ids() {
        check!(session.collaborative().get(id, id) == Some(1.0));
    }
    check!(session.collaborative().ids() == [1, 2, 3, 4, 5]);
    check!(session.content().ids() == [1, 2, 3, 4, 5]);
}

/// Test: a destination without facility text is dissimilar to everything by content.
#[rstest]
fn empty_facilities_have_zero_content_similarity(session: LoadedSession) {
    let content = session.session.content();
    for &other in content.ids() {
        check!(content.get(4, other) == Some(0.0));
    }
    // Non-empty rows still have self-similarity 1
    check!(content.get(5, 5) == Some(1.0));
}

/// Test: fusing a matrix with itself returns the same matrix.
#[rstest]
#[case(0.0)]
#[case(0.6)]
#[case(1.0)]
fn fusion_fixed_point(session: LoadedSession, #[case] alpha: f64) {
    let collab = session.session.collaborative();
    let fused = fuse(collab, collab, alpha).unwrap();
    for &a in collab.ids() {
        for &b in collab.ids() {
            let_assert!(Some(expected) = collab.get(a, b));
            let_assert!(Some(actual) = fused.get(a, b));
            check!((actual - expected).abs() < 1e-12);
        }
    }
}

/// Test: the fused matrix is memoized per alpha and reused.
#[rstest]
fn fused_matrix_is_memoized(session: LoadedSession) {
    let session = &session.session;
    let first = session.fused(0.6).unwrap();
    let second = session.fused(0.6).unwrap();
    check!(Arc::ptr_eq(&first, &second));

    let pure_collab = session.fused(1.0).unwrap();
    check!(*pure_collab == *session.collaborative());
}

/// Test: loading fails cleanly when a source file is missing.
#[rstest]
fn missing_source_is_load_error(dataset: TempDataset) {
    let config = EngineConfig {
        rating_path: dataset.path().join("nope.csv"),
        ..dataset.config()
    };
    let_assert!(Err(EngineError::DataLoad { path, .. }) = Session::load(config));
    check!(path.ends_with("nope.csv"));
}

/// Test: a rating column for an undescribed destination is a schema error.
#[test]
fn rated_destination_without_description() {
    let dataset = TempDataset::with_sources(
        common::DESCRIPTIONS,
        "Nama,Jenis Kelamin,1,42\nAni,Perempuan,5,4\n",
    );
    let_assert!(Err(EngineError::Schema { reason, .. }) = Session::load(dataset.config()));
    check!(reason.contains("42"));
}

/// Test: a destination id heading two rating columns is rejected at load time.
#[test]
fn repeated_rating_column_is_schema_error() {
    let dataset = TempDataset::with_sources(
        common::DESCRIPTIONS,
        "Nama,Jenis Kelamin,1,1,2,3,4\nAni,Perempuan,5,4,3,2,1\n",
    );
    let_assert!(Err(EngineError::Schema { reason, .. }) = Session::load(dataset.config()));
    check!(reason.contains("duplicate rating column for destination 1"));
}

/// Test: negative ratings are rejected so collaborative scores stay in [0, 1].
#[test]
fn negative_rating_is_schema_error() {
    let dataset = TempDataset::with_sources(
        common::DESCRIPTIONS,
        "Nama,Jenis Kelamin,1,2,3,4,5\nAni,Perempuan,5,-4,3,2,1\nSari,Perempuan,1,-2,,,\n",
    );
    let_assert!(Err(EngineError::Schema { reason, .. }) = Session::load(dataset.config()));
    check!(reason.contains("rating must be non-negative"));
}

/// Test: described but unrated destinations cannot be fused.
#[test]
fn unrated_destination_is_shape_mismatch() {
    let dataset = TempDataset::with_sources(
        common::DESCRIPTIONS,
        "Nama,Jenis Kelamin,1,2,3,4\nAni,Perempuan,5,4,3,2\n",
    );
    let_assert!(
        Err(EngineError::ShapeMismatch { left: 4, right: 5, missing: 1 }) =
            Session::load(dataset.config())
    );
}

/// Test: out-of-range tuning is rejected before any data is read.
#[rstest]
fn invalid_alpha_rejected(dataset: TempDataset) {
    let config = EngineConfig {
        alpha: 1.5,
        ..dataset.config()
    };
    let_assert!(Err(error) = Session::load(config));
    check!(error.is_user_error());
}

/// Test: a TOML config file drives the session.
#[rstest]
fn config_file_round_trip(dataset: TempDataset) {
    let toml = format!(
        "description_path = {:?}\nrating_path = {:?}\nalpha = 0.5\nresult_limit = 2\n",
        dataset.description_path().display().to_string(),
        dataset.rating_path().display().to_string()
    );
    dataset.create_file("engine.toml", &toml);

    let config = EngineConfig::from_file(&dataset.path().join("engine.toml")).unwrap();
    check!(config.alpha == 0.5);
    let session = Session::load(config).unwrap();
    let result = session.recommend_default(&["Pantai Boom"]).unwrap();
    check!(result.len() == 2);
}

/// Test: a session can be shared across threads without locking.
#[rstest]
fn session_is_shareable(session: LoadedSession) {
    let shared = Arc::new(session.session);
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                scope.spawn(move || shared.recommend(&["Kawah Ijen"], 3, 0.6).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    check!(results.windows(2).all(|pair| pair[0] == pair[1]));
}

/// Test: reloading swaps in a complete new snapshot; old snapshots stay usable.
#[rstest]
fn handle_reload_swaps_snapshot(dataset: TempDataset) {
    let handle = SessionHandle::new(Session::load(dataset.config()).unwrap());
    let before = handle.snapshot();

    let config = EngineConfig {
        alpha: 0.2,
        ..dataset.config()
    };
    handle.reload(config).unwrap();
    let after = handle.snapshot();

    check!(!Arc::ptr_eq(&before, &after));
    check!(before.config().alpha == 0.6);
    check!(after.config().alpha == 0.2);
    check!(before.recommend_default(&["Pantai Boom"]).is_ok());

    // A failed reload keeps the current session
    let broken = EngineConfig {
        description_path: dataset.path().join("missing.csv"),
        ..dataset.config()
    };
    check!(handle.reload(broken).is_err());
    check!(Arc::ptr_eq(&after, &handle.snapshot()));
}
