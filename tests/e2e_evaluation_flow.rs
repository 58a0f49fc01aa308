//! End-to-end tests for the evaluation capture flow
//!
//! Exercises the complete submit path against an in-memory database:
//! scoring derivations, scope enforcement, the duplicate guard, and the
//! write/read round trip.

use arete_core::storage::test_utils::{create_test_storage, sample_worker, seed_workers};
use arete_core::{
    AccessScope, AreteError, AttainmentLevel, EvaluationDraft, EvaluationService, Factor,
    FactorLevel, FactorScores, LibsqlStorage, Period, ReportFilter, ReportService,
    StorageBackend, WorkerId,
};
use std::sync::Arc;
use std::time::Duration;

fn services(storage: Arc<LibsqlStorage>) -> (Arc<ReportService>, EvaluationService) {
    let reports = Arc::new(ReportService::new(
        storage.clone(),
        Duration::from_secs(60),
    ));
    let evaluations = EvaluationService::new(storage, reports.clone());
    (reports, evaluations)
}

fn draft_for(worker_id: i64, period: Period) -> EvaluationDraft {
    let mut draft = EvaluationDraft::new(WorkerId(worker_id));
    draft.period = Some(period);
    draft.goal_levels = [
        AttainmentLevel::Achieved,
        AttainmentLevel::Partial,
        AttainmentLevel::Minimal,
    ];
    draft.factors = FactorScores::uniform(FactorLevel::Solid);
    draft.comentarios = "Buen desempeño general".to_string();
    draft.necesidades_capac = "Curso de archivo".to_string();
    draft
}

#[tokio::test]
async fn test_submit_derives_stored_figures() {
    let storage = create_test_storage().await.unwrap();
    seed_workers(&storage, &[sample_worker(1, "Ana López", "Secretaría de Salud")])
        .await
        .unwrap();

    let (_, evaluations) = services(storage.clone());
    let evaluation = evaluations
        .submit(
            &AccessScope::AllDependencies,
            draft_for(1, Period::new(3, 2025)),
        )
        .await
        .unwrap();

    // Programmed 100 at level 4: stored 100%, real 100.0
    assert_eq!(evaluation.goals[0].percent, 100);
    assert_eq!(evaluation.goals[0].real, 100.0);

    // Programmed 80 at level 2: stored 50%, real 40.0
    assert_eq!(evaluation.goals[1].percent, 50);
    assert_eq!(evaluation.goals[1].real, 40.0);

    // No programmed target: stored tier kept, real value 0
    assert_eq!(evaluation.goals[2].percent, 25);
    assert_eq!(evaluation.goals[2].real, 0.0);

    // Twelve factors at level 3
    assert_eq!(evaluation.puntaje_total, 36);
}

#[tokio::test]
async fn test_round_trip_preserves_stored_values() {
    let storage = create_test_storage().await.unwrap();
    seed_workers(&storage, &[sample_worker(1, "Ana López", "Secretaría de Salud")])
        .await
        .unwrap();

    let (reports, evaluations) = services(storage.clone());

    let mut draft = draft_for(1, Period::new(4, 2025));
    draft.factors = FactorScores::uniform(FactorLevel::Basic)
        .with(Factor::JobKnowledge, FactorLevel::Outstanding)
        .with(Factor::ContinuousImprovement, FactorLevel::Insufficient);
    let written = evaluations
        .submit(&AccessScope::AllDependencies, draft)
        .await
        .unwrap();

    let report = reports
        .report(&AccessScope::AllDependencies, &ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(report.count, 1);

    let read = &report.rows[0].evaluation;
    assert_eq!(read.id, written.id);
    assert_eq!(read.factors, written.factors);
    assert_eq!(read.puntaje_total, written.puntaje_total);
    assert_eq!(read.goals, written.goals);
    assert_eq!(read.period, written.period);
    assert_eq!(read.comentarios, written.comentarios);
    assert_eq!(read.necesidades_capac, written.necesidades_capac);

    // Worker display fields come through the join
    assert_eq!(report.rows[0].nombre, "Ana López");
    assert_eq!(report.rows[0].dependencia, "Secretaría de Salud");
}

#[tokio::test]
async fn test_second_submission_fails_and_row_unchanged() {
    let storage = create_test_storage().await.unwrap();
    seed_workers(&storage, &[sample_worker(1, "Ana López", "Secretaría de Salud")])
        .await
        .unwrap();

    let (reports, evaluations) = services(storage.clone());
    let period = Period::new(5, 2025);

    let first = evaluations
        .submit(&AccessScope::AllDependencies, draft_for(1, period))
        .await
        .unwrap();

    let mut second = draft_for(1, period);
    second.factors = FactorScores::uniform(FactorLevel::Outstanding);
    let err = evaluations
        .submit(&AccessScope::AllDependencies, second)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AreteError::DuplicateEvaluation {
            worker_id: 1,
            month: 5,
            year: 2025
        }
    ));

    // The original row is untouched
    let report = reports
        .report(&AccessScope::AllDependencies, &ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(report.count, 1);
    assert_eq!(report.rows[0].evaluation.id, first.id);
    assert_eq!(report.rows[0].evaluation.puntaje_total, 36);
}

#[tokio::test]
async fn test_unique_constraint_is_the_authority() {
    // Bypass the service pre-check and insert directly: the storage
    // constraint must still reject the second row.
    let storage = create_test_storage().await.unwrap();
    seed_workers(&storage, &[sample_worker(1, "Ana López", "Secretaría de Salud")])
        .await
        .unwrap();

    let (_, evaluations) = services(storage.clone());
    let period = Period::new(6, 2025);
    let written = evaluations
        .submit(&AccessScope::AllDependencies, draft_for(1, period))
        .await
        .unwrap();

    let mut clone = written.clone();
    clone.id = arete_core::EvaluationId::new();
    let err = storage.insert_evaluation(&clone).await.unwrap_err();
    assert!(matches!(err, AreteError::DuplicateEvaluation { .. }));
}

#[tokio::test]
async fn test_same_worker_other_period_is_allowed() {
    let storage = create_test_storage().await.unwrap();
    seed_workers(&storage, &[sample_worker(1, "Ana López", "Secretaría de Salud")])
        .await
        .unwrap();

    let (reports, evaluations) = services(storage.clone());
    evaluations
        .submit(&AccessScope::AllDependencies, draft_for(1, Period::new(1, 2025)))
        .await
        .unwrap();
    evaluations
        .submit(&AccessScope::AllDependencies, draft_for(1, Period::new(2, 2025)))
        .await
        .unwrap();

    let report = reports
        .report(&AccessScope::AllDependencies, &ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(report.count, 2);
}

#[tokio::test]
async fn test_unknown_worker_is_not_found() {
    let storage = create_test_storage().await.unwrap();
    let (_, evaluations) = services(storage.clone());

    let err = evaluations
        .submit(&AccessScope::AllDependencies, draft_for(99, Period::new(1, 2025)))
        .await
        .unwrap_err();
    assert!(matches!(err, AreteError::NotFound(_)));
}

#[tokio::test]
async fn test_scope_blocks_foreign_dependency() {
    let storage = create_test_storage().await.unwrap();
    seed_workers(
        &storage,
        &[sample_worker(1, "Ana López", "Secretaría de Salud")],
    )
    .await
    .unwrap();

    let (reports, evaluations) = services(storage.clone());
    let scope = AccessScope::Dependency {
        name: "Secretaría de Educación".to_string(),
    };

    let err = evaluations
        .submit(&scope, draft_for(1, Period::new(1, 2025)))
        .await
        .unwrap_err();
    assert!(matches!(err, AreteError::Validation(_)));

    // Nothing was written
    let report = reports
        .report(&AccessScope::AllDependencies, &ReportFilter::default())
        .await
        .unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_local_database_persists_across_reconnects() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("arete.db");
    let db_path = db_path.to_str().unwrap();

    {
        let storage = Arc::new(LibsqlStorage::connect_local(db_path).await.unwrap());
        seed_workers(&storage, &[sample_worker(1, "Ana López", "Secretaría de Salud")])
            .await
            .unwrap();
        let (_, evaluations) = services(storage);
        evaluations
            .submit(&AccessScope::AllDependencies, draft_for(1, Period::new(7, 2025)))
            .await
            .unwrap();
    }

    // Reconnect: applied migrations are skipped and the row is still there
    let storage = Arc::new(LibsqlStorage::connect_local(db_path).await.unwrap());
    let (reports, _) = services(storage);
    let report = reports
        .report(&AccessScope::AllDependencies, &ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(report.count, 1);
    assert_eq!(report.rows[0].nombre, "Ana López");
}

#[tokio::test]
async fn test_scope_match_ignores_case_and_whitespace() {
    let storage = create_test_storage().await.unwrap();
    seed_workers(
        &storage,
        &[sample_worker(1, "Ana López", "Secretaría de Salud")],
    )
    .await
    .unwrap();

    let (_, evaluations) = services(storage.clone());
    let scope = AccessScope::Dependency {
        name: "  SECRETARÍA DE SALUD ".to_string(),
    };

    evaluations
        .submit(&scope, draft_for(1, Period::new(1, 2025)))
        .await
        .unwrap();
}
