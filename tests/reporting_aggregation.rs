//! Integration tests for the reporting aggregator
//!
//! Seeds workers across two dependencies, writes evaluations through the
//! service, and checks scoped filtering, statistics, grouping, and cache
//! invalidation after writes.

use arete_core::storage::test_utils::{create_test_storage, sample_worker, seed_workers};
use arete_core::{
    AccessScope, AttainmentLevel, EvaluationDraft, EvaluationService, FactorLevel, FactorScores,
    LibsqlStorage, Period, ReportFilter, ReportService, WorkerId,
};
use std::sync::Arc;
use std::time::Duration;

const SALUD: &str = "Secretaría de Salud";
const EDUCACION: &str = "Secretaría de Educación";

async fn seeded_services() -> (Arc<LibsqlStorage>, Arc<ReportService>, EvaluationService) {
    let storage = create_test_storage().await.unwrap();
    seed_workers(
        &storage,
        &[
            sample_worker(1, "Ana López", SALUD),
            sample_worker(2, "Bruno Díaz", SALUD),
            sample_worker(3, "Carmen Ruiz", EDUCACION),
        ],
    )
    .await
    .unwrap();

    let reports = Arc::new(ReportService::new(
        storage.clone(),
        Duration::from_secs(60),
    ));
    let evaluations = EvaluationService::new(storage.clone(), reports.clone());
    (storage, reports, evaluations)
}

async fn submit(
    evaluations: &EvaluationService,
    worker_id: i64,
    period: Period,
    level: FactorLevel,
) {
    let mut draft = EvaluationDraft::new(WorkerId(worker_id));
    draft.period = Some(period);
    draft.goal_levels = [AttainmentLevel::Achieved; 3];
    draft.factors = FactorScores::uniform(level);
    evaluations
        .submit(&AccessScope::AllDependencies, draft)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_dependency_reports_no_data() {
    let (_storage, reports, evaluations) = seeded_services().await;
    submit(&evaluations, 1, Period::new(1, 2025), FactorLevel::Solid).await;

    let scope = AccessScope::Dependency {
        name: EDUCACION.to_string(),
    };
    let report = reports.report(&scope, &ReportFilter::default()).await.unwrap();

    assert!(report.is_empty());
    assert_eq!(report.count, 0);
    assert_eq!(report.mean_total, None);
}

#[tokio::test]
async fn test_scope_restricts_rows_and_mean() {
    let (_storage, reports, evaluations) = seeded_services().await;
    submit(&evaluations, 1, Period::new(1, 2025), FactorLevel::Solid).await; // 36
    submit(&evaluations, 2, Period::new(1, 2025), FactorLevel::Outstanding).await; // 48
    submit(&evaluations, 3, Period::new(1, 2025), FactorLevel::Insufficient).await; // 12

    let all = reports
        .report(&AccessScope::AllDependencies, &ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(all.count, 3);
    assert_eq!(all.mean_total, Some(32.0));

    let salud = reports
        .report(
            &AccessScope::Dependency {
                name: SALUD.to_string(),
            },
            &ReportFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(salud.count, 2);
    assert_eq!(salud.mean_total, Some(42.0));
}

#[tokio::test]
async fn test_filters_are_a_conjunction() {
    let (_storage, reports, evaluations) = seeded_services().await;
    submit(&evaluations, 1, Period::new(1, 2025), FactorLevel::Solid).await;
    submit(&evaluations, 2, Period::new(1, 2025), FactorLevel::Basic).await;
    submit(&evaluations, 3, Period::new(1, 2025), FactorLevel::Basic).await;

    let filter = ReportFilter {
        nombre: Some("Ana López".to_string()),
        dependencia: Some(SALUD.to_string()),
        ..Default::default()
    };
    let report = reports
        .report(&AccessScope::AllDependencies, &filter)
        .await
        .unwrap();
    assert_eq!(report.count, 1);
    assert_eq!(report.rows[0].nombre, "Ana López");

    // Same name filter with the wrong dependency matches nothing
    let filter = ReportFilter {
        nombre: Some("Ana López".to_string()),
        dependencia: Some(EDUCACION.to_string()),
        ..Default::default()
    };
    let report = reports
        .report(&AccessScope::AllDependencies, &filter)
        .await
        .unwrap();
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_dependency_filter_is_normalized() {
    let (_storage, reports, evaluations) = seeded_services().await;
    submit(&evaluations, 1, Period::new(1, 2025), FactorLevel::Solid).await;

    let filter = ReportFilter {
        dependencia: Some("  secretaría de salud ".to_string()),
        ..Default::default()
    };
    let report = reports
        .report(&AccessScope::AllDependencies, &filter)
        .await
        .unwrap();
    assert_eq!(report.count, 1);
}

#[tokio::test]
async fn test_grouping_and_chronology() {
    let (_storage, reports, evaluations) = seeded_services().await;
    submit(&evaluations, 1, Period::new(12, 2024), FactorLevel::Basic).await;
    submit(&evaluations, 1, Period::new(1, 2025), FactorLevel::Solid).await;
    submit(&evaluations, 3, Period::new(11, 2024), FactorLevel::Basic).await;

    let report = reports
        .report(&AccessScope::AllDependencies, &ReportFilter::default())
        .await
        .unwrap();

    let by_worker = report.by_worker();
    assert_eq!(by_worker["Ana López"].len(), 2);
    assert_eq!(by_worker["Carmen Ruiz"].len(), 1);

    let by_dependency = report.by_dependency();
    assert_eq!(by_dependency[SALUD].len(), 2);
    assert_eq!(by_dependency[EDUCACION].len(), 1);

    let periods: Vec<String> = report
        .chronological()
        .iter()
        .map(|r| r.periodo())
        .collect();
    assert_eq!(periods, vec!["11/2024", "12/2024", "1/2025"]);
}

#[tokio::test]
async fn test_cache_is_invalidated_by_writes() {
    let (_storage, reports, evaluations) = seeded_services().await;
    submit(&evaluations, 1, Period::new(1, 2025), FactorLevel::Solid).await;

    // Prime the cache
    let first = reports
        .report(&AccessScope::AllDependencies, &ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(first.count, 1);

    // A write must invalidate it; the next read sees the new row well
    // before the TTL expires
    submit(&evaluations, 2, Period::new(1, 2025), FactorLevel::Basic).await;
    let second = reports
        .report(&AccessScope::AllDependencies, &ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(second.count, 2);
}
