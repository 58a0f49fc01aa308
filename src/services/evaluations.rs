//! Evaluation Record Service (writer)
//!
//! Validates one complete set of selections, derives the stored figures,
//! and persists a single evaluation row. There is no state machine: a
//! submission is one validate-derive-insert step, and every failure
//! surfaces before or without a write.

use crate::error::{AreteError, Result};
use crate::scoring::{AttainmentLevel, FactorScores, GoalOutcome};
use crate::services::reporting::ReportService;
use crate::storage::StorageBackend;
use crate::types::{AccessScope, Evaluation, EvaluationId, Period, WorkerId};
use chrono::{Datelike, Local};
use std::sync::Arc;
use tracing::info;

/// One complete set of evaluator selections, ready to submit
#[derive(Debug, Clone)]
pub struct EvaluationDraft {
    pub worker_id: WorkerId,

    /// Evaluation period; defaults to the current month/year
    pub period: Option<Period>,

    /// Tier selections for the three goals
    pub goal_levels: [AttainmentLevel; 3],

    /// The twelve factor selections
    pub factors: FactorScores,

    pub comentarios: String,
    pub necesidades_capac: String,
}

impl EvaluationDraft {
    /// Draft with default selections (goals at level 1, factors at level 2)
    pub fn new(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            period: None,
            goal_levels: [AttainmentLevel::default(); 3],
            factors: FactorScores::default(),
            comentarios: String::new(),
            necesidades_capac: String::new(),
        }
    }
}

/// Writer service for evaluation records
pub struct EvaluationService {
    storage: Arc<dyn StorageBackend>,
    reports: Arc<ReportService>,
}

impl EvaluationService {
    pub fn new(storage: Arc<dyn StorageBackend>, reports: Arc<ReportService>) -> Self {
        Self { storage, reports }
    }

    /// Validate and persist one evaluation
    ///
    /// The caller's scope must cover the worker's dependency. The selected
    /// tiers are authoritative input: derivations use the worker's
    /// programmed targets, and the storage-level unique constraint on
    /// (worker, month, year) is the duplicate authority, so concurrent
    /// submissions fail deterministically even past the friendly pre-check.
    pub async fn submit(&self, scope: &AccessScope, draft: EvaluationDraft) -> Result<Evaluation> {
        let worker = self.storage.get_worker(draft.worker_id).await?;

        if !scope.permits(&worker.dependencia) {
            return Err(AreteError::Validation(format!(
                "worker {} belongs to '{}', outside the permitted scope ({})",
                worker.id, worker.dependencia, scope
            )));
        }

        let today = Local::now();
        let period = draft.period.unwrap_or_else(Period::current);

        if self.storage.evaluation_exists(worker.id, period).await? {
            return Err(AreteError::DuplicateEvaluation {
                worker_id: worker.id.0,
                month: period.mes,
                year: period.anio,
            });
        }

        let goals = [
            GoalOutcome::from_selection(draft.goal_levels[0], worker.goals[0].programmed),
            GoalOutcome::from_selection(draft.goal_levels[1], worker.goals[1].programmed),
            GoalOutcome::from_selection(draft.goal_levels[2], worker.goals[2].programmed),
        ];

        let factors = draft.factors;
        let evaluation = Evaluation {
            id: EvaluationId::new(),
            worker_id: worker.id,
            dia: today.day(),
            period,
            goals,
            puntaje_total: factors.total(),
            factors,
            comentarios: draft.comentarios,
            necesidades_capac: draft.necesidades_capac,
        };

        self.storage.insert_evaluation(&evaluation).await?;
        self.reports.invalidate();

        info!(
            "Registered evaluation for {} ({}): total {}",
            worker.nombre, period, evaluation.puntaje_total
        );
        Ok(evaluation)
    }
}
