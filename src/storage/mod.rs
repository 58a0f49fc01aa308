//! Storage layer for the Arete evaluation system
//!
//! Provides the backend abstraction and the libSQL implementation used for
//! local, in-memory (test) and remote databases. The worker table is
//! consumed, not owned: this layer reads workers and writes evaluations.

pub mod libsql;
pub mod test_utils;

use crate::error::Result;
use crate::types::{Evaluation, Period, Worker, WorkerId};
use async_trait::async_trait;
use serde::Serialize;

/// One evaluation row joined with the worker display fields the reporting
/// surface needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRecord {
    pub evaluation: Evaluation,
    pub nombre: String,
    pub dependencia: String,
    pub area_adscripcion: String,
    pub puesto: String,
}

impl EvaluationRecord {
    /// Period label used for chronological grouping, "mes/anio"
    pub fn periodo(&self) -> String {
        self.evaluation.period.to_string()
    }
}

/// Storage backend trait defining all required operations
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read all worker rows
    async fn list_workers(&self) -> Result<Vec<Worker>>;

    /// Read one worker by id; NotFound when the id does not resolve
    async fn get_worker(&self, id: WorkerId) -> Result<Worker>;

    /// Insert one evaluation row
    ///
    /// The storage-level unique constraint on (trabajador_id, mes, anio)
    /// is the duplicate authority: a violation surfaces as
    /// DuplicateEvaluation with no partial write.
    async fn insert_evaluation(&self, evaluation: &Evaluation) -> Result<()>;

    /// Whether an evaluation already exists for this worker and period
    async fn evaluation_exists(&self, worker_id: WorkerId, period: Period) -> Result<bool>;

    /// Read all evaluation rows joined with worker display fields
    async fn list_evaluations(&self) -> Result<Vec<EvaluationRecord>>;
}
