//! Arete - Performance Evaluation Scoring & Aggregation Core
//!
//! A storage-backed core for periodic employee performance evaluations:
//! - Twelve-factor qualitative rubric, each factor scored 1-4
//! - Three numeric goals scored by attainment tier (25/50/75/100%)
//! - One evaluation per worker per month/year, enforced by the store
//! - Scoped, filtered aggregation for reporting
//!
//! # Architecture
//!
//! The system is organized into several layers:
//! - **Types**: Core data structures (Worker, Evaluation, Period, ...)
//! - **Scoring/Rubric**: The rules turning selections into stored figures
//! - **Storage**: libSQL backend (local, in-memory, remote)
//! - **Services**: Directory access, evaluation writing, reporting
//!
//! Presentation, authentication and charting are external: callers hand
//! this crate an already-resolved [`AccessScope`] and render whatever the
//! reporting service returns.
//!
//! # Example
//!
//! ```ignore
//! use arete_core::{
//!     AccessScope, AttainmentLevel, ConnectionMode, EvaluationDraft,
//!     EvaluationService, LibsqlStorage, ReportFilter, ReportService, WorkerId,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = Arc::new(LibsqlStorage::connect_local("arete.db").await?);
//!     let reports = Arc::new(ReportService::new(storage.clone(), Duration::from_secs(60)));
//!     let evaluations = EvaluationService::new(storage.clone(), reports.clone());
//!
//!     let scope = AccessScope::Dependency { name: "Secretaría de Salud".into() };
//!     let mut draft = EvaluationDraft::new(WorkerId(1));
//!     draft.goal_levels = [AttainmentLevel::Achieved; 3];
//!     evaluations.submit(&scope, draft).await?;
//!
//!     let report = reports.report(&scope, &ReportFilter::default()).await?;
//!     println!("{} evaluations, mean {:?}", report.count, report.mean_total);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod rubric;
pub mod scoring;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::AreteConfig;
pub use error::{AreteError, Result};
pub use rubric::{Factor, LevelDescriptor, ALL_FACTORS, FACTOR_COUNT};
pub use scoring::{AttainmentLevel, FactorLevel, FactorScores, GoalOutcome, ALL_ATTAINMENT_LEVELS};
pub use services::{
    EvaluationDraft, EvaluationReport, EvaluationService, ReportFilter, ReportService,
    WorkerDirectory,
};
pub use storage::libsql::{ConnectionMode, LibsqlStorage};
pub use storage::{EvaluationRecord, StorageBackend};
pub use types::{AccessScope, Evaluation, EvaluationId, Goal, Period, Worker, WorkerId};
