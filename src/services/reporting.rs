//! Evaluation Aggregator
//!
//! Scoped, filtered reads of evaluation rows joined with worker display
//! fields, plus the statistics and groupings the reporting surface renders.
//! Reads go through a short-TTL cache invalidated after every write.

use crate::error::Result;
use crate::services::cache::QueryCache;
use crate::storage::{EvaluationRecord, StorageBackend};
use crate::types::{normalize_dependency, AccessScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Optional equality filters over the reporting dimensions
///
/// Filters combine as a conjunction; an absent filter means no
/// restriction. Dependency matching is trim- and case-insensitive, the
/// rest are exact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub nombre: Option<String>,
    pub dependencia: Option<String>,
    pub area_adscripcion: Option<String>,
    pub puesto: Option<String>,
}

impl ReportFilter {
    fn matches(&self, record: &EvaluationRecord) -> bool {
        if let Some(nombre) = &self.nombre {
            if &record.nombre != nombre {
                return false;
            }
        }
        if let Some(dependencia) = &self.dependencia {
            if normalize_dependency(dependencia) != normalize_dependency(&record.dependencia) {
                return false;
            }
        }
        if let Some(area) = &self.area_adscripcion {
            if &record.area_adscripcion != area {
                return false;
            }
        }
        if let Some(puesto) = &self.puesto {
            if &record.puesto != puesto {
                return false;
            }
        }
        true
    }
}

/// Aggregated view over the matching evaluation rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub rows: Vec<EvaluationRecord>,

    /// Number of matching rows
    pub count: usize,

    /// Mean of the total scores rounded to 2 decimals; None when the
    /// filtered set is empty ("no data" rather than an error)
    pub mean_total: Option<f64>,
}

impl EvaluationReport {
    fn from_rows(rows: Vec<EvaluationRecord>) -> Self {
        let count = rows.len();
        let mean_total = if count == 0 {
            None
        } else {
            let sum: f64 = rows.iter().map(|r| r.evaluation.puntaje_total as f64).sum();
            Some(((sum / count as f64) * 100.0).round() / 100.0)
        };
        Self {
            rows,
            count,
            mean_total,
        }
    }

    /// The filter matched nothing; a reportable state, not an error
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows grouped by worker name, for per-worker display
    pub fn by_worker(&self) -> BTreeMap<&str, Vec<&EvaluationRecord>> {
        let mut groups: BTreeMap<&str, Vec<&EvaluationRecord>> = BTreeMap::new();
        for record in &self.rows {
            groups.entry(record.nombre.as_str()).or_default().push(record);
        }
        groups
    }

    /// Rows grouped by dependency, for distribution display
    pub fn by_dependency(&self) -> BTreeMap<&str, Vec<&EvaluationRecord>> {
        let mut groups: BTreeMap<&str, Vec<&EvaluationRecord>> = BTreeMap::new();
        for record in &self.rows {
            groups
                .entry(record.dependencia.as_str())
                .or_default()
                .push(record);
        }
        groups
    }

    /// Rows ordered by (anio, mes), for time-series display
    pub fn chronological(&self) -> Vec<&EvaluationRecord> {
        let mut ordered: Vec<&EvaluationRecord> = self.rows.iter().collect();
        ordered.sort_by_key(|r| r.evaluation.period);
        ordered
    }
}

/// Reporting service over the evaluation store
pub struct ReportService {
    storage: Arc<dyn StorageBackend>,
    cache: QueryCache<String, EvaluationReport>,
}

impl ReportService {
    pub fn new(storage: Arc<dyn StorageBackend>, ttl: Duration) -> Self {
        Self {
            storage,
            cache: QueryCache::new(64, ttl),
        }
    }

    /// Build the report for a scope and filter set
    pub async fn report(
        &self,
        scope: &AccessScope,
        filter: &ReportFilter,
    ) -> Result<EvaluationReport> {
        let key = Self::cache_key(scope, filter);
        if let Some(report) = self.cache.get(&key) {
            debug!("Report served from cache ({} rows)", report.count);
            return Ok(report);
        }

        let records = self.storage.list_evaluations().await?;
        let rows: Vec<EvaluationRecord> = records
            .into_iter()
            .filter(|r| scope.permits(&r.dependencia) && filter.matches(r))
            .collect();

        let report = EvaluationReport::from_rows(rows);
        debug!(
            "Report built for {}: {} rows, mean {:?}",
            scope, report.count, report.mean_total
        );

        self.cache.insert(key, report.clone());
        Ok(report)
    }

    /// Drop cached reports; called after every evaluation write
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    fn cache_key(scope: &AccessScope, filter: &ReportFilter) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            scope,
            filter.nombre.as_deref().unwrap_or(""),
            filter
                .dependencia
                .as_deref()
                .map(normalize_dependency)
                .unwrap_or_default(),
            filter.area_adscripcion.as_deref().unwrap_or(""),
            filter.puesto.as_deref().unwrap_or(""),
        )
    }
}
