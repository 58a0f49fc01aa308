//! Core data types for the Arete evaluation system
//!
//! This module defines the fundamental data structures used throughout the
//! crate: workers, goals, evaluation records, periods, and access scopes.
//! The worker directory is owned by an external system; workers are
//! read-only from this crate's perspective.

use crate::scoring::{FactorScores, GoalOutcome};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for workers, assigned by the external directory system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub i64);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for evaluation records
///
/// Wraps a UUID so an evaluation is fully formed before it is inserted,
/// keeping the write a single statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationId(pub Uuid);

impl EvaluationId {
    /// Create a new random evaluation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an evaluation ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of a worker's three numeric goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Goal description as captured in the directory
    pub description: String,

    /// Programmed (target) value; 0 means no data / not applicable
    pub programmed: f64,
}

/// Worker record from the `trabajadores` directory table
///
/// Maintained by an external directory system; this crate only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub nombre: String,
    pub curp: String,
    pub rfc: String,
    pub superior: String,

    /// Organizational unit, the primary access-scope and filter dimension
    pub dependencia: String,
    pub area_adscripcion: String,
    pub puesto: String,
    pub nivel: String,
    pub plaza: String,

    /// Employment dates and seniority, kept as directory-formatted text
    pub fecha_inicio_gobierno: String,
    pub antig_puesto: String,
    pub antig_gob: String,

    /// Secondment flag; stored as "Sí"/"No" text in the table
    pub comisionado: bool,
    pub area_comision: Option<String>,

    /// Principal activities
    pub funciones: [String; 3],

    /// Three numeric goals with programmed targets
    pub goals: [Goal; 3],
}

/// Evaluation period, one evaluation per worker per period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub mes: u32,
    pub anio: i32,
}

impl Period {
    pub fn new(mes: u32, anio: i32) -> Self {
        Self { mes, anio }
    }

    /// Period for the current local date
    pub fn current() -> Self {
        let today = Local::now();
        Self {
            mes: today.month(),
            anio: today.year(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.mes, self.anio)
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.anio, self.mes).cmp(&(other.anio, other.mes))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// One scored evaluation record, written once and never edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub worker_id: WorkerId,

    /// Day of capture (the month/year pair lives in `period`)
    pub dia: u32,
    pub period: Period,

    /// Goal outcomes: stored percentage tier plus derived real value
    pub goals: [GoalOutcome; 3],

    /// The twelve factor selections
    pub factors: FactorScores,

    /// Sum of the twelve factor levels, always in [12, 48]
    pub puntaje_total: u8,

    pub comentarios: String,
    pub necesidades_capac: String,
}

/// Normalize a dependency name for comparison: trim and fold case
///
/// The directory carries dependency names with inconsistent casing and
/// stray whitespace, so every dependency comparison goes through here.
pub fn normalize_dependency(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Permitted dependency scope, supplied by the external identity provider
///
/// This crate never authenticates anyone; it receives the already-resolved
/// scope and applies it to reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AccessScope {
    /// All dependencies (global administrators)
    AllDependencies,

    /// A single dependency (area administrators and HR staff)
    Dependency { name: String },
}

impl AccessScope {
    /// Whether this scope permits records from the given dependency
    pub fn permits(&self, dependencia: &str) -> bool {
        match self {
            AccessScope::AllDependencies => true,
            AccessScope::Dependency { name } => {
                normalize_dependency(name) == normalize_dependency(dependencia)
            }
        }
    }

    /// The single permitted dependency, if the scope is restricted
    pub fn dependency(&self) -> Option<&str> {
        match self {
            AccessScope::AllDependencies => None,
            AccessScope::Dependency { name } => Some(name),
        }
    }
}

impl std::fmt::Display for AccessScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessScope::AllDependencies => write!(f, "all dependencies"),
            AccessScope::Dependency { name } => write!(f, "dependency:{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_id_creation() {
        let id1 = EvaluationId::new();
        let id2 = EvaluationId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_period_display() {
        assert_eq!(Period::new(3, 2025).to_string(), "3/2025");
    }

    #[test]
    fn test_period_ordering_year_before_month() {
        let a = Period::new(12, 2024);
        let b = Period::new(1, 2025);
        assert!(a < b);

        let c = Period::new(2, 2025);
        assert!(b < c);
    }

    #[test]
    fn test_scope_permits_normalized() {
        let scope = AccessScope::Dependency {
            name: "Secretaría de Salud".to_string(),
        };
        assert!(scope.permits("  SECRETARÍA DE SALUD "));
        assert!(!scope.permits("Secretaría de Educación"));
        assert!(AccessScope::AllDependencies.permits("anything"));
    }
}
