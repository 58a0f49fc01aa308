//! Scoring model: goal attainment tiers and factor score aggregation
//!
//! Two rules turn raw selections into stored figures:
//! - a goal level (1-4) maps to a fixed percentage tier and a derived real
//!   value against the worker's programmed target;
//! - the twelve factor levels (1-4 each) sum to the total score, always in
//!   [12, 48].
//!
//! Levels arriving from outside (CLI input, stored rows) are validated at
//! the boundary via `TryFrom`; everything past that point is well-formed by
//! construction.

use crate::error::AreteError;
use crate::rubric::{Factor, ALL_FACTORS, FACTOR_COUNT};
use serde::{Deserialize, Serialize};

/// Goal attainment level, the evaluator's pick for one goal
///
/// Defaults to `Minimal` (level 1) when no prior selection exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AttainmentLevel {
    #[default]
    Minimal = 1,
    Partial = 2,
    Significant = 3,
    Achieved = 4,
}

/// All attainment levels in ascending order
pub const ALL_ATTAINMENT_LEVELS: [AttainmentLevel; 4] = [
    AttainmentLevel::Minimal,
    AttainmentLevel::Partial,
    AttainmentLevel::Significant,
    AttainmentLevel::Achieved,
];

impl AttainmentLevel {
    /// Numeric level, 1-4
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Stored percentage for this tier: 25, 50, 75 or 100
    pub fn percent(&self) -> u8 {
        match self {
            AttainmentLevel::Minimal => 25,
            AttainmentLevel::Partial => 50,
            AttainmentLevel::Significant => 75,
            AttainmentLevel::Achieved => 100,
        }
    }

    /// Progress band covered by this tier, inclusive percent bounds
    pub fn band(&self) -> (u8, u8) {
        match self {
            AttainmentLevel::Minimal => (0, 25),
            AttainmentLevel::Partial => (26, 50),
            AttainmentLevel::Significant => (51, 75),
            AttainmentLevel::Achieved => (76, 100),
        }
    }

    /// Short tier label
    pub fn label(&self) -> &'static str {
        match self {
            AttainmentLevel::Minimal => "Avance mínimo",
            AttainmentLevel::Partial => "Avance parcial",
            AttainmentLevel::Significant => "Avance significativo",
            AttainmentLevel::Achieved => "Meta alcanzada",
        }
    }

    /// Help text shown for this tier
    pub fn help(&self) -> &'static str {
        match self {
            AttainmentLevel::Minimal => "Avance muy limitado respecto a lo programado.",
            AttainmentLevel::Partial => "Existe avance, pero aún distante de la meta.",
            AttainmentLevel::Significant => "Progreso importante; aún no se alcanza completamente.",
            AttainmentLevel::Achieved => "La meta se cumple conforme a lo programado o se supera.",
        }
    }

    /// Resolve the tier a stored percentage belongs to
    pub fn from_percent(percent: f64) -> Result<Self, AreteError> {
        ALL_ATTAINMENT_LEVELS
            .iter()
            .find(|level| level.percent() as f64 == percent)
            .copied()
            .ok_or_else(|| {
                AreteError::Validation(format!(
                    "stored percentage {} is not one of 25/50/75/100",
                    percent
                ))
            })
    }
}

impl From<AttainmentLevel> for u8 {
    fn from(level: AttainmentLevel) -> u8 {
        level.level()
    }
}

impl TryFrom<u8> for AttainmentLevel {
    type Error = AreteError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AttainmentLevel::Minimal),
            2 => Ok(AttainmentLevel::Partial),
            3 => Ok(AttainmentLevel::Significant),
            4 => Ok(AttainmentLevel::Achieved),
            other => Err(AreteError::Validation(format!(
                "attainment level must be 1-4, got {}",
                other
            ))),
        }
    }
}

impl TryFrom<i64> for AttainmentLevel {
    type Error = AreteError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| AreteError::Validation(format!("attainment level must be 1-4, got {}", value)))
            .and_then(AttainmentLevel::try_from)
    }
}

/// Stored outcome for one goal: percentage tier plus derived real value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalOutcome {
    /// Stored attainment percentage, one of 25/50/75/100
    pub percent: u8,

    /// Derived real value: programmed × percent / 100; 0 when the goal has
    /// no programmed target
    pub real: f64,
}

impl GoalOutcome {
    /// Derive the stored figures from a tier selection and the programmed
    /// target. The selected tier is authoritative input; it is not checked
    /// against observed evidence.
    pub fn from_selection(level: AttainmentLevel, programmed: f64) -> Self {
        let percent = level.percent();
        let real = if programmed > 0.0 {
            programmed * (percent as f64 / 100.0)
        } else {
            0.0
        };
        Self { percent, real }
    }

    /// Rebuild an outcome from stored columns, validating the percentage
    pub fn from_stored(percent: f64, real: f64) -> Result<Self, AreteError> {
        let level = AttainmentLevel::from_percent(percent)?;
        Ok(Self {
            percent: level.percent(),
            real,
        })
    }

    /// The tier this outcome was selected at
    pub fn level(&self) -> AttainmentLevel {
        // percent is tier-valued by construction
        AttainmentLevel::from_percent(self.percent as f64).expect("tier-valued percent")
    }
}

/// Factor score level for one rubric dimension
///
/// Defaults to `Basic` (level 2) when unselected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FactorLevel {
    Insufficient = 1,
    #[default]
    Basic = 2,
    Solid = 3,
    Outstanding = 4,
}

impl FactorLevel {
    /// Numeric level, 1-4
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl From<FactorLevel> for u8 {
    fn from(level: FactorLevel) -> u8 {
        level.level()
    }
}

impl TryFrom<u8> for FactorLevel {
    type Error = AreteError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FactorLevel::Insufficient),
            2 => Ok(FactorLevel::Basic),
            3 => Ok(FactorLevel::Solid),
            4 => Ok(FactorLevel::Outstanding),
            other => Err(AreteError::Validation(format!(
                "factor level must be 1-4, got {}",
                other
            ))),
        }
    }
}

impl TryFrom<i64> for FactorLevel {
    type Error = AreteError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| AreteError::Validation(format!("factor level must be 1-4, got {}", value)))
            .and_then(FactorLevel::try_from)
    }
}

/// The complete set of twelve factor selections
///
/// Only complete sets exist; partial selections live in the caller until
/// every factor has a level. The total is always the arithmetic sum of the
/// twelve stored levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScores([FactorLevel; FACTOR_COUNT]);

impl Default for FactorScores {
    fn default() -> Self {
        Self([FactorLevel::default(); FACTOR_COUNT])
    }
}

impl FactorScores {
    /// All factors at the same level
    pub fn uniform(level: FactorLevel) -> Self {
        Self([level; FACTOR_COUNT])
    }

    /// Build from raw levels in the fixed factor order
    pub fn from_levels(levels: [u8; FACTOR_COUNT]) -> Result<Self, AreteError> {
        let mut scores = [FactorLevel::default(); FACTOR_COUNT];
        for (i, raw) in levels.into_iter().enumerate() {
            scores[i] = FactorLevel::try_from(raw)?;
        }
        Ok(Self(scores))
    }

    /// Level selected for one factor
    pub fn level(&self, factor: Factor) -> FactorLevel {
        self.0[factor.index()]
    }

    /// Set the level for one factor
    pub fn set(&mut self, factor: Factor, level: FactorLevel) {
        self.0[factor.index()] = level;
    }

    /// Builder-style set, for test and CLI construction
    pub fn with(mut self, factor: Factor, level: FactorLevel) -> Self {
        self.set(factor, level);
        self
    }

    /// Iterate selections in the fixed factor order
    pub fn iter(&self) -> impl Iterator<Item = (Factor, FactorLevel)> + '_ {
        ALL_FACTORS.iter().map(move |f| (*f, self.0[f.index()]))
    }

    /// Total score: sum of the twelve levels, always in [12, 48]
    pub fn total(&self) -> u8 {
        self.0.iter().map(|l| l.level()).sum()
    }
}
