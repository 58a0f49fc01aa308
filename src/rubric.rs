//! Twelve-factor evaluation rubric
//!
//! Fixed, ordered list of the qualitative factors a worker is scored on,
//! with the presentation text for each factor/level cell. The factor order
//! and the persistence column names are stable contracts; the descriptor
//! text is static content loaded once at process start.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of rubric factors
pub const FACTOR_COUNT: usize = 12;

/// One of the twelve fixed qualitative rubric dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    JobKnowledge,
    Judgment,
    WorkQuality,
    WorkMethod,
    SupervisionNeed,
    TrainingUptake,
    Initiative,
    Collaboration,
    Responsibility,
    Teamwork,
    InterpersonalRelations,
    ContinuousImprovement,
}

/// Fixed display and persistence order of the twelve factors
pub const ALL_FACTORS: [Factor; FACTOR_COUNT] = [
    Factor::JobKnowledge,
    Factor::Judgment,
    Factor::WorkQuality,
    Factor::WorkMethod,
    Factor::SupervisionNeed,
    Factor::TrainingUptake,
    Factor::Initiative,
    Factor::Collaboration,
    Factor::Responsibility,
    Factor::Teamwork,
    Factor::InterpersonalRelations,
    Factor::ContinuousImprovement,
];

impl Factor {
    /// Position in the fixed factor order
    pub fn index(&self) -> usize {
        ALL_FACTORS.iter().position(|f| f == self).expect("factor in ALL_FACTORS")
    }

    /// Column name in the `evaluaciones` table
    pub fn column(&self) -> &'static str {
        match self {
            Factor::JobKnowledge => "conocimiento",
            Factor::Judgment => "criterio",
            Factor::WorkQuality => "calidad",
            Factor::WorkMethod => "tecnica",
            Factor::SupervisionNeed => "supervision",
            Factor::TrainingUptake => "capacitacion",
            Factor::Initiative => "iniciativa",
            Factor::Collaboration => "colaboracion",
            Factor::Responsibility => "responsabilidad",
            Factor::Teamwork => "equipo",
            Factor::InterpersonalRelations => "relaciones",
            Factor::ContinuousImprovement => "mejora",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Factor::JobKnowledge => "CONOCIMIENTO DEL PUESTO",
            Factor::Judgment => "CRITERIO",
            Factor::WorkQuality => "CALIDAD DEL TRABAJO",
            Factor::WorkMethod => "TÉCNICA Y ORGANIZACIÓN DEL TRABAJO",
            Factor::SupervisionNeed => "NECESIDAD DE SUPERVISIÓN",
            Factor::TrainingUptake => "CAPACITACIÓN RECIBIDA",
            Factor::Initiative => "INICIATIVA",
            Factor::Collaboration => "COLABORACIÓN Y DISCRECIÓN",
            Factor::Responsibility => "RESPONSABILIDAD Y DISCIPLINA",
            Factor::Teamwork => "TRABAJO EN EQUIPO",
            Factor::InterpersonalRelations => "RELACIONES INTERPERSONALES",
            Factor::ContinuousImprovement => "MEJORA CONTINUA",
        }
    }

    /// Resolve a factor from its persistence column name
    pub fn from_column(column: &str) -> Option<Factor> {
        static BY_COLUMN: Lazy<HashMap<&'static str, Factor>> = Lazy::new(|| {
            ALL_FACTORS.iter().map(|f| (f.column(), *f)).collect()
        });
        BY_COLUMN.get(column).copied()
    }

    /// The four level descriptors for this factor, worst to best
    pub fn descriptors(&self) -> &'static [LevelDescriptor; 4] {
        match self {
            Factor::JobKnowledge => &JOB_KNOWLEDGE,
            Factor::Judgment => &JUDGMENT,
            Factor::WorkQuality => &WORK_QUALITY,
            Factor::WorkMethod => &WORK_METHOD,
            Factor::SupervisionNeed => &SUPERVISION_NEED,
            Factor::TrainingUptake => &TRAINING_UPTAKE,
            Factor::Initiative => &INITIATIVE,
            Factor::Collaboration => &COLLABORATION,
            Factor::Responsibility => &RESPONSIBILITY,
            Factor::Teamwork => &TEAMWORK,
            Factor::InterpersonalRelations => &INTERPERSONAL,
            Factor::ContinuousImprovement => &IMPROVEMENT,
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Presentation text for one factor/level cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDescriptor {
    /// Short text shown in the selection cell
    pub summary: &'static str,

    /// Full rationale shown as the cell's detailed help
    pub detail: &'static str,
}

const JOB_KNOWLEDGE: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Conoce solo partes; requiere orientación constante.",
        detail: "Conoce solo partes aisladas de sus funciones; requiere orientación constante; desconoce normatividad, procesos críticos y sistemas relevantes; confunde conceptos básicos y afecta tiempos/calidad.",
    },
    LevelDescriptor {
        summary: "2. Conocimiento elemental; resuelve rutinas con apoyo.",
        detail: "Conoce aspectos elementales del puesto; resuelve tareas rutinarias con apoyo; domina parcialmente normatividad y procedimientos; presenta errores frecuentes en casos no estándar.",
    },
    LevelDescriptor {
        summary: "3. Conoce adecuadamente; opera con autonomía en la mayoría.",
        detail: "Conoce adecuadamente el perfil del puesto; opera con autonomía en la mayoría de tareas; aplica normatividad y procedimientos con pocos errores; resuelve casos de mediana complejidad.",
    },
    LevelDescriptor {
        summary: "4. Dominio amplio; asesora y anticipa impactos.",
        detail: "Dominio amplio del puesto y sus interdependencias; aplica normativa con precisión; anticipa impactos; asesora a otros; aprende rápidamente nuevos marcos y herramientas.",
    },
];

const JUDGMENT: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Decide sin fundamento; no contrasta evidencias.",
        detail: "Toma decisiones poco fundamentadas; elige alternativas que no resuelven el problema; no contrasta evidencias ni escenarios.",
    },
    LevelDescriptor {
        summary: "2. Decide con información básica; ignora variables a veces.",
        detail: "Decide con base en información básica; a veces ignora variables relevantes; resuelve casos simples, se complica en casos medios.",
    },
    LevelDescriptor {
        summary: "3. Analiza alternativas; pide apoyo en casos complejos.",
        detail: "Analiza causas; compara alternativas; elige opciones viables; solicita apoyo oportuno en casos complejos.",
    },
    LevelDescriptor {
        summary: "4. Diagnóstico sólido; pondera riesgos y documenta.",
        detail: "Formula diagnósticos sólidos; pondera riesgos/costos/tiempos; propone soluciones integrales y sostenibles; documenta decisiones.",
    },
];

const WORK_QUALITY: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Entregables con errores; requiere rehacer frecuentemente.",
        detail: "Entregables con errores de forma/fondo; información incompleta; necesita rehacer con frecuencia.",
    },
    LevelDescriptor {
        summary: "2. Calidad aceptable pero irregular; errores periódicos.",
        detail: "Calidad aceptable pero irregular; errores periódicos; formatos parcialmente cumplidos.",
    },
    LevelDescriptor {
        summary: "3. Entregables correctos y oportunos; errores esporádicos.",
        detail: "Entregables correctos, completos y oportunos; estándar institucional cumplido; errores esporádicos.",
    },
    LevelDescriptor {
        summary: "4. Alta calidad sostenida; estandariza buenas prácticas.",
        detail: "Alta calidad sostenida; mejora presentaciones y claridad; estandariza buenas prácticas; cero retrabajos.",
    },
];

const WORK_METHOD: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Sin métodos ni controles; desorden en archivos y tiempos.",
        detail: "No aplica métodos ni controles; archivos y tiempos desordenados; genera cuellos de botella.",
    },
    LevelDescriptor {
        summary: "2. Técnicas básicas intermitentes; documentación incompleta.",
        detail: "Aplica técnicas básicas de forma intermitente; planeación limitada; documentación incompleta.",
    },
    LevelDescriptor {
        summary: "3. Planifica y controla avances; documenta evidencias.",
        detail: "Planifica tareas; controla avances; documenta evidencias; usa correctamente formatos/herramientas.",
    },
    LevelDescriptor {
        summary: "4. Optimiza flujos; diseña checklists y reduce riesgos.",
        detail: "Optimiza flujos y tiempos; simplifica procesos; diseña checklists y plantillas; reduce riesgos operativos.",
    },
];

const SUPERVISION_NEED: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Requiere seguimiento permanente; no avanza sin indicaciones.",
        detail: "Requiere seguimiento permanente; no avanza sin indicaciones; pierde el enfoque con facilidad.",
    },
    LevelDescriptor {
        summary: "2. Requiere supervisión ocasional en hitos clave.",
        detail: "Requiere supervisión ocasional en hitos clave; cumple lo solicitado con guía.",
    },
    LevelDescriptor {
        summary: "3. Mínima supervisión; reporta avances y pide revisión crítica.",
        detail: "Requiere mínima supervisión; reporta avances; pide revisión en puntos críticos.",
    },
    LevelDescriptor {
        summary: "4. Autonomía; propone objetivos y solicita validación final.",
        detail: "Trabaja con autonomía; propone objetivos y verifica resultados; solo solicita validación final.",
    },
];

const TRAINING_UPTAKE: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. No aplica contenidos; sin evidencia de mejora.",
        detail: "No aplica contenidos; olvida o desestima buenas prácticas; sin evidencia de mejora.",
    },
    LevelDescriptor {
        summary: "2. Aplica parcialmente; requiere recordatorios frecuentes.",
        detail: "Aplica parcialmente lo aprendido; mejora limitada; requiere recordatorios frecuentes.",
    },
    LevelDescriptor {
        summary: "3. Integra aprendizajes; mejora en tiempos y calidad.",
        detail: "Integra aprendizajes en tareas; se observan mejoras en tiempos/calidad.",
    },
    LevelDescriptor {
        summary: "4. Difunde buenas prácticas; capacita y mejora procesos.",
        detail: "Aplica y difunde buenas prácticas; capacita a otros; traduce aprendizaje en mejoras del proceso.",
    },
];

const INITIATIVE: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Se limita a lo solicitado; evita proponer mejoras.",
        detail: "Se limita a lo solicitado; no anticipa problemas; evita proponer mejoras.",
    },
    LevelDescriptor {
        summary: "2. Propone ideas puntuales; apoya mejoras simples si se le pide.",
        detail: "Propone ideas puntuales; apoya mejoras simples cuando se le pide.",
    },
    LevelDescriptor {
        summary: "3. Detecta oportunidades y propone acciones concretas.",
        detail: "Detecta áreas de oportunidad y sugiere acciones concretas; participa activamente en mejoras.",
    },
    LevelDescriptor {
        summary: "4. Impulsa mejoras continuas; institucionaliza cambios.",
        detail: "Impulsa mejoras continuas; lidera pequeños cambios; documenta e institucionaliza mejoras.",
    },
];

const COLLABORATION: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Baja cooperación; maneja mal información; genera conflictos.",
        detail: "Baja cooperación; filtra información sin cuidado; genera conflictos.",
    },
    LevelDescriptor {
        summary: "2. Colabora irregular; discreción aceptable con lapsos.",
        detail: "Colabora de forma irregular; discreción aceptable con lapsos.",
    },
    LevelDescriptor {
        summary: "3. Buena cooperación; manejo prudente de información sensible.",
        detail: "Buena cooperación y comunicación; manejo prudente de información sensible.",
    },
    LevelDescriptor {
        summary: "4. Colabora proactivamente; confidencialidad impecable.",
        detail: "Colabora proactivamente; confidencialidad impecable; mejora comunicación y clima laboral.",
    },
];

const RESPONSIBILITY: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Incumple plazos y normas; requiere llamados de atención.",
        detail: "Incumple plazos y normas; justifica sin sustento; requiere llamados de atención.",
    },
    LevelDescriptor {
        summary: "2. Cumple parcialmente; respeta normas con recordatorios.",
        detail: "Cumple parcialmente metas; respeta normas con recordatorios.",
    },
    LevelDescriptor {
        summary: "3. Cumple metas y disposiciones; puntual y confiable.",
        detail: "Cumple metas y disposiciones; es puntual y confiable.",
    },
    LevelDescriptor {
        summary: "4. Excede metas con apego normativo; lidera con el ejemplo.",
        detail: "Excede metas con apego normativo; promueve la disciplina con el ejemplo.",
    },
];

const TEAMWORK: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Dificulta coordinación; poca apertura al consenso.",
        detail: "Dificulta coordinación; impone criterios; poca apertura al consenso.",
    },
    LevelDescriptor {
        summary: "2. Coopera cuando se solicita; apertura moderada.",
        detail: "Coopera cuando se solicita; comunicación suficiente; apertura moderada.",
    },
    LevelDescriptor {
        summary: "3. Colabora activamente; comparte información; busca acuerdos.",
        detail: "Colabora activamente; comparte información; busca acuerdos.",
    },
    LevelDescriptor {
        summary: "4. Integra voluntades; facilita acuerdos y resultados conjuntos.",
        detail: "Referente de equipo; integra voluntades; facilita acuerdos y entrega conjunta de resultados.",
    },
];

const INTERPERSONAL: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. Trato deficiente; conflictos frecuentes; baja escucha.",
        detail: "Trato deficiente; conflictos frecuentes; baja escucha.",
    },
    LevelDescriptor {
        summary: "2. Trato correcto con áreas de mejora; escucha parcial.",
        detail: "Trato correcto con áreas de mejora; escucha parcial.",
    },
    LevelDescriptor {
        summary: "3. Interacción respetuosa y efectiva; escucha activa.",
        detail: "Interacción respetuosa y efectiva; escucha activa.",
    },
    LevelDescriptor {
        summary: "4. Excelente trato; empatía; resuelve tensiones constructivamente.",
        detail: "Excelente trato; empatía; resolución constructiva de tensiones.",
    },
];

const IMPROVEMENT: [LevelDescriptor; 4] = [
    LevelDescriptor {
        summary: "1. No identifica mejoras; estanca procesos.",
        detail: "No identifica áreas de mejora; estanca procesos.",
    },
    LevelDescriptor {
        summary: "2. Identifica mejoras puntuales; ejecución parcial.",
        detail: "Identifica mejoras puntuales; ejecución parcial.",
    },
    LevelDescriptor {
        summary: "3. Identifica y ejecuta mejoras con impacto observable.",
        detail: "Identifica y ejecuta mejoras con impacto observable.",
    },
    LevelDescriptor {
        summary: "4. Mejora sistemáticamente; mide resultados y consolida estándares.",
        detail: "Mejora de manera sistemática; mide resultados; consolida estándares.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_order_is_stable() {
        let columns: Vec<&str> = ALL_FACTORS.iter().map(|f| f.column()).collect();
        assert_eq!(
            columns,
            vec![
                "conocimiento",
                "criterio",
                "calidad",
                "tecnica",
                "supervision",
                "capacitacion",
                "iniciativa",
                "colaboracion",
                "responsabilidad",
                "equipo",
                "relaciones",
                "mejora",
            ]
        );
    }

    #[test]
    fn test_every_factor_has_four_descriptors() {
        for factor in ALL_FACTORS {
            let descriptors = factor.descriptors();
            assert_eq!(descriptors.len(), 4);
            for (i, d) in descriptors.iter().enumerate() {
                assert!(!d.summary.is_empty());
                assert!(!d.detail.is_empty());
                // Cell summaries are numbered 1..4 in display order
                assert!(d.summary.starts_with(&format!("{}.", i + 1)), "{}", d.summary);
            }
        }
    }

    #[test]
    fn test_from_column_round_trip() {
        for factor in ALL_FACTORS {
            assert_eq!(Factor::from_column(factor.column()), Some(factor));
        }
        assert_eq!(Factor::from_column("puntaje_total"), None);
    }

    #[test]
    fn test_index_matches_order() {
        for (i, factor) in ALL_FACTORS.iter().enumerate() {
            assert_eq!(factor.index(), i);
        }
    }
}
