//! libSQL storage backend implementation
//!
//! Persistent storage over Turso/libSQL. Local file and in-memory modes
//! own their schema through the embedded migrations; the remote mode
//! connects to the production database, which this crate consumes but does
//! not own.

use crate::error::{AreteError, Result};
use crate::rubric::{ALL_FACTORS, FACTOR_COUNT};
use crate::scoring::{FactorScores, GoalOutcome};
use crate::storage::{EvaluationRecord, StorageBackend};
use crate::types::{Evaluation, EvaluationId, Goal, Period, Worker, WorkerId};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{params, Builder, Connection, Database};
use once_cell::sync::Lazy;
use tracing::{debug, info};

/// Embedded migrations, applied in order and tracked by name
const MIGRATIONS: [(&str, &str); 2] = [
    (
        "001_initial_schema.sql",
        include_str!("../../migrations/libsql/001_initial_schema.sql"),
    ),
    (
        "002_add_indexes.sql",
        include_str!("../../migrations/libsql/002_add_indexes.sql"),
    ),
];

/// Columns of `trabajadores` in the order the row mappers expect
const WORKER_COLUMNS: &str = "id, nombre, curp, rfc, superior, dependencia, area_adscripcion, \
     puesto, nivel, plaza, fecha_inicio_gobierno, antig_puesto, antig_gob, \
     comisionado, area_comision, funcion1, funcion2, funcion3, \
     meta1_desc, meta1_prog, meta2_desc, meta2_prog, meta3_desc, meta3_prog";

/// Insert statement for `evaluaciones`; the factor columns come from the
/// fixed rubric order so SQL and params cannot drift apart
static INSERT_EVALUATION_SQL: Lazy<String> = Lazy::new(|| {
    let factor_cols = ALL_FACTORS
        .iter()
        .map(|f| f.column())
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; 14 + FACTOR_COUNT].join(", ");
    format!(
        "INSERT INTO evaluaciones (id, trabajador_id, dia, mes, anio, \
         meta1_real, meta2_real, meta3_real, resultado1, resultado2, resultado3, \
         {factor_cols}, puntaje_total, comentarios, necesidades_capac) \
         VALUES ({placeholders})"
    )
});

/// Reporting join: evaluation columns plus the worker display fields
static SELECT_RECORDS_SQL: Lazy<String> = Lazy::new(|| {
    let factor_cols = ALL_FACTORS
        .iter()
        .map(|f| format!("e.{}", f.column()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT e.id, e.trabajador_id, e.dia, e.mes, e.anio, \
         e.meta1_real, e.meta2_real, e.meta3_real, \
         e.resultado1, e.resultado2, e.resultado3, \
         {factor_cols}, \
         e.puntaje_total, e.comentarios, e.necesidades_capac, \
         t.nombre, t.dependencia, t.area_adscripcion, t.puesto \
         FROM evaluaciones e \
         JOIN trabajadores t ON t.id = e.trabajador_id \
         ORDER BY e.anio, e.mes, t.nombre"
    )
});

/// Split a migration file into individual statements
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();

        // Skip comment-only and empty lines when not building a statement
        if current.is_empty() && (trimmed.is_empty() || trimmed.starts_with("--")) {
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);

        if trimmed.ends_with(';') {
            statements.push(std::mem::take(&mut current));
        }
    }

    if !current.trim().is_empty() {
        statements.push(current);
    }

    statements
}

/// Database connection mode
#[derive(Debug, Clone)]
pub enum ConnectionMode {
    /// Local file-based database
    Local(String),
    /// In-memory database (for testing)
    InMemory,
    /// Remote database (Turso Cloud)
    Remote { url: String, token: String },
}

/// libSQL storage backend
pub struct LibsqlStorage {
    /// Held to keep the (in-memory) database alive for as long as `conn`
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

impl LibsqlStorage {
    /// Connect and bring the schema up to date
    pub async fn connect(mode: ConnectionMode) -> Result<Self> {
        info!("Connecting to libSQL database: {:?}", mode);

        let db = match &mode {
            ConnectionMode::Local(path) => {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            AreteError::Database(format!(
                                "Failed to create database directory {}: {}",
                                parent.display(),
                                e
                            ))
                        })?;
                    }
                }
                Builder::new_local(path).build().await.map_err(|e| {
                    AreteError::Database(format!("Failed to open local database: {}", e))
                })?
            }
            ConnectionMode::InMemory => Builder::new_local(":memory:")
                .build()
                .await
                .map_err(|e| {
                    AreteError::Database(format!("Failed to create in-memory database: {}", e))
                })?,
            ConnectionMode::Remote { url, token } => {
                Builder::new_remote(url.clone(), token.clone())
                    .build()
                    .await
                    .map_err(|e| {
                        AreteError::Database(format!("Failed to connect to remote database: {}", e))
                    })?
            }
        };

        let conn = db
            .connect()
            .map_err(|e| AreteError::Database(format!("Failed to get connection: {}", e)))?;
        let storage = Self { db, conn };
        storage.run_migrations().await?;

        info!("libSQL database connection established");
        Ok(storage)
    }

    /// Convenience constructor for a local file path
    pub async fn connect_local(path: &str) -> Result<Self> {
        Self::connect(ConnectionMode::Local(path.to_string())).await
    }

    /// Get a connection to the database
    ///
    /// A single connection is held for the lifetime of the backend: an
    /// in-memory database is private to its connection, so every operation
    /// must share one connection to see the migrated schema.
    fn get_conn(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        debug!("Running database migrations...");

        let conn = self.get_conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations_applied (
                migration_name TEXT PRIMARY KEY,
                applied_at INTEGER NOT NULL
            )",
            params![],
        )
        .await
        .map_err(|e| AreteError::Migration(format!("Failed to create migrations table: {}", e)))?;

        for (name, sql) in MIGRATIONS {
            let mut rows = conn
                .query(
                    "SELECT COUNT(*) FROM _migrations_applied WHERE migration_name = ?",
                    params![name],
                )
                .await?;

            let already_applied = if let Some(row) = rows.next().await? {
                row.get::<i64>(0).unwrap_or(0)
            } else {
                0
            };

            if already_applied > 0 {
                debug!("Skipping already applied migration: {}", name);
                continue;
            }

            for statement in split_sql_statements(sql) {
                conn.execute(&statement, params![]).await.map_err(|e| {
                    AreteError::Migration(format!(
                        "Failed to execute statement in {}: {}",
                        name, e
                    ))
                })?;
            }

            conn.execute(
                "INSERT INTO _migrations_applied (migration_name, applied_at) VALUES (?, ?)",
                params![name, Utc::now().timestamp()],
            )
            .await
            .map_err(|e| AreteError::Migration(format!("Failed to record migration: {}", e)))?;

            info!("Executed migration: {}", name);
        }

        Ok(())
    }

    /// Insert or replace one worker row
    ///
    /// Directory-sync / bootstrap path: the directory system owns worker
    /// data, this method only loads its exports into local databases.
    pub async fn upsert_worker(&self, worker: &Worker) -> Result<()> {
        let conn = self.get_conn()?;

        let sql = format!(
            "INSERT OR REPLACE INTO trabajadores ({}) VALUES \
             (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            WORKER_COLUMNS
        );

        conn.execute(
            &sql,
            params![
                worker.id.0,
                worker.nombre.as_str(),
                worker.curp.as_str(),
                worker.rfc.as_str(),
                worker.superior.as_str(),
                worker.dependencia.as_str(),
                worker.area_adscripcion.as_str(),
                worker.puesto.as_str(),
                worker.nivel.as_str(),
                worker.plaza.as_str(),
                worker.fecha_inicio_gobierno.as_str(),
                worker.antig_puesto.as_str(),
                worker.antig_gob.as_str(),
                if worker.comisionado { "Sí" } else { "No" },
                worker.area_comision.clone(),
                worker.funciones[0].as_str(),
                worker.funciones[1].as_str(),
                worker.funciones[2].as_str(),
                worker.goals[0].description.as_str(),
                worker.goals[0].programmed,
                worker.goals[1].description.as_str(),
                worker.goals[1].programmed,
                worker.goals[2].description.as_str(),
                worker.goals[2].programmed,
            ],
        )
        .await
        .map_err(|e| AreteError::Database(format!("Failed to upsert worker: {}", e)))?;

        debug!("Upserted worker {}", worker.id);
        Ok(())
    }

    /// Convert a libsql row to a Worker
    fn row_to_worker(row: &libsql::Row) -> Result<Worker> {
        let id: i64 = row.get(0)?;
        let nombre: String = row.get(1)?;
        let curp: String = row.get(2)?;
        let rfc: String = row.get(3)?;
        let superior: String = row.get(4)?;
        let dependencia: String = row.get(5)?;
        let area_adscripcion: String = row.get(6)?;
        let puesto: String = row.get(7)?;
        let nivel: String = row.get(8)?;
        let plaza: String = row.get(9)?;
        let fecha_inicio_gobierno: String = row.get(10)?;
        let antig_puesto: String = row.get(11)?;
        let antig_gob: String = row.get(12)?;

        let comisionado: String = row.get(13)?;
        let area_comision: Option<String> = row.get(14)?;

        let funcion1: String = row.get(15)?;
        let funcion2: String = row.get(16)?;
        let funcion3: String = row.get(17)?;

        let meta1_desc: String = row.get(18)?;
        let meta1_prog: f64 = row.get(19)?;
        let meta2_desc: String = row.get(20)?;
        let meta2_prog: f64 = row.get(21)?;
        let meta3_desc: String = row.get(22)?;
        let meta3_prog: f64 = row.get(23)?;

        Ok(Worker {
            id: WorkerId(id),
            nombre,
            curp,
            rfc,
            superior,
            dependencia,
            area_adscripcion,
            puesto,
            nivel,
            plaza,
            fecha_inicio_gobierno,
            antig_puesto,
            antig_gob,
            comisionado: comisionado == "Sí",
            area_comision,
            funciones: [funcion1, funcion2, funcion3],
            goals: [
                Goal {
                    description: meta1_desc,
                    programmed: meta1_prog,
                },
                Goal {
                    description: meta2_desc,
                    programmed: meta2_prog,
                },
                Goal {
                    description: meta3_desc,
                    programmed: meta3_prog,
                },
            ],
        })
    }

    /// Convert a joined libsql row to an EvaluationRecord
    fn row_to_record(row: &libsql::Row) -> Result<EvaluationRecord> {
        let id_str: String = row.get(0)?;
        let id = EvaluationId::from_string(&id_str)
            .map_err(|e| AreteError::Database(format!("Invalid evaluation id: {}", e)))?;

        let trabajador_id: i64 = row.get(1)?;
        let dia: i64 = row.get(2)?;
        let mes: i64 = row.get(3)?;
        let anio: i64 = row.get(4)?;

        let meta1_real: f64 = row.get(5)?;
        let meta2_real: f64 = row.get(6)?;
        let meta3_real: f64 = row.get(7)?;
        let resultado1: f64 = row.get(8)?;
        let resultado2: f64 = row.get(9)?;
        let resultado3: f64 = row.get(10)?;

        let goals = [
            GoalOutcome::from_stored(resultado1, meta1_real)?,
            GoalOutcome::from_stored(resultado2, meta2_real)?,
            GoalOutcome::from_stored(resultado3, meta3_real)?,
        ];

        let mut levels = [0u8; FACTOR_COUNT];
        for (i, level) in levels.iter_mut().enumerate() {
            let raw: i64 = row.get((11 + i) as i32)?;
            *level = u8::try_from(raw).map_err(|_| {
                AreteError::Database(format!("Factor level out of range: {}", raw))
            })?;
        }
        let factors = FactorScores::from_levels(levels)?;

        let base = (11 + FACTOR_COUNT) as i32;
        let puntaje_total: i64 = row.get(base)?;
        let comentarios: String = row.get(base + 1)?;
        let necesidades_capac: String = row.get(base + 2)?;

        let nombre: String = row.get(base + 3)?;
        let dependencia: String = row.get(base + 4)?;
        let area_adscripcion: String = row.get(base + 5)?;
        let puesto: String = row.get(base + 6)?;

        Ok(EvaluationRecord {
            evaluation: Evaluation {
                id,
                worker_id: WorkerId(trabajador_id),
                dia: dia as u32,
                period: Period::new(mes as u32, anio as i32),
                goals,
                factors,
                puntaje_total: puntaje_total as u8,
                comentarios,
                necesidades_capac,
            },
            nombre,
            dependencia,
            area_adscripcion,
            puesto,
        })
    }
}

#[async_trait]
impl StorageBackend for LibsqlStorage {
    async fn list_workers(&self) -> Result<Vec<Worker>> {
        let conn = self.get_conn()?;

        let sql = format!("SELECT {} FROM trabajadores ORDER BY nombre", WORKER_COLUMNS);
        let mut rows = conn.query(&sql, params![]).await?;

        let mut workers = Vec::new();
        while let Some(row) = rows.next().await? {
            workers.push(Self::row_to_worker(&row)?);
        }

        debug!("Listed {} workers", workers.len());
        Ok(workers)
    }

    async fn get_worker(&self, id: WorkerId) -> Result<Worker> {
        let conn = self.get_conn()?;

        let sql = format!("SELECT {} FROM trabajadores WHERE id = ?", WORKER_COLUMNS);
        let mut rows = conn.query(&sql, params![id.0]).await?;

        match rows.next().await? {
            Some(row) => Self::row_to_worker(&row),
            None => Err(AreteError::NotFound(format!("worker {}", id))),
        }
    }

    async fn insert_evaluation(&self, evaluation: &Evaluation) -> Result<()> {
        use crate::rubric::Factor::*;

        let conn = self.get_conn()?;
        let f = &evaluation.factors;

        let result = conn
            .execute(
                INSERT_EVALUATION_SQL.as_str(),
                params![
                    evaluation.id.to_string(),
                    evaluation.worker_id.0,
                    evaluation.dia as i64,
                    evaluation.period.mes as i64,
                    evaluation.period.anio as i64,
                    evaluation.goals[0].real,
                    evaluation.goals[1].real,
                    evaluation.goals[2].real,
                    evaluation.goals[0].percent as f64,
                    evaluation.goals[1].percent as f64,
                    evaluation.goals[2].percent as f64,
                    f.level(JobKnowledge).level() as i64,
                    f.level(Judgment).level() as i64,
                    f.level(WorkQuality).level() as i64,
                    f.level(WorkMethod).level() as i64,
                    f.level(SupervisionNeed).level() as i64,
                    f.level(TrainingUptake).level() as i64,
                    f.level(Initiative).level() as i64,
                    f.level(Collaboration).level() as i64,
                    f.level(Responsibility).level() as i64,
                    f.level(Teamwork).level() as i64,
                    f.level(InterpersonalRelations).level() as i64,
                    f.level(ContinuousImprovement).level() as i64,
                    evaluation.puntaje_total as i64,
                    evaluation.comentarios.as_str(),
                    evaluation.necesidades_capac.as_str(),
                ],
            )
            .await;

        match result {
            Ok(_) => {
                debug!(
                    "Inserted evaluation {} for worker {} ({})",
                    evaluation.id, evaluation.worker_id, evaluation.period
                );
                Ok(())
            }
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("UNIQUE") {
                    Err(AreteError::DuplicateEvaluation {
                        worker_id: evaluation.worker_id.0,
                        month: evaluation.period.mes,
                        year: evaluation.period.anio,
                    })
                } else {
                    Err(AreteError::Database(format!(
                        "Failed to insert evaluation: {}",
                        msg
                    )))
                }
            }
        }
    }

    async fn evaluation_exists(&self, worker_id: WorkerId, period: Period) -> Result<bool> {
        let conn = self.get_conn()?;

        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM evaluaciones WHERE trabajador_id = ? AND mes = ? AND anio = ?",
                params![worker_id.0, period.mes as i64, period.anio as i64],
            )
            .await?;

        let count = if let Some(row) = rows.next().await? {
            row.get::<i64>(0)?
        } else {
            0
        };

        Ok(count > 0)
    }

    async fn list_evaluations(&self) -> Result<Vec<EvaluationRecord>> {
        let conn = self.get_conn()?;

        let mut rows = conn.query(SELECT_RECORDS_SQL.as_str(), params![]).await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(Self::row_to_record(&row)?);
        }

        debug!("Listed {} evaluation records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sql_statements() {
        let sql = "-- comment\n\nCREATE TABLE a (\n  id INTEGER\n);\nCREATE INDEX i ON a(id);\n";
        let statements = split_sql_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE a"));
        assert!(statements[1].starts_with("CREATE INDEX i"));
    }

    #[test]
    fn test_insert_sql_covers_all_columns() {
        let placeholders = INSERT_EVALUATION_SQL.matches('?').count();
        assert_eq!(placeholders, 14 + FACTOR_COUNT);
        for factor in ALL_FACTORS {
            assert!(INSERT_EVALUATION_SQL.contains(factor.column()));
        }
    }

    #[test]
    fn test_select_sql_joins_worker_fields() {
        assert!(SELECT_RECORDS_SQL.contains("JOIN trabajadores"));
        assert!(SELECT_RECORDS_SQL.contains("t.dependencia"));
        assert!(SELECT_RECORDS_SQL.contains("ORDER BY e.anio, e.mes"));
    }
}
