//! Test utilities for storage initialization
//!
//! Provides an in-memory backend with the schema applied, plus seed
//! helpers for directory rows, so integration tests have no filesystem
//! dependencies.

use crate::error::Result;
use crate::storage::libsql::{ConnectionMode, LibsqlStorage};
use crate::types::{Goal, Worker, WorkerId};
use std::sync::Arc;

/// Create an in-memory storage backend with migrations applied
pub async fn create_test_storage() -> Result<Arc<LibsqlStorage>> {
    let storage = Arc::new(LibsqlStorage::connect(ConnectionMode::InMemory).await?);
    Ok(storage)
}

/// A directory row with sensible defaults for tests
///
/// Goal targets are 100 / 80 / 0, covering a full target, a partial target
/// and a "no data" goal.
pub fn sample_worker(id: i64, nombre: &str, dependencia: &str) -> Worker {
    Worker {
        id: WorkerId(id),
        nombre: nombre.to_string(),
        curp: format!("CURP{:04}", id),
        rfc: format!("RFC{:04}", id),
        superior: "Jefa de Departamento".to_string(),
        dependencia: dependencia.to_string(),
        area_adscripcion: "Dirección Administrativa".to_string(),
        puesto: "Analista".to_string(),
        nivel: "7".to_string(),
        plaza: "Base".to_string(),
        fecha_inicio_gobierno: "2019-02-01".to_string(),
        antig_puesto: "3 años".to_string(),
        antig_gob: "6 años".to_string(),
        comisionado: false,
        area_comision: None,
        funciones: [
            "Atención de trámites".to_string(),
            "Integración de expedientes".to_string(),
            "Elaboración de reportes".to_string(),
        ],
        goals: [
            Goal {
                description: "Trámites resueltos".to_string(),
                programmed: 100.0,
            },
            Goal {
                description: "Expedientes integrados".to_string(),
                programmed: 80.0,
            },
            Goal {
                description: "Sin meta asignada".to_string(),
                programmed: 0.0,
            },
        ],
    }
}

/// Seed a set of workers into the directory table
pub async fn seed_workers(storage: &LibsqlStorage, workers: &[Worker]) -> Result<()> {
    for worker in workers {
        storage.upsert_worker(worker).await?;
    }
    Ok(())
}
