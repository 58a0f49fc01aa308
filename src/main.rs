//! Arete - performance evaluation capture and reporting CLI
//!
//! Thin command-line surface over the library services: list workers,
//! capture one evaluation, and print scoped/filtered reports. The real
//! presentation layer lives elsewhere; this binary exists so the core can
//! be driven end to end from a shell.

use anyhow::{anyhow, Context};
use arete_core::{
    AccessScope, AreteConfig, AttainmentLevel, EvaluationDraft, EvaluationService, Factor,
    FactorLevel, FactorScores, LibsqlStorage, Period, ReportFilter, ReportService, Worker,
    WorkerDirectory, WorkerId, ALL_ATTAINMENT_LEVELS, ALL_FACTORS,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arete", about = "Performance evaluation capture and reporting", version)]
struct Cli {
    /// Config file path (defaults to ./arete.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Database URL: a local path, ":memory:", or libsql://... (overrides config)
    #[arg(long, global = true, env = "ARETE_DATABASE_URL")]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and bring the schema up to date
    Init,

    /// Load a worker directory export (JSON array) into the database
    Import {
        /// Path to the JSON file
        #[arg(long)]
        file: String,
    },

    /// List workers, optionally restricted to one dependency
    Workers {
        /// Restrict to one dependency
        #[arg(long)]
        dependency: Option<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one worker's directory record, goals included
    Worker {
        /// Worker id
        #[arg(long)]
        id: i64,
    },

    /// Print the goal tier table and the twelve-factor rubric
    Rubric,

    /// Capture one evaluation
    Evaluate {
        /// Worker id
        #[arg(long)]
        worker: i64,

        /// Three goal levels 1-4, comma separated (e.g. "4,2,1")
        #[arg(long)]
        goals: String,

        /// Twelve factor levels 1-4, comma separated, in rubric order
        #[arg(long)]
        factors: String,

        /// Evaluation month (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,

        /// Evaluation year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Free-text comments
        #[arg(long, default_value = "")]
        comments: String,

        /// Training needs notes
        #[arg(long, default_value = "")]
        needs: String,

        /// Permitted dependency scope (omit for all dependencies)
        #[arg(long)]
        scope: Option<String>,
    },

    /// Print a scoped, filtered report
    Report {
        /// Permitted dependency scope (omit for all dependencies)
        #[arg(long)]
        scope: Option<String>,

        /// Filter by worker name
        #[arg(long)]
        name: Option<String>,

        /// Filter by dependency
        #[arg(long)]
        dependency: Option<String>,

        /// Filter by assignment area
        #[arg(long)]
        area: Option<String>,

        /// Filter by post
        #[arg(long)]
        post: Option<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn access_scope(dependency: Option<String>) -> AccessScope {
    match dependency {
        Some(name) => AccessScope::Dependency { name },
        None => AccessScope::AllDependencies,
    }
}

fn parse_goal_levels(raw: &str) -> anyhow::Result<[AttainmentLevel; 3]> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(anyhow!("--goals expects exactly 3 levels, got {}", parts.len()));
    }
    let mut levels = [AttainmentLevel::default(); 3];
    for (i, part) in parts.iter().enumerate() {
        let value: u8 = part.parse().with_context(|| format!("invalid goal level '{}'", part))?;
        levels[i] = AttainmentLevel::try_from(value)?;
    }
    Ok(levels)
}

/// Parse factor selections, either positional ("3,2,4,...") in rubric
/// order or named pairs ("conocimiento=3,criterio=2,...")
fn parse_factor_scores(raw: &str) -> anyhow::Result<FactorScores> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();

    if parts.iter().any(|p| p.contains('=')) {
        let mut scores = FactorScores::default();
        for part in parts {
            let (column, value) = part
                .split_once('=')
                .ok_or_else(|| anyhow!("expected column=level, got '{}'", part))?;
            let factor = Factor::from_column(column.trim())
                .ok_or_else(|| anyhow!("unknown factor column '{}'", column))?;
            let level: u8 = value
                .trim()
                .parse()
                .with_context(|| format!("invalid factor level '{}'", value))?;
            scores.set(factor, FactorLevel::try_from(level)?);
        }
        return Ok(scores);
    }

    if parts.len() != ALL_FACTORS.len() {
        return Err(anyhow!(
            "--factors expects exactly {} levels, got {}",
            ALL_FACTORS.len(),
            parts.len()
        ));
    }
    let mut levels = [0u8; 12];
    for (i, part) in parts.iter().enumerate() {
        levels[i] = part
            .parse()
            .with_context(|| format!("invalid factor level '{}'", part))?;
    }
    Ok(FactorScores::from_levels(levels)?)
}

fn print_worker_table(workers: &[Worker]) {
    println!("{:<6} {:<35} {:<40} {:<20}", "ID", "NOMBRE", "DEPENDENCIA", "PUESTO");
    for w in workers {
        println!(
            "{:<6} {:<35} {:<40} {:<20}",
            w.id, w.nombre, w.dependencia, w.puesto
        );
    }
    println!("({} workers)", workers.len());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AreteConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        // CLI / env override wins over the config file
        config.database.url = db;
    }
    debug!("Using database: {}", config.database.url);

    let storage = Arc::new(LibsqlStorage::connect(config.connection_mode()?).await?);
    let reports = Arc::new(ReportService::new(
        storage.clone(),
        Duration::from_secs(config.cache.report_ttl_secs),
    ));
    let directory = WorkerDirectory::new(
        storage.clone(),
        Duration::from_secs(config.cache.worker_ttl_secs),
    );

    match cli.command {
        Command::Init => {
            // Migrations already ran on connect
            println!("Database ready: {}", config.database.url);
        }

        Command::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file))?;
            let workers: Vec<Worker> = serde_json::from_str(&raw)?;
            for worker in &workers {
                storage.upsert_worker(worker).await?;
            }
            directory.invalidate();
            reports.invalidate();
            println!("Imported {} workers from {}", workers.len(), file);
        }

        Command::Workers { dependency, json } => {
            let scope = access_scope(dependency);
            let workers = directory.in_scope(&scope).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&workers)?);
            } else {
                print_worker_table(&workers);
            }
        }

        Command::Worker { id } => {
            let worker = directory.get(WorkerId(id)).await?;
            println!("{} ({})", worker.nombre, worker.id);
            println!("  CURP/RFC:     {} / {}", worker.curp, worker.rfc);
            println!("  Dependencia:  {}", worker.dependencia);
            println!("  Área:         {}", worker.area_adscripcion);
            println!("  Puesto:       {} (nivel {}, plaza {})", worker.puesto, worker.nivel, worker.plaza);
            println!("  Superior:     {}", worker.superior);
            println!(
                "  Comisionado:  {}{}",
                if worker.comisionado { "Sí" } else { "No" },
                worker
                    .area_comision
                    .as_deref()
                    .map(|a| format!(" ({})", a))
                    .unwrap_or_default()
            );
            for (i, funcion) in worker.funciones.iter().enumerate() {
                println!("  Actividad {}:  {}", i + 1, funcion);
            }
            for (i, goal) in worker.goals.iter().enumerate() {
                println!(
                    "  Meta {}:       {} (programada: {})",
                    i + 1,
                    goal.description,
                    goal.programmed
                );
            }
        }

        Command::Rubric => {
            println!("Metas (avance por tramo):");
            for level in ALL_ATTAINMENT_LEVELS {
                let (lo, hi) = level.band();
                println!(
                    "  Nivel {}: {}-{}% | {} ({})",
                    level.level(),
                    lo,
                    hi,
                    level.label(),
                    level.help()
                );
            }
            println!();
            println!("Factores de calidad:");
            for (i, factor) in ALL_FACTORS.iter().enumerate() {
                println!("{}. {} ({})", i + 1, factor.label(), factor.column());
                for descriptor in factor.descriptors() {
                    println!("   {}", descriptor.summary);
                }
            }
        }

        Command::Evaluate {
            worker,
            goals,
            factors,
            month,
            year,
            comments,
            needs,
            scope,
        } => {
            let scope = access_scope(scope);
            let period = match (month, year) {
                (Some(mes), Some(anio)) => Some(Period::new(mes, anio)),
                (None, None) => None,
                _ => return Err(anyhow!("--month and --year must be given together")),
            };

            let mut draft = EvaluationDraft::new(WorkerId(worker));
            draft.period = period;
            draft.goal_levels = parse_goal_levels(&goals)?;
            draft.factors = parse_factor_scores(&factors)?;
            draft.comentarios = comments;
            draft.necesidades_capac = needs;

            let evaluations = EvaluationService::new(storage.clone(), reports.clone());
            let evaluation = evaluations.submit(&scope, draft).await?;

            println!(
                "Registered evaluation {} for worker {} ({}): total {}/48",
                evaluation.id, evaluation.worker_id, evaluation.period, evaluation.puntaje_total
            );
            for (i, outcome) in evaluation.goals.iter().enumerate() {
                println!(
                    "  meta{}: {} ({}%) -> {:.2}",
                    i + 1,
                    outcome.level().label(),
                    outcome.percent,
                    outcome.real
                );
            }
            for (factor, level) in evaluation.factors.iter() {
                println!("  {}: {}", factor.column(), level.level());
            }
        }

        Command::Report {
            scope,
            name,
            dependency,
            area,
            post,
            json,
        } => {
            let scope = access_scope(scope);
            let filter = ReportFilter {
                nombre: name,
                dependencia: dependency,
                area_adscripcion: area,
                puesto: post,
            };

            let report = reports.report(&scope, &filter).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.is_empty() {
                println!("No evaluations match the given scope and filters.");
            } else {
                match report.mean_total {
                    Some(mean) => println!(
                        "Mean score: {}/48 over {} evaluations",
                        mean, report.count
                    ),
                    None => println!("No data"),
                }
                println!();
                println!(
                    "{:<25} {:<35} {:<10} {:<8}",
                    "NOMBRE", "DEPENDENCIA", "PERIODO", "TOTAL"
                );
                for record in report.chronological() {
                    println!(
                        "{:<25} {:<35} {:<10} {:<8}",
                        record.nombre,
                        record.dependencia,
                        record.periodo(),
                        record.evaluation.puntaje_total
                    );
                }
            }
        }
    }

    Ok(())
}
