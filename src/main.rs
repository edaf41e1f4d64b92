//! Bitacora command line
//!
//! Reads and edits the journal collections directly against the configured
//! store. Every command prints JSON on stdout; logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! # List a collection, optionally filtered by a search term
//! bitacora list clients
//! bitacora list rituals --search protection
//!
//! # Add a record
//! bitacora create appointments --json '{"title":"Reading","date":"2026-10-19T15:00:00Z"}'
//!
//! # Partial update
//! bitacora update appointments <id> --json '{"status":"completed"}'
//!
//! # Client with sessions, spreads and rituals
//! bitacora client <id>
//!
//! # Summaries
//! bitacora dashboard
//! bitacora ledger --month 2026-10
//! bitacora agenda --upcoming
//!
//! # Dangling client references and keys outside every collection
//! bitacora check
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use bitacora::models::{Appointment, ConsultantEnergy, Ritual, Spread, Transaction};
use bitacora::resolver::{dangling_references, resolve_owner};
use bitacora::services::spawn_logging_listener;
use bitacora::views::{agenda, dashboard, journal, ledger};
use bitacora::{Backend, Collection, Config, EntityService, Record, Services};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bitacora")]
#[command(about = "Practice journal records: clients, sessions, finances, rituals")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage directory
    #[arg(long, env = "BITACORA_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Storage backend (memory, sqlite, sled)
    #[arg(long, env = "BITACORA_BACKEND")]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every record in a collection
    List {
        collection: Collection,
        /// Keep only records whose text fields or client name contain this term
        #[arg(long)]
        search: Option<String>,
    },

    /// Create a record from a JSON object
    Create {
        collection: Collection,
        #[arg(long)]
        json: String,
    },

    /// Merge a partial JSON object into an existing record
    Update {
        collection: Collection,
        id: String,
        #[arg(long)]
        json: String,
    },

    /// Delete a record (missing ids are ignored)
    Delete { collection: Collection, id: String },

    /// Show a client with its sessions, spreads and rituals
    Client { id: String },

    /// Dashboard summary for today
    Dashboard,

    /// Income, expense and balance for a month (defaults to the current one)
    Ledger {
        /// Month as YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },

    /// Appointments grouped by day, with their clients
    Agenda {
        /// Only scheduled appointments from now on
        #[arg(long)]
        upcoming: bool,
    },

    /// Report dangling client references and unknown stored keys
    Check,
}

enum Crud {
    List,
    Create(String),
    Update(String, String),
    Delete(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("bitacora=info".parse()?))
        .init();

    let args = Args::parse();

    // Load config
    let mut config = if let Some(config_path) = &args.config {
        Config::load(config_path)
            .with_context(|| format!("reading config {}", config_path.display()))?
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }

    debug!(
        storage_dir = %config.storage_dir.display(),
        backend = %config.backend,
        "Starting bitacora"
    );

    let services = Services::open(&config).await?;
    let listener = spawn_logging_listener(services.events.clone());

    let output = run(&services, args.command).await;

    // Let the listener drain whatever the command emitted
    drop(services);
    let _ = listener.await;

    print_json(&output?)
}

async fn run(services: &Services, command: Command) -> anyhow::Result<Value> {
    match command {
        Command::List { collection, search: None } => crud(services, collection, Crud::List).await,
        Command::List { collection, search: Some(term) } => {
            search(services, collection, &term).await
        }
        Command::Create { collection, json } => {
            crud(services, collection, Crud::Create(json)).await
        }
        Command::Update { collection, id, json } => {
            crud(services, collection, Crud::Update(id, json)).await
        }
        Command::Delete { collection, id } => crud(services, collection, Crud::Delete(id)).await,

        Command::Client { id } => {
            let profile = services
                .clients
                .get_by_id(&id)
                .await?
                .ok_or_else(|| anyhow!("no client with id {}", id))?;
            Ok(serde_json::to_value(profile)?)
        }

        Command::Dashboard => {
            let snapshot = services.snapshot().await?;
            Ok(serde_json::to_value(dashboard::summarize(&snapshot, Utc::now()))?)
        }

        Command::Ledger { month } => {
            let (year, month) = match month {
                Some(text) => ledger::parse_month(&text)
                    .ok_or_else(|| anyhow!("month must look like YYYY-MM, got '{}'", text))?,
                None => {
                    let now = Utc::now();
                    (now.year(), now.month())
                }
            };
            let transactions = services.transactions.get_all().await?;
            Ok(serde_json::to_value(ledger::month_summary(&transactions, year, month))?)
        }

        Command::Agenda { upcoming } => {
            let mut appointments = services.appointments.get_all().await?;
            if upcoming {
                appointments = agenda::upcoming(&appointments, Utc::now());
            }
            let clients = services.clients.get_all().await?;

            let days: BTreeMap<_, _> = agenda::group_by_day(&appointments)
                .into_iter()
                .map(|(day, list)| (day, resolve_owner(&list, &clients)))
                .collect();
            Ok(serde_json::to_value(days)?)
        }

        Command::Check => check(services).await,
    }
}

async fn crud(services: &Services, collection: Collection, op: Crud) -> anyhow::Result<Value> {
    match collection {
        Collection::Clients => apply(services.clients.records(), op).await,
        Collection::Appointments => apply(&services.appointments, op).await,
        Collection::Transactions => apply(&services.transactions, op).await,
        Collection::Energy => apply(&services.energy, op).await,
        Collection::ConsultantEnergy => apply(&services.consultant_energy, op).await,
        Collection::Rituals => apply(&services.rituals, op).await,
        Collection::Spreads => apply(&services.spreads, op).await,
    }
}

async fn apply<R: Record>(service: &EntityService<R>, op: Crud) -> anyhow::Result<Value> {
    let value = match op {
        Crud::List => serde_json::to_value(service.get_all().await?)?,
        Crud::Create(json) => {
            let draft: R::Draft = serde_json::from_str(&json)
                .with_context(|| format!("invalid {} record", service.collection()))?;
            serde_json::to_value(service.create(draft).await?)?
        }
        Crud::Update(id, json) => {
            let patch: R::Patch = serde_json::from_str(&json)
                .with_context(|| format!("invalid {} patch", service.collection()))?;
            serde_json::to_value(service.update(&id, patch).await?)?
        }
        Crud::Delete(id) => {
            service.delete(&id).await?;
            serde_json::json!({ "deleted": id })
        }
    };
    Ok(value)
}

async fn search(
    services: &Services,
    collection: Collection,
    term: &str,
) -> anyhow::Result<Value> {
    let value = match collection {
        Collection::Clients => {
            let clients = services.clients.get_all().await?;
            serde_json::to_value(journal::search_clients(&clients, term))?
        }
        Collection::Energy => {
            let logs = services.energy.get_all().await?;
            serde_json::to_value(journal::search_energy(&logs, term))?
        }
        Collection::ConsultantEnergy => {
            let clients = services.clients.get_all().await?;
            let sessions = services.consultant_energy.get_all().await?;
            let joined = resolve_owner(&sessions, &clients);
            serde_json::to_value(journal::search_sessions(&joined, term))?
        }
        Collection::Spreads => {
            let clients = services.clients.get_all().await?;
            let spreads = services.spreads.get_all().await?;
            let joined = resolve_owner(&spreads, &clients);
            serde_json::to_value(journal::search_spreads(&joined, term))?
        }
        Collection::Rituals => {
            let clients = services.clients.get_all().await?;
            let rituals = services.rituals.get_all().await?;
            let joined = resolve_owner(&rituals, &clients);
            serde_json::to_value(journal::search_rituals(&joined, term))?
        }
        Collection::Appointments | Collection::Transactions => {
            bail!("{} cannot be searched", collection)
        }
    };
    Ok(value)
}

async fn check(services: &Services) -> anyhow::Result<Value> {
    let snapshot = services.snapshot().await?;
    let clients = &snapshot.clients;

    let report: BTreeMap<String, Vec<String>> = [
        (Appointment::COLLECTION, dangling_references(&snapshot.appointments, clients)),
        (Transaction::COLLECTION, dangling_references(&snapshot.transactions, clients)),
        (ConsultantEnergy::COLLECTION, dangling_references(&snapshot.consultant_energy, clients)),
        (Ritual::COLLECTION, dangling_references(&snapshot.rituals, clients)),
        (Spread::COLLECTION, dangling_references(&snapshot.spreads, clients)),
    ]
    .into_iter()
    .filter(|(_, ids)| !ids.is_empty())
    .map(|(collection, ids)| (collection.name().to_string(), ids))
    .collect();

    let total: usize = report.values().map(Vec::len).sum();
    if total > 0 {
        warn!(dangling = total, "Records reference missing clients");
    } else {
        info!(energy_logs = snapshot.energy.len(), "No dangling client references");
    }

    let stray = services.stray_keys().await?;
    for key in &stray {
        warn!(key = %key, "Stored key belongs to no collection");
    }

    Ok(serde_json::json!({ "dangling": report, "strayKeys": stray }))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
