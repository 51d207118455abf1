use crate::{
    commands::{Commands, CursorCommand},
    env::EnvManager,
    error::CliError,
    output::PartnerReport,
};
use clap::Parser;
use connectors::{
    http::{HttpConfig, HttpPageFetcher},
    partner::{Partner, registry},
};
use engine_core::{
    runner::SyncRunner,
    settings::SyncSettings,
    state::{CursorStore, sled_store::SledCursorStore},
};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "txsync",
    version = "0.1.0",
    about = "Incremental exchange transaction sync"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Cursor state directory (default: ~/.txsync/state)"
    )]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

struct SyncArgs {
    partner: Option<String>,
    all: bool,
    env_file: Option<String>,
    credentials: Vec<String>,
    output: Option<String>,
    page_size: Option<usize>,
    rollback: Option<u64>,
    max_pages: Option<usize>,
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays parseable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync {
            partner,
            all,
            env_file,
            credentials,
            output,
            page_size,
            rollback,
            max_pages,
            timeout_secs,
        } => {
            let args = SyncArgs {
                partner,
                all,
                env_file,
                credentials,
                output,
                page_size,
                rollback,
                max_pages,
                timeout_secs,
            };
            run_sync(cli.state_dir, args).await?;
        }
        Commands::Partners => {
            for p in registry::all() {
                println!(
                    "{:<12} {:<12} cursor={:<10} env={}",
                    p.id(),
                    p.name(),
                    p.cursor_kind().to_string(),
                    p.credential_env()
                );
            }
        }
        Commands::Cursor { command } => match command {
            CursorCommand::Show {
                partner,
                history,
                json,
            } => show_cursors(cli.state_dir, partner, history, json).await?,
            CursorCommand::Reset { partner } => {
                let partner = registry::by_id(&partner)?;
                let store = open_state_store(cli.state_dir)?;
                if store.clear_checkpoint(partner.id()).await? {
                    info!(partner = partner.id(), "Cursor cleared.");
                } else {
                    info!(partner = partner.id(), "No cursor stored.");
                }
            }
        },
    }

    Ok(())
}

async fn run_sync(state_dir: Option<PathBuf>, args: SyncArgs) -> Result<(), CliError> {
    let partners: Vec<Arc<dyn Partner>> = match (&args.partner, args.all) {
        (_, true) => registry::all(),
        (Some(id), false) => vec![registry::by_id(id)?],
        (None, false) => {
            return Err(CliError::Config("pass --partner <id> or --all".into()));
        }
    };

    let mut env = EnvManager::new();
    if let Some(path) = &args.env_file {
        env.load_from_file(path)?;
    }

    let http = HttpConfig {
        timeout: Duration::from_secs(args.timeout_secs),
        ..HttpConfig::default()
    };
    let fetcher = Arc::new(HttpPageFetcher::new(&http)?);
    let runner = SyncRunner::new(open_state_store(state_dir)?, fetcher);

    let mut reports = Vec::with_capacity(partners.len());
    let mut failed = 0usize;

    for partner in &partners {
        let credentials = env.credentials_for(partner.as_ref(), &args.credentials)?;
        let settings = settings_for(partner.as_ref(), &args);

        match runner
            .run_partner(partner.clone(), settings, &credentials)
            .await
        {
            Ok(outcome) => reports.push(PartnerReport {
                partner: partner.id().to_string(),
                state: Some(outcome.state),
                cursor: Some(outcome.result.cursor),
                error: None,
                transactions: outcome.result.transactions,
            }),
            Err(e) => {
                error!(partner = partner.id(), error = %e, "Sync failed.");
                failed += 1;
                reports.push(PartnerReport {
                    partner: partner.id().to_string(),
                    state: None,
                    cursor: None,
                    error: Some(e.to_string()),
                    transactions: Vec::new(),
                });
            }
        }
    }

    match &args.output {
        Some(path) => output::write_report(&reports, path).await?,
        None => output::print_report(&reports)?,
    }

    if failed > 0 {
        return Err(CliError::PartialFailure {
            failed,
            total: partners.len(),
        });
    }
    Ok(())
}

fn settings_for(partner: &dyn Partner, args: &SyncArgs) -> SyncSettings {
    let mut settings = SyncSettings::for_partner(partner).with_max_pages(args.max_pages);
    if let Some(page_size) = args.page_size {
        settings = settings.with_page_size(page_size);
    }
    if let Some(rollback) = args.rollback {
        settings = settings.with_rollback(rollback);
    }
    settings
}

async fn show_cursors(
    state_dir: Option<PathBuf>,
    partner: Option<String>,
    history: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let store = open_state_store(state_dir)?;

    let checkpoints = match (partner, history) {
        (Some(id), true) => store.history(registry::by_id(&id)?.id()).await?,
        (Some(id), false) => store
            .load_checkpoint(registry::by_id(&id)?.id())
            .await?
            .into_iter()
            .collect(),
        (None, true) => {
            let mut all = Vec::new();
            for p in registry::all() {
                all.extend(store.history(p.id()).await?);
            }
            all
        }
        (None, false) => store.list_checkpoints().await?,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&checkpoints)?);
    } else {
        output::print_checkpoint_table(&checkpoints);
    }
    Ok(())
}

fn open_state_store(state_dir: Option<PathBuf>) -> Result<Arc<dyn CursorStore>, CliError> {
    let path = match state_dir {
        Some(dir) => dir,
        None => dirs::home_dir()
            .ok_or_else(|| CliError::Unexpected("Could not determine home directory".into()))?
            .join(".txsync/state"),
    };
    let store = SledCursorStore::open(&path)?;
    Ok(Arc::new(store))
}
