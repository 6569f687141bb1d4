use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use aurora_core::{Database, Error};
use aurora_server::commands::{self, DeskCommand};
use aurora_server::routes::router;
use aurora_server::{AppConfig, AppState};

#[derive(Parser, Debug)]
#[command(name = "aurora-desk")]
#[command(author, version, about = "Aurora desk - operator console for WhatsApp customer service")]
struct Args {
    /// Keep conversations and alerts in process memory instead of Postgres.
    #[arg(long)]
    in_memory: bool,

    /// Address for the HTTP console; overrides AURORA_BIND.
    #[arg(long)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP console (default).
    Serve,
    /// Create the desk tables if they do not exist.
    Migrate,
    #[command(flatten)]
    Desk(DeskCommand),
}

fn init_tracing() {
    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::from_default_env()
        .add_directive("aurora=info".parse().unwrap_or_default())
        .add_directive("aurora_core=info".parse().unwrap_or_default())
        .add_directive("aurora_server=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).with_writer(std::io::stderr).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {e}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, kind = ?e.kind(), "aurora-desk failed");
            eprintln!("{}", e.operator_message().red());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let mut config = AppConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    let command = args.command.unwrap_or(Command::Serve);
    if let Command::Migrate = command {
        return migrate(&config, args.in_memory).await;
    }

    let state = if args.in_memory {
        AppState::in_memory(&config)
    } else {
        AppState::connect(&config).await?
    };

    match command {
        Command::Serve => serve(state, &config.bind_address).await,
        Command::Desk(desk) => commands::run(&desk, &state).await,
        Command::Migrate => Ok(()),
    }
}

async fn migrate(config: &AppConfig, in_memory: bool) -> Result<(), Error> {
    if in_memory {
        println!("{}", "Nothing to migrate for the in-memory store.".dimmed());
        return Ok(());
    }
    let db = Database::connect(config.database()?).await?;
    db.migrate().await?;
    println!("{}", "Desk tables are up to date.".green());
    Ok(())
}

async fn serve(state: AppState, bind: &str) -> Result<(), Error> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Aurora desk listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Aurora desk stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested.");
}
