use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use curriculum_board::analysis::{AnalysisService, GeminiClient, Snapshot};
use curriculum_board::api::{self, AppState, AuthConfig};
use curriculum_board::models::Roster;
use curriculum_board::store::{JsonFileStorage, Store};

#[derive(Parser)]
#[command(name = "curriculum-board")]
#[command(about = "Shared curriculum planning board for a department's professors")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the board server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "17020")]
        port: u16,

        /// Data directory for the persisted collections
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Roster JSON file; built-in department roster when omitted
        #[arg(long)]
        roster: Option<PathBuf>,
    },
    /// Run one curriculum analysis against the persisted state and print it
    Analyze {
        /// Data directory for the persisted collections
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "curriculum_board=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_store(data_dir: Option<PathBuf>) -> anyhow::Result<Store> {
    let storage = match data_dir {
        Some(dir) => JsonFileStorage::new(dir)?,
        None => JsonFileStorage::open_default()?,
    };
    Ok(Store::open(Box::new(storage)))
}

fn load_roster(path: Option<PathBuf>) -> anyhow::Result<Roster> {
    match path {
        Some(path) => Roster::from_file(&path),
        None => Ok(Roster::default_department()),
    }
}

async fn serve(port: u16, data_dir: Option<PathBuf>, roster: Option<PathBuf>) -> anyhow::Result<()> {
    let state = AppState {
        store: open_store(data_dir)?,
        roster: Arc::new(load_roster(roster)?),
        auth: AuthConfig::from_env(),
        analysis: AnalysisService::new(GeminiClient::from_env()),
    };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Curriculum board listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve {
            port,
            data_dir,
            roster,
        }) => {
            serve(port, data_dir, roster).await?;
        }
        Some(Commands::Analyze { data_dir }) => {
            let store = open_store(data_dir)?;
            let service = AnalysisService::new(GeminiClient::from_env());
            let outcome = service.analyze(Snapshot::capture(&store)).await;
            println!("{}", outcome.text);
        }
        None => {
            serve(17020, None, None).await?;
        }
    }

    Ok(())
}
