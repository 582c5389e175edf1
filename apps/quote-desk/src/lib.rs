//! # Mabric Quote Desk
//!
//! Session context and command-line shell for the quotation generator.
//!
//! ## Module Organization
//! ```text
//! quote_desk/
//! ├── lib.rs          ◄─── You are here (startup, App)
//! ├── session.rs      ◄─── Session context: user + local quotation list
//! ├── cli.rs          ◄─── clap commands and their handlers
//! ├── config.rs       ◄─── AppConfig: defaults → TOML → environment
//! └── error.rs        ◄─── AppError with machine-readable codes
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,quote=debug,sqlx=warn (override with RUST_LOG)      │
//! │                                                                         │
//! │  2. Load Config ──────────────────────────────────────────────────────► │
//! │     • --config path or platform config dir, then QUOTE_* variables      │
//! │                                                                         │
//! │  3. Connect to Database ──────────────────────────────────────────────► │
//! │     • SQLite with WAL mode                                              │
//! │     • Run pending migrations                                            │
//! │                                                                         │
//! │  4. Open Session ─────────────────────────────────────────────────────► │
//! │     • Sign in, load the user's quotations                               │
//! │     • Run one command                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod session;

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use error::AppResult;
use quote_core::{QuotationRecord, QuotationView};
use quote_db::{Database, DbConfig, LocalAuth, QuotationRepository};
use session::Session;

/// Session backed by SQLite storage and local profiles.
pub type DeskSession = Session<QuotationRepository, LocalAuth>;

/// Loaded configuration plus an open database.
#[derive(Debug, Clone)]
pub struct App {
    config: AppConfig,
    db: Database,
}

impl App {
    /// Opens the configured database and applies migrations.
    pub async fn open(config: AppConfig) -> AppResult<Self> {
        let path = config.database_path()?;
        info!(?path, "Database path determined");

        let db = Database::new(DbConfig::new(path)).await?;
        info!("Database connected and migrations applied");

        Ok(App { config, db })
    }

    /// Wraps an existing database (used with in-memory databases in tests).
    pub fn with_database(config: AppConfig, db: Database) -> Self {
        App { config, db }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// A signed-out session over this app's database.
    pub fn session(&self) -> DeskSession {
        let db = self.db.clone();
        Session::new(self.db.auth(), move |user| db.quotations_for(&user.id))
    }

    /// Formats a record with the configured letterhead and currency.
    pub fn view(&self, record: &QuotationRecord) -> QuotationView {
        QuotationView::build(
            record,
            &self.config.company,
            &self.config.export.currency_symbol,
        )
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config.export.output_dir.clone()
    }
}

/// Loads config, opens the app and runs one command.
pub async fn run(cli: cli::Cli) -> AppResult<()> {
    let config = AppConfig::load(cli.config.clone())?;
    let app = App::open(config).await?;
    cli::execute(cli, &app).await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=quote_db=trace` - Trace storage only
/// - Default: `info,quote=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quote=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
