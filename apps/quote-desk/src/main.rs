//! # Quote Desk Entry Point
//!
//! ```text
//! quote-desk [--config FILE] --email E --password P <command>
//!
//!   signup --full-name NAME
//!   new    [--client-name ..] [--item "desc;l;w;price"]...
//!   edit   QT-YYYYMMDD-NNNNNN [same flags as new]
//!   list | show N | delete N
//!   export N --format pdf|xlsx|csv|html [--out DIR]
//!   print  N [--out DIR]
//! ```

use std::process::ExitCode;

use clap::Parser;
use quote_desk::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    quote_desk::init_tracing();

    let cli = Cli::parse();
    match quote_desk::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
