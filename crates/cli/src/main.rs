//! Dropzone CLI - the storefront flow without a server.
//!
//! Stock lives in a local JSON key-value file instead of server memory, so the
//! level survives between runs until `reset` clears it.
//!
//! # Usage
//!
//! ```bash
//! # Show the stock level
//! dropzone stock
//!
//! # Buy one (or more) units
//! dropzone buy --qty 2
//!
//! # Validate card details and buy
//! dropzone checkout -n "Test Bot" -c 4242424242424242 -e 12/30 --cvc 123
//!
//! # Overwrite the level, or forget it
//! dropzone set-stock 10
//! dropzone reset
//! ```
//!
//! Results go to stdout; logs go to stderr. Exit code is 1 when a request is
//! rejected and 2 when the store itself fails.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dropzone_core::DEFAULT_STOCK;

use crate::commands::CommandError;
use crate::commands::checkout::CheckoutArgs;
use crate::local_store::FileStockStore;

mod commands;
mod local_store;

#[derive(Parser)]
#[command(name = "dropzone")]
#[command(author, version, about = "Dropzone storefront fixture, offline")]
struct Cli {
    /// Path to the local key-value store
    #[arg(
        long,
        global = true,
        env = "DROPZONE_STORE",
        default_value = ".dropzone/store.json"
    )]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current stock level
    Stock,
    /// Buy without card details
    Buy {
        /// Units to buy (defaults to 1)
        #[arg(short, long)]
        qty: Option<String>,
    },
    /// Validate card details and buy
    Checkout {
        /// Cardholder name
        #[arg(short, long)]
        name: String,

        /// Card number (spaces and dashes allowed)
        #[arg(short, long)]
        card: String,

        /// Expiry as MM/YY
        #[arg(short, long)]
        expiry: String,

        /// Card verification code
        #[arg(long)]
        cvc: String,

        /// Units to buy (defaults to 1)
        #[arg(short, long)]
        qty: Option<String>,
    },
    /// Overwrite the stock level
    SetStock {
        /// New level (non-negative number)
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Clear the stored level so it reverts to the default
    Reset,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dropzone_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = FileStockStore::new(cli.store, DEFAULT_STOCK);
    let mut stdout = std::io::stdout().lock();

    match run(cli.command, &store, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn run(
    command: Commands,
    store: &FileStockStore,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match command {
        Commands::Stock => commands::inventory::show(store, out),
        Commands::Buy { qty } => commands::inventory::buy(store, qty, out),
        Commands::Checkout {
            name,
            card,
            expiry,
            cvc,
            qty,
        } => commands::checkout::run(
            store,
            CheckoutArgs {
                name,
                card,
                expiry,
                cvc,
                qty,
            },
            out,
        ),
        Commands::SetStock { value } => commands::inventory::set(store, &value, out),
        Commands::Reset => commands::inventory::reset(store, out),
    }
}
