//! Parcel tracker CLI
//!
//! ## Commands
//!
//! - `parcel-tracker register --client N --address TEXT` - Register a parcel
//! - `parcel-tracker get NUMBER` - Show one parcel
//! - `parcel-tracker list --client N` - Show all parcels of a client
//! - `parcel-tracker set-status NUMBER STATUS` - Overwrite the status
//! - `parcel-tracker next-status NUMBER` - Advance registered -> sent -> delivered
//! - `parcel-tracker set-address NUMBER ADDRESS` - Change address while registered
//! - `parcel-tracker delete NUMBER` - Delete while registered
//!
//! ## Exit Codes
//! - 0: Success (including guarded no-ops)
//! - 1: Parcel not found
//! - 2: Storage or configuration error

use clap::{Parser, Subcommand};
use parcel_store::{
    ErrorCategory, Parcel, ParcelError, ParcelService, ParcelStatus, ParcelStore, TrackerConfig,
    db,
};
use serde::Serialize;
use std::path::PathBuf;

pub const EXIT_OK: i32 = 0;
pub const EXIT_NOT_FOUND: i32 = 1;
pub const EXIT_FAILURE: i32 = 2;

/// Parcel tracker: register parcels and follow them through delivery
#[derive(Debug, Parser)]
#[command(name = "parcel-tracker", version)]
pub struct Cli {
    /// SQLite database path (overrides `db_path` from tracker.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Output as JSON for automation
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: TrackerSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum TrackerSubcommand {
    /// Register a new parcel in the `registered` state
    Register(RegisterArgs),

    /// Show one parcel
    Get {
        number: i64,
    },

    /// Show all parcels of a client
    List {
        #[arg(long, allow_negative_numbers = true)]
        client: i64,
    },

    /// Overwrite the status of a parcel, whatever it was
    SetStatus {
        number: i64,
        status: String,
    },

    /// Advance a parcel one step: registered -> sent -> delivered
    NextStatus {
        number: i64,
    },

    /// Change the delivery address (only while registered)
    SetAddress {
        number: i64,
        address: String,
    },

    /// Delete a parcel (only while registered)
    Delete {
        number: i64,
    },
}

#[derive(Debug, Parser)]
pub struct RegisterArgs {
    /// Owning client identifier
    #[arg(long, allow_negative_numbers = true)]
    pub client: i64,

    /// Delivery address
    #[arg(long)]
    pub address: String,
}

/// What a command produced, ready for printing
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outcome {
    Parcel(Parcel),
    Parcels(Vec<Parcel>),
    Status { number: i64, status: Option<ParcelStatus> },
    Done { number: i64 },
}

impl Cli {
    pub fn run(self) -> i32 {
        let json = self.json;
        match self.execute() {
            Ok(outcome) if json => print_json(&outcome),
            Ok(outcome) => {
                print_human(&outcome);
                EXIT_OK
            }
            Err(err) => {
                tracing::debug!(category = err.category().as_str(), error = ?err, "Command failed");
                eprintln!("error: {}", error_chain(&err));
                exit_code(&err)
            }
        }
    }

    fn execute(self) -> parcel_store::Result<Outcome> {
        let mut cfg = TrackerConfig::load()?;
        if let Some(path) = self.db {
            cfg.db_path = path.to_string_lossy().into_owned();
        }

        let conn = db::open(&cfg)?;
        let service = ParcelService::new(ParcelStore::new(&conn));

        let outcome = match self.command {
            TrackerSubcommand::Register(args) => {
                Outcome::Parcel(service.register(args.client, &args.address)?)
            }
            TrackerSubcommand::Get { number } => Outcome::Parcel(service.store().get(number)?),
            TrackerSubcommand::List { client } => {
                Outcome::Parcels(service.client_parcels(client)?)
            }
            TrackerSubcommand::SetStatus { number, status } => {
                let status = ParcelStatus::from(status);
                service.store().set_status(number, &status)?;
                Outcome::Done { number }
            }
            TrackerSubcommand::NextStatus { number } => Outcome::Status {
                number,
                status: service.next_status(number)?,
            },
            TrackerSubcommand::SetAddress { number, address } => {
                service.change_address(number, &address)?;
                Outcome::Done { number }
            }
            TrackerSubcommand::Delete { number } => {
                service.delete(number)?;
                Outcome::Done { number }
            }
        };

        Ok(outcome)
    }
}

pub fn exit_code(err: &ParcelError) -> i32 {
    match err.category() {
        ErrorCategory::NotFound => EXIT_NOT_FOUND,
        ErrorCategory::StorageError | ErrorCategory::ConfigError => EXIT_FAILURE,
    }
}

/// Render an error followed by each of its sources, `: `-separated
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn describe(parcel: &Parcel) -> String {
    format!(
        "parcel {}: client {}, status {}, address {:?}, created {}",
        parcel.number, parcel.client, parcel.status, parcel.address, parcel.created_at
    )
}

fn print_human(outcome: &Outcome) {
    match outcome {
        Outcome::Parcel(parcel) => println!("{}", describe(parcel)),
        Outcome::Parcels(parcels) => {
            if parcels.is_empty() {
                println!("no parcels");
            }
            for parcel in parcels {
                println!("{}", describe(parcel));
            }
        }
        Outcome::Status {
            number,
            status: Some(status),
        } => println!("parcel {number}: status {status}"),
        Outcome::Status { number, status: None } => {
            println!("parcel {number}: no further status")
        }
        Outcome::Done { number } => println!("parcel {number}: ok"),
    }
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            EXIT_OK
        }
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            EXIT_FAILURE
        }
    }
}
