//! Parcel tracking persistence
//!
//! Stores parcels in a single SQLite table and exposes create, lookup,
//! lookup-by-client, status and address updates, and deletion. Address
//! updates and deletion only apply while a parcel is still `registered`;
//! that check is part of the write statement itself.
//!
//! ```no_run
//! use parcel_store::{ParcelService, ParcelStore, TrackerConfig, db};
//!
//! # fn main() -> parcel_store::Result<()> {
//! let cfg = TrackerConfig::load()?;
//! let conn = db::open(&cfg)?;
//! let service = ParcelService::new(ParcelStore::new(&conn));
//! let parcel = service.register(1001, "Pushkin st. 1")?;
//! service.next_status(parcel.number)?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod db;
pub mod errors;
pub mod parcel;
pub mod service;
pub mod store;

pub use config::TrackerConfig;
pub use errors::{ErrorCategory, ParcelError, Result};
pub use parcel::{Parcel, ParcelStatus};
pub use service::ParcelService;
pub use store::ParcelStore;
