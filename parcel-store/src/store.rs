//! SQLite-backed parcel store
//!
//! Each operation is a single statement. Address changes and deletion carry
//! `status = 'registered'` in their WHERE clause so the state check and the
//! write happen atomically inside SQLite, with no read-then-write window.
//!
//! Mutations that match no row (unknown number, or a parcel that already left
//! the registered state) succeed silently. Callers that need to tell the two
//! apart must follow up with [`ParcelStore::get`].

use crate::errors::{ParcelError, Result};
use crate::parcel::{Parcel, ParcelStatus};
use rusqlite::{Connection, OptionalExtension, Row, named_params};

/// Parcel persistence over a caller-owned connection
#[derive(Debug, Clone, Copy)]
pub struct ParcelStore<'conn> {
    conn: &'conn Connection,
}

/// Columns in table order: number, client, status, address, created_at
fn parcel_from_row(row: &Row<'_>) -> rusqlite::Result<Parcel> {
    Ok(Parcel {
        number: row.get(0)?,
        client: row.get(1)?,
        status: row.get(2)?,
        address: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl<'conn> ParcelStore<'conn> {
    /// Wrap an open connection. The `parcel` table must already exist.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Insert a parcel and return its newly assigned number.
    ///
    /// `parcel.number` is ignored. Field contents are stored as given.
    pub fn add(&self, parcel: &Parcel) -> Result<i64> {
        let number = self
            .conn
            .query_row(
                r#"
                INSERT INTO parcel (client, status, address, created_at)
                VALUES (:client, :status, :address, :created_at)
                RETURNING number
                "#,
                named_params! {
                    ":client": parcel.client,
                    ":status": parcel.status,
                    ":address": parcel.address,
                    ":created_at": parcel.created_at,
                },
                |row| row.get(0),
            )
            .map_err(|e| ParcelError::storage("failed to add parcel", e))?;

        tracing::debug!(number, client = parcel.client, "Added parcel");

        Ok(number)
    }

    /// Fetch a parcel by number
    pub fn get(&self, number: i64) -> Result<Parcel> {
        self.conn
            .query_row(
                r#"
                SELECT number, client, status, address, created_at
                FROM parcel
                WHERE number = :number
                "#,
                named_params! { ":number": number },
                parcel_from_row,
            )
            .optional()
            .map_err(|e| ParcelError::storage("failed to get parcel", e))?
            .ok_or(ParcelError::NotFound { number })
    }

    /// All parcels owned by `client`, in storage order. Empty if none.
    pub fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
                SELECT number, client, status, address, created_at
                FROM parcel
                WHERE client = :client
                "#,
            )
            .map_err(|e| ParcelError::storage("failed to prepare query", e))?;

        let rows = stmt
            .query_map(named_params! { ":client": client }, parcel_from_row)
            .map_err(|e| ParcelError::storage("failed to query parcels", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| ParcelError::storage("failed to read parcel row", e))
    }

    /// Overwrite the status, whatever it was before
    pub fn set_status(&self, number: i64, status: &ParcelStatus) -> Result<()> {
        let updated = self
            .conn
            .execute(
                r#"
                UPDATE parcel
                SET status = :status
                WHERE number = :number
                "#,
                named_params! { ":status": status, ":number": number },
            )
            .map_err(|e| ParcelError::storage("failed to set parcel status", e))?;

        tracing::debug!(number, %status, updated, "Set parcel status");

        Ok(())
    }

    /// Replace the address, only while the parcel is still registered
    pub fn set_address(&self, number: i64, address: &str) -> Result<()> {
        let updated = self
            .conn
            .execute(
                r#"
                UPDATE parcel
                SET address = :address
                WHERE number = :number AND status = :registered
                "#,
                named_params! {
                    ":address": address,
                    ":number": number,
                    ":registered": ParcelStatus::Registered,
                },
            )
            .map_err(|e| ParcelError::storage("failed to set parcel address", e))?;

        tracing::debug!(number, updated, "Set parcel address");

        Ok(())
    }

    /// Remove the parcel, only while it is still registered
    pub fn delete(&self, number: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute(
                r#"
                DELETE FROM parcel
                WHERE number = :number AND status = :registered
                "#,
                named_params! {
                    ":number": number,
                    ":registered": ParcelStatus::Registered,
                },
            )
            .map_err(|e| ParcelError::storage("failed to delete parcel", e))?;

        tracing::debug!(number, deleted, "Deleted parcel");

        Ok(())
    }
}
