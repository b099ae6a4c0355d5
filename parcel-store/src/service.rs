//! Parcel service: the application-facing workflow on top of `ParcelStore`

use crate::errors::Result;
use crate::parcel::{Parcel, ParcelStatus};
use crate::store::ParcelStore;

#[derive(Debug, Clone, Copy)]
pub struct ParcelService<'conn> {
    store: ParcelStore<'conn>,
}

impl<'conn> ParcelService<'conn> {
    pub fn new(store: ParcelStore<'conn>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> ParcelStore<'conn> {
        self.store
    }

    /// Register a new parcel for `client` and return it with its number set
    pub fn register(&self, client: i64, address: &str) -> Result<Parcel> {
        let mut parcel = Parcel::registered(client, address);
        parcel.number = self.store.add(&parcel)?;

        tracing::info!(
            number = parcel.number,
            client,
            created_at = %parcel.created_at,
            "Registered parcel"
        );

        Ok(parcel)
    }

    pub fn client_parcels(&self, client: i64) -> Result<Vec<Parcel>> {
        self.store.get_by_client(client)
    }

    /// Advance a parcel one step along `registered -> sent -> delivered`.
    ///
    /// Returns the status written, or `None` if the parcel was already in a
    /// terminal or unknown status and nothing was written.
    pub fn next_status(&self, number: i64) -> Result<Option<ParcelStatus>> {
        let parcel = self.store.get(number)?;

        let Some(next) = parcel.status.next() else {
            tracing::info!(number, status = %parcel.status, "Parcel has no next status");
            return Ok(None);
        };

        self.store.set_status(number, &next)?;
        tracing::info!(number, from = %parcel.status, to = %next, "Advanced parcel status");

        Ok(Some(next))
    }

    /// Change the delivery address; no effect unless the parcel is registered
    pub fn change_address(&self, number: i64, address: &str) -> Result<()> {
        self.store.set_address(number, address)
    }

    /// Delete the parcel; no effect unless the parcel is registered
    pub fn delete(&self, number: i64) -> Result<()> {
        self.store.delete(number)
    }
}
