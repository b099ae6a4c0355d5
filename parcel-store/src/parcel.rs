//! Parcel entity and lifecycle status

use chrono::{SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Lifecycle status of a parcel.
///
/// Stored as plain text. Only `Registered` carries meaning for the store's
/// guards; any other text round-trips through `Other`. Equality and hashing
/// compare the text, so `Other("sent")` equals `Sent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ParcelStatus {
    /// Initial state; address changes and deletion are only allowed here
    Registered,
    /// Handed over for delivery
    Sent,
    /// Delivered to the recipient
    Delivered,
    /// Any status text outside the known set
    Other(String),
}

impl ParcelStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Other(s) => s,
        }
    }

    /// Next state along `registered -> sent -> delivered`.
    ///
    /// `None` for terminal or unknown statuses.
    pub fn next(&self) -> Option<Self> {
        match self.as_str() {
            "registered" => Some(Self::Sent),
            "sent" => Some(Self::Delivered),
            _ => None,
        }
    }
}

impl From<&str> for ParcelStatus {
    fn from(s: &str) -> Self {
        match s {
            "registered" => Self::Registered,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ParcelStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "registered" | "sent" | "delivered" => Self::from(s.as_str()),
            _ => Self::Other(s),
        }
    }
}

impl From<ParcelStatus> for String {
    fn from(status: ParcelStatus) -> Self {
        match status {
            ParcelStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl PartialEq for ParcelStatus {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ParcelStatus {}

impl Hash for ParcelStatus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for ParcelStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ParcelStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(Self::from)
    }
}

/// A row of the `parcel` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parcel {
    /// Assigned by the store on insert; `0` until then
    pub number: i64,
    pub client: i64,
    pub status: ParcelStatus,
    pub address: String,
    pub created_at: String,
}

impl Parcel {
    /// Build a new, not yet stored parcel in the `Registered` state.
    ///
    /// `created_at` is the current UTC time in RFC 3339 with second precision.
    pub fn registered(client: i64, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
