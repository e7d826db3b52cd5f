//! Cursor codec.
//!
//! On the wire a cursor is two strings: an RFC 3339 timestamp and a UUID in
//! canonical hyphenated form. Both are present or both are absent.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PageError;
use crate::model::{truncate_micros, Keyed};

/// Position of the last item a client has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "WireCursor")]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl Cursor {
    pub fn new(created_at: DateTime<Utc>, id: Uuid) -> Self {
        Self {
            created_at: truncate_micros(created_at),
            id,
        }
    }

    /// Timestamp as stored in the `created_at` columns.
    pub fn created_at_micros(&self) -> i64 {
        self.created_at.timestamp_micros()
    }

    pub fn to_wire(&self) -> WireCursor {
        WireCursor {
            last_loaded_timestamp: self
                .created_at
                .to_rfc3339_opts(SecondsFormat::Micros, true),
            last_loaded_id: self.id.hyphenated().to_string(),
        }
    }
}

/// Wire form of a [`Cursor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCursor {
    pub last_loaded_timestamp: String,
    pub last_loaded_id: String,
}

impl From<Cursor> for WireCursor {
    fn from(cursor: Cursor) -> Self {
        cursor.to_wire()
    }
}

impl TryFrom<&WireCursor> for Cursor {
    type Error = PageError;

    fn try_from(wire: &WireCursor) -> Result<Self, Self::Error> {
        decode(&wire.last_loaded_timestamp, &wire.last_loaded_id)
    }
}

/// Parse a cursor from its two wire fields.
pub fn decode(raw_timestamp: &str, raw_id: &str) -> Result<Cursor, PageError> {
    let created_at = DateTime::parse_from_rfc3339(raw_timestamp)
        .map_err(|e| {
            PageError::MalformedCursor(format!(
                "last_loaded_timestamp: should be RFC 3339 ({e})"
            ))
        })?
        .with_timezone(&Utc);

    // Only the hyphenated form is canonical; `try_parse` would also accept
    // simple, braced and URN spellings.
    if raw_id.len() != uuid::fmt::Hyphenated::LENGTH {
        return Err(PageError::MalformedCursor(
            "last_loaded_id: should be a hyphenated UUID".to_string(),
        ));
    }
    let id = Uuid::try_parse(raw_id)
        .map_err(|e| PageError::MalformedCursor(format!("last_loaded_id: {e}")))?;

    Ok(Cursor::new(created_at, id))
}

/// Parse an optional cursor. Absent fields mean "first page"; a single
/// field without the other is malformed.
pub fn decode_optional(
    raw_timestamp: Option<&str>,
    raw_id: Option<&str>,
) -> Result<Option<Cursor>, PageError> {
    match (raw_timestamp, raw_id) {
        (None, None) => Ok(None),
        (Some(ts), Some(id)) => decode(ts, id).map(Some),
        (Some(_), None) => Err(PageError::MalformedCursor(
            "last_loaded_id is required with last_loaded_timestamp".to_string(),
        )),
        (None, Some(_)) => Err(PageError::MalformedCursor(
            "last_loaded_timestamp is required with last_loaded_id".to_string(),
        )),
    }
}

/// Cursor positioned at `item`.
pub fn encode<T: Keyed>(item: &T) -> Cursor {
    item.cursor()
}
