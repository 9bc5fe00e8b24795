//! Serde helpers shared by the wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// Deserializes an optional string, mapping the empty string to `None`.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.is_empty()))
}

/// Deserializes an optional RFC 3339 timestamp, mapping the empty string to `None`.
///
/// The control plane reports timestamps that have not been reached yet as `""`.
pub fn empty_datetime_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(&value)
            .map(|timestamp| Some(timestamp.with_timezone(&Utc)))
            .map_err(de::Error::custom),
    }
}
