//! Compound identifiers for backfills.
//!
//! A backfill is scoped under its parent consumer, so its import identifier
//! encodes both: `<consumer-name-or-id>/<backfill-id>`.

use crate::error::{ErrorKind, SluiceResult};
use crate::sluice_error;

/// Separator between the consumer reference and the backfill id.
const SEPARATOR: char = '/';

/// Encodes a consumer reference and backfill id into one import identifier.
///
/// Inverse of [`decode`] for segments that do not contain the separator.
pub fn encode(consumer: &str, backfill_id: &str) -> String {
    format!("{consumer}{SEPARATOR}{backfill_id}")
}

/// Decodes an import identifier into (consumer reference, backfill id).
///
/// Requires exactly one separator with two non-empty segments.
pub fn decode(raw: &str) -> SluiceResult<(String, String)> {
    let mut segments = raw.split(SEPARATOR);

    let invalid = || {
        sluice_error!(
            ErrorKind::InvalidIdentifier,
            "invalid backfill import identifier",
            format!("expected `<consumer>{SEPARATOR}<backfill-id>`, got `{raw}`")
        )
    };

    let consumer = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let backfill_id = segments.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;

    if segments.next().is_some() {
        return Err(invalid());
    }

    Ok((consumer.to_string(), backfill_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_valid_identifiers() {
        let (consumer, backfill_id) = decode(&encode("orders-sink", "bf-001")).unwrap();
        assert_eq!(consumer, "orders-sink");
        assert_eq!(backfill_id, "bf-001");
    }

    #[test]
    fn rejects_missing_separator() {
        let error = decode("bad-id-no-separator").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidIdentifier);
        assert!(error.detail().unwrap().contains("<consumer>/<backfill-id>"));
    }

    #[test]
    fn rejects_extra_separators() {
        let error = decode("orders/extra/bf-001").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidIdentifier);
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(decode("/bf-001").is_err());
        assert!(decode("orders-sink/").is_err());
        assert!(decode("/").is_err());
        assert!(decode("").is_err());
    }
}
