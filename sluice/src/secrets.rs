//! Carrying write-only fields across read cycles.
//!
//! The control plane accepts secrets in requests but never returns them (the
//! creation response may echo a value once). Reconstructing the merged value
//! therefore prefers the snapshot and otherwise carries the prior persisted
//! value forward verbatim, including when that value is itself absent. Nothing
//! is ever fabricated.

/// Merges one write-only field from a snapshot against the prior value.
pub fn preserve<T: Clone>(snapshot: Option<T>, prior: Option<&T>) -> Option<T> {
    snapshot.or_else(|| prior.cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_config::SerializableSecretString;

    #[test]
    fn snapshot_value_wins() {
        let snapshot = Some(SerializableSecretString::from("echoed-once"));
        let prior = SerializableSecretString::from("old");

        assert_eq!(
            preserve(snapshot, Some(&prior)),
            Some(SerializableSecretString::from("echoed-once"))
        );
    }

    #[test]
    fn absent_snapshot_carries_prior_forward() {
        let prior = SerializableSecretString::from("s3cr3t");

        assert_eq!(
            preserve(None, Some(&prior)),
            Some(SerializableSecretString::from("s3cr3t"))
        );
    }

    #[test]
    fn absent_prior_stays_absent() {
        assert_eq!(preserve::<SerializableSecretString>(None, None), None);
    }
}
