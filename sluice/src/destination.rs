//! Folding destination snapshots into the persisted union.
//!
//! The control plane reports destinations as a flattened record; the merged
//! representation is the tagged [`DestinationConfig`]. Building the merged
//! value from a snapshot takes the active kind's fields from the snapshot and
//! runs write-only fields through the secret preserver against a same-kind
//! prior. The result is a sum type, so it cannot carry fields from a
//! previously persisted kind.

use sluice_client::types::{DestinationConfig, DestinationKind, WireDestination};
use sluice_config::SerializableSecretString;

use crate::error::{ErrorKind, SluiceResult};
use crate::{normalize, secrets, sluice_error};

/// Write-only fields of a prior destination, keyed by wire field name.
#[derive(Default)]
struct PriorSecrets<'a> {
    password: Option<&'a SerializableSecretString>,
    aws_access_key_id: Option<&'a SerializableSecretString>,
    aws_secret_access_key: Option<&'a SerializableSecretString>,
    access_key_id: Option<&'a SerializableSecretString>,
    secret_access_key: Option<&'a SerializableSecretString>,
}

impl<'a> PriorSecrets<'a> {
    /// Extracts the prior secrets, but only when the prior destination has the
    /// same kind as the snapshot. A kind switch must not leak credentials
    /// across kinds.
    fn from_prior(prior: Option<&'a DestinationConfig>, snapshot: &WireDestination) -> Self {
        let Some(prior) = prior else {
            return Self::default();
        };

        if prior.kind() != snapshot.kind {
            return Self::default();
        }

        match prior {
            DestinationConfig::Kafka {
                password,
                aws_access_key_id,
                aws_secret_access_key,
                ..
            } => Self {
                password: password.as_ref(),
                aws_access_key_id: aws_access_key_id.as_ref(),
                aws_secret_access_key: aws_secret_access_key.as_ref(),
                ..Self::default()
            },
            DestinationConfig::Sqs {
                access_key_id,
                secret_access_key,
                ..
            }
            | DestinationConfig::Kinesis {
                access_key_id,
                secret_access_key,
                ..
            } => Self {
                access_key_id: access_key_id.as_ref(),
                secret_access_key: secret_access_key.as_ref(),
                ..Self::default()
            },
            DestinationConfig::Webhook { .. } => Self::default(),
        }
    }
}

/// Returns the prior kafka topic when the prior destination is kafka.
fn prior_kafka_topic(prior: Option<&DestinationConfig>) -> Option<&String> {
    match prior {
        Some(DestinationConfig::Kafka { topic, .. }) => topic.as_ref(),
        _ => None,
    }
}

fn missing_field(kind: &str, field: &str) -> crate::SluiceError {
    sluice_error!(
        ErrorKind::DeserializationError,
        "destination snapshot is missing a required field",
        format!("`{field}` absent in {kind} destination snapshot")
    )
}

/// Decodes a flattened desired destination into the tagged union.
///
/// A record populating fields outside its declared kind is a configuration
/// error; it is rejected here, before any network call is made.
pub fn decode_desired(wire: WireDestination) -> SluiceResult<DestinationConfig> {
    DestinationConfig::try_from(wire).map_err(|error| {
        let detail = error.to_string();
        sluice_error!(
            ErrorKind::InvalidDestinationField,
            "invalid destination configuration",
            detail,
            source: error
        )
    })
}

/// Folds a destination snapshot against the prior persisted destination.
///
/// `routing_active` reports whether the merged consumer carries a routing
/// function; only then does an absent kafka topic fall back to the prior
/// value, since the control plane suppresses the topic when routing overrides
/// it. The fallback is deliberately scoped to that one field and condition.
pub fn merge_snapshot(
    snapshot: &WireDestination,
    prior: Option<&DestinationConfig>,
    routing_active: bool,
) -> SluiceResult<DestinationConfig> {
    let prior_secrets = PriorSecrets::from_prior(prior, snapshot);

    match snapshot.kind {
        DestinationKind::Kafka => {
            let topic = match normalize::non_empty(snapshot.topic.clone()) {
                Some(topic) => Some(topic),
                None if routing_active => prior_kafka_topic(prior).cloned(),
                None => None,
            };

            Ok(DestinationConfig::Kafka {
                hosts: normalize::non_empty(snapshot.hosts.clone())
                    .ok_or_else(|| missing_field("kafka", "hosts"))?,
                topic,
                tls: snapshot.tls,
                username: normalize::non_empty(snapshot.username.clone()),
                password: secrets::preserve(snapshot.password.clone(), prior_secrets.password),
                sasl_mechanism: snapshot.sasl_mechanism,
                aws_region: normalize::non_empty(snapshot.aws_region.clone()),
                aws_access_key_id: secrets::preserve(
                    snapshot.aws_access_key_id.clone(),
                    prior_secrets.aws_access_key_id,
                ),
                aws_secret_access_key: secrets::preserve(
                    snapshot.aws_secret_access_key.clone(),
                    prior_secrets.aws_secret_access_key,
                ),
            })
        }
        DestinationKind::Sqs => Ok(DestinationConfig::Sqs {
            queue_url: normalize::non_empty(snapshot.queue_url.clone())
                .ok_or_else(|| missing_field("sqs", "queue_url"))?,
            region: normalize::non_empty(snapshot.region.clone()),
            access_key_id: secrets::preserve(
                snapshot.access_key_id.clone(),
                prior_secrets.access_key_id,
            ),
            secret_access_key: secrets::preserve(
                snapshot.secret_access_key.clone(),
                prior_secrets.secret_access_key,
            ),
            is_fifo: snapshot.is_fifo,
        }),
        DestinationKind::Kinesis => Ok(DestinationConfig::Kinesis {
            stream_arn: normalize::non_empty(snapshot.stream_arn.clone())
                .ok_or_else(|| missing_field("kinesis", "stream_arn"))?,
            region: normalize::non_empty(snapshot.region.clone()),
            access_key_id: secrets::preserve(
                snapshot.access_key_id.clone(),
                prior_secrets.access_key_id,
            ),
            secret_access_key: secrets::preserve(
                snapshot.secret_access_key.clone(),
                prior_secrets.secret_access_key,
            ),
        }),
        DestinationKind::Webhook => Ok(DestinationConfig::Webhook {
            http_endpoint: normalize::non_empty(snapshot.http_endpoint.clone())
                .ok_or_else(|| missing_field("webhook", "http_endpoint"))?,
            http_endpoint_path: normalize::non_empty(snapshot.http_endpoint_path.clone()),
            batch: snapshot.batch,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kafka_snapshot() -> WireDestination {
        WireDestination {
            hosts: Some("b:9092".to_string()),
            topic: Some("t".to_string()),
            ..WireDestination::new(DestinationKind::Kafka)
        }
    }

    fn prior_kafka() -> DestinationConfig {
        DestinationConfig::Kafka {
            hosts: "b:9092".to_string(),
            topic: Some("t".to_string()),
            tls: None,
            username: None,
            password: Some(SerializableSecretString::from("p1")),
            sasl_mechanism: None,
            aws_region: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
        }
    }

    #[test]
    fn preserves_password_omitted_by_snapshot() {
        let merged = merge_snapshot(&kafka_snapshot(), Some(&prior_kafka()), false).unwrap();

        match merged {
            DestinationConfig::Kafka {
                hosts,
                topic,
                password,
                ..
            } => {
                assert_eq!(hosts, "b:9092");
                assert_eq!(topic.as_deref(), Some("t"));
                assert_eq!(password, Some(SerializableSecretString::from("p1")));
            }
            other => panic!("expected kafka destination, got {other:?}"),
        }
    }

    #[test]
    fn kind_switch_drops_prior_secrets() {
        let snapshot = WireDestination {
            http_endpoint: Some("https://example.com".to_string()),
            ..WireDestination::new(DestinationKind::Webhook)
        };

        let merged = merge_snapshot(&snapshot, Some(&prior_kafka()), false).unwrap();

        assert_eq!(
            merged,
            DestinationConfig::Webhook {
                http_endpoint: "https://example.com".to_string(),
                http_endpoint_path: None,
                batch: None,
            }
        );
    }

    #[test]
    fn topic_falls_back_to_prior_only_while_routing_is_active() {
        let mut snapshot = kafka_snapshot();
        snapshot.topic = None;

        let merged = merge_snapshot(&snapshot, Some(&prior_kafka()), true).unwrap();
        match &merged {
            DestinationConfig::Kafka { topic, .. } => assert_eq!(topic.as_deref(), Some("t")),
            other => panic!("expected kafka destination, got {other:?}"),
        }

        let merged = merge_snapshot(&snapshot, Some(&prior_kafka()), false).unwrap();
        match &merged {
            DestinationConfig::Kafka { topic, .. } => assert_eq!(topic.as_deref(), None),
            other => panic!("expected kafka destination, got {other:?}"),
        }
    }

    #[test]
    fn same_kind_secrets_survive_for_aws_destinations() {
        let prior = DestinationConfig::Sqs {
            queue_url: "https://sqs/q".to_string(),
            region: Some("us-east-1".to_string()),
            access_key_id: Some(SerializableSecretString::from("AKIA")),
            secret_access_key: Some(SerializableSecretString::from("shh")),
            is_fifo: Some(false),
        };

        let snapshot = WireDestination {
            queue_url: Some("https://sqs/q".to_string()),
            region: Some("us-east-1".to_string()),
            is_fifo: Some(false),
            ..WireDestination::new(DestinationKind::Sqs)
        };

        let merged = merge_snapshot(&snapshot, Some(&prior), false).unwrap();
        assert_eq!(merged, prior);
    }

    #[test]
    fn missing_anchor_field_is_an_error() {
        let snapshot = WireDestination::new(DestinationKind::Kinesis);
        let error = merge_snapshot(&snapshot, None, false).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DeserializationError);
    }

    #[test]
    fn desired_record_with_foreign_field_is_rejected() {
        let mut wire = WireDestination::new(DestinationKind::Kafka);
        wire.hosts = Some("b:9092".to_string());
        wire.queue_url = Some("https://sqs/q".to_string());

        let error = decode_desired(wire).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidDestinationField);
        assert!(error.detail().unwrap().contains("queue_url"));
    }

    #[test]
    fn merge_is_stable_across_repeated_reads() {
        let snapshot = kafka_snapshot();
        let first = merge_snapshot(&snapshot, Some(&prior_kafka()), false).unwrap();
        let second = merge_snapshot(&snapshot, Some(&first), false).unwrap();
        assert_eq!(first, second);
    }
}
