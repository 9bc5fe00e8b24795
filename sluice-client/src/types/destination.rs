use std::fmt;

use serde::{Deserialize, Serialize};
use sluice_config::SerializableSecretString;
use thiserror::Error;

/// Discriminator for the four supported destination kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    Kafka,
    Sqs,
    Kinesis,
    Webhook,
}

impl DestinationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKind::Kafka => "kafka",
            DestinationKind::Sqs => "sqs",
            DestinationKind::Kinesis => "kinesis",
            DestinationKind::Webhook => "webhook",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SASL mechanism for Kafka authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaslMechanism {
    #[serde(rename = "PLAIN")]
    Plain,
    #[serde(rename = "SCRAM-SHA-256")]
    ScramSha256,
    #[serde(rename = "SCRAM-SHA-512")]
    ScramSha512,
    #[serde(rename = "AWS_MSK_IAM")]
    AwsMskIam,
}

/// The flattened destination record used on the wire.
///
/// The control plane transports every destination kind through one record:
/// a `type` discriminator plus the union of all per-kind fields, with the
/// inactive ones omitted. [`DestinationConfig`] is the structured view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDestination {
    #[serde(rename = "type")]
    pub kind: DestinationKind,

    // Kafka fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SerializableSecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sasl_mechanism: Option<SaslMechanism>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_access_key_id: Option<SerializableSecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_secret_access_key: Option<SerializableSecretString>,

    // SQS and Kinesis fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<SerializableSecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<SerializableSecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fifo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_arn: Option<String>,

    // Webhook fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_endpoint_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<bool>,
}

impl WireDestination {
    /// Creates an empty record for the given kind.
    pub fn new(kind: DestinationKind) -> Self {
        Self {
            kind,
            hosts: None,
            topic: None,
            tls: None,
            username: None,
            password: None,
            sasl_mechanism: None,
            aws_region: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            queue_url: None,
            region: None,
            access_key_id: None,
            secret_access_key: None,
            is_fifo: None,
            stream_arn: None,
            http_endpoint: None,
            http_endpoint_path: None,
            batch: None,
        }
    }
}

/// Errors raised when decoding a flattened destination record.
#[derive(Debug, Error)]
pub enum DestinationDecodeError {
    /// A populated field does not belong to the declared kind.
    #[error("field `{field}` is not valid for {kind} destinations")]
    ForeignField {
        kind: DestinationKind,
        field: &'static str,
    },

    /// A field required by the declared kind is missing.
    #[error("`{field}` is required for {kind} destinations")]
    MissingField {
        kind: DestinationKind,
        field: &'static str,
    },
}

/// Destination configuration as a tagged union.
///
/// One case per kind, each owning a disjoint field subset, so a value can
/// never carry stale fields from another kind. On the wire it flattens into
/// [`WireDestination`]; decoding rejects records that populate fields outside
/// the declared kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireDestination", into = "WireDestination")]
pub enum DestinationConfig {
    Kafka {
        hosts: String,
        topic: Option<String>,
        tls: Option<bool>,
        username: Option<String>,
        password: Option<SerializableSecretString>,
        sasl_mechanism: Option<SaslMechanism>,
        aws_region: Option<String>,
        aws_access_key_id: Option<SerializableSecretString>,
        aws_secret_access_key: Option<SerializableSecretString>,
    },
    Sqs {
        queue_url: String,
        region: Option<String>,
        access_key_id: Option<SerializableSecretString>,
        secret_access_key: Option<SerializableSecretString>,
        is_fifo: Option<bool>,
    },
    Kinesis {
        stream_arn: String,
        region: Option<String>,
        access_key_id: Option<SerializableSecretString>,
        secret_access_key: Option<SerializableSecretString>,
    },
    Webhook {
        http_endpoint: String,
        http_endpoint_path: Option<String>,
        batch: Option<bool>,
    },
}

impl DestinationConfig {
    /// Returns the kind discriminator of this destination.
    pub fn kind(&self) -> DestinationKind {
        match self {
            DestinationConfig::Kafka { .. } => DestinationKind::Kafka,
            DestinationConfig::Sqs { .. } => DestinationKind::Sqs,
            DestinationConfig::Kinesis { .. } => DestinationKind::Kinesis,
            DestinationConfig::Webhook { .. } => DestinationKind::Webhook,
        }
    }
}

fn ensure_absent<T>(
    kind: DestinationKind,
    field: &'static str,
    value: &Option<T>,
) -> Result<(), DestinationDecodeError> {
    if value.is_some() {
        return Err(DestinationDecodeError::ForeignField { kind, field });
    }
    Ok(())
}

fn require<T>(
    kind: DestinationKind,
    field: &'static str,
    value: Option<T>,
) -> Result<T, DestinationDecodeError> {
    value.ok_or(DestinationDecodeError::MissingField { kind, field })
}

impl TryFrom<WireDestination> for DestinationConfig {
    type Error = DestinationDecodeError;

    fn try_from(wire: WireDestination) -> Result<Self, Self::Error> {
        let kind = wire.kind;
        match kind {
            DestinationKind::Kafka => {
                ensure_absent(kind, "queue_url", &wire.queue_url)?;
                ensure_absent(kind, "region", &wire.region)?;
                ensure_absent(kind, "access_key_id", &wire.access_key_id)?;
                ensure_absent(kind, "secret_access_key", &wire.secret_access_key)?;
                ensure_absent(kind, "is_fifo", &wire.is_fifo)?;
                ensure_absent(kind, "stream_arn", &wire.stream_arn)?;
                ensure_absent(kind, "http_endpoint", &wire.http_endpoint)?;
                ensure_absent(kind, "http_endpoint_path", &wire.http_endpoint_path)?;
                ensure_absent(kind, "batch", &wire.batch)?;

                Ok(DestinationConfig::Kafka {
                    hosts: require(kind, "hosts", wire.hosts)?,
                    topic: wire.topic,
                    tls: wire.tls,
                    username: wire.username,
                    password: wire.password,
                    sasl_mechanism: wire.sasl_mechanism,
                    aws_region: wire.aws_region,
                    aws_access_key_id: wire.aws_access_key_id,
                    aws_secret_access_key: wire.aws_secret_access_key,
                })
            }
            DestinationKind::Sqs => {
                ensure_absent(kind, "hosts", &wire.hosts)?;
                ensure_absent(kind, "topic", &wire.topic)?;
                ensure_absent(kind, "tls", &wire.tls)?;
                ensure_absent(kind, "username", &wire.username)?;
                ensure_absent(kind, "password", &wire.password)?;
                ensure_absent(kind, "sasl_mechanism", &wire.sasl_mechanism)?;
                ensure_absent(kind, "aws_region", &wire.aws_region)?;
                ensure_absent(kind, "aws_access_key_id", &wire.aws_access_key_id)?;
                ensure_absent(kind, "aws_secret_access_key", &wire.aws_secret_access_key)?;
                ensure_absent(kind, "stream_arn", &wire.stream_arn)?;
                ensure_absent(kind, "http_endpoint", &wire.http_endpoint)?;
                ensure_absent(kind, "http_endpoint_path", &wire.http_endpoint_path)?;
                ensure_absent(kind, "batch", &wire.batch)?;

                Ok(DestinationConfig::Sqs {
                    queue_url: require(kind, "queue_url", wire.queue_url)?,
                    region: wire.region,
                    access_key_id: wire.access_key_id,
                    secret_access_key: wire.secret_access_key,
                    is_fifo: wire.is_fifo,
                })
            }
            DestinationKind::Kinesis => {
                ensure_absent(kind, "hosts", &wire.hosts)?;
                ensure_absent(kind, "topic", &wire.topic)?;
                ensure_absent(kind, "tls", &wire.tls)?;
                ensure_absent(kind, "username", &wire.username)?;
                ensure_absent(kind, "password", &wire.password)?;
                ensure_absent(kind, "sasl_mechanism", &wire.sasl_mechanism)?;
                ensure_absent(kind, "aws_region", &wire.aws_region)?;
                ensure_absent(kind, "aws_access_key_id", &wire.aws_access_key_id)?;
                ensure_absent(kind, "aws_secret_access_key", &wire.aws_secret_access_key)?;
                ensure_absent(kind, "queue_url", &wire.queue_url)?;
                ensure_absent(kind, "is_fifo", &wire.is_fifo)?;
                ensure_absent(kind, "http_endpoint", &wire.http_endpoint)?;
                ensure_absent(kind, "http_endpoint_path", &wire.http_endpoint_path)?;
                ensure_absent(kind, "batch", &wire.batch)?;

                Ok(DestinationConfig::Kinesis {
                    stream_arn: require(kind, "stream_arn", wire.stream_arn)?,
                    region: wire.region,
                    access_key_id: wire.access_key_id,
                    secret_access_key: wire.secret_access_key,
                })
            }
            DestinationKind::Webhook => {
                ensure_absent(kind, "hosts", &wire.hosts)?;
                ensure_absent(kind, "topic", &wire.topic)?;
                ensure_absent(kind, "tls", &wire.tls)?;
                ensure_absent(kind, "username", &wire.username)?;
                ensure_absent(kind, "password", &wire.password)?;
                ensure_absent(kind, "sasl_mechanism", &wire.sasl_mechanism)?;
                ensure_absent(kind, "aws_region", &wire.aws_region)?;
                ensure_absent(kind, "aws_access_key_id", &wire.aws_access_key_id)?;
                ensure_absent(kind, "aws_secret_access_key", &wire.aws_secret_access_key)?;
                ensure_absent(kind, "queue_url", &wire.queue_url)?;
                ensure_absent(kind, "region", &wire.region)?;
                ensure_absent(kind, "access_key_id", &wire.access_key_id)?;
                ensure_absent(kind, "secret_access_key", &wire.secret_access_key)?;
                ensure_absent(kind, "is_fifo", &wire.is_fifo)?;
                ensure_absent(kind, "stream_arn", &wire.stream_arn)?;

                Ok(DestinationConfig::Webhook {
                    http_endpoint: require(kind, "http_endpoint", wire.http_endpoint)?,
                    http_endpoint_path: wire.http_endpoint_path,
                    batch: wire.batch,
                })
            }
        }
    }
}

impl From<DestinationConfig> for WireDestination {
    fn from(config: DestinationConfig) -> Self {
        match config {
            DestinationConfig::Kafka {
                hosts,
                topic,
                tls,
                username,
                password,
                sasl_mechanism,
                aws_region,
                aws_access_key_id,
                aws_secret_access_key,
            } => WireDestination {
                hosts: Some(hosts),
                topic,
                tls,
                username,
                password,
                sasl_mechanism,
                aws_region,
                aws_access_key_id,
                aws_secret_access_key,
                ..WireDestination::new(DestinationKind::Kafka)
            },
            DestinationConfig::Sqs {
                queue_url,
                region,
                access_key_id,
                secret_access_key,
                is_fifo,
            } => WireDestination {
                queue_url: Some(queue_url),
                region,
                access_key_id,
                secret_access_key,
                is_fifo,
                ..WireDestination::new(DestinationKind::Sqs)
            },
            DestinationConfig::Kinesis {
                stream_arn,
                region,
                access_key_id,
                secret_access_key,
            } => WireDestination {
                stream_arn: Some(stream_arn),
                region,
                access_key_id,
                secret_access_key,
                ..WireDestination::new(DestinationKind::Kinesis)
            },
            DestinationConfig::Webhook {
                http_endpoint,
                http_endpoint_path,
                batch,
            } => WireDestination {
                http_endpoint: Some(http_endpoint),
                http_endpoint_path,
                batch,
                ..WireDestination::new(DestinationKind::Webhook)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kafka_config() -> DestinationConfig {
        DestinationConfig::Kafka {
            hosts: "broker1:9092,broker2:9092".to_string(),
            topic: Some("user-events".to_string()),
            tls: Some(true),
            username: None,
            password: Some(SerializableSecretString::from("p1")),
            sasl_mechanism: Some(SaslMechanism::ScramSha256),
            aws_region: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
        }
    }

    #[test]
    fn serializes_to_flattened_record() {
        let json = serde_json::to_value(kafka_config()).unwrap();

        assert_eq!(json["type"], "kafka");
        assert_eq!(json["hosts"], "broker1:9092,broker2:9092");
        assert_eq!(json["sasl_mechanism"], "SCRAM-SHA-256");
        // Inactive-kind fields must not appear at all.
        assert!(json.get("queue_url").is_none());
        assert!(json.get("http_endpoint").is_none());
    }

    #[test]
    fn flat_round_trip_is_identity_for_every_kind() {
        let configs = vec![
            kafka_config(),
            DestinationConfig::Sqs {
                queue_url: "https://sqs.us-east-1.amazonaws.com/123/orders".to_string(),
                region: Some("us-east-1".to_string()),
                access_key_id: Some(SerializableSecretString::from("AKIA")),
                secret_access_key: Some(SerializableSecretString::from("shh")),
                is_fifo: Some(true),
            },
            DestinationConfig::Kinesis {
                stream_arn: "arn:aws:kinesis:us-east-1:123:stream/orders".to_string(),
                region: Some("us-east-1".to_string()),
                access_key_id: None,
                secret_access_key: None,
            },
            DestinationConfig::Webhook {
                http_endpoint: "https://example.com".to_string(),
                http_endpoint_path: Some("/hooks/changes".to_string()),
                batch: Some(false),
            },
        ];

        for config in configs {
            let json = serde_json::to_string(&config).unwrap();
            let back: DestinationConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(back, config);
        }
    }

    #[test]
    fn rejects_foreign_fields() {
        let result = serde_json::from_str::<DestinationConfig>(
            r#"{"type": "kafka", "hosts": "b:9092", "queue_url": "https://sqs/q"}"#,
        );

        let message = result.unwrap_err().to_string();
        assert!(message.contains("`queue_url` is not valid for kafka destinations"));
    }

    #[test]
    fn rejects_missing_required_field() {
        let result = serde_json::from_str::<DestinationConfig>(r#"{"type": "webhook"}"#);

        let message = result.unwrap_err().to_string();
        assert!(message.contains("`http_endpoint` is required for webhook destinations"));
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(serde_json::from_str::<DestinationConfig>(r#"{"type": "pubsub"}"#).is_err());
    }
}
