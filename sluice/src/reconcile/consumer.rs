use sluice_client::ControlPlaneApi;
use sluice_client::types::{
    ConsumerRequest, ConsumerSnapshot, DestinationConfig, WireSourceFilter, WireTableSpec,
};
use tracing::warn;

use crate::concurrency::CancellationRx;
use crate::error::{ErrorKind, SluiceResult};
use crate::reconcile::{ReadOutcome, call_remote};
use crate::state::{
    ResourceStatus, SourceFilter, StreamConsumerConfig, StreamConsumerState, TableSpec,
};
use crate::{bail, destination, normalize};

/// Prior values consulted while folding a snapshot: the destination for
/// secret preservation and the status record for retention when the control
/// plane reports none.
struct PriorView<'a> {
    destination: Option<&'a DestinationConfig>,
    status_info: Option<&'a ResourceStatus>,
}

impl<'a> PriorView<'a> {
    fn from_config(config: &'a StreamConsumerConfig) -> Self {
        Self {
            destination: Some(&config.destination),
            status_info: None,
        }
    }

    fn from_state(state: &'a StreamConsumerState) -> Self {
        Self {
            destination: Some(&state.destination),
            status_info: state.status_info.as_ref(),
        }
    }
}

/// Reconciles stream consumers against the control plane.
pub struct StreamConsumerReconciler<C> {
    api: C,
}

impl<C> StreamConsumerReconciler<C>
where
    C: ControlPlaneApi,
{
    pub fn new(api: C) -> Self {
        Self { api }
    }

    /// Returns the underlying collaborator.
    pub fn api(&self) -> &C {
        &self.api
    }

    /// Creates the consumer and folds the response seeded with the desired
    /// configuration, so declared destination secrets survive the first
    /// round trip.
    pub async fn create(
        &self,
        desired: &StreamConsumerConfig,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<StreamConsumerState> {
        validate(desired)?;

        let request = build_request(desired);
        let snapshot = call_remote(
            "create consumer",
            &desired.name,
            cancellation,
            self.api.create_consumer(&request),
        )
        .await?;

        fold_snapshot(snapshot, PriorView::from_config(desired))
    }

    /// Refreshes the persisted state from the control plane.
    pub async fn read(
        &self,
        prior: &StreamConsumerState,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<ReadOutcome<StreamConsumerState>> {
        let snapshot = match call_remote(
            "read consumer",
            &prior.id,
            cancellation,
            self.api.get_consumer(&prior.id),
        )
        .await
        {
            Ok(snapshot) => snapshot,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                warn!(id = %prior.id, "stream consumer not found, removing from state");
                return Ok(ReadOutcome::Removed);
            }
            Err(error) => return Err(error),
        };

        Ok(ReadOutcome::Live(fold_snapshot(
            snapshot,
            PriorView::from_state(prior),
        )?))
    }

    /// Updates the consumer keyed by the prior state's identity.
    ///
    /// Switching the destination kind is allowed; fields of the previous kind
    /// cannot survive the merge because the destination is a tagged union.
    pub async fn update(
        &self,
        desired: &StreamConsumerConfig,
        prior: &StreamConsumerState,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<StreamConsumerState> {
        validate(desired)?;

        let request = build_request(desired);
        let snapshot = call_remote(
            "update consumer",
            &prior.id,
            cancellation,
            self.api.update_consumer(&prior.id, &request),
        )
        .await?;

        fold_snapshot(snapshot, PriorView::from_config(desired))
    }

    /// Deletes the consumer; deleting an already-missing one succeeds.
    pub async fn delete(
        &self,
        prior: &StreamConsumerState,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<()> {
        call_remote(
            "delete consumer",
            &prior.id,
            cancellation,
            self.api.delete_consumer(&prior.id),
        )
        .await
    }
}

impl<C> StreamConsumerReconciler<C> {
    /// Validates an external identifier for import. The identifier is the
    /// consumer's own opaque id.
    pub fn import_id(raw: &str) -> SluiceResult<String> {
        if raw.trim().is_empty() {
            bail!(
                ErrorKind::InvalidIdentifier,
                "invalid consumer import identifier",
                "expected a non-empty consumer id"
            );
        }
        Ok(raw.to_string())
    }
}

fn validate(desired: &StreamConsumerConfig) -> SluiceResult<()> {
    if desired.name.trim().is_empty() {
        bail!(
            ErrorKind::ValidationError,
            "invalid consumer configuration",
            "`name` must not be empty"
        );
    }

    if desired.tables.is_empty() {
        bail!(
            ErrorKind::ValidationError,
            "invalid consumer configuration",
            format!("consumer `{}` must declare at least one table", desired.name)
        );
    }

    Ok(())
}

fn build_request(desired: &StreamConsumerConfig) -> ConsumerRequest {
    ConsumerRequest {
        name: desired.name.clone(),
        status: desired.status,
        connection_id: desired.connection_id.clone(),
        source: desired.source.as_ref().map(|source| WireSourceFilter {
            include_schemas: source.include_schemas.clone(),
            exclude_schemas: source.exclude_schemas.clone(),
            include_tables: source.include_tables.clone(),
            exclude_tables: source.exclude_tables.clone(),
        }),
        tables: desired
            .tables
            .iter()
            .map(|table| WireTableSpec {
                name: table.name.clone(),
                group_column_names: table.group_column_names.clone(),
            })
            .collect(),
        actions: desired.actions.clone(),
        destination: desired.destination.clone(),
        filter: desired.filter.clone(),
        transform: desired.transform.clone(),
        enrichment: desired.enrichment.clone(),
        routing: desired.routing.clone(),
        message_grouping: desired.message_grouping,
        batch_size: desired.batch_size,
        max_retry_count: desired.max_retry_count,
        load_shedding_policy: desired.load_shedding_policy,
        timestamp_format: desired.timestamp_format,
    }
}

fn fold_source(source: Option<WireSourceFilter>) -> Option<SourceFilter> {
    let source = source?;

    let folded = SourceFilter {
        include_schemas: normalize::list_value(source.include_schemas),
        exclude_schemas: normalize::list_value(source.exclude_schemas),
        include_tables: normalize::list_value(source.include_tables),
        exclude_tables: normalize::list_value(source.exclude_tables),
    };

    // An all-empty filter means "no restriction", the same as no filter.
    (!folded.is_empty()).then_some(folded)
}

fn fold_tables(tables: Vec<WireTableSpec>) -> Vec<TableSpec> {
    tables
        .into_iter()
        .map(|table| TableSpec {
            name: table.name,
            group_column_names: normalize::list_value(table.group_column_names),
        })
        .collect()
}

fn fold_snapshot(
    snapshot: ConsumerSnapshot,
    prior: PriorView<'_>,
) -> SluiceResult<StreamConsumerState> {
    let routing = normalize::string_value(snapshot.routing);

    let destination = destination::merge_snapshot(
        &snapshot.destination,
        prior.destination,
        routing.is_some(),
    )?;

    let status_info = snapshot
        .status_info
        .filter(|status| status.has_data())
        .map(|status| ResourceStatus {
            state: status.state,
            created_at: status.created_at,
            updated_at: status.updated_at,
            last_error: status.last_error,
        })
        .or_else(|| prior.status_info.cloned());

    Ok(StreamConsumerState {
        id: snapshot.id,
        name: snapshot.name,
        status: snapshot.status,
        connection_id: snapshot.connection_id,
        source: fold_source(snapshot.source),
        tables: fold_tables(snapshot.tables),
        actions: (!snapshot.actions.is_empty()).then_some(snapshot.actions),
        destination,
        filter: normalize::string_value(snapshot.filter),
        transform: normalize::string_value(snapshot.transform),
        enrichment: normalize::string_value(snapshot.enrichment),
        routing,
        message_grouping: snapshot.message_grouping,
        batch_size: snapshot.batch_size,
        max_retry_count: normalize::zero_as_absent(snapshot.max_retry_count),
        load_shedding_policy: snapshot.load_shedding_policy,
        timestamp_format: snapshot.timestamp_format,
        status_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_client::types::{
        ActionKind, ConsumerStatus, DestinationKind, LoadSheddingPolicy, TimestampFormat,
        WireDestination, WireResourceStatus,
    };
    use sluice_config::SerializableSecretString;

    fn desired() -> StreamConsumerConfig {
        StreamConsumerConfig {
            name: "orders-sink".to_string(),
            status: None,
            connection_id: "conn-1".to_string(),
            source: None,
            tables: vec![TableSpec {
                name: "public.orders".to_string(),
                group_column_names: None,
            }],
            actions: Some(vec![ActionKind::Insert, ActionKind::Update]),
            destination: DestinationConfig::Kafka {
                hosts: "b:9092".to_string(),
                topic: Some("t".to_string()),
                tls: None,
                username: None,
                password: Some(SerializableSecretString::from("p1")),
                sasl_mechanism: None,
                aws_region: None,
                aws_access_key_id: None,
                aws_secret_access_key: None,
            },
            filter: None,
            transform: None,
            enrichment: None,
            routing: None,
            message_grouping: None,
            batch_size: None,
            max_retry_count: None,
            load_shedding_policy: None,
            timestamp_format: None,
        }
    }

    fn snapshot() -> ConsumerSnapshot {
        ConsumerSnapshot {
            id: "sink-1".to_string(),
            name: "orders-sink".to_string(),
            status: ConsumerStatus::Active,
            connection_id: "conn-1".to_string(),
            source: None,
            tables: vec![WireTableSpec {
                name: "public.orders".to_string(),
                group_column_names: Some(vec![]),
            }],
            actions: vec![ActionKind::Insert, ActionKind::Update],
            destination: WireDestination {
                hosts: Some("b:9092".to_string()),
                topic: Some("t".to_string()),
                ..WireDestination::new(DestinationKind::Kafka)
            },
            filter: Some("none".to_string()),
            transform: Some("none".to_string()),
            enrichment: Some("none".to_string()),
            routing: Some("none".to_string()),
            message_grouping: true,
            batch_size: 100,
            max_retry_count: None,
            load_shedding_policy: LoadSheddingPolicy::PauseOnFull,
            timestamp_format: TimestampFormat::Iso8601,
            status_info: None,
        }
    }

    #[test]
    fn validation_rejects_empty_table_set() {
        let mut config = desired();
        config.tables.clear();

        let error = validate(&config).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn fold_normalizes_sentinels_and_preserves_secrets() {
        let config = desired();
        let state = fold_snapshot(snapshot(), PriorView::from_config(&config)).unwrap();

        assert_eq!(state.id, "sink-1");
        assert_eq!(state.filter, None);
        assert_eq!(state.transform, None);
        assert_eq!(state.enrichment, None);
        assert_eq!(state.routing, None);
        assert_eq!(state.tables[0].group_column_names, None);

        match state.destination {
            DestinationConfig::Kafka { password, .. } => {
                assert_eq!(password, Some(SerializableSecretString::from("p1")));
            }
            other => panic!("expected kafka destination, got {other:?}"),
        }
    }

    #[test]
    fn fold_collapses_all_empty_source_filter() {
        let mut wire = snapshot();
        wire.source = Some(WireSourceFilter {
            include_schemas: Some(vec![]),
            exclude_schemas: None,
            include_tables: Some(vec![]),
            exclude_tables: None,
        });

        let config = desired();
        let state = fold_snapshot(wire, PriorView::from_config(&config)).unwrap();
        assert_eq!(state.source, None);
    }

    #[test]
    fn fold_keeps_populated_source_lists() {
        let mut wire = snapshot();
        wire.source = Some(WireSourceFilter {
            include_schemas: Some(vec!["public".to_string()]),
            exclude_schemas: Some(vec![]),
            include_tables: None,
            exclude_tables: None,
        });

        let config = desired();
        let state = fold_snapshot(wire, PriorView::from_config(&config)).unwrap();
        let source = state.source.unwrap();
        assert_eq!(source.include_schemas, Some(vec!["public".to_string()]));
        assert_eq!(source.exclude_schemas, None);
    }

    #[test]
    fn fold_keeps_prior_status_info_when_snapshot_has_none() {
        let prior_status = ResourceStatus {
            state: Some("active".to_string()),
            created_at: None,
            updated_at: None,
            last_error: None,
        };

        let config = desired();
        let mut prior = PriorView::from_config(&config);
        prior.status_info = Some(&prior_status);

        let state = fold_snapshot(snapshot(), prior).unwrap();
        assert_eq!(state.status_info, Some(prior_status));
    }

    #[test]
    fn fold_takes_reported_status_info() {
        let mut wire = snapshot();
        wire.status_info = Some(WireResourceStatus {
            state: Some("active".to_string()),
            created_at: None,
            updated_at: None,
            last_error: None,
        });

        let config = desired();
        let state = fold_snapshot(wire, PriorView::from_config(&config)).unwrap();
        assert_eq!(state.status_info.unwrap().state.as_deref(), Some("active"));
    }

    #[test]
    fn fold_treats_zero_retry_cap_as_unset() {
        let mut wire = snapshot();
        wire.max_retry_count = Some(0);

        let config = desired();
        let state = fold_snapshot(wire, PriorView::from_config(&config)).unwrap();
        assert_eq!(state.max_retry_count, None);
    }
}
