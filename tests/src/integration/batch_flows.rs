//! Atomic batch publish: representative resolution, eligibility, and the
//! all-or-nothing relay submission.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wallet_bus::ActionName;
    use wallet_publish::{BatchItem, NonceLockPool, PublishError, PublishPipeline};
    use wallet_types::TransactionId;

    use crate::support::{eligible_record, random_address, smart_flags, World, WorldConfig};

    fn pipeline(world: &World) -> PublishPipeline {
        PublishPipeline::new(world.pipeline_messenger(), Arc::new(NonceLockPool::new()))
    }

    fn items(ids: &[TransactionId]) -> Vec<BatchItem> {
        ids.iter()
            .enumerate()
            .map(|(index, &transaction_id)| BatchItem {
                transaction_id,
                signed_transaction: format!("0xsigned{index:02}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_eligibility_resolves_from_the_last_item() {
        let representative = eligible_record(&random_address());
        let mut config = WorldConfig {
            flags: smart_flags(),
            ..Default::default()
        };
        // Only the last record is resolvable; the first two are never
        // looked up.
        config.records.insert(representative.id, representative.clone());
        let world = World::new(config);

        let ids = [
            TransactionId::generate(),
            TransactionId::generate(),
            representative.id,
        ];
        let submission = pipeline(&world)
            .publish_batch(&items(&ids))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(submission.transaction_hashes.len(), 3);
        assert_eq!(*world.captured.bundle_size.lock(), Some(3));
        assert_eq!(*world.captured.looked_up.lock(), vec![representative.id]);
    }

    #[tokio::test]
    async fn test_unknown_representative_fails_fast() {
        let world = World::new(WorldConfig {
            flags: smart_flags(),
            ..Default::default()
        });
        let missing = TransactionId::generate();
        let ids = [TransactionId::generate(), missing];

        let err = pipeline(&world)
            .publish_batch(&items(&ids))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PublishError::UnknownBatchTransaction { transaction_id } if transaction_id == missing
        ));
        // Fail fast, never a silent fallback submission.
        assert_eq!(world.calls.count(ActionName::SubmitRelayBundle), 0);
    }

    #[tokio::test]
    async fn test_ineligible_representative_declines_whole_batch() {
        let mut representative = eligible_record(&random_address());
        representative.tx_params.max_fee_per_gas = None;
        representative.tx_params.gas_price = Some(1);
        let mut config = WorldConfig {
            flags: smart_flags(),
            ..Default::default()
        };
        config.records.insert(representative.id, representative.clone());
        let world = World::new(config);

        let declined = pipeline(&world)
            .publish_batch(&items(&[representative.id]))
            .await
            .unwrap();
        assert!(declined.is_none());
        assert_eq!(world.calls.count(ActionName::SubmitRelayBundle), 0);
    }

    #[tokio::test]
    async fn test_relay_without_hashes_reports_empty_list() {
        let representative = eligible_record(&random_address());
        let mut config = WorldConfig {
            flags: smart_flags(),
            bundle_hash: None,
            ..Default::default()
        };
        config.records.insert(representative.id, representative.clone());
        let world = World::new(config);

        let submission = pipeline(&world)
            .publish_batch(&items(&[representative.id]))
            .await
            .unwrap()
            .unwrap();
        assert!(submission.transaction_hashes.is_empty());
    }
}
