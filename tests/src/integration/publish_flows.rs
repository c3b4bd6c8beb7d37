//! Single-transaction publish flows through the real strategy pipeline,
//! with the surrounding controllers scripted.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wallet_bus::ActionName;
    use wallet_publish::{
        NonceLockPool, PublishError, PublishPipeline, PublishRequest,
    };
    use wallet_types::{Address, TransactionType, TxHash};

    use crate::support::{
        eligible_record, random_address, smart_flags, World, WorldConfig,
    };

    fn pipeline(world: &World) -> PublishPipeline {
        PublishPipeline::new(world.pipeline_messenger(), Arc::new(NonceLockPool::new()))
    }

    fn request(from: &Address) -> PublishRequest {
        PublishRequest {
            transaction: eligible_record(from),
            signed_transaction: "0xsigned".to_string(),
        }
    }

    #[tokio::test]
    async fn test_no_capability_and_no_smart_declines_without_submissions() {
        let world = World::new(WorldConfig::default());
        let outcome = pipeline(&world)
            .publish(&request(&random_address()))
            .await
            .unwrap();

        assert!(!outcome.is_submitted());
        assert_eq!(world.calls.count(ActionName::SubmitRelayBundle), 0);
        assert_eq!(world.calls.count(ActionName::SubmitRelayTransaction), 0);
    }

    #[tokio::test]
    async fn test_delegated_wins_and_smart_is_never_consulted() {
        let world = World::new(WorldConfig {
            atomic_batch: true,
            send_bundle: true,
            ..Default::default()
        });
        let outcome = pipeline(&world)
            .publish(&request(&random_address()))
            .await
            .unwrap();

        assert!(outcome.is_submitted());
        assert_eq!(world.calls.count(ActionName::SubmitRelayBundle), 1);
        // The smart strategy starts with a flag fetch; it never ran.
        assert_eq!(world.calls.count(ActionName::GetFeatureFlags), 0);
        // The reserved nonce was read under the lock and forwarded.
        assert_eq!(*world.captured.bundle_nonce.lock(), Some(Some(7)));
        assert_eq!(world.calls.count(ActionName::GetNextNonce), 1);
    }

    #[tokio::test]
    async fn test_send_bundle_probe_fails_closed() {
        // Atomic batching is supported but the probe is scripted off, so the
        // delegated strategy declines and the (disabled) smart path follows.
        let world = World::new(WorldConfig {
            atomic_batch: true,
            send_bundle: false,
            ..Default::default()
        });
        let outcome = pipeline(&world)
            .publish(&request(&random_address()))
            .await
            .unwrap();

        assert!(!outcome.is_submitted());
        assert_eq!(world.calls.count(ActionName::SubmitRelayBundle), 0);
    }

    #[tokio::test]
    async fn test_gas_fee_token_without_bundle_support_skips_smart_path() {
        let world = World::new(WorldConfig {
            flags: smart_flags(),
            send_bundle: false,
            ..Default::default()
        });
        let mut request = request(&random_address());
        request.transaction.selected_gas_fee_token = Some(random_address());

        let outcome = pipeline(&world).publish(&request).await.unwrap();
        assert!(!outcome.is_submitted());
        assert_eq!(world.calls.count(ActionName::SubmitRelayTransaction), 0);
    }

    #[tokio::test]
    async fn test_smart_path_waits_for_canonical_hash() {
        let world = World::new(WorldConfig {
            flags: smart_flags(),
            wait_hash: Some(TxHash::new("0xcanonical")),
            ..Default::default()
        });
        let outcome = pipeline(&world)
            .publish(&request(&random_address()))
            .await
            .unwrap();

        assert_eq!(outcome.transaction_hash, Some(TxHash::new("0xcanonical")));
        assert!(outcome.submission_id.is_some());
        assert_eq!(world.calls.count(ActionName::WaitForRelayTransactionHash), 1);
    }

    #[tokio::test]
    async fn test_return_hash_asap_skips_the_wait() {
        let mut flags = smart_flags();
        flags.return_tx_hash_asap = true;
        let world = World::new(WorldConfig {
            flags,
            submit_tx_hash: Some(TxHash::new("0xearly")),
            ..Default::default()
        });
        let outcome = pipeline(&world)
            .publish(&request(&random_address()))
            .await
            .unwrap();

        assert_eq!(outcome.transaction_hash, Some(TxHash::new("0xearly")));
        assert_eq!(world.calls.count(ActionName::WaitForRelayTransactionHash), 0);
    }

    #[tokio::test]
    async fn test_fee_quote_failure_is_advisory() {
        let world = World::new(WorldConfig {
            flags: smart_flags(),
            fee_quote_fails: true,
            ..Default::default()
        });
        let outcome = pipeline(&world)
            .publish(&request(&random_address()))
            .await
            .unwrap();

        // Declined, not errored: the engine still broadcasts by itself.
        assert!(!outcome.is_submitted());
        assert_eq!(world.calls.count(ActionName::SubmitRelayTransaction), 0);
    }

    #[tokio::test]
    async fn test_missing_canonical_hash_is_an_error() {
        let world = World::new(WorldConfig {
            flags: smart_flags(),
            wait_hash: None,
            ..Default::default()
        });
        let err = pipeline(&world)
            .publish(&request(&random_address()))
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::MissingTransactionHash { .. }));
    }

    #[tokio::test]
    async fn test_unsupported_types_never_reach_the_relay() {
        let world = World::new(WorldConfig {
            flags: smart_flags(),
            ..Default::default()
        });
        for tx_type in [
            TransactionType::SwapAndSend,
            TransactionType::SwapApproval,
            TransactionType::BridgeApproval,
        ] {
            let mut request = request(&random_address());
            request.transaction.tx_type = tx_type;
            let outcome = pipeline(&world).publish(&request).await.unwrap();
            assert!(!outcome.is_submitted(), "{tx_type:?} must not be relayed");
        }
        assert_eq!(world.calls.count(ActionName::SubmitRelayTransaction), 0);
    }

    #[tokio::test]
    async fn test_legacy_envelope_never_reaches_the_relay() {
        let world = World::new(WorldConfig {
            flags: smart_flags(),
            ..Default::default()
        });
        let mut request = request(&random_address());
        request.transaction.tx_params.max_fee_per_gas = None;
        request.transaction.tx_params.gas_price = Some(1);

        let outcome = pipeline(&world).publish(&request).await.unwrap();
        assert!(!outcome.is_submitted());
        assert_eq!(world.calls.count(ActionName::GetFeatureFlags), 0);
    }
}
