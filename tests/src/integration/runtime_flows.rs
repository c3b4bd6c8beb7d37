//! End-to-end flows through the fully assembled runtime: real controllers,
//! real pipeline, real event relay.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wallet_runtime::{RuntimeConfig, WalletRuntime};
    use wallet_types::{ChainId, TransactionStatus, TransactionType};

    use crate::support::{random_address, transfer_params};

    fn smart_config() -> RuntimeConfig {
        RuntimeConfig {
            smart_transactions_enabled: true,
            smart_transaction_chains: vec![ChainId::MAINNET],
            send_bundle_chains: vec![ChainId::MAINNET],
            ..Default::default()
        }
    }

    async fn started(config: RuntimeConfig) -> WalletRuntime {
        let runtime = WalletRuntime::new(config, serde_json::Value::Null).unwrap();
        runtime.start().await.unwrap();
        runtime
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_smart_transaction_submission_end_to_end() {
        let runtime = started(smart_config()).await;
        let transactions = runtime.transactions().unwrap();

        let record = transactions
            .add_transaction(
                transfer_params(&random_address()),
                TransactionType::Transfer,
                None,
            )
            .await
            .unwrap();
        transactions.approve(record.id).unwrap();
        let hash = transactions.submit(record.id).await.unwrap();

        let submitted = transactions.get(record.id).unwrap();
        assert_eq!(submitted.status, TransactionStatus::Submitted);
        assert_eq!(submitted.hash, Some(hash));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_batch_decline_broadcasts_each_item() {
        // Smart transactions stay off, so the batch declines and every item
        // goes through the default broadcast individually.
        let runtime = started(RuntimeConfig::default()).await;
        let transactions = runtime.transactions().unwrap();

        let from = random_address();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let record = transactions
                .add_transaction(transfer_params(&from), TransactionType::Batch, None)
                .await
                .unwrap();
            transactions.approve(record.id).unwrap();
            ids.push(record.id);
        }

        let hashes = transactions.submit_batch(&ids).await.unwrap();
        assert_eq!(hashes.len(), 3);
        for id in ids {
            assert_eq!(
                transactions.get(id).unwrap().status,
                TransactionStatus::Submitted
            );
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failed_submission_marks_record_and_forwards_metrics() {
        let runtime = started(RuntimeConfig::default()).await;
        let transactions = runtime.transactions().unwrap();

        let record = transactions
            .add_transaction(
                transfer_params(&random_address()),
                TransactionType::Transfer,
                None,
            )
            .await
            .unwrap();
        transactions.approve(record.id).unwrap();
        transactions.fail(record.id, "user cancelled on device").unwrap();

        let failed = transactions.get(record.id).unwrap();
        assert_eq!(failed.status, TransactionStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("user cancelled on device"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        let tracked = runtime.metrics().unwrap().tracked();
        let finalized = tracked
            .iter()
            .find(|payload| payload.event == "Transaction Finalized")
            .expect("failure must be forwarded");
        assert_eq!(finalized.properties["error"], "user cancelled on device");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_full_lifecycle_event_stream() {
        let runtime = started(smart_config()).await;
        let transactions = runtime.transactions().unwrap();

        let record = transactions
            .add_transaction(
                transfer_params(&random_address()),
                TransactionType::Swap,
                None,
            )
            .await
            .unwrap();
        transactions.approve(record.id).unwrap();
        transactions.link_swap(record.id).unwrap();
        transactions.submit(record.id).await.unwrap();
        transactions.confirm(record.id).unwrap();
        transactions.post_balance_update(record.id, 42_000).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        let events: Vec<String> = runtime
            .metrics()
            .unwrap()
            .tracked()
            .into_iter()
            .map(|payload| payload.event)
            .collect();
        for expected in [
            "Transaction Added",
            "Transaction Approved",
            "Swap Started",
            "Transaction Submitted",
            "Transaction Finalized",
            "Post Transaction Balance Updated",
        ] {
            assert!(events.contains(&expected.to_string()), "missing {expected}");
        }
        runtime.shutdown();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_is_idempotent() {
        let runtime = started(RuntimeConfig::default()).await;
        runtime.shutdown();
        runtime.shutdown();
    }
}
