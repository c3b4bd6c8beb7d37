//! # Telemetry Payloads
//!
//! Pure functions from lifecycle event + shared context to the structured
//! payload sent to the metrics sink. Kept free of bus access so every
//! mapping is testable without wiring.

use serde_json::json;

use wallet_bus::{MetricsPayload, WalletEvent};
use wallet_types::{KeyringType, TransactionRecord};

/// Context shared by every forwarded event, built once when the relay is
/// wired. All fields are best-effort; forwarding proceeds without them.
#[derive(Debug, Clone, Default)]
pub struct MetricsContext {
    /// Keyring kind backing the selected account at wire time.
    pub account_keyring: Option<KeyringType>,
}

const CATEGORY: &str = "Transactions";

/// Build the telemetry payload for one lifecycle event, or `None` for
/// events that are not forwarded.
#[must_use]
pub fn payload_for(event: &WalletEvent, context: &MetricsContext) -> Option<MetricsPayload> {
    let payload = match event {
        WalletEvent::UnapprovedTransactionAdded(tx) => {
            base_payload("Transaction Added", tx, context)
        }
        WalletEvent::TransactionApproved(tx) => base_payload("Transaction Approved", tx, context),
        WalletEvent::TransactionSubmitted(tx) => base_payload("Transaction Submitted", tx, context),
        WalletEvent::TransactionConfirmed(tx)
        | WalletEvent::TransactionDropped(tx) => base_payload("Transaction Finalized", tx, context),
        WalletEvent::TransactionFailed { transaction, error } => {
            let mut payload = base_payload("Transaction Finalized", transaction, context);
            merge(&mut payload, "error", json!(error));
            payload
        }
        WalletEvent::TransactionRejected(tx) => base_payload("Transaction Rejected", tx, context),
        WalletEvent::PostTransactionBalanceUpdated {
            transaction,
            balance,
        } => {
            let mut payload = base_payload("Post Transaction Balance Updated", transaction, context);
            merge(&mut payload, "balance", json!(balance.to_string()));
            payload
        }
        WalletEvent::TransactionNewSwap(tx) => base_payload("Swap Started", tx, context),
        WalletEvent::NetworkDidChange { .. } => return None,
    };
    Some(payload)
}

fn base_payload(
    event: &str,
    transaction: &TransactionRecord,
    context: &MetricsContext,
) -> MetricsPayload {
    MetricsPayload {
        event: event.to_string(),
        category: CATEGORY.to_string(),
        properties: json!({
            "transaction_id": transaction.id.to_string(),
            "chain_id": transaction.chain_id.as_hex(),
            "status": transaction.status,
            "transaction_type": transaction.tx_type,
            "account_keyring": context.account_keyring.map(|k| k.as_str()),
        }),
    }
}

fn merge(payload: &mut MetricsPayload, key: &str, value: serde_json::Value) {
    if let serde_json::Value::Object(properties) = &mut payload.properties {
        properties.insert(key.to_string(), value);
    }
}
