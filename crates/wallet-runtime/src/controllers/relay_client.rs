//! # Relay Controller
//!
//! Client for the off-chain smart-transaction relay. This build carries an
//! in-memory simulation of the relay endpoint: submissions are assigned ids
//! and hashes immediately, and the hash wait resolves from the stored
//! submission. The action surface matches the real endpoint, so swapping in
//! an HTTP client changes only this module.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use wallet_bus::{
    ActionHandler, ActionName, ActionResponse, BusError, RelayFeeQuote, RelaySubmission,
    WalletAction,
};
use wallet_controllers::{Controller, ControllerInit, InitRequest, InitResult, RegistryError};
use wallet_types::{ChainId, ControllerName, TxHash};

use super::derive_tx_hash;
use crate::config::RuntimeConfig;

/// Floor for simulated priority fees, wei.
const MIN_PRIORITY_FEE: u128 = 100_000_000;

pub struct RelayController {
    relay_url: String,
    send_bundle_chains: Vec<ChainId>,
    submissions: Mutex<HashMap<Uuid, Vec<TxHash>>>,
}

impl RelayController {
    fn record_submission(&self, hashes: Vec<TxHash>) -> RelaySubmission {
        let submission_id = Uuid::new_v4();
        self.submissions
            .lock()
            .insert(submission_id, hashes.clone());
        RelaySubmission {
            submission_id,
            tx_hash: hashes.first().cloned(),
            tx_hashes: hashes,
        }
    }

    fn handle(&self, action: WalletAction) -> Result<ActionResponse, BusError> {
        match action {
            WalletAction::IsSendBundleSupported { chain_id } => Ok(ActionResponse::Supported(
                self.send_bundle_chains.contains(&chain_id),
            )),
            WalletAction::GetRelayFeeQuote { tx_params, .. } => {
                let max_fee = tx_params.max_fee_per_gas.unwrap_or(MIN_PRIORITY_FEE * 15);
                Ok(ActionResponse::FeeQuote(RelayFeeQuote {
                    max_fee_per_gas: max_fee,
                    max_priority_fee_per_gas: (max_fee / 10).max(MIN_PRIORITY_FEE),
                }))
            }
            WalletAction::SubmitRelayTransaction {
                chain_id,
                signed_transaction,
                ..
            } => {
                let submission = self.record_submission(vec![derive_tx_hash(&signed_transaction)]);
                info!(
                    relay = %self.relay_url,
                    %chain_id,
                    submission_id = %submission.submission_id,
                    "Relay accepted transaction"
                );
                Ok(ActionResponse::RelaySubmission(submission))
            }
            WalletAction::SubmitRelayBundle {
                chain_id,
                signed_transactions,
                nonce,
            } => {
                let hashes = signed_transactions
                    .iter()
                    .map(|signed| derive_tx_hash(signed))
                    .collect();
                let submission = self.record_submission(hashes);
                info!(
                    relay = %self.relay_url,
                    %chain_id,
                    ?nonce,
                    items = submission.tx_hashes.len(),
                    submission_id = %submission.submission_id,
                    "Relay accepted bundle"
                );
                Ok(ActionResponse::RelaySubmission(submission))
            }
            WalletAction::WaitForRelayTransactionHash { submission_id } => {
                let hash = self
                    .submissions
                    .lock()
                    .get(&submission_id)
                    .and_then(|hashes| hashes.first().cloned());
                Ok(ActionResponse::TransactionHash(hash))
            }
            other => Err(BusError::handler(
                other.name(),
                "not handled by the relay controller",
            )),
        }
    }
}

impl Controller for RelayController {
    fn name(&self) -> ControllerName {
        ControllerName::Relay
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct RelayInit {
    pub config: RuntimeConfig,
}

impl ControllerInit for RelayInit {
    fn name(&self) -> ControllerName {
        ControllerName::Relay
    }

    fn init(&self, request: InitRequest<'_>) -> Result<InitResult, RegistryError> {
        let controller = Arc::new(RelayController {
            relay_url: self.config.relay_url.clone(),
            send_bundle_chains: self.config.send_bundle_chains.clone(),
            submissions: Mutex::new(HashMap::new()),
        });

        let handler: ActionHandler = {
            let controller = Arc::clone(&controller);
            Arc::new(
                move |action: WalletAction| -> BoxFuture<'static, Result<ActionResponse, BusError>> {
                    let controller = Arc::clone(&controller);
                    Box::pin(async move { controller.handle(action) })
                },
            )
        };
        for name in [
            ActionName::IsSendBundleSupported,
            ActionName::GetRelayFeeQuote,
            ActionName::SubmitRelayTransaction,
            ActionName::SubmitRelayBundle,
            ActionName::WaitForRelayTransactionHash,
        ] {
            request
                .messenger
                .register_action(name, Arc::clone(&handler))?;
        }

        Ok(InitResult::controller_only(controller))
    }
}
