//! # Accounts Controller
//!
//! Owns the selected account, keyring classification, origin permissions,
//! the atomic-batch (delegation) capability check, and transaction signing.
//! Signing resolves the full record through the bus rather than taking raw
//! parameters, so the engine stays the single source of truth for what is
//! being signed.

use futures::future::BoxFuture;
use sha3::{Digest, Keccak256};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use wallet_bus::{
    ActionHandler, ActionName, ActionResponse, BusError, RestrictedMessenger, WalletAction,
};
use wallet_controllers::{Controller, ControllerInit, InitRequest, InitResult, RegistryError};
use wallet_types::{Address, ControllerName, KeyringType, TransactionRecord};

use crate::config::RuntimeConfig;

type PermittedAccountsFn = Arc<dyn Fn(&str) -> Vec<Address> + Send + Sync>;

pub struct AccountsController {
    messenger: RestrictedMessenger,
    selected: Address,
    keyrings: HashMap<Address, KeyringType>,
    /// Accounts with an active EIP-7702 delegation (atomic batch capable).
    delegated: HashSet<Address>,
    get_permitted_accounts: PermittedAccountsFn,
}

impl AccountsController {
    async fn handle(self: Arc<Self>, action: WalletAction) -> Result<ActionResponse, BusError> {
        match action {
            WalletAction::GetSelectedAccount => Ok(ActionResponse::Account(self.selected.clone())),
            WalletAction::GetPermittedAccounts { origin } => Ok(ActionResponse::Accounts(
                (self.get_permitted_accounts)(&origin),
            )),
            WalletAction::GetAccountKeyringType { address } => Ok(ActionResponse::KeyringType(
                self.keyrings.get(&address).copied().unwrap_or(KeyringType::Hd),
            )),
            WalletAction::IsAtomicBatchSupported { address, chain_id } => {
                let supported = self.delegated.contains(&address);
                debug!(%address, %chain_id, supported, "Atomic batch capability check");
                Ok(ActionResponse::Supported(supported))
            }
            WalletAction::SignTransaction { transaction_id } => {
                let record = self
                    .messenger
                    .call(WalletAction::GetTransactionById { transaction_id })
                    .await?
                    .into_transaction()?
                    .ok_or_else(|| {
                        BusError::handler(
                            ActionName::SignTransaction,
                            format!("unknown transaction {transaction_id}"),
                        )
                    })?;
                Ok(ActionResponse::SignedTransaction(sign_stub(&record)))
            }
            other => Err(BusError::handler(
                other.name(),
                "not handled by the accounts controller",
            )),
        }
    }
}

/// Deterministic signing stand-in: a real build would route to the keyring.
fn sign_stub(record: &TransactionRecord) -> String {
    let mut hasher = Keccak256::new();
    hasher.update(record.id.to_string().as_bytes());
    if let Ok(params) = serde_json::to_vec(&record.tx_params) {
        hasher.update(&params);
    }
    format!("0x02{}", hex::encode(hasher.finalize()))
}

impl Controller for AccountsController {
    fn name(&self) -> ControllerName {
        ControllerName::Accounts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct AccountsInit {
    pub config: RuntimeConfig,
    /// Accounts with an active delegation at startup.
    pub delegated: Vec<Address>,
}

impl ControllerInit for AccountsInit {
    fn name(&self) -> ControllerName {
        ControllerName::Accounts
    }

    fn init(&self, request: InitRequest<'_>) -> Result<InitResult, RegistryError> {
        let mut keyrings = HashMap::new();
        keyrings.insert(self.config.selected_account.clone(), KeyringType::Hd);

        let controller = Arc::new(AccountsController {
            messenger: request.messenger.clone(),
            selected: self.config.selected_account.clone(),
            keyrings,
            delegated: self.delegated.iter().cloned().collect(),
            get_permitted_accounts: Arc::clone(&request.context.get_permitted_accounts),
        });

        let handler: ActionHandler = {
            let controller = Arc::clone(&controller);
            Arc::new(
                move |action: WalletAction| -> BoxFuture<'static, Result<ActionResponse, BusError>> {
                    let controller = Arc::clone(&controller);
                    Box::pin(controller.handle(action))
                },
            )
        };
        for name in [
            ActionName::GetSelectedAccount,
            ActionName::GetPermittedAccounts,
            ActionName::GetAccountKeyringType,
            ActionName::IsAtomicBatchSupported,
            ActionName::SignTransaction,
        ] {
            request
                .messenger
                .register_action(name, Arc::clone(&handler))?;
        }

        Ok(InitResult::controller_only(controller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_types::{ChainId, NetworkClientId, TransactionType, TxParams};

    #[test]
    fn test_sign_stub_is_deterministic_per_record() {
        let record = TransactionRecord::new(
            ChainId::MAINNET,
            NetworkClientId::new("mainnet"),
            TxParams {
                from: Address::new("0xaa"),
                to: Some(Address::new("0xbb")),
                value: 7,
                data: "0x".into(),
                nonce: Some(1),
                max_fee_per_gas: Some(1),
                gas_price: None,
            },
            TransactionType::Transfer,
        );
        let first = sign_stub(&record);
        assert_eq!(first, sign_stub(&record));
        assert!(first.starts_with("0x02"));

        let mut other = record.clone();
        other.tx_params.value = 8;
        assert_ne!(first, sign_stub(&other));
    }
}
