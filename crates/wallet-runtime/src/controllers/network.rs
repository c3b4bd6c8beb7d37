//! # Network Controller
//!
//! Owns the selected network, the configured network clients, and the
//! default raw broadcast path used when the publish pipeline declines.

use futures::future::BoxFuture;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use wallet_bus::{ActionHandler, ActionName, ActionResponse, BusError, WalletAction};
use wallet_controllers::{
    Controller, ControllerInit, InitRequest, InitResult, RegistryError,
};
use wallet_types::{ControllerName, NetworkClientId, NetworkClientInfo};

use super::derive_tx_hash;
use crate::config::RuntimeConfig;

pub struct NetworkController {
    clients: HashMap<NetworkClientId, NetworkClientInfo>,
    selected: NetworkClientId,
}

impl NetworkController {
    fn selected_client(&self) -> Result<&NetworkClientInfo, BusError> {
        self.clients.get(&self.selected).ok_or_else(|| {
            BusError::handler(
                ActionName::GetSelectedNetworkClient,
                format!("selected network client {} is not configured", self.selected),
            )
        })
    }

    fn handle(&self, action: WalletAction) -> Result<ActionResponse, BusError> {
        match action {
            WalletAction::GetCurrentChainId => {
                Ok(ActionResponse::ChainId(self.selected_client()?.chain_id))
            }
            WalletAction::GetSelectedNetworkClient => Ok(ActionResponse::NetworkClient(Some(
                self.selected_client()?.clone(),
            ))),
            WalletAction::GetNetworkClientById { network_client_id } => Ok(
                ActionResponse::NetworkClient(self.clients.get(&network_client_id).cloned()),
            ),
            WalletAction::GetEip1559Compatibility { network_client_id } => {
                match self.clients.get(&network_client_id) {
                    Some(client) => Ok(ActionResponse::Supported(client.eip1559)),
                    None => Err(BusError::handler(
                        ActionName::GetEip1559Compatibility,
                        format!("unknown network client {network_client_id}"),
                    )),
                }
            }
            WalletAction::SubmitRawTransaction {
                network_client_id,
                signed_transaction,
            } => {
                // Stands in for the RPC provider's eth_sendRawTransaction.
                let hash = derive_tx_hash(&signed_transaction);
                info!(%network_client_id, %hash, "Broadcast raw transaction");
                Ok(ActionResponse::TransactionHash(Some(hash)))
            }
            other => Err(BusError::handler(
                other.name(),
                "not handled by the network controller",
            )),
        }
    }
}

impl Controller for NetworkController {
    fn name(&self) -> ControllerName {
        ControllerName::Network
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct NetworkInit {
    pub config: RuntimeConfig,
}

impl ControllerInit for NetworkInit {
    fn name(&self) -> ControllerName {
        ControllerName::Network
    }

    fn init(&self, request: InitRequest<'_>) -> Result<InitResult, RegistryError> {
        let mut clients = HashMap::new();
        clients.insert(
            self.config.network_client_id.clone(),
            NetworkClientInfo {
                id: self.config.network_client_id.clone(),
                chain_id: self.config.chain_id,
                eip1559: self.config.eip1559,
            },
        );
        let controller = Arc::new(NetworkController {
            clients,
            selected: self.config.network_client_id.clone(),
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
            ActionName::GetCurrentChainId,
            ActionName::GetNetworkClientById,
            ActionName::GetSelectedNetworkClient,
            ActionName::GetEip1559Compatibility,
            ActionName::SubmitRawTransaction,
        ] {
            request
                .messenger
                .register_action(name, Arc::clone(&handler))?;
        }

        Ok(InitResult::controller_only(controller))
    }
}
