//! # Controller Initializer Contract
//!
//! Every controller is constructed by a pure initializer taking an
//! [`InitRequest`] and returning an [`InitResult`]. The request carries a
//! capability-scoped messenger, a resolver callback for declared
//! dependencies, the controller's persisted state slice, and read-only
//! shared context. The result declares where the controller's state merges
//! into the global state trees and optionally exposes a curated external
//! API surface (never the raw instance).

use std::any::Any;
use std::sync::Arc;

use wallet_bus::RestrictedMessenger;
use wallet_types::{Address, ControllerName};

use crate::error::RegistryError;

/// A constructed, registered controller instance.
pub trait Controller: Send + Sync {
    /// The controller's name.
    fn name(&self) -> ControllerName;

    /// Serializable snapshot of this controller's state, merged into the
    /// global trees under the keys declared at init time. `None` for
    /// stateless controllers.
    fn state_snapshot(&self) -> Option<serde_json::Value> {
        None
    }

    /// Downcast support for wiring code that needs the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl std::fmt::Debug for dyn Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("name", &self.name())
            .finish()
    }
}

/// Resolver callback handed to initializers for dependency pulls.
pub trait Resolver {
    /// Resolve a declared dependency, initializing it first if needed.
    fn resolve(&self, name: ControllerName) -> Result<Arc<dyn Controller>, RegistryError>;
}

/// Read-only shared context available to every initializer.
#[derive(Clone)]
pub struct SharedContext {
    /// Fetch the current UI-visible flattened state.
    pub get_flat_state: Arc<dyn Fn() -> serde_json::Value + Send + Sync>,
    /// Fetch the accounts permitted for an external origin.
    pub get_permitted_accounts: Arc<dyn Fn(&str) -> Vec<Address> + Send + Sync>,
}

impl SharedContext {
    /// A context with empty state and no permitted accounts.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            get_flat_state: Arc::new(|| serde_json::Value::Null),
            get_permitted_accounts: Arc::new(|_| Vec::new()),
        }
    }
}

/// Everything an initializer receives.
pub struct InitRequest<'a> {
    /// Narrow handle used by the controller post-construction.
    pub messenger: RestrictedMessenger,
    /// Broader bootstrap-only handle, discarded after construction.
    pub init_messenger: RestrictedMessenger,
    /// Resolver for declared dependencies.
    pub registry: &'a dyn Resolver,
    /// This controller's persisted state slice (`Null` when absent).
    pub persisted_state: serde_json::Value,
    /// Read-only shared context.
    pub context: &'a SharedContext,
}

/// Everything an initializer returns.
pub struct InitResult {
    /// The constructed instance.
    pub controller: Arc<dyn Controller>,
    /// Curated external API surface, if any. Wiring code downcasts this to
    /// the controller's dedicated API type; the raw instance is never
    /// exposed this way.
    pub api: Option<Arc<dyn Any + Send + Sync>>,
    /// Key under which `state_snapshot` merges into the persisted tree,
    /// or `None` to opt out.
    pub persisted_state_key: Option<&'static str>,
    /// Key under which `state_snapshot` merges into the in-memory tree,
    /// or `None` to opt out.
    pub mem_state_key: Option<&'static str>,
}

impl InitResult {
    /// A result with no API surface and no state keys.
    #[must_use]
    pub fn controller_only(controller: Arc<dyn Controller>) -> Self {
        Self {
            controller,
            api: None,
            persisted_state_key: None,
            mem_state_key: None,
        }
    }
}

/// A controller factory registered with the registry.
///
/// `declared_dependencies` is checked against the actual `resolve` calls
/// made during `init`: pulling an undeclared dependency is a startup error.
pub trait ControllerInit: Send + Sync {
    /// Name of the controller this initializer constructs.
    fn name(&self) -> ControllerName;

    /// Controllers this initializer may resolve during construction.
    fn declared_dependencies(&self) -> &'static [ControllerName] {
        &[]
    }

    /// Key of this controller's slice in the global persisted tree, used to
    /// cut the slice handed to `init`. Usually matches the
    /// `persisted_state_key` returned in [`InitResult`].
    fn persisted_state_key(&self) -> Option<&'static str> {
        None
    }

    /// Construct the controller. Runs exactly once per process; the
    /// one-shot resolver cache guarantees any event subscriptions made here
    /// happen exactly once.
    fn init(&self, request: InitRequest<'_>) -> Result<InitResult, RegistryError>;
}
