//! # Controller Registry / Lazy Resolver
//!
//! Resolves controllers on first use. `resolve` runs the controller's
//! initializer, which may itself resolve dependencies; the resolution stack
//! detects cycles, and every pull is checked against the puller's declared
//! dependency list. Instances are cached: each initializer runs exactly
//! once per process.

use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use wallet_bus::Messenger;
use wallet_types::ControllerName;

use crate::capabilities::{controller_grant, init_grant};
use crate::error::RegistryError;
use crate::init::{Controller, ControllerInit, InitRequest, Resolver, SharedContext};

/// A cached, fully initialized controller.
struct Entry {
    controller: Arc<dyn Controller>,
    api: Option<Arc<dyn Any + Send + Sync>>,
    persisted_state_key: Option<&'static str>,
    mem_state_key: Option<&'static str>,
}

/// Mutable resolution state, guarded as one unit.
#[derive(Default)]
struct ResolutionState {
    instances: HashMap<ControllerName, Entry>,
    /// Controllers whose initializers are currently executing.
    stack: Vec<ControllerName>,
}

/// The central controller registry.
///
/// Built once at process start; mutated only during the one-time
/// initialization pass. Resolution is expected to happen on the
/// single-threaded startup path.
pub struct ControllerRegistry {
    messenger: Arc<Messenger>,
    context: SharedContext,
    /// Global persisted state tree, sliced per controller at init time.
    persisted_state: serde_json::Value,
    inits: HashMap<ControllerName, Box<dyn ControllerInit>>,
    /// Registration order, used by `init_all`.
    order: Vec<ControllerName>,
    state: Mutex<ResolutionState>,
}

impl ControllerRegistry {
    /// Create an empty registry over `messenger`.
    #[must_use]
    pub fn new(
        messenger: Arc<Messenger>,
        context: SharedContext,
        persisted_state: serde_json::Value,
    ) -> Self {
        Self {
            messenger,
            context,
            persisted_state,
            inits: HashMap::new(),
            order: Vec::new(),
            state: Mutex::new(ResolutionState::default()),
        }
    }

    /// Register an initializer.
    ///
    /// # Errors
    ///
    /// `RegistryError::DuplicateController` if the name is already taken.
    pub fn register(&mut self, init: Box<dyn ControllerInit>) -> Result<(), RegistryError> {
        let name = init.name();
        if self.inits.contains_key(&name) {
            return Err(RegistryError::DuplicateController { name });
        }
        info!(controller = %name, "Registering controller initializer");
        self.inits.insert(name, init);
        self.order.push(name);
        Ok(())
    }

    /// Initialize every registered controller, in registration order.
    ///
    /// Lazy pulls may initialize dependencies out of this order; that is
    /// fine, each initializer still runs exactly once.
    pub fn init_all(&self) -> Result<(), RegistryError> {
        for name in &self.order {
            info!(controller = %name, "Initializing controller");
            self.resolve(*name)?;
        }
        info!(count = self.order.len(), "All controllers initialized");
        Ok(())
    }

    /// Get an already initialized controller, if any.
    #[must_use]
    pub fn controller(&self, name: ControllerName) -> Option<Arc<dyn Controller>> {
        self.state
            .lock()
            .instances
            .get(&name)
            .map(|entry| Arc::clone(&entry.controller))
    }

    /// Get a controller's curated external API surface, if it exposed one.
    #[must_use]
    pub fn api(&self, name: ControllerName) -> Option<Arc<dyn Any + Send + Sync>> {
        self.state
            .lock()
            .instances
            .get(&name)
            .and_then(|entry| entry.api.as_ref().map(Arc::clone))
    }

    /// Merge controller snapshots into the global persisted state tree.
    #[must_use]
    pub fn persisted_state_snapshot(&self) -> serde_json::Value {
        self.snapshot_by(|entry| entry.persisted_state_key)
    }

    /// Merge controller snapshots into the global in-memory state tree.
    #[must_use]
    pub fn mem_state_snapshot(&self) -> serde_json::Value {
        self.snapshot_by(|entry| entry.mem_state_key)
    }

    fn snapshot_by(&self, key: impl Fn(&Entry) -> Option<&'static str>) -> serde_json::Value {
        let state = self.state.lock();
        let mut tree = serde_json::Map::new();
        for entry in state.instances.values() {
            let Some(key) = key(entry) else { continue };
            if let Some(snapshot) = entry.controller.state_snapshot() {
                tree.insert(key.to_string(), snapshot);
            }
        }
        serde_json::Value::Object(tree)
    }

    fn resolve_inner(&self, name: ControllerName) -> Result<Arc<dyn Controller>, RegistryError> {
        {
            let state = self.state.lock();

            // Declared-dependency audit: a pull made while initializing a
            // parent must appear in the parent's declared list, even when
            // the target is already cached.
            if let Some(parent) = state.stack.last() {
                let declared = self
                    .inits
                    .get(parent)
                    .map_or(&[] as &[ControllerName], |init| {
                        init.declared_dependencies()
                    });
                if !declared.contains(&name) {
                    return Err(RegistryError::UndeclaredDependency {
                        controller: *parent,
                        dependency: name,
                    });
                }
            }

            if let Some(entry) = state.instances.get(&name) {
                return Ok(Arc::clone(&entry.controller));
            }

            if let Some(position) = state.stack.iter().position(|on_stack| *on_stack == name) {
                let mut cycle: Vec<ControllerName> = state.stack[position..].to_vec();
                cycle.push(name);
                return Err(RegistryError::CircularDependency { cycle });
            }
        }

        let init = self
            .inits
            .get(&name)
            .ok_or(RegistryError::UnknownController { name })?;

        debug!(controller = %name, "Running controller initializer");
        self.state.lock().stack.push(name);

        // The lock is released while the initializer runs so it can
        // re-enter `resolve` for its declared dependencies.
        let result = init.init(InitRequest {
            messenger: self.messenger.restricted(controller_grant(name)),
            init_messenger: self.messenger.restricted(init_grant(name)),
            registry: self,
            persisted_state: self.persisted_slice(init.as_ref()),
            context: &self.context,
        });

        let mut state = self.state.lock();
        state.stack.pop();

        let init_result = result?;
        let controller = Arc::clone(&init_result.controller);
        state.instances.insert(
            name,
            Entry {
                controller: init_result.controller,
                api: init_result.api,
                persisted_state_key: init_result.persisted_state_key,
                mem_state_key: init_result.mem_state_key,
            },
        );
        debug!(controller = %name, "Controller initialized");
        Ok(controller)
    }

    fn persisted_slice(&self, init: &dyn ControllerInit) -> serde_json::Value {
        init.persisted_state_key()
            .and_then(|key| self.persisted_state.get(key).cloned())
            .unwrap_or(serde_json::Value::Null)
    }
}

impl Resolver for ControllerRegistry {
    fn resolve(&self, name: ControllerName) -> Result<Arc<dyn Controller>, RegistryError> {
        self.resolve_inner(name)
    }
}

impl ControllerRegistry {
    /// Resolve a controller by name, initializing it (and its declared
    /// dependencies) on first use.
    ///
    /// # Errors
    ///
    /// `CircularDependency` when the controller is already on the
    /// resolution stack; `UndeclaredDependency` when pulled from an
    /// initializer that did not declare it; `UnknownController` when no
    /// initializer was registered.
    pub fn resolve(&self, name: ControllerName) -> Result<Arc<dyn Controller>, RegistryError> {
        self.resolve_inner(name)
    }
}
