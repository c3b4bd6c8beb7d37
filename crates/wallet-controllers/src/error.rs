//! # Registry Errors
//!
//! All of these are configuration errors: fatal at startup. Continuing with
//! a partially wired system would leave controllers silently missing their
//! dependencies, so initialization aborts on the first failure.

use thiserror::Error;

use wallet_bus::BusError;
use wallet_types::ControllerName;

/// Errors from controller registration and resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No initializer registered under this name.
    #[error("unknown controller {name}")]
    UnknownController { name: ControllerName },

    /// Two initializers registered under the same name.
    #[error("duplicate controller registration for {name}")]
    DuplicateController { name: ControllerName },

    /// `resolve` re-entered a controller already being initialized.
    #[error("circular controller dependency: {}", format_cycle(cycle))]
    CircularDependency { cycle: Vec<ControllerName> },

    /// A controller pulled a dependency missing from its declared list.
    #[error("{controller} resolved undeclared dependency {dependency}")]
    UndeclaredDependency {
        controller: ControllerName,
        dependency: ControllerName,
    },

    /// The initializer itself failed.
    #[error("initializer for {controller} failed: {message}")]
    Init {
        controller: ControllerName,
        message: String,
    },

    /// A bus operation performed during initialization failed.
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl RegistryError {
    /// Build an initializer failure for `controller`.
    #[must_use]
    pub fn init(controller: ControllerName, message: impl Into<String>) -> Self {
        Self::Init {
            controller,
            message: message.into(),
        }
    }
}

fn format_cycle(cycle: &[ControllerName]) -> String {
    cycle
        .iter()
        .map(ControllerName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
