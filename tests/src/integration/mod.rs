//! # Integration Tests
//!
//! Cross-controller flows exercising the bus, the registry, the publish
//! pipeline, and the full runtime together.

pub mod batch_flows;
pub mod bus_isolation;
pub mod publish_flows;
pub mod registry_wiring;
pub mod runtime_flows;
