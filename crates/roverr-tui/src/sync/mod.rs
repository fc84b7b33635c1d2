//! Client-side synchronization: state store, pollers, reconciliation and
//! selection. Nothing in here draws; the components read what it produces.

pub mod detail;
pub mod reconcile;
pub mod scheduler;
pub mod selection;
pub mod store;
