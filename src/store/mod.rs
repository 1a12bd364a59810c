//! Document storage for the lifecycle engine.
//!
//! The engine persists plain records into logical collections keyed by
//! identifier. This module ships the in-process implementation used by the
//! engine and its tests; the hosted document store used in production is an
//! external collaborator with the same collection shapes.

mod memory;

pub use memory::{DocumentStore, StoreState};
