//! Approver resolution.
//!
//! Resolving "who may approve" is an explicit injected dependency rather
//! than an ambient lookup, so submissions can be tested against a
//! deterministic directory. The resolved set is captured once per request;
//! later role changes never affect requests already in flight.

use std::sync::Arc;

use crate::error::{EngineError, EngineResult};
use crate::store::DocumentStore;

/// Source of the identifiers currently holding an approver role.
pub trait ApproverDirectory: Send + Sync {
    /// Returns the ids of every user in the organization who currently
    /// holds an approver role. May be empty; callers treat an empty set as
    /// a hard failure via [`resolve_approvers`].
    fn approver_ids(&self, organization_id: &str) -> Vec<String>;
}

/// Resolves the approver snapshot for a new submission.
///
/// An empty directory result blocks the submission entirely with
/// [`EngineError::NoApproversAvailable`]: a request with no resolvable
/// approver must never be created.
pub fn resolve_approvers(
    directory: &dyn ApproverDirectory,
    organization_id: &str,
) -> EngineResult<Vec<String>> {
    let approvers = directory.approver_ids(organization_id);
    if approvers.is_empty() {
        return Err(EngineError::NoApproversAvailable {
            organization_id: organization_id.to_string(),
        });
    }
    Ok(approvers)
}

/// Directory backed by the employee collection of a [`DocumentStore`].
///
/// Resolves every unblocked employee of the organization whose role is
/// authorized to approve. Results are sorted by id so snapshots are
/// deterministic.
#[derive(Clone)]
pub struct StoreDirectory {
    store: Arc<DocumentStore>,
}

impl StoreDirectory {
    /// Creates a directory over the given store.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

impl ApproverDirectory for StoreDirectory {
    fn approver_ids(&self, organization_id: &str) -> Vec<String> {
        self.store.read(|state| {
            let mut ids: Vec<String> = state
                .employees
                .values()
                .filter(|e| e.organization_id == organization_id && e.can_approve())
                .map(|e| e.id.clone())
                .collect();
            ids.sort();
            ids
        })
    }
}

/// A directory returning a fixed set of approvers, for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct FixedDirectory {
    approvers: Vec<String>,
}

impl FixedDirectory {
    /// Creates a directory that always resolves to the given ids.
    pub fn new<I, S>(approvers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            approvers: approvers.into_iter().map(Into::into).collect(),
        }
    }
}

impl ApproverDirectory for FixedDirectory {
    fn approver_ids(&self, _organization_id: &str) -> Vec<String> {
        self.approvers.clone()
    }
}
