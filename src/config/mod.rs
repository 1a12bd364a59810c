//! Policy configuration for the lifecycle engine.
//!
//! The calendar rule, the leave-type catalog, the clearance checklist and
//! the settlement parameters are operator policy, loaded from a YAML
//! directory at startup.

mod loader;
mod types;

pub use loader::PolicyLoader;
pub use types::{
    DepartmentsConfig, LeaveCategory, LeaveTypeConfig, LeaveTypesConfig, PolicyFile,
    SettlementPolicy,
};
