//! Core data models for the Employee Lifecycle Engine.
//!
//! This module contains all the domain documents persisted and produced by
//! the engine.

mod attendance;
mod clearance;
mod employee;
mod holiday;
mod leave;
mod resignation;
mod settlement;

pub use attendance::{AttendanceEditRequest, AttendanceRecord, GeoPoint};
pub use clearance::{Clearance, ClearanceItem, ClearanceItemStatus, ClearanceStatus};
pub use employee::{Employee, EmployeeRole, Gender};
pub use holiday::Holiday;
pub use leave::{LeaveBalance, LeaveRequest};
pub use resignation::{Resignation, ResignationStatus, ResignationType};
pub use settlement::{Settlement, SettlementStatus};
