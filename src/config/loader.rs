//! Configuration loading functionality.
//!
//! This module provides the [`PolicyLoader`] type for loading lifecycle
//! policy from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::Weekday;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::types::{DepartmentsConfig, LeaveTypeConfig, LeaveTypesConfig, PolicyFile};

/// Loads and provides access to lifecycle policy.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/hr/
/// ├── policy.yaml       # weekly off, notice, settlement parameters
/// ├── leave_types.yaml  # leave-type catalog
/// └── departments.yaml  # clearance checklist departments
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_engine::config::PolicyLoader;
///
/// let policy = PolicyLoader::load("./config/hr").unwrap();
/// let leave_type = policy.leave_type("PL").unwrap();
/// println!("{} is {:?}", leave_type.name, leave_type.category);
/// ```
#[derive(Debug, Clone)]
pub struct PolicyLoader {
    policy: PolicyFile,
    leave_types: HashMap<String, LeaveTypeConfig>,
    clearance_departments: Vec<String>,
}

impl PolicyLoader {
    /// Loads policy from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, declares a duplicate leave-type code, or lists no clearance
    /// departments.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;
        let leave_types_file = Self::load_yaml::<LeaveTypesConfig>(&path.join("leave_types.yaml"))?;
        let departments = Self::load_yaml::<DepartmentsConfig>(&path.join("departments.yaml"))?;

        let mut leave_types = HashMap::new();
        for leave_type in leave_types_file.leave_types {
            if leave_types
                .insert(leave_type.code.clone(), leave_type)
                .is_some()
            {
                return Err(EngineError::ConfigParseError {
                    path: path.join("leave_types.yaml").display().to_string(),
                    message: "duplicate leave-type code".to_string(),
                });
            }
        }

        if departments.clearance_departments.is_empty() {
            return Err(EngineError::ConfigParseError {
                path: path.join("departments.yaml").display().to_string(),
                message: "clearance_departments must not be empty".to_string(),
            });
        }

        Ok(Self {
            policy,
            leave_types,
            clearance_departments: departments.clearance_departments,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Builds a loader directly from parsed parts; used by tests.
    pub fn from_parts(
        policy: PolicyFile,
        leave_types: Vec<LeaveTypeConfig>,
        clearance_departments: Vec<String>,
    ) -> Self {
        Self {
            policy,
            leave_types: leave_types
                .into_iter()
                .map(|t| (t.code.clone(), t))
                .collect(),
            clearance_departments,
        }
    }

    /// The fixed weekly off day.
    pub fn weekly_off(&self) -> Weekday {
        self.policy.weekly_off
    }

    /// Minimum calendar days of notice for a voluntary resignation.
    pub fn minimum_notice_days(&self) -> u32 {
        self.policy.minimum_notice_days
    }

    /// Divisor applied to basic salary to price one encashed leave day.
    pub fn encashment_divisor(&self) -> u32 {
        self.policy.settlement.encashment_divisor
    }

    /// Looks up a leave type by code.
    pub fn leave_type(&self, code: &str) -> EngineResult<&LeaveTypeConfig> {
        self.leave_types
            .get(code)
            .ok_or_else(|| EngineError::LeaveTypeUnknown {
                code: code.to_string(),
            })
    }

    /// The full leave-type catalog.
    pub fn leave_types(&self) -> &HashMap<String, LeaveTypeConfig> {
        &self.leave_types
    }

    /// The departments that must each sign off a clearance.
    pub fn clearance_departments(&self) -> &[String] {
        &self.clearance_departments
    }

    /// Annual entitlements per paid type, used to seed a fresh balance
    /// document.
    pub fn default_balances(&self) -> HashMap<String, Decimal> {
        self.leave_types
            .values()
            .filter(|t| t.category.is_paid())
            .map(|t| (t.code.clone(), t.annual_entitlement))
            .collect()
    }
}
