//! Configuration loading and management for the payroll engine.
//!
//! This module loads server and payroll settings plus the employee roster
//! from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("{} employees on the roster", config.roster().employees.len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendanceRecord, EngineConfig, PayrollConfig, RosterConfig, ServerConfig, WorkingDaysPolicy,
};
