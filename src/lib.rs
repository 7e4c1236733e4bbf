//! Payroll Engine
//!
//! This crate computes monthly payroll from effective-dated salary
//! structures and attendance facts, and drives each payroll period through
//! an HR/Admin approval workflow that ends in immutable payslips.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod sources;
pub mod store;
pub mod workflow;
