//! Application state for the payroll API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::workflow::PayrollWorkflow;

/// Shared application state.
///
/// Holds the payroll workflow every handler drives.
#[derive(Clone)]
pub struct AppState {
    workflow: Arc<PayrollWorkflow>,
}

impl AppState {
    /// Creates application state around an existing workflow.
    pub fn new(workflow: PayrollWorkflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
        }
    }

    /// Creates application state backed by the roster in `config`.
    pub fn from_config(config: &ConfigLoader) -> Self {
        Self::new(PayrollWorkflow::from_config(config))
    }

    /// Returns a reference to the payroll workflow.
    pub fn workflow(&self) -> &PayrollWorkflow {
        &self.workflow
    }
}
