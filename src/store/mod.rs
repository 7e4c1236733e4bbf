//! Storage for salary structures and payroll records.
//!
//! Everything here is in memory and synchronous. Tables are cloneable
//! handles over shared state, so the workflow and the API can hold the same
//! store without extra wrapping.

mod memory;
mod period_locks;
mod repository;
mod salary_structures;

pub use memory::Table;
pub use period_locks::PeriodLocks;
pub use repository::PayrollRepository;
pub use salary_structures::SalaryStructureStore;
