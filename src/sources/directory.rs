use parking_lot::RwLock;

use crate::error::EngineResult;
use crate::models::Employee;

use super::EmployeeDirectory;

/// An employee directory held in memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    employees: RwLock<Vec<Employee>>,
}

impl InMemoryDirectory {
    /// Creates a directory with the given employees.
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: RwLock::new(employees),
        }
    }

    /// Adds an employee, replacing any existing one with the same id.
    pub fn upsert(&self, employee: Employee) {
        let mut employees = self.employees.write();
        match employees.iter_mut().find(|e| e.id == employee.id) {
            Some(existing) => *existing = employee,
            None => employees.push(employee),
        }
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.employees.read().clone())
    }
}
