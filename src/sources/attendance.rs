use parking_lot::RwLock;

use crate::config::{AttendanceRecord, WorkingDaysPolicy};
use crate::error::EngineResult;
use crate::models::{AttendanceFacts, PeriodKey};

use super::AttendanceSource;

/// An attendance source held in memory.
///
/// Lookup picks the most specific matching record: one pinned to the exact
/// month and year beats one pinned to only one of them, which beats an
/// employee-wide record. Later records win ties. Employees without any
/// record get full attendance for the policy's working days.
#[derive(Debug)]
pub struct InMemoryAttendance {
    policy: WorkingDaysPolicy,
    records: RwLock<Vec<AttendanceRecord>>,
}

impl InMemoryAttendance {
    /// Creates a source with the given default policy and records.
    pub fn new(policy: WorkingDaysPolicy, records: Vec<AttendanceRecord>) -> Self {
        Self {
            policy,
            records: RwLock::new(records),
        }
    }

    /// Records facts for an employee, pinned to one period.
    pub fn record(&self, employee_id: impl Into<String>, period: PeriodKey, facts: AttendanceFacts) {
        self.records.write().push(AttendanceRecord {
            employee_id: employee_id.into(),
            month: Some(period.month),
            year: Some(period.year),
            facts,
        });
    }
}

fn specificity(record: &AttendanceRecord, period: PeriodKey) -> Option<u8> {
    let month = match record.month {
        Some(m) if m != period.month => return None,
        Some(_) => 1,
        None => 0,
    };
    let year = match record.year {
        Some(y) if y != period.year => return None,
        Some(_) => 1,
        None => 0,
    };
    Some(month + year)
}

impl AttendanceSource for InMemoryAttendance {
    fn facts(&self, employee_id: &str, period: PeriodKey) -> EngineResult<AttendanceFacts> {
        let records = self.records.read();
        let best = records
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .filter_map(|r| specificity(r, period).map(|score| (score, r)))
            .max_by_key(|(score, _)| *score);

        Ok(match best {
            Some((_, record)) => record.facts.clone(),
            None => AttendanceFacts::full(self.policy.working_days(period)),
        })
    }
}
