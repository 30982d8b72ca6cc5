//! Structural checks over a flat employee list.
//!
//! All four checks are independent and pure. `validate` stops at the first
//! failing check, `violations` runs every check and reports all failures.

use std::collections::HashSet;

use itertools::Itertools;

use crate::domain::entities::EmployeeRecord;
use crate::domain::error::ValidationError;

/// Result of a single check.
pub type CheckResult = Result<(), ValidationError>;

/// Run all checks, returning the first failure.
pub fn validate(records: &[EmployeeRecord]) -> CheckResult {
    check_names(records)?;
    check_ids(records)?;
    check_single_root(records)?;
    check_manager_ids(records)
}

pub fn is_valid(records: &[EmployeeRecord]) -> bool {
    validate(records).is_ok()
}

/// Run every check and collect each failure.
pub fn violations(records: &[EmployeeRecord]) -> Vec<ValidationError> {
    [
        check_names(records),
        check_ids(records),
        check_single_root(records),
        check_manager_ids(records),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

/// Every name is non-empty after trimming.
pub fn check_names(records: &[EmployeeRecord]) -> CheckResult {
    match records.iter().find(|r| r.name.trim().is_empty()) {
        Some(r) => Err(ValidationError::EmptyName {
            employee_id: r.employee_id,
        }),
        None => Ok(()),
    }
}

/// Every id is positive and no id repeats.
pub fn check_ids(records: &[EmployeeRecord]) -> CheckResult {
    if let Some(r) = records.iter().find(|r| r.employee_id <= 0) {
        return Err(ValidationError::NonPositiveId {
            employee_id: r.employee_id,
        });
    }
    match records.iter().map(|r| r.employee_id).duplicates().next() {
        Some(employee_id) => Err(ValidationError::DuplicateId { employee_id }),
        None => Ok(()),
    }
}

/// Exactly one record has no manager.
pub fn check_single_root(records: &[EmployeeRecord]) -> CheckResult {
    let roots: Vec<i64> = records
        .iter()
        .filter(|r| r.is_root())
        .map(|r| r.employee_id)
        .collect();
    match roots.len() {
        1 => Ok(()),
        0 => Err(ValidationError::NoRoot),
        _ => Err(ValidationError::MultipleRoots {
            employee_ids: roots,
        }),
    }
}

/// No record manages itself and every manager id names an existing record.
pub fn check_manager_ids(records: &[EmployeeRecord]) -> CheckResult {
    if let Some(r) = records
        .iter()
        .find(|r| r.manager_id == Some(r.employee_id))
    {
        return Err(ValidationError::SelfManaged {
            employee_id: r.employee_id,
        });
    }

    let known: HashSet<i64> = records.iter().map(|r| r.employee_id).collect();
    let dangling = records.iter().find_map(|r| match r.manager_id {
        Some(manager_id) if !known.contains(&manager_id) => Some((r.employee_id, manager_id)),
        _ => None,
    });
    match dangling {
        Some((employee_id, manager_id)) => Err(ValidationError::DanglingManager {
            employee_id,
            manager_id,
        }),
        None => Ok(()),
    }
}
