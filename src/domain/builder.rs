//! Hierarchy builder turning manager references into a nested tree.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, trace};

use crate::domain::entities::{EmployeeRecord, Hierarchy, HierarchyNode};
use crate::domain::error::{DomainError, DomainResult, ValidationError};

/// Constructs a [`Hierarchy`] from a validated flat employee list.
///
/// Callers are expected to run the validator first. The builder only
/// re-derives the root and rejects duplicate ids; everything else it
/// reports through the post-condition checks.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    subordinate_cache: HashMap<i64, Vec<EmployeeRecord>>,
    visited_ids: HashSet<i64>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the hierarchy rooted at the only employee without a manager.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(&mut self, records: &[EmployeeRecord]) -> DomainResult<Hierarchy> {
        // Reset state for a fresh build
        self.subordinate_cache.clear();
        self.visited_ids.clear();

        let root = find_root(records)?;
        self.index_subordinates(records)?;

        let ceo = self.resolve(root);
        debug!(
            "build: reached {} of {} employees",
            self.visited_ids.len(),
            records.len()
        );

        if self.visited_ids.len() != records.len() {
            let unreachable: Vec<i64> = {
                let mut ids: Vec<i64> = records
                    .iter()
                    .map(|r| r.employee_id)
                    .filter(|id| !self.visited_ids.contains(id))
                    .collect();
                ids.sort_unstable();
                ids
            };
            return Err(DomainError::IncompleteHierarchy {
                reached: self.visited_ids.len(),
                total: records.len(),
                unreachable,
            });
        }

        if ceo.is_leaf() {
            return Err(DomainError::EmptyHierarchy {
                employee_id: ceo.employee_id(),
            });
        }

        Ok(Hierarchy::new(ceo))
    }

    fn index_subordinates(&mut self, records: &[EmployeeRecord]) -> DomainResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.employee_id) {
                return Err(ValidationError::DuplicateId {
                    employee_id: record.employee_id,
                }
                .into());
            }
            if let Some(manager_id) = record.manager_id {
                self.subordinate_cache
                    .entry(manager_id)
                    .or_default()
                    .push(record.clone());
            }
        }
        Ok(())
    }

    fn resolve(&mut self, employee: &EmployeeRecord) -> HierarchyNode {
        self.visited_ids.insert(employee.employee_id);

        let direct = self
            .subordinate_cache
            .get(&employee.employee_id)
            .cloned()
            .unwrap_or_default();
        trace!(
            "resolve: {} has {} direct subordinates",
            employee,
            direct.len()
        );

        let subordinates = direct.iter().map(|child| self.resolve(child)).collect();
        HierarchyNode::new(employee.clone(), subordinates)
    }
}

fn find_root(records: &[EmployeeRecord]) -> DomainResult<&EmployeeRecord> {
    let mut roots = records.iter().filter(|r| r.is_root());
    let root = roots.next().ok_or(DomainError::NoRootFound)?;
    let others: Vec<i64> = roots.map(|r| r.employee_id).collect();
    if others.is_empty() {
        Ok(root)
    } else {
        let mut ids = vec![root.employee_id];
        ids.extend(others);
        Err(DomainError::MultipleRoots(ids))
    }
}
