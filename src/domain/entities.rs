//! Domain entities: employee records and the hierarchy built from them

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// A single employee as supplied by the caller.
///
/// Identity is the `employee_id`: two records with the same id are equal
/// regardless of name or manager, and records order by id ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    /// Display name (must be non-empty after trimming)
    #[serde(default)]
    pub name: String,
    /// Unique positive identifier
    #[serde(default)]
    pub employee_id: i64,
    /// Identifier of this employee's manager, `None` for the root
    #[serde(default)]
    pub manager_id: Option<i64>,
}

impl EmployeeRecord {
    pub fn new(name: impl Into<String>, employee_id: i64, manager_id: Option<i64>) -> Self {
        Self {
            name: name.into(),
            employee_id,
            manager_id,
        }
    }

    /// Record without a manager (the CEO).
    pub fn root(name: impl Into<String>, employee_id: i64) -> Self {
        Self::new(name, employee_id, None)
    }

    pub fn is_root(&self) -> bool {
        self.manager_id.is_none()
    }
}

impl PartialEq for EmployeeRecord {
    fn eq(&self, other: &Self) -> bool {
        self.employee_id == other.employee_id
    }
}

impl Eq for EmployeeRecord {}

impl Hash for EmployeeRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.employee_id.hash(state);
    }
}

impl PartialOrd for EmployeeRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EmployeeRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.employee_id.cmp(&other.employee_id)
    }
}

impl fmt::Display for EmployeeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.employee_id)
    }
}

/// Tree form of an employee record.
///
/// A manager always carries at least one subordinate; subordinates are kept
/// sorted by id ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyNode {
    Manager {
        employee: EmployeeRecord,
        subordinates: Vec<HierarchyNode>,
    },
    Leaf(EmployeeRecord),
}

/// Serialized as the record's own fields, plus `subordinates` for managers.
impl Serialize for HierarchyNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let employee = self.employee();
        let fields = if self.is_leaf() { 3 } else { 4 };
        let mut state = serializer.serialize_struct("Employee", fields)?;
        state.serialize_field("name", &employee.name)?;
        state.serialize_field("employeeId", &employee.employee_id)?;
        state.serialize_field("managerId", &employee.manager_id)?;
        if let HierarchyNode::Manager { subordinates, .. } = self {
            state.serialize_field("subordinates", subordinates)?;
        }
        state.end()
    }
}

impl HierarchyNode {
    /// Wrap a record with its resolved subordinates.
    ///
    /// Subordinates are sorted here; an empty list yields a leaf.
    pub fn new(employee: EmployeeRecord, mut subordinates: Vec<HierarchyNode>) -> Self {
        if subordinates.is_empty() {
            return HierarchyNode::Leaf(employee);
        }
        subordinates.sort_by_key(|node| node.employee_id());
        HierarchyNode::Manager {
            employee,
            subordinates,
        }
    }

    pub fn employee(&self) -> &EmployeeRecord {
        match self {
            HierarchyNode::Manager { employee, .. } | HierarchyNode::Leaf(employee) => employee,
        }
    }

    pub fn employee_id(&self) -> i64 {
        self.employee().employee_id
    }

    pub fn name(&self) -> &str {
        &self.employee().name
    }

    /// Direct subordinates, empty for a leaf.
    pub fn subordinates(&self) -> &[HierarchyNode] {
        match self {
            HierarchyNode::Manager { subordinates, .. } => subordinates,
            HierarchyNode::Leaf(_) => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HierarchyNode::Leaf(_))
    }

    /// Number of layers below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            HierarchyNode::Leaf(_) => 1,
            HierarchyNode::Manager { subordinates, .. } => {
                1 + subordinates
                    .iter()
                    .map(HierarchyNode::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Number of employees in this subtree.
    pub fn len(&self) -> usize {
        1 + self
            .subordinates()
            .iter()
            .map(HierarchyNode::len)
            .sum::<usize>()
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a EmployeeRecord>) {
        out.push(self.employee());
        for child in self.subordinates() {
            child.collect(out);
        }
    }

    fn find(&self, employee_id: i64) -> Option<&HierarchyNode> {
        if self.employee_id() == employee_id {
            return Some(self);
        }
        self.subordinates()
            .iter()
            .find_map(|child| child.find(employee_id))
    }
}

/// A validated organizational hierarchy rooted at the CEO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    ceo: HierarchyNode,
}

impl Hierarchy {
    pub fn new(ceo: HierarchyNode) -> Self {
        Self { ceo }
    }

    pub fn root(&self) -> &HierarchyNode {
        &self.ceo
    }

    /// Number of layers, root = layer 1.
    pub fn depth(&self) -> usize {
        self.ceo.depth()
    }

    pub fn len(&self) -> usize {
        self.ceo.len()
    }

    /// Never true for a built hierarchy; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All records in pre-order, children in ascending id order.
    pub fn flatten(&self) -> Vec<&EmployeeRecord> {
        let mut out = Vec::with_capacity(self.len());
        self.ceo.collect(&mut out);
        out
    }

    pub fn find(&self, employee_id: i64) -> Option<&HierarchyNode> {
        self.ceo.find(employee_id)
    }
}
