//! Property-based tests over generated organizations.

use std::collections::HashSet;

use orgtree::domain::{
    is_valid, render_text, EmployeeRecord, Hierarchy, HierarchyBuilder, HierarchyNode,
};
use proptest::prelude::*;
use proptest::sample::Index;

/// Strategy for a connected organization with at least two employees.
///
/// Employee `i` reports to one of the employees generated before it, ids are
/// a shuffled range and the list itself is shuffled.
fn organization_strategy() -> impl Strategy<Value = Vec<EmployeeRecord>> {
    (2usize..40)
        .prop_flat_map(|n| {
            (
                Just((1..=n as i64).map(|i| i * 10).collect::<Vec<_>>()).prop_shuffle(),
                prop::collection::vec(any::<Index>(), n - 1),
                "[A-Z][a-z]{1,8}",
            )
        })
        .prop_flat_map(|(ids, parents, surname)| {
            let records: Vec<EmployeeRecord> = ids
                .iter()
                .enumerate()
                .map(|(i, &id)| {
                    let manager = if i == 0 {
                        None
                    } else {
                        Some(ids[parents[i - 1].index(i)])
                    };
                    EmployeeRecord::new(format!("{surname}{i}"), id, manager)
                })
                .collect();
            Just(records).prop_shuffle()
        })
}

fn assert_sorted(node: &HierarchyNode) -> Result<(), TestCaseError> {
    let ids: Vec<i64> = node.subordinates().iter().map(|n| n.employee_id()).collect();
    prop_assert!(ids.windows(2).all(|w| w[0] < w[1]), "unsorted: {:?}", ids);
    for child in node.subordinates() {
        assert_sorted(child)?;
    }
    Ok(())
}

fn build(records: &[EmployeeRecord]) -> Hierarchy {
    HierarchyBuilder::new()
        .build(records)
        .expect("generated organization builds")
}

proptest! {
    #[test]
    fn generated_organizations_are_valid(records in organization_strategy()) {
        prop_assert!(is_valid(&records));
    }

    #[test]
    fn flattening_returns_every_record_once(records in organization_strategy()) {
        let hierarchy = build(&records);
        let flat = hierarchy.flatten();
        prop_assert_eq!(flat.len(), records.len());

        let flat_ids: HashSet<i64> = flat.iter().map(|r| r.employee_id).collect();
        let input_ids: HashSet<i64> = records.iter().map(|r| r.employee_id).collect();
        prop_assert_eq!(flat_ids, input_ids);
    }

    #[test]
    fn building_twice_gives_equal_trees(records in organization_strategy()) {
        prop_assert_eq!(build(&records), build(&records));
    }

    #[test]
    fn subordinates_are_strictly_ascending(records in organization_strategy()) {
        assert_sorted(build(&records).root())?;
    }

    #[test]
    fn text_rendering_has_one_row_per_employee(records in organization_strategy()) {
        let hierarchy = build(&records);
        let text = render_text(&hierarchy);
        prop_assert_eq!(text.lines().count(), records.len());
        let widest = text.lines().map(|l| l.matches('|').count()).max().unwrap_or(0);
        prop_assert_eq!(widest, hierarchy.depth());
    }
}
