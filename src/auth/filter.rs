//! Restriction filtering over collections
//!
//! Applies the single-item evaluator per element so list views and
//! single-item checks can never disagree.

use crate::auth::session::UserPermissions;
use crate::auth::types::{Permission, ScopedResource};

/// Keep the items the session may access under `permission`.
///
/// Stable: input order is preserved and items are never mutated. An absent
/// session filters everything out.
pub fn filter_permitted<T: ScopedResource>(
    session: Option<&UserPermissions>,
    items: Vec<T>,
    permission: &Permission,
) -> Vec<T> {
    let Some(session) = session else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter(|item| {
            let context = item.permission_context();
            session.has_permission(permission, Some(&context))
        })
        .collect()
}

/// Borrowing variant of [`filter_permitted`] for read paths that keep
/// ownership of the collection.
pub fn filter_refs<'a, T: ScopedResource>(
    session: Option<&UserPermissions>,
    items: &'a [T],
    permission: &Permission,
) -> Vec<&'a T> {
    let Some(session) = session else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| {
            let context = item.permission_context();
            session.has_permission(permission, Some(&context))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{Condition, Grant, Restrictions};

    #[derive(Debug, Clone, PartialEq)]
    struct BenchResource {
        id: String,
        owner: String,
    }

    impl ScopedResource for BenchResource {
        fn resource_type(&self) -> &str {
            "bench_resource"
        }

        fn resource_id(&self) -> Option<&str> {
            Some(&self.id)
        }

        fn owner_id(&self) -> Option<&str> {
            Some(&self.owner)
        }
    }

    fn bench(id: &str, owner: &str) -> BenchResource {
        BenchResource {
            id: id.to_string(),
            owner: owner.to_string(),
        }
    }

    fn own_only_session(user_id: &str) -> UserPermissions {
        UserPermissions {
            user_id: user_id.to_string(),
            roles: ["employee".to_string()].into_iter().collect(),
            grants: vec![Grant::conditional(
                Permission::new("bench_resources", "read"),
                Condition::OwnOnly,
            )],
            restrictions: Restrictions::default(),
        }
    }

    #[test]
    fn test_filter_keeps_only_permitted_items() {
        let session = own_only_session("emp-1");
        let items = vec![
            bench("a", "emp-1"),
            bench("b", "emp-2"),
            bench("c", "emp-1"),
        ];

        let permission = Permission::new("bench_resources", "read");
        let filtered = filter_permitted(Some(&session), items, &permission);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].id, "a");
        assert_eq!(filtered[1].id, "c");
    }

    #[test]
    fn test_filter_is_a_subset_preserving_order() {
        let session = own_only_session("emp-1");
        let items: Vec<_> = (0..10)
            .map(|i| {
                let owner = if i % 3 == 0 { "emp-1" } else { "emp-2" };
                bench(&format!("r{}", i), owner)
            })
            .collect();
        let input = items.clone();

        let permission = Permission::new("bench_resources", "read");
        let filtered = filter_permitted(Some(&session), items, &permission);

        assert!(filtered.len() <= input.len());
        // Filtered output appears in the same relative order as the input
        let mut cursor = 0;
        for item in &filtered {
            let pos = input[cursor..]
                .iter()
                .position(|candidate| candidate == item)
                .expect("filtered item must come from the input");
            cursor += pos + 1;
        }
    }

    #[test]
    fn test_filter_agrees_with_single_item_checks() {
        let session = own_only_session("emp-1");
        let items = vec![bench("a", "emp-1"), bench("b", "emp-2")];
        let permission = Permission::new("bench_resources", "read");

        let kept = filter_refs(Some(&session), &items, &permission);

        for item in &items {
            let single = session.has_permission(&permission, Some(&item.permission_context()));
            let in_list = kept.iter().any(|k| k.id == item.id);
            assert_eq!(single, in_list);
        }
    }

    #[test]
    fn test_filter_without_session_is_empty() {
        let items = vec![bench("a", "emp-1")];
        let permission = Permission::new("bench_resources", "read");

        assert!(filter_permitted::<BenchResource>(None, items, &permission).is_empty());
    }

    #[test]
    fn test_filter_refs_does_not_consume() {
        let session = own_only_session("emp-1");
        let items = vec![bench("a", "emp-1"), bench("b", "emp-2")];
        let permission = Permission::new("bench_resources", "read");

        let kept = filter_refs(Some(&session), &items, &permission);
        assert_eq!(kept.len(), 1);
        // Original collection untouched
        assert_eq!(items.len(), 2);
    }
}
