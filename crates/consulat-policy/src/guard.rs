//! Guard and query helpers built on [`Authorizer::has_permission`].
//!
//! Role-membership checks are plain set tests and need no table. The
//! resource summary exists for deciding what to render; effectful operations
//! must gate on [`Authorizer::assert_permission`] with a freshly loaded entity.

use std::collections::BTreeMap;

use consulat_contracts::{AccessError, AccessResult, ActionKind, Entity, Principal, Role};

use crate::{engine::Authorizer, table::TableResource};

/// True iff `user` holds `role`. No principal holds nothing.
pub fn has_role(user: Option<&Principal>, role: Role) -> bool {
    user.is_some_and(|user| user.roles.contains(&role))
}

/// True iff `user` holds at least one of `roles`.
pub fn has_any_role(user: Option<&Principal>, roles: &[Role]) -> bool {
    user.is_some_and(|user| roles.iter().any(|role| user.roles.contains(role)))
}

/// True iff `user` holds every one of `roles`.
///
/// An empty `roles` list is satisfied by any present principal.
pub fn has_all_roles(user: Option<&Principal>, roles: &[Role]) -> bool {
    user.is_some_and(|user| roles.iter().all(|role| user.roles.contains(role)))
}

impl Authorizer {
    /// Return `Ok(())` if the action is granted, `PermissionDenied` otherwise.
    ///
    /// Call this next to the mutation it protects, with the entity as just
    /// loaded from the data layer.
    pub fn assert_permission<R: TableResource>(
        &self,
        user: Option<&Principal>,
        resource: R,
        action: R::Action,
        entity: Option<&R::Entity>,
    ) -> AccessResult<()> {
        if self.has_permission(user, resource, action, entity)? {
            return Ok(());
        }
        Err(AccessError::PermissionDenied {
            resource: R::KIND,
            action: action.as_str(),
            entity_id: entity.map(|e| e.entity_id().to_string()),
        })
    }

    /// Evaluate every legal action of `resource` for `user`.
    ///
    /// The map has exactly one key per action the resource declares. It is a
    /// snapshot for UI enablement and can go stale; do not gate mutations on it.
    pub fn resource_permissions<R: TableResource>(
        &self,
        user: Option<&Principal>,
        resource: R,
        entity: Option<&R::Entity>,
    ) -> AccessResult<BTreeMap<R::Action, bool>> {
        <R::Action as ActionKind>::ALL
            .iter()
            .map(|&action| {
                self.has_permission(user, resource, action, entity)
                    .map(|granted| (action, granted))
            })
            .collect()
    }
}
