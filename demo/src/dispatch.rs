//! Bridges string queries from the command line to the typed evaluator.
//!
//! Unknown resource/action pairs and entities that do not match the
//! resource's record shape are rejected with `AccessError::InvalidQuery`.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use consulat_contracts::{
    AccessError, AccessResult, ActionKind, Appointments, ChildProfiles, Documents,
    IntelligenceNotes, Organizations, Principal, Profiles, Requests, Resource, ResourceKind, Role,
    Services, Users,
};
use consulat_policy::{Authorizer, Overrides, RoleTable, RuleKind, TableResource};

macro_rules! dispatch {
    ($kind:expr, $f:ident($($arg:expr),* $(,)?)) => {
        match $kind {
            ResourceKind::Profiles => $f(Profiles, $($arg),*),
            ResourceKind::Requests => $f(Requests, $($arg),*),
            ResourceKind::Documents => $f(Documents, $($arg),*),
            ResourceKind::Organizations => $f(Organizations, $($arg),*),
            ResourceKind::Services => $f(Services, $($arg),*),
            ResourceKind::Appointments => $f(Appointments, $($arg),*),
            ResourceKind::Users => $f(Users, $($arg),*),
            ResourceKind::ChildProfiles => $f(ChildProfiles, $($arg),*),
            ResourceKind::IntelligenceNotes => $f(IntelligenceNotes, $($arg),*),
        }
    };
}

/// One row of a resource summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionGrant {
    pub action: &'static str,
    pub granted: bool,
}

/// One row of a role matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRule {
    pub action: &'static str,
    pub rule: RuleKind,
}

fn parse_entity<R: Resource>(raw: Option<&Value>) -> AccessResult<Option<R::Entity>> {
    raw.map(|value| {
        serde_json::from_value(value.clone()).map_err(|e| AccessError::InvalidQuery {
            reason: format!("entity does not describe a '{}' record: {}", R::KIND, e),
        })
    })
    .transpose()
}

/// Evaluate `action` on `resource`, with `overrides` in front of the table.
pub fn check(
    authorizer: &Authorizer,
    user: Option<&Principal>,
    overrides: &Overrides,
    resource: ResourceKind,
    action: &str,
    entity: Option<&Value>,
) -> AccessResult<bool> {
    fn typed<R: TableResource>(
        resource: R,
        authorizer: &Authorizer,
        user: Option<&Principal>,
        overrides: &Overrides,
        action: &str,
        entity: Option<&Value>,
    ) -> AccessResult<bool> {
        let action = <R::Action as FromStr>::from_str(action)?;
        let entity = parse_entity::<R>(entity)?;
        debug!(resource = %R::KIND, action = %action, has_entity = entity.is_some(), "checking");
        authorizer.has_permission_with_overrides(user, overrides, resource, action, entity.as_ref())
    }
    dispatch!(resource, typed(authorizer, user, overrides, action, entity))
}

/// Evaluate every action of `resource`, in declaration order.
pub fn summary(
    authorizer: &Authorizer,
    user: Option<&Principal>,
    resource: ResourceKind,
    entity: Option<&Value>,
) -> AccessResult<Vec<ActionGrant>> {
    fn typed<R: TableResource>(
        resource: R,
        authorizer: &Authorizer,
        user: Option<&Principal>,
        entity: Option<&Value>,
    ) -> AccessResult<Vec<ActionGrant>> {
        let entity = parse_entity::<R>(entity)?;
        let grants = authorizer.resource_permissions(user, resource, entity.as_ref())?;
        Ok(<R::Action as ActionKind>::ALL
            .iter()
            .map(|action| ActionGrant {
                action: action.as_str(),
                granted: grants.get(action).copied().unwrap_or(false),
            })
            .collect())
    }
    dispatch!(resource, typed(authorizer, user, entity))
}

/// How `role` is treated for every action of `resource`.
pub fn matrix_row(table: &RoleTable, role: Role, resource: ResourceKind) -> Vec<ActionRule> {
    fn typed<R: TableResource>(_resource: R, table: &RoleTable, role: Role) -> Vec<ActionRule> {
        <R::Action as ActionKind>::ALL
            .iter()
            .map(|&action| ActionRule {
                action: action.as_str(),
                rule: table.rule_kind::<R>(role, action),
            })
            .collect()
    }
    dispatch!(resource, typed(table, role))
}
