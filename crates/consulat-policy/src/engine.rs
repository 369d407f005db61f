//! The permission evaluator.
//!
//! `Authorizer` answers "may this principal perform this action on this
//! resource (and this entity)?" against an injected [`RoleTable`].
//!
//! Evaluation algorithm:
//!
//! 1. No principal, or a principal without roles → deny.
//! 2. For each role the principal holds, look up role → resource → action.
//!    A missing entry at any level contributes deny.
//!    a. `Static(b)` contributes `b`.
//!    b. `Dynamic(p)` contributes deny when no entity is supplied, otherwise
//!       the predicate's result.
//! 3. Grant if any role contributed grant (first grant short-circuits).
//! 4. Otherwise, if a predicate failed, return the first failure as
//!    `AccessError::Evaluation`; it is never turned into a denial. A failure
//!    never hides a grant from another role, whatever the role order.

use std::sync::Arc;

use tracing::{debug, trace};

use consulat_contracts::{AccessError, AccessResult, ActionKind, Principal};

use crate::{
    consular,
    rule::Rule,
    table::{RoleTable, TableResource},
};

/// Evaluates permission queries against a shared, immutable role table.
///
/// Cloning is cheap; clones share the same table.
///
/// ```rust,ignore
/// use consulat_contracts::{Principal, RequestAction, Requests, Role};
/// use consulat_policy::Authorizer;
///
/// let authorizer = Authorizer::consular();
/// let agent = Principal::new("u1").with_role(Role::Agent).with_membership("m1");
/// let granted =
///     authorizer.has_permission(Some(&agent), Requests, RequestAction::Process, Some(&request))?;
/// ```
#[derive(Debug, Clone)]
pub struct Authorizer {
    table: Arc<RoleTable>,
}

impl Authorizer {
    pub fn new(table: RoleTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Share a table that is already held elsewhere.
    pub fn from_shared(table: Arc<RoleTable>) -> Self {
        Self { table }
    }

    /// An authorizer over the built-in consular table.
    pub fn consular() -> Self {
        Self::new(consular::table())
    }

    pub fn table(&self) -> &RoleTable {
        &self.table
    }

    /// Decide whether `user` may perform `action` on `resource`.
    ///
    /// `entity` is consulted only by dynamic rules. Denial is `Ok(false)`;
    /// `Err` means a dynamic rule could not judge the inputs.
    pub fn has_permission<R: TableResource>(
        &self,
        user: Option<&Principal>,
        _resource: R,
        action: R::Action,
        entity: Option<&R::Entity>,
    ) -> AccessResult<bool> {
        let Some(user) = user else {
            debug!(
                resource = %R::KIND,
                action = %action,
                "no principal; denying"
            );
            return Ok(false);
        };

        let mut failure = None;

        for role in &user.roles {
            let granted = match self.table.rule::<R>(*role, action) {
                None => false,
                Some(Rule::Static(granted)) => *granted,
                Some(Rule::Dynamic(predicate)) => match entity {
                    None => false,
                    Some(entity) => match predicate(user, entity) {
                        Ok(granted) => granted,
                        Err(source) => {
                            trace!(
                                user_id = %user.id,
                                role = %role,
                                resource = %R::KIND,
                                action = %action,
                                error = %source,
                                "predicate failed"
                            );
                            if failure.is_none() {
                                failure = Some(source);
                            }
                            false
                        }
                    },
                },
            };

            trace!(
                user_id = %user.id,
                role = %role,
                resource = %R::KIND,
                action = %action,
                granted,
                "role contribution"
            );

            if granted {
                debug!(
                    user_id = %user.id,
                    role = %role,
                    resource = %R::KIND,
                    action = %action,
                    "permission granted"
                );
                return Ok(true);
            }
        }

        if let Some(source) = failure {
            debug!(
                user_id = %user.id,
                resource = %R::KIND,
                action = %action,
                error = %source,
                "no role grants action; reporting predicate failure"
            );
            return Err(AccessError::Evaluation {
                resource: R::KIND,
                action: action.as_str(),
                source,
            });
        }

        debug!(
            user_id = %user.id,
            roles = user.roles.len(),
            resource = %R::KIND,
            action = %action,
            "no role grants action; denying"
        );
        Ok(false)
    }
}
