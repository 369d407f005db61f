//! The acting user.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// A user together with the roles resolved for the current request.
///
/// Built per request by the authentication layer (platform roles) and the
/// membership lookup (organization roles). The permission evaluator only
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User account id. Compared against ownership fields (`owner_id`,
    /// `user_id`, `author_id`).
    pub id: String,
    /// Id of the membership the user is acting through, when acting for an
    /// organization. Compared against `assigned_agent_id` on requests.
    #[serde(default)]
    pub membership_id: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl Principal {
    /// A principal with no roles. Every permission check denies until roles
    /// are added.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            membership_id: None,
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn with_membership(mut self, membership_id: impl Into<String>) -> Self {
        self.membership_id = Some(membership_id.into());
        self
    }
}
