//! The role table: role → resource → action → rule.
//!
//! Built once with [`RoleTable::builder`] and never mutated afterwards. Each
//! role lists its grants in full; the table has no notion of one role
//! including another.

use std::collections::HashMap;

use consulat_contracts::{
    Appointments, ChildProfiles, Documents, IntelligenceNotes, Organizations, Profiles, Requests,
    Resource, Role, Services, Users,
};

use crate::rule::{ActionRules, Rule, RuleKind};

/// Everything one role is granted, one rule set per resource.
#[derive(Debug, Clone, Default)]
pub struct RoleGrants {
    pub profiles: ActionRules<Profiles>,
    pub requests: ActionRules<Requests>,
    pub documents: ActionRules<Documents>,
    pub organizations: ActionRules<Organizations>,
    pub services: ActionRules<Services>,
    pub appointments: ActionRules<Appointments>,
    pub users: ActionRules<Users>,
    pub child_profiles: ActionRules<ChildProfiles>,
    pub intelligence_notes: ActionRules<IntelligenceNotes>,
}

/// A resource that has a slot in [`RoleGrants`].
pub trait TableResource: Resource {
    fn rules(grants: &RoleGrants) -> &ActionRules<Self>;
}

macro_rules! table_resource {
    ($($marker:ty => $field:ident),+ $(,)?) => {
        $(
            impl TableResource for $marker {
                fn rules(grants: &RoleGrants) -> &ActionRules<Self> {
                    &grants.$field
                }
            }
        )+
    };
}

table_resource!(
    Profiles => profiles,
    Requests => requests,
    Documents => documents,
    Organizations => organizations,
    Services => services,
    Appointments => appointments,
    Users => users,
    ChildProfiles => child_profiles,
    IntelligenceNotes => intelligence_notes,
);

/// Immutable mapping from role to its grants.
///
/// Missing entries at any level mean deny. The table is `Send + Sync` and
/// meant to be shared (`Arc`) by every evaluator in the process.
#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    roles: HashMap<Role, RoleGrants>,
}

impl RoleTable {
    pub fn builder() -> RoleTableBuilder {
        RoleTableBuilder::default()
    }

    /// A table with no grants at all. Every check against it denies.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn grants(&self, role: Role) -> Option<&RoleGrants> {
        self.roles.get(&role)
    }

    /// The rule `role` holds for `action` on resource `R`, if any.
    pub fn rule<R: TableResource>(&self, role: Role, action: R::Action) -> Option<&Rule<R>> {
        self.grants(role).and_then(|grants| R::rules(grants).rule(action))
    }

    pub fn rule_kind<R: TableResource>(&self, role: Role, action: R::Action) -> RuleKind {
        self.rule::<R>(role, action).map_or(RuleKind::Denied, Rule::kind)
    }

    /// Roles that have an entry in the table.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.keys().copied()
    }
}

/// Collects role grants before freezing them into a [`RoleTable`].
#[derive(Debug, Default)]
pub struct RoleTableBuilder {
    roles: HashMap<Role, RoleGrants>,
}

impl RoleTableBuilder {
    /// Declare the grants for `role`.
    ///
    /// Calling this twice for the same role edits the same entry.
    pub fn role(mut self, role: Role, declare: impl FnOnce(&mut RoleGrants)) -> Self {
        declare(self.roles.entry(role).or_default());
        self
    }

    pub fn build(self) -> RoleTable {
        RoleTable { roles: self.roles }
    }
}
