//! Role identifiers.
//!
//! The role set is closed: every role a principal can hold is listed here and
//! nowhere else. There is no hierarchy between roles; an administrative role
//! does not implicitly carry the grants of the roles below it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// Where a role comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleScope {
    /// Inherent to the user account, valid across every organization.
    Platform,
    /// Granted by a membership in one embassy, consulate or other organization.
    Organization,
}

/// A role a principal may hold.
///
/// Serialized as the snake_case wire name (e.g. `"consul_general"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    // Platform roles
    SuperAdmin,
    /// Citizen or other member of the public.
    User,
    IntelAgent,
    EducationAgent,

    // Generic organization roles
    Admin,
    Manager,
    Agent,
    Viewer,

    // Embassy hierarchy
    Ambassador,
    FirstCounselor,
    Paymaster,
    EconomicCounselor,
    SocialCounselor,
    CommunicationCounselor,
    Chancellor,
    FirstSecretary,
    Receptionist,

    // Consulate hierarchy
    ConsulGeneral,
    Consul,
    ViceConsul,
    ConsularAffairsOfficer,
    ConsularAgent,
    Intern,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: &'static [Role] = &[
        Role::SuperAdmin,
        Role::User,
        Role::IntelAgent,
        Role::EducationAgent,
        Role::Admin,
        Role::Manager,
        Role::Agent,
        Role::Viewer,
        Role::Ambassador,
        Role::FirstCounselor,
        Role::Paymaster,
        Role::EconomicCounselor,
        Role::SocialCounselor,
        Role::CommunicationCounselor,
        Role::Chancellor,
        Role::FirstSecretary,
        Role::Receptionist,
        Role::ConsulGeneral,
        Role::Consul,
        Role::ViceConsul,
        Role::ConsularAffairsOfficer,
        Role::ConsularAgent,
        Role::Intern,
    ];

    /// The snake_case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::User => "user",
            Role::IntelAgent => "intel_agent",
            Role::EducationAgent => "education_agent",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Agent => "agent",
            Role::Viewer => "viewer",
            Role::Ambassador => "ambassador",
            Role::FirstCounselor => "first_counselor",
            Role::Paymaster => "paymaster",
            Role::EconomicCounselor => "economic_counselor",
            Role::SocialCounselor => "social_counselor",
            Role::CommunicationCounselor => "communication_counselor",
            Role::Chancellor => "chancellor",
            Role::FirstSecretary => "first_secretary",
            Role::Receptionist => "receptionist",
            Role::ConsulGeneral => "consul_general",
            Role::Consul => "consul",
            Role::ViceConsul => "vice_consul",
            Role::ConsularAffairsOfficer => "consular_affairs_officer",
            Role::ConsularAgent => "consular_agent",
            Role::Intern => "intern",
        }
    }

    /// Platform roles live on the user account; all others come from a membership.
    pub fn scope(self) -> RoleScope {
        match self {
            Role::SuperAdmin | Role::User | Role::IntelAgent | Role::EducationAgent => {
                RoleScope::Platform
            }
            _ => RoleScope::Organization,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AccessError::InvalidQuery {
                reason: format!("unknown role '{}'", s),
            })
    }
}
