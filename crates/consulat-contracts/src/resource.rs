//! Resources and their legal actions.
//!
//! Every resource has its own closed action enum. `delete` on documents and
//! `delete` on appointments are different values of different types, so an
//! action can only ever be paired with the resource that declares it.
//!
//! Code that knows the resource statically goes through the [`Resource`]
//! marker types (`Requests`, `Documents`, ...). Code that starts from strings
//! (a CLI, a permission key stored in a database) goes through
//! [`ResourceKind`] and [`ResourceKind::canonical_action`], which reject
//! unknown pairs with `AccessError::InvalidQuery` instead of denying.

use std::{fmt, hash::Hash, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    entity::{
        Appointment, ChildProfile, Document, Entity, IntelligenceNote, Organization, Profile,
        Service, ServiceRequest, UserAccount,
    },
    error::AccessError,
};

/// The category of domain entity an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Profiles,
    Requests,
    Documents,
    Organizations,
    Services,
    Appointments,
    Users,
    ChildProfiles,
    IntelligenceNotes,
}

impl ResourceKind {
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::Profiles,
        ResourceKind::Requests,
        ResourceKind::Documents,
        ResourceKind::Organizations,
        ResourceKind::Services,
        ResourceKind::Appointments,
        ResourceKind::Users,
        ResourceKind::ChildProfiles,
        ResourceKind::IntelligenceNotes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Profiles => "profiles",
            ResourceKind::Requests => "requests",
            ResourceKind::Documents => "documents",
            ResourceKind::Organizations => "organizations",
            ResourceKind::Services => "services",
            ResourceKind::Appointments => "appointments",
            ResourceKind::Users => "users",
            ResourceKind::ChildProfiles => "child_profiles",
            ResourceKind::IntelligenceNotes => "intelligence_notes",
        }
    }

    /// Wire names of every action legal for this resource.
    pub fn action_names(self) -> Vec<&'static str> {
        fn names<A: ActionKind>() -> Vec<&'static str> {
            A::ALL.iter().map(|a| a.as_str()).collect()
        }
        match self {
            ResourceKind::Profiles => names::<ProfileAction>(),
            ResourceKind::Requests => names::<RequestAction>(),
            ResourceKind::Documents => names::<DocumentAction>(),
            ResourceKind::Organizations => names::<OrganizationAction>(),
            ResourceKind::Services => names::<ServiceAction>(),
            ResourceKind::Appointments => names::<AppointmentAction>(),
            ResourceKind::Users => names::<UserAction>(),
            ResourceKind::ChildProfiles => names::<ChildProfileAction>(),
            ResourceKind::IntelligenceNotes => names::<IntelligenceNoteAction>(),
        }
    }

    /// Resolve `action` against this resource's action set.
    ///
    /// Returns the canonical `&'static str` name, or `InvalidQuery` if the
    /// resource does not declare that action.
    pub fn canonical_action(self, action: &str) -> Result<&'static str, AccessError> {
        self.action_names()
            .into_iter()
            .find(|name| *name == action)
            .ok_or_else(|| AccessError::InvalidQuery {
                reason: format!("action '{}' is not defined for resource '{}'", action, self),
            })
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AccessError::InvalidQuery {
                reason: format!("unknown resource '{}'", s),
            })
    }
}

/// Behaviour shared by every per-resource action enum.
pub trait ActionKind:
    Copy
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = AccessError>
    + Serialize
    + Send
    + Sync
    + 'static
{
    /// Every legal action, in declaration order.
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;
}

/// A resource known at compile time.
///
/// Implemented by zero-sized marker types. The associated types tie the
/// resource to its action set and to the shape of the record that dynamic
/// rules inspect.
pub trait Resource: Copy + fmt::Debug + Send + Sync + 'static {
    type Action: ActionKind;
    type Entity: Entity;

    const KIND: ResourceKind;
}

macro_rules! action_enum {
    (
        $(#[$meta:meta])*
        $name:ident for $resource:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl ActionKind for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AccessError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(AccessError::InvalidQuery {
                        reason: format!(
                            "action '{}' is not defined for resource '{}'",
                            other, $resource
                        ),
                    }),
                }
            }
        }
    };
}

action_enum! {
    /// Actions on citizen profiles.
    ProfileAction for "profiles" {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Validate => "validate",
    }
}

action_enum! {
    /// Actions on service requests (passport, visa, civil status ...).
    RequestAction for "requests" {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Process => "process",
        Validate => "validate",
        Complete => "complete",
        Assign => "assign",
    }
}

action_enum! {
    DocumentAction for "documents" {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Validate => "validate",
        Generate => "generate",
    }
}

action_enum! {
    OrganizationAction for "organizations" {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Manage => "manage",
    }
}

action_enum! {
    ServiceAction for "services" {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Configure => "configure",
    }
}

action_enum! {
    AppointmentAction for "appointments" {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Reschedule => "reschedule",
        Cancel => "cancel",
    }
}

action_enum! {
    /// Actions on user accounts (staff and citizens).
    UserAction for "users" {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Manage => "manage",
    }
}

action_enum! {
    ChildProfileAction for "child_profiles" {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
    }
}

action_enum! {
    IntelligenceNoteAction for "intelligence_notes" {
        View => "view",
        Create => "create",
        Update => "update",
        Delete => "delete",
        ViewHistory => "view_history",
    }
}

// ── Resource markers ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Profiles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Requests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Documents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Organizations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Services;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Appointments;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Users;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChildProfiles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntelligenceNotes;

impl Resource for Profiles {
    type Action = ProfileAction;
    type Entity = Profile;
    const KIND: ResourceKind = ResourceKind::Profiles;
}

impl Resource for Requests {
    type Action = RequestAction;
    type Entity = ServiceRequest;
    const KIND: ResourceKind = ResourceKind::Requests;
}

impl Resource for Documents {
    type Action = DocumentAction;
    type Entity = Document;
    const KIND: ResourceKind = ResourceKind::Documents;
}

impl Resource for Organizations {
    type Action = OrganizationAction;
    type Entity = Organization;
    const KIND: ResourceKind = ResourceKind::Organizations;
}

impl Resource for Services {
    type Action = ServiceAction;
    type Entity = Service;
    const KIND: ResourceKind = ResourceKind::Services;
}

impl Resource for Appointments {
    type Action = AppointmentAction;
    type Entity = Appointment;
    const KIND: ResourceKind = ResourceKind::Appointments;
}

impl Resource for Users {
    type Action = UserAction;
    type Entity = UserAccount;
    const KIND: ResourceKind = ResourceKind::Users;
}

impl Resource for ChildProfiles {
    type Action = ChildProfileAction;
    type Entity = ChildProfile;
    const KIND: ResourceKind = ResourceKind::ChildProfiles;
}

impl Resource for IntelligenceNotes {
    type Action = IntelligenceNoteAction;
    type Entity = IntelligenceNote;
    const KIND: ResourceKind = ResourceKind::IntelligenceNotes;
}
