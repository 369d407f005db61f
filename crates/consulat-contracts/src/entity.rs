//! Entity records inspected by dynamic permission rules.
//!
//! These carry only the attributes access decisions depend on (ids,
//! ownership, assignment, status). The full documents live in the data layer;
//! callers project them into these shapes right before evaluation.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A record that can be the subject of a permission check.
pub trait Entity: DeserializeOwned + fmt::Debug + Send + Sync + 'static {
    /// Stable identifier, reported in `PermissionDenied` errors.
    fn entity_id(&self) -> &str;
}

/// Lifecycle status of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Not yet submitted; the only status in which citizens may edit.
    Draft,
    Pending,
    PendingCompletion,
    Edited,
    Submitted,
    UnderReview,
    InProduction,
    Validated,
    Rejected,
    AppointmentScheduled,
    ReadyForPickup,
    Completed,
    Cancelled,
}

/// A citizen profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    /// The user account this profile belongs to.
    pub user_id: String,
}

/// A consular service request (passport renewal, visa, transcription ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: String,
    /// The citizen who filed the request.
    pub user_id: String,
    /// Membership id of the agent handling the request, if assigned.
    #[serde(default)]
    pub assigned_agent_id: Option<String>,
    /// Required: a record whose status is unknown cannot be judged editable.
    pub status: RequestStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
}

/// A platform user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
}

/// A minor's profile attached to a parent account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelligenceNote {
    pub id: String,
    pub author_id: String,
}

macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Entity for $ty {
                fn entity_id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

impl_entity!(
    Profile,
    ServiceRequest,
    Document,
    Organization,
    Service,
    Appointment,
    UserAccount,
    ChildProfile,
    IntelligenceNote,
);
