//! # consulat-contracts
//!
//! Shared types for consular access control.
//!
//! The closed sets (roles, resources, per-resource actions), the entity
//! records that dynamic rules inspect, the acting `Principal` and the error
//! types. No evaluation logic lives in this crate; see `consulat-policy`.

pub mod entity;
pub mod error;
pub mod principal;
pub mod resource;
pub mod role;

pub use entity::{
    Appointment, ChildProfile, Document, Entity, IntelligenceNote, Organization, Profile,
    RequestStatus, Service, ServiceRequest, UserAccount,
};
pub use error::{AccessError, AccessResult, EvaluationError};
pub use principal::Principal;
pub use resource::{
    ActionKind, AppointmentAction, Appointments, ChildProfileAction, ChildProfiles,
    DocumentAction, Documents, IntelligenceNoteAction, IntelligenceNotes, OrganizationAction,
    Organizations, ProfileAction, Profiles, RequestAction, Requests, Resource, ResourceKind,
    ServiceAction, Services, UserAction, Users,
};
pub use role::{Role, RoleScope};
