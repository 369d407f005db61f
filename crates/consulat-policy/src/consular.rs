//! The built-in consular role table.
//!
//! Grants are listed per role, in full. Overlaps between roles are repeated,
//! not derived, and asymmetries between neighbouring roles (for instance a
//! role holding `validate` without `update`) are intentional data, not
//! omissions to be tidied up.

use consulat_contracts::{
    AppointmentAction as Ap, ChildProfileAction as Ch, Document, DocumentAction as Dc,
    EvaluationError, IntelligenceNote, IntelligenceNoteAction as In, OrganizationAction as Or,
    Principal, Profile, ProfileAction as Pf, RequestAction as Rq, RequestStatus, Role,
    ServiceAction as Sv, ServiceRequest, UserAction as Us,
};

use crate::table::{RoleTable, RoleTableBuilder};

// ── Predicates ────────────────────────────────────────────────────────────────

fn present<'a>(value: &'a str, field: &'static str) -> Result<&'a str, EvaluationError> {
    if value.is_empty() {
        Err(EvaluationError::MissingAttribute { field })
    } else {
        Ok(value)
    }
}

fn is_principal(user: &Principal, id: &str, field: &'static str) -> Result<bool, EvaluationError> {
    let user_id = present(&user.id, "principal.id")?;
    Ok(present(id, field)? == user_id)
}

/// The request is assigned to the membership the principal acts through.
///
/// Staff roles always act through a membership, so a principal without one
/// is malformed input rather than a denial. So is a request assigned to a
/// blank agent id. An unassigned request is a plain denial.
pub fn assigned_to_acting_agent(
    user: &Principal,
    request: &ServiceRequest,
) -> Result<bool, EvaluationError> {
    let membership = user
        .membership_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(EvaluationError::MissingAttribute {
            field: "principal.membership_id",
        })?;
    match request.assigned_agent_id.as_deref() {
        None => Ok(false),
        Some("") => Err(EvaluationError::Malformed {
            reason: format!("request '{}' is assigned to an empty agent id", request.id),
        }),
        Some(assigned) => Ok(assigned == membership),
    }
}

pub fn filed_by_user(user: &Principal, request: &ServiceRequest) -> Result<bool, EvaluationError> {
    is_principal(user, &request.user_id, "request.user_id")
}

/// Citizens may only edit their own requests, and only before submission.
pub fn own_draft_request(
    user: &Principal,
    request: &ServiceRequest,
) -> Result<bool, EvaluationError> {
    Ok(filed_by_user(user, request)? && request.status == RequestStatus::Draft)
}

pub fn owns_document(user: &Principal, document: &Document) -> Result<bool, EvaluationError> {
    is_principal(user, &document.owner_id, "document.owner_id")
}

pub fn owns_profile(user: &Principal, profile: &Profile) -> Result<bool, EvaluationError> {
    is_principal(user, &profile.user_id, "profile.user_id")
}

pub fn authored_note(user: &Principal, note: &IntelligenceNote) -> Result<bool, EvaluationError> {
    is_principal(user, &note.author_id, "note.author_id")
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Build the consular role table.
pub fn table() -> RoleTable {
    let builder = RoleTable::builder()
        // ── Platform ─────────────────────────────────────────────────────────
        .role(Role::SuperAdmin, |g| {
            g.profiles
                .allow([Pf::View, Pf::Create, Pf::Update, Pf::Delete, Pf::Validate]);
            g.requests.allow([
                Rq::View,
                Rq::Create,
                Rq::Update,
                Rq::Delete,
                Rq::Process,
                Rq::Validate,
                Rq::Complete,
                Rq::Assign,
            ]);
            g.documents.allow([
                Dc::View,
                Dc::Create,
                Dc::Update,
                Dc::Delete,
                Dc::Validate,
                Dc::Generate,
            ]);
            g.organizations
                .allow([Or::View, Or::Create, Or::Update, Or::Delete, Or::Manage]);
            g.services
                .allow([Sv::View, Sv::Create, Sv::Update, Sv::Delete, Sv::Configure]);
            g.appointments.allow([
                Ap::View,
                Ap::Create,
                Ap::Update,
                Ap::Delete,
                Ap::Reschedule,
                Ap::Cancel,
            ]);
            g.users
                .allow([Us::View, Us::Create, Us::Update, Us::Delete, Us::Manage]);
            g.child_profiles
                .allow([Ch::View, Ch::Create, Ch::Update, Ch::Delete]);
            g.intelligence_notes
                .allow([In::View, In::Create, In::Update, In::Delete, In::ViewHistory]);
        })
        .role(Role::User, |g| {
            g.profiles
                .when(Pf::View, owns_profile)
                .when(Pf::Create, owns_profile)
                .when(Pf::Update, owns_profile);
            g.requests
                .when(Rq::View, filed_by_user)
                .allow([Rq::Create])
                .when(Rq::Update, own_draft_request);
            g.documents
                .when(Dc::View, owns_document)
                .allow([Dc::Create])
                .when(Dc::Update, owns_document)
                .when(Dc::Delete, owns_document);
            g.services.allow([Sv::View]);
            g.organizations.allow([Or::View]);
            g.appointments
                .allow([Ap::View, Ap::Create, Ap::Reschedule, Ap::Cancel]);
            g.child_profiles.allow([Ch::View, Ch::Create, Ch::Update]);
        })
        .role(Role::IntelAgent, |g| {
            g.profiles.allow([Pf::View]);
            g.intelligence_notes
                .allow([In::View, In::Create])
                .when(In::Update, authored_note)
                .when(In::Delete, authored_note)
                .allow([In::ViewHistory]);
            g.documents.allow([Dc::View]);
        })
        .role(Role::EducationAgent, |g| {
            g.profiles.allow([Pf::View]);
            g.organizations.allow([Or::View]);
        })
        // ── Generic organization roles ───────────────────────────────────────
        .role(Role::Admin, |g| {
            g.profiles
                .allow([Pf::View, Pf::Create, Pf::Update, Pf::Validate]);
            g.requests.allow([
                Rq::View,
                Rq::Create,
                Rq::Update,
                Rq::Process,
                Rq::Validate,
                Rq::Complete,
                Rq::Assign,
            ]);
            g.documents
                .allow([Dc::View, Dc::Create, Dc::Update, Dc::Validate, Dc::Generate]);
            g.organizations.allow([Or::View, Or::Update, Or::Manage]);
            g.services.allow([Sv::View, Sv::Update, Sv::Configure]);
            g.appointments
                .allow([Ap::View, Ap::Create, Ap::Update, Ap::Reschedule, Ap::Cancel]);
            g.users.allow([Us::View, Us::Create, Us::Update, Us::Manage]);
            g.child_profiles.allow([Ch::View]);
            g.intelligence_notes
                .allow([In::View, In::Create, In::Update, In::Delete, In::ViewHistory]);
        })
        .role(Role::Manager, |g| {
            g.profiles.allow([Pf::View, Pf::Validate]);
            g.requests
                .allow([Rq::View, Rq::Process, Rq::Validate, Rq::Complete, Rq::Assign]);
            g.documents.allow([Dc::View, Dc::Validate]);
            g.organizations.allow([Or::View]);
            g.services.allow([Sv::View]);
            g.appointments
                .allow([Ap::View, Ap::Update, Ap::Reschedule, Ap::Cancel]);
            g.users.allow([Us::View]);
            g.intelligence_notes.allow([In::View, In::ViewHistory]);
        })
        .role(Role::Agent, |g| {
            g.profiles.allow([Pf::View, Pf::Validate]);
            g.requests
                .allow([Rq::View])
                .when(Rq::Process, assigned_to_acting_agent)
                .when(Rq::Update, assigned_to_acting_agent)
                .allow([Rq::Validate])
                .when(Rq::Complete, assigned_to_acting_agent);
            g.documents.allow([Dc::View, Dc::Validate]);
            g.services.allow([Sv::View]);
            g.appointments.allow([Ap::View, Ap::Update, Ap::Reschedule]);
        });

    consulate(embassy(builder)).build()
}

// Embassy hierarchy, levels 1 to 5.
fn embassy(builder: RoleTableBuilder) -> RoleTableBuilder {
    builder
        .role(Role::Ambassador, |g| {
            g.profiles
                .allow([Pf::View, Pf::Create, Pf::Update, Pf::Validate]);
            g.requests.allow([
                Rq::View,
                Rq::Create,
                Rq::Update,
                Rq::Process,
                Rq::Validate,
                Rq::Complete,
                Rq::Assign,
            ]);
            g.documents
                .allow([Dc::View, Dc::Create, Dc::Update, Dc::Validate, Dc::Generate]);
            g.organizations.allow([Or::View, Or::Update, Or::Manage]);
            g.services.allow([Sv::View, Sv::Update, Sv::Configure]);
            g.appointments
                .allow([Ap::View, Ap::Create, Ap::Update, Ap::Reschedule, Ap::Cancel]);
            g.users.allow([Us::View, Us::Create, Us::Update, Us::Manage]);
            g.intelligence_notes
                .allow([In::View, In::Create, In::Update, In::Delete, In::ViewHistory]);
        })
        .role(Role::FirstCounselor, |g| {
            g.profiles.allow([Pf::View, Pf::Update, Pf::Validate]);
            g.requests.allow([
                Rq::View,
                Rq::Update,
                Rq::Process,
                Rq::Validate,
                Rq::Complete,
                Rq::Assign,
            ]);
            g.documents.allow([Dc::View, Dc::Validate, Dc::Generate]);
            g.organizations.allow([Or::View, Or::Update]);
            g.services.allow([Sv::View, Sv::Update]);
            g.appointments
                .allow([Ap::View, Ap::Update, Ap::Reschedule, Ap::Cancel]);
            g.users.allow([Us::View, Us::Update]);
            g.intelligence_notes.allow([In::View, In::ViewHistory]);
        })
        .role(Role::Paymaster, |g| {
            g.profiles.allow([Pf::View]);
            g.requests.allow([Rq::View, Rq::Process, Rq::Validate]);
            g.documents.allow([Dc::View, Dc::Validate]);
            g.services.allow([Sv::View]);
            g.appointments.allow([Ap::View]);
        })
        .role(Role::EconomicCounselor, |g| {
            g.profiles.allow([Pf::View]);
            g.requests.allow([Rq::View, Rq::Process]);
            g.documents.allow([Dc::View]);
            g.organizations.allow([Or::View]);
            g.services.allow([Sv::View]);
        })
        .role(Role::SocialCounselor, |g| {
            g.profiles.allow([Pf::View, Pf::Update]);
            g.requests.allow([Rq::View, Rq::Process, Rq::Validate]);
            g.documents.allow([Dc::View, Dc::Validate]);
            g.services.allow([Sv::View]);
            g.appointments.allow([Ap::View, Ap::Create, Ap::Update]);
        })
        .role(Role::CommunicationCounselor, |g| {
            g.profiles.allow([Pf::View]);
            g.organizations.allow([Or::View]);
            g.services.allow([Sv::View]);
        })
        .role(Role::Chancellor, |g| {
            g.profiles.allow([Pf::View, Pf::Validate]);
            g.requests
                .allow([Rq::View, Rq::Process, Rq::Validate, Rq::Complete]);
            g.documents.allow([Dc::View, Dc::Validate, Dc::Generate]);
            g.services.allow([Sv::View]);
            g.appointments
                .allow([Ap::View, Ap::Create, Ap::Update, Ap::Reschedule]);
        })
        .role(Role::FirstSecretary, |g| {
            g.profiles.allow([Pf::View]);
            g.requests.allow([Rq::View, Rq::Process]);
            g.documents.allow([Dc::View, Dc::Validate]);
            g.services.allow([Sv::View]);
            g.appointments.allow([Ap::View, Ap::Create, Ap::Update]);
        })
        .role(Role::Receptionist, |g| {
            g.profiles.allow([Pf::View]);
            g.requests.allow([Rq::View]);
            g.services.allow([Sv::View]);
            g.appointments.allow([Ap::View, Ap::Create]);
        })
}

// Consulate hierarchy, levels 1 to 6.
fn consulate(builder: RoleTableBuilder) -> RoleTableBuilder {
    builder
        .role(Role::ConsulGeneral, |g| {
            g.profiles
                .allow([Pf::View, Pf::Create, Pf::Update, Pf::Validate]);
            g.requests.allow([
                Rq::View,
                Rq::Create,
                Rq::Update,
                Rq::Process,
                Rq::Validate,
                Rq::Complete,
                Rq::Assign,
            ]);
            g.documents
                .allow([Dc::View, Dc::Create, Dc::Update, Dc::Validate, Dc::Generate]);
            g.organizations.allow([Or::View, Or::Update, Or::Manage]);
            g.services.allow([Sv::View, Sv::Update, Sv::Configure]);
            g.appointments
                .allow([Ap::View, Ap::Create, Ap::Update, Ap::Reschedule, Ap::Cancel]);
            g.users.allow([Us::View, Us::Create, Us::Update, Us::Manage]);
            // No delete, unlike the ambassador.
            g.intelligence_notes
                .allow([In::View, In::Create, In::Update, In::ViewHistory]);
        })
        .role(Role::Consul, |g| {
            g.profiles.allow([Pf::View, Pf::Update, Pf::Validate]);
            g.requests.allow([
                Rq::View,
                Rq::Update,
                Rq::Process,
                Rq::Validate,
                Rq::Complete,
                Rq::Assign,
            ]);
            g.documents.allow([Dc::View, Dc::Validate, Dc::Generate]);
            g.organizations.allow([Or::View, Or::Update]);
            g.services.allow([Sv::View, Sv::Update]);
            g.appointments
                .allow([Ap::View, Ap::Update, Ap::Reschedule, Ap::Cancel]);
            g.users.allow([Us::View, Us::Update]);
        })
        .role(Role::ViceConsul, |g| {
            g.profiles.allow([Pf::View, Pf::Validate]);
            g.requests
                .allow([Rq::View, Rq::Process, Rq::Validate, Rq::Complete]);
            g.documents.allow([Dc::View, Dc::Validate, Dc::Generate]);
            g.services.allow([Sv::View]);
            g.appointments.allow([Ap::View, Ap::Update, Ap::Reschedule]);
        })
        .role(Role::ConsularAffairsOfficer, |g| {
            g.profiles.allow([Pf::View, Pf::Validate]);
            g.requests
                .allow([Rq::View])
                .when(Rq::Process, assigned_to_acting_agent)
                .allow([Rq::Validate])
                .when(Rq::Complete, assigned_to_acting_agent);
            g.documents.allow([Dc::View, Dc::Validate]);
            g.services.allow([Sv::View]);
            g.appointments.allow([Ap::View, Ap::Update]);
        })
        .role(Role::ConsularAgent, |g| {
            g.profiles.allow([Pf::View]);
            g.requests
                .allow([Rq::View])
                .when(Rq::Process, assigned_to_acting_agent)
                .when(Rq::Update, assigned_to_acting_agent);
            g.documents.allow([Dc::View, Dc::Validate]);
            g.services.allow([Sv::View]);
            g.appointments.allow([Ap::View, Ap::Create]);
        })
        .role(Role::Intern, |g| {
            g.profiles.allow([Pf::View]);
            g.requests.allow([Rq::View]);
            g.documents.allow([Dc::View]);
            g.services.allow([Sv::View]);
            g.appointments.allow([Ap::View]);
        })
}
