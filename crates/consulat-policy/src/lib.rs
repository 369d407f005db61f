//! # consulat-policy
//!
//! A fail-closed, role-based permission evaluator with attribute checks for
//! consular case management.
//!
//! ## Overview
//!
//! [`RoleTable`] maps role → resource → action → [`Rule`]. A rule is a fixed
//! grant or a predicate over the acting [`Principal`](consulat_contracts::Principal)
//! and the entity being acted on. [`Authorizer`] evaluates a query against
//! every role the principal holds and grants if any of them does. Anything
//! missing (principal, role entry, entity for a predicate) denies.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use consulat_contracts::{AppointmentAction, Appointments, Principal, Role};
//! use consulat_policy::Authorizer;
//!
//! let authorizer = Authorizer::consular();
//! let manager = Principal::new("u3").with_role(Role::Manager);
//!
//! authorizer.assert_permission(Some(&manager), Appointments, AppointmentAction::Cancel, None)?;
//! let buttons = authorizer.resource_permissions(Some(&manager), Appointments, None)?;
//! ```
//!
//! ## Overrides
//!
//! [`Overrides`] adds per-membership grant/deny entries and feature flags
//! loaded from TOML, evaluated in front of the table.

pub mod consular;
pub mod engine;
pub mod guard;
pub mod overrides;
pub mod rule;
pub mod table;

pub use engine::Authorizer;
pub use guard::{has_all_roles, has_any_role, has_role};
pub use overrides::{Effect, OverrideEntry, Overrides};
pub use rule::{ActionRules, Predicate, Rule, RuleKind};
pub use table::{RoleGrants, RoleTable, RoleTableBuilder, TableResource};

// ── Tests ─────────────────────────────────────────────────────────────────────
