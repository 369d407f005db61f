//! Per-membership permission overrides.
//!
//! An organization can attach explicit grant or deny entries to a
//! membership, keyed `"<resource>.<action>"`, and switch features on with
//! `"feature.<name>"`. Overrides sit in front of the role table; they never
//! change it.
//!
//! Example in TOML:
//! ```toml
//! [[overrides]]
//! permission = "requests.assign"
//! effect = "grant"
//!
//! [[overrides]]
//! permission = "documents.generate"
//! effect = "deny"
//!
//! [[overrides]]
//! permission = "feature.ai_assistant"
//! effect = "grant"
//! ```

use std::{
    collections::{hash_map::Entry, HashMap},
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use consulat_contracts::{AccessError, AccessResult, ActionKind, Principal, ResourceKind};

use crate::{engine::Authorizer, table::TableResource};

const FEATURE_PREFIX: &str = "feature";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Grant,
    Deny,
}

/// One override as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    /// `"<resource>.<action>"` or `"feature.<name>"`.
    pub permission: String,
    pub effect: Effect,
}

#[derive(Debug, Deserialize)]
struct OverrideConfig {
    #[serde(default)]
    overrides: Vec<OverrideEntry>,
}

/// Validated overrides for one membership.
///
/// When the same key appears with both effects, deny wins.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    permissions: HashMap<(ResourceKind, &'static str), Effect>,
    features: HashMap<String, Effect>,
}

impl Overrides {
    /// Validate `entries` and index them.
    ///
    /// Returns `AccessError::ConfigError` for a key naming an unknown
    /// resource, an action the resource does not declare, or an empty
    /// feature name.
    pub fn from_entries(entries: impl IntoIterator<Item = OverrideEntry>) -> AccessResult<Self> {
        let mut overrides = Self::default();
        for entry in entries {
            let (prefix, name) = entry.permission.split_once('.').ok_or_else(|| {
                AccessError::ConfigError {
                    reason: format!(
                        "override key '{}' must look like '<resource>.<action>'",
                        entry.permission
                    ),
                }
            })?;

            if prefix == FEATURE_PREFIX {
                if name.is_empty() {
                    return Err(AccessError::ConfigError {
                        reason: format!("override key '{}' names no feature", entry.permission),
                    });
                }
                merge(overrides.features.entry(name.to_string()), entry.effect);
                continue;
            }

            let resource = ResourceKind::from_str(prefix).map_err(|e| config_error(&entry, e))?;
            let action = resource
                .canonical_action(name)
                .map_err(|e| config_error(&entry, e))?;
            merge(overrides.permissions.entry((resource, action)), entry.effect);
        }
        Ok(overrides)
    }

    /// Parse `s` as TOML (`[[overrides]]` tables) and validate it.
    pub fn from_toml_str(s: &str) -> AccessResult<Self> {
        let config: OverrideConfig = toml::from_str(s).map_err(|e| AccessError::ConfigError {
            reason: format!("failed to parse overrides TOML: {}", e),
        })?;
        Self::from_entries(config.overrides)
    }

    /// Read the file at `path` and parse it with [`Overrides::from_toml_str`].
    pub fn from_file(path: &Path) -> AccessResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AccessError::ConfigError {
            reason: format!("failed to read overrides file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The override for `action` on resource `R`, if one was configured.
    pub fn effect<R: TableResource>(&self, action: R::Action) -> Option<Effect> {
        self.permissions.get(&(R::KIND, action.as_str())).copied()
    }

    pub fn feature(&self, name: &str) -> Option<Effect> {
        self.features.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.features.is_empty()
    }
}

fn merge<K>(slot: Entry<'_, K, Effect>, effect: Effect) {
    let current = slot.or_insert(effect);
    if effect == Effect::Deny {
        *current = Effect::Deny;
    }
}

fn config_error(entry: &OverrideEntry, source: AccessError) -> AccessError {
    AccessError::ConfigError {
        reason: format!("invalid override key '{}': {}", entry.permission, source),
    }
}

impl Authorizer {
    /// [`Authorizer::has_permission`] with membership overrides in front.
    ///
    /// No principal → deny. A deny override denies, a grant override grants,
    /// and otherwise the role table decides.
    pub fn has_permission_with_overrides<R: TableResource>(
        &self,
        user: Option<&Principal>,
        overrides: &Overrides,
        resource: R,
        action: R::Action,
        entity: Option<&R::Entity>,
    ) -> AccessResult<bool> {
        let Some(principal) = user else {
            return Ok(false);
        };

        match overrides.effect::<R>(action) {
            Some(effect) => {
                debug!(
                    user_id = %principal.id,
                    resource = %R::KIND,
                    action = %action,
                    ?effect,
                    "override applied"
                );
                Ok(effect == Effect::Grant)
            }
            None => self.has_permission(user, resource, action, entity),
        }
    }

    /// Features have no table fallback: only an explicit grant enables one.
    pub fn has_feature(
        &self,
        user: Option<&Principal>,
        overrides: &Overrides,
        feature: &str,
    ) -> bool {
        user.is_some() && overrides.feature(feature) == Some(Effect::Grant)
    }
}

#[cfg(test)]
mod tests {
    use consulat_contracts::{
        AccessError, Document, DocumentAction, Documents, Principal, RequestAction, Requests, Role,
    };

    use super::*;

    fn agent() -> Principal {
        Principal::new("u1").with_role(Role::Agent).with_membership("m1")
    }

    #[test]
    fn grant_override_adds_an_action_the_table_denies() {
        let overrides = Overrides::from_toml_str(
            r#"
            [[overrides]]
            permission = "requests.assign"
            effect = "grant"
        "#,
        )
        .unwrap();
        let authorizer = Authorizer::consular();
        let user = agent();

        assert!(!authorizer
            .has_permission(Some(&user), Requests, RequestAction::Assign, None)
            .unwrap());
        assert!(authorizer
            .has_permission_with_overrides(
                Some(&user),
                &overrides,
                Requests,
                RequestAction::Assign,
                None
            )
            .unwrap());
    }

    #[test]
    fn deny_override_removes_a_table_grant() {
        let overrides = Overrides::from_toml_str(
            r#"
            [[overrides]]
            permission = "documents.validate"
            effect = "deny"
        "#,
        )
        .unwrap();
        let authorizer = Authorizer::consular();
        let user = agent();

        assert!(!authorizer
            .has_permission_with_overrides(
                Some(&user),
                &overrides,
                Documents,
                DocumentAction::Validate,
                None
            )
            .unwrap());
        // Actions without an override still follow the table.
        assert!(authorizer
            .has_permission_with_overrides(
                Some(&user),
                &overrides,
                Documents,
                DocumentAction::View,
                None
            )
            .unwrap());
    }

    #[test]
    fn overrides_never_grant_without_a_principal() {
        let overrides = Overrides::from_entries([OverrideEntry {
            permission: "documents.delete".to_string(),
            effect: Effect::Grant,
        }])
        .unwrap();
        let doc = Document {
            id: "d1".to_string(),
            owner_id: "u1".to_string(),
        };

        let granted = Authorizer::consular()
            .has_permission_with_overrides(
                None,
                &overrides,
                Documents,
                DocumentAction::Delete,
                Some(&doc),
            )
            .unwrap();
        assert!(!granted);
    }

    #[test]
    fn conflicting_entries_resolve_to_deny() {
        let overrides = Overrides::from_toml_str(
            r#"
            [[overrides]]
            permission = "requests.delete"
            effect = "deny"

            [[overrides]]
            permission = "requests.delete"
            effect = "grant"
        "#,
        )
        .unwrap();
        assert_eq!(
            overrides.effect::<Requests>(RequestAction::Delete),
            Some(Effect::Deny)
        );
    }

    #[test]
    fn features_require_an_explicit_grant() {
        let overrides = Overrides::from_toml_str(
            r#"
            [[overrides]]
            permission = "feature.ai_assistant"
            effect = "grant"

            [[overrides]]
            permission = "feature.map_view"
            effect = "deny"
        "#,
        )
        .unwrap();
        let authorizer = Authorizer::consular();
        let user = agent();

        assert!(authorizer.has_feature(Some(&user), &overrides, "ai_assistant"));
        assert!(!authorizer.has_feature(Some(&user), &overrides, "map_view"));
        assert!(!authorizer.has_feature(Some(&user), &overrides, "unlisted"));
        assert!(!authorizer.has_feature(None, &overrides, "ai_assistant"));
        assert!(!authorizer.has_feature(Some(&user), &Overrides::default(), "ai_assistant"));
    }

    #[test]
    fn empty_document_has_no_overrides() {
        let overrides = Overrides::from_toml_str("").unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn unknown_action_for_resource_is_config_error() {
        let result = Overrides::from_toml_str(
            r#"
            [[overrides]]
            permission = "appointments.process"
            effect = "grant"
        "#,
        );
        match result {
            Err(AccessError::ConfigError { reason }) => {
                assert!(reason.contains("appointments.process"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn key_without_separator_is_config_error() {
        let result = Overrides::from_entries([OverrideEntry {
            permission: "requests".to_string(),
            effect: Effect::Grant,
        }]);
        assert!(matches!(result, Err(AccessError::ConfigError { .. })));

        let result = Overrides::from_entries([OverrideEntry {
            permission: "feature.".to_string(),
            effect: Effect::Grant,
        }]);
        assert!(matches!(result, Err(AccessError::ConfigError { .. })));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        match Overrides::from_toml_str("this is not valid toml ][[[") {
            Err(AccessError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse overrides TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn unknown_effect_is_config_error() {
        let result = Overrides::from_toml_str(
            r#"
            [[overrides]]
            permission = "requests.view"
            effect = "maybe"
        "#,
        );
        assert!(matches!(result, Err(AccessError::ConfigError { .. })));
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = Overrides::from_file(Path::new("/nonexistent/overrides.toml"));
        match result {
            Err(AccessError::ConfigError { reason }) => {
                assert!(reason.contains("failed to read overrides file"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
