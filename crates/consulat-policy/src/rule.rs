//! Permission rules and per-resource rule sets.
//!
//! A rule is either fixed when the table is written (`Static`) or computed
//! from the acting principal and the entity at call time (`Dynamic`). An
//! action with no rule is denied.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use consulat_contracts::{EvaluationError, Principal, Resource};

/// A pure check over the acting principal and one entity of resource `R`.
///
/// Predicates must not perform I/O or depend on ambient state. They return
/// `Err` only when the inputs are malformed; a legitimate "no" is `Ok(false)`.
pub type Predicate<R> = Arc<
    dyn Fn(&Principal, &<R as Resource>::Entity) -> Result<bool, EvaluationError> + Send + Sync,
>;

/// The outcome a table entry produces for one (role, resource, action).
pub enum Rule<R: Resource> {
    /// Granted (`true`) or denied (`false`) regardless of the entity.
    Static(bool),
    /// Granted only if the predicate holds for the supplied entity.
    /// Denied when no entity is supplied.
    Dynamic(Predicate<R>),
}

impl<R: Resource> Clone for Rule<R> {
    fn clone(&self) -> Self {
        match self {
            Rule::Static(granted) => Rule::Static(*granted),
            Rule::Dynamic(predicate) => Rule::Dynamic(Arc::clone(predicate)),
        }
    }
}

impl<R: Resource> fmt::Debug for Rule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Static(granted) => f.debug_tuple("Static").field(granted).finish(),
            Rule::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Coarse classification of a table entry, for listings that cannot supply
/// an entity (admin screens, the demo `matrix` command).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Granted,
    Conditional,
    Denied,
}

impl<R: Resource> Rule<R> {
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Static(true) => RuleKind::Granted,
            Rule::Static(false) => RuleKind::Denied,
            Rule::Dynamic(_) => RuleKind::Conditional,
        }
    }
}

/// The rules one role holds for one resource, keyed by that resource's actions.
///
/// Only `R::Action` values can be inserted, so attaching an action the
/// resource does not declare fails to compile.
pub struct ActionRules<R: Resource> {
    rules: BTreeMap<R::Action, Rule<R>>,
}

impl<R: Resource> Default for ActionRules<R> {
    fn default() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }
}

impl<R: Resource> Clone for ActionRules<R> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<R: Resource> fmt::Debug for ActionRules<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.rules.iter()).finish()
    }
}

impl<R: Resource> ActionRules<R> {
    /// Grant each of `actions` unconditionally.
    pub fn allow(&mut self, actions: impl IntoIterator<Item = R::Action>) -> &mut Self {
        for action in actions {
            self.rules.insert(action, Rule::Static(true));
        }
        self
    }

    /// Record an explicit denial. Equivalent to leaving the action out.
    pub fn deny(&mut self, action: R::Action) -> &mut Self {
        self.rules.insert(action, Rule::Static(false));
        self
    }

    /// Grant `action` only when `predicate` holds for the entity.
    pub fn when<F>(&mut self, action: R::Action, predicate: F) -> &mut Self
    where
        F: Fn(&Principal, &R::Entity) -> Result<bool, EvaluationError> + Send + Sync + 'static,
    {
        self.rules.insert(action, Rule::Dynamic(Arc::new(predicate)));
        self
    }

    pub fn rule(&self, action: R::Action) -> Option<&Rule<R>> {
        self.rules.get(&action)
    }

    /// `Denied` for actions without an entry.
    pub fn kind(&self, action: R::Action) -> RuleKind {
        self.rule(action).map_or(RuleKind::Denied, Rule::kind)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
